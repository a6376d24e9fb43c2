//! SQLite persistence layer for exported datasets.
//!
//! RULE: Only store.rs talks to the database.
//! Exporters call store methods — they never execute SQL directly.

use crate::{
    aggregator::BrandDimension,
    deriver::Transaction,
    error::GenResult,
};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection};

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the export database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version) VALUES (?1, ?2, ?3)",
            params![run_id, seed as i64, version],
        )?;
        Ok(())
    }

    /// Write a run and both of its tables in one SQL transaction, replacing
    /// whatever an earlier export stored under the same run id.
    pub fn replace_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        transactions: &[Transaction],
        brands: &[BrandDimension],
    ) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let replaced = delete_run_rows(&tx, run_id)?;
        tx.execute(
            "INSERT INTO run (run_id, seed, version) VALUES (?1, ?2, ?3)",
            params![run_id, seed as i64, version],
        )?;
        write_transactions(&tx, run_id, transactions)?;
        write_brand_dimension(&tx, run_id, brands)?;
        tx.commit()?;
        if replaced > 0 {
            log::info!("store: replaced earlier export of {run_id}");
        }
        log::debug!("store: {} transactions for {run_id}", transactions.len());
        Ok(())
    }

    pub fn run_count(&self) -> GenResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn run_seed(&self, run_id: &str) -> GenResult<u64> {
        let seed: i64 = self.conn.query_row(
            "SELECT seed FROM run WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(seed as u64)
    }

    // ── Fact table ─────────────────────────────────────────────

    /// Insert every transaction in one SQL transaction. Row order is kept
    /// in `row_index` so reads come back in generation order.
    pub fn insert_transactions(&self, run_id: &str, rows: &[Transaction]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_transactions(&tx, run_id, rows)?;
        tx.commit()?;
        Ok(())
    }

    pub fn transaction_count(&self, run_id: &str) -> GenResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM fact_transaction WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn transactions(&self, run_id: &str) -> GenResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, brand, status, amount, approved, chargeback, fraud,
                    processing_time, year_month
             FROM fact_transaction WHERE run_id = ?1
             ORDER BY row_index ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                let date: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok(Transaction {
                    date,
                    brand: row.get(1)?,
                    status: row.get(2)?,
                    amount: row.get(3)?,
                    approved: row.get(4)?,
                    chargeback: row.get(5)?,
                    fraud: row.get(6)?,
                    processing_time: row.get(7)?,
                    year_month: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Total volume straight from the fact table, for reconciliation.
    pub fn volume_for_brand(&self, run_id: &str, brand: &str) -> GenResult<f64> {
        let volume: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM fact_transaction
             WHERE run_id = ?1 AND brand = ?2",
            params![run_id, brand],
            |row| row.get(0),
        )?;
        Ok(volume)
    }

    // ── Dimension table ────────────────────────────────────────

    pub fn insert_brand_dimension(&self, run_id: &str, rows: &[BrandDimension]) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_brand_dimension(&tx, run_id, rows)?;
        tx.commit()?;
        Ok(())
    }

    pub fn brand_dimension(&self, run_id: &str) -> GenResult<Vec<BrandDimension>> {
        let mut stmt = self.conn.prepare(
            "SELECT brand, total_volume, transaction_count, approval_count, average_ticket,
                    chargeback_count, fraud_count, average_processing_time,
                    approval_rate, chargeback_rate, fraud_rate
             FROM dim_brand WHERE run_id = ?1
             ORDER BY brand ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(BrandDimension {
                    brand: row.get(0)?,
                    total_volume: row.get(1)?,
                    transaction_count: row.get::<_, i64>(2)? as u64,
                    approval_count: row.get::<_, i64>(3)? as u64,
                    average_ticket: row.get(4)?,
                    chargeback_count: row.get::<_, i64>(5)? as u64,
                    fraud_count: row.get::<_, i64>(6)? as u64,
                    average_processing_time: row.get(7)?,
                    approval_rate: row.get(8)?,
                    chargeback_rate: row.get(9)?,
                    fraud_rate: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Remove a run and its rows. Returns the number of run rows deleted.
fn delete_run_rows(conn: &Connection, run_id: &str) -> GenResult<usize> {
    conn.execute("DELETE FROM dim_brand WHERE run_id = ?1", params![run_id])?;
    conn.execute("DELETE FROM fact_transaction WHERE run_id = ?1", params![run_id])?;
    let runs = conn.execute("DELETE FROM run WHERE run_id = ?1", params![run_id])?;
    Ok(runs)
}

fn write_transactions(conn: &Connection, run_id: &str, rows: &[Transaction]) -> GenResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO fact_transaction (
            run_id, row_index, date, brand, status, amount,
            approved, chargeback, fraud, processing_time, year_month
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for (i, t) in rows.iter().enumerate() {
        stmt.execute(params![
            run_id,
            i as i64,
            t.date.to_string(),
            &t.brand,
            &t.status,
            t.amount,
            t.approved,
            t.chargeback,
            t.fraud,
            t.processing_time,
            &t.year_month,
        ])?;
    }
    Ok(())
}

fn write_brand_dimension(conn: &Connection, run_id: &str, rows: &[BrandDimension]) -> GenResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO dim_brand (
            run_id, brand, total_volume, transaction_count, approval_count,
            average_ticket, chargeback_count, fraud_count, average_processing_time,
            approval_rate, chargeback_rate, fraud_rate
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )?;
    for d in rows {
        stmt.execute(params![
            run_id,
            &d.brand,
            d.total_volume,
            d.transaction_count as i64,
            d.approval_count as i64,
            d.average_ticket,
            d.chargeback_count as i64,
            d.fraud_count as i64,
            d.average_processing_time,
            d.approval_rate,
            d.chargeback_rate,
            d.fraud_rate,
        ])?;
    }
    Ok(())
}
