//! Field Deriver — dependent columns computed from sampled rows.
//!
//! DRAW ORDER (fixed, documented, never reordered):
//!   1. approved         no draws
//!   2. chargeback       calendar stream, one roll per APPROVED row, row order
//!   3. fraud            calendar stream, one roll per row, row order
//!   4. processing_time  sampling stream, one draw per row, row order
//!   5. year_month       no draws
//!
//! Changing this order changes every generated dataset for a given seed.

use crate::{
    config::GeneratorConfig,
    normalize::normalize_status,
    rng::DrawStreams,
    sampler::{uniform_cents, RawDraw},
    types::{Flag, YearMonth},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One fully derived transaction row. Columns map 1:1 to the export tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub brand: String,
    pub status: String,
    pub amount: f64,
    pub approved: Flag,
    pub chargeback: Flag,
    pub fraud: Flag,
    pub processing_time: f64,
    pub year_month: YearMonth,
}

/// `YYYY-MM` bucket for a calendar date.
pub fn year_month(date: NaiveDate) -> YearMonth {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub struct FieldDeriver<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> FieldDeriver<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn derive(&self, rows: Vec<RawDraw>, streams: &mut DrawStreams) -> Vec<Transaction> {
        let vocabulary = self.config.status_vocabulary.normalized();

        let approved: Vec<Flag> = rows
            .iter()
            .map(|r| Flag::from(vocabulary.is_approved(&normalize_status(&r.status))))
            .collect();

        let p_chargeback = self.config.chargeback_probability;
        let chargeback: Vec<Flag> = approved
            .iter()
            .map(|a| Flag::from(*a == 1 && streams.calendar.chance(p_chargeback)))
            .collect();

        let p_fraud = self.config.fraud_probability;
        let fraud: Vec<Flag> = (0..rows.len())
            .map(|_| Flag::from(streams.calendar.chance(p_fraud)))
            .collect();

        let range = self.config.processing_time;
        let processing: Vec<f64> = (0..rows.len())
            .map(|_| uniform_cents(&mut streams.sampling, range.min, range.max))
            .collect();

        let transactions: Vec<Transaction> = rows
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Transaction {
                year_month: year_month(raw.date),
                date: raw.date,
                brand: raw.brand,
                status: raw.status,
                amount: raw.amount,
                approved: approved[i],
                chargeback: chargeback[i],
                fraud: fraud[i],
                processing_time: processing[i],
            })
            .collect();

        log::debug!(
            "deriver: {} rows, {} approved, {} chargebacks, {} fraud",
            transactions.len(),
            approved.iter().map(|a| *a as usize).sum::<usize>(),
            chargeback.iter().map(|c| *c as usize).sum::<usize>(),
            fraud.iter().map(|f| *f as usize).sum::<usize>()
        );
        transactions
    }
}
