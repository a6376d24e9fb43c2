//! Aggregator — the brand dimension table.

use crate::deriver::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One KPI row per brand observed in the transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDimension {
    pub brand: String,
    pub total_volume: f64,
    pub transaction_count: u64,
    pub approval_count: u64,
    pub average_ticket: f64,
    pub chargeback_count: u64,
    pub fraud_count: u64,
    pub average_processing_time: f64,
    pub approval_rate: f64,
    pub chargeback_rate: f64,
    pub fraud_rate: f64,
}

#[derive(Default)]
struct BrandTotals {
    volume: f64,
    count: u64,
    approvals: u64,
    chargebacks: u64,
    frauds: u64,
    processing_time: f64,
}

/// Group by brand, sorted by brand label. Sums accumulate in row order.
/// Brands with no transactions produce no row, so every divisor is >= 1.
pub fn aggregate_by_brand(transactions: &[Transaction]) -> Vec<BrandDimension> {
    let mut totals: BTreeMap<&str, BrandTotals> = BTreeMap::new();
    for t in transactions {
        let entry = totals.entry(t.brand.as_str()).or_default();
        entry.volume += t.amount;
        entry.count += 1;
        entry.approvals += t.approved as u64;
        entry.chargebacks += t.chargeback as u64;
        entry.frauds += t.fraud as u64;
        entry.processing_time += t.processing_time;
    }

    let rows: Vec<BrandDimension> = totals
        .into_iter()
        .map(|(brand, b)| {
            let n = b.count as f64;
            BrandDimension {
                brand: brand.to_string(),
                total_volume: b.volume,
                transaction_count: b.count,
                approval_count: b.approvals,
                average_ticket: b.volume / n,
                chargeback_count: b.chargebacks,
                fraud_count: b.frauds,
                average_processing_time: b.processing_time / n,
                approval_rate: b.approvals as f64 / n,
                chargeback_rate: b.chargebacks as f64 / n,
                fraud_rate: b.frauds as f64 / n,
            }
        })
        .collect();

    for row in &rows {
        log::debug!(
            "brand={} txns={} tpv={:.2} approval={:.4}",
            row.brand,
            row.transaction_count,
            row.total_volume,
            row.approval_rate
        );
    }
    rows
}
