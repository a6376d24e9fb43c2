//! Validator — dataset-wide sanity checks run before anything is exported.
//!
//! Any failure aborts the run. Generation is deterministic, so a failing
//! configuration fails identically on every retry.

use crate::{
    config::GeneratorConfig,
    deriver::Transaction,
    error::{GenError, GenResult},
    normalize::normalize_status,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rates closer than this to either bound pass, with a warning.
pub const NEAR_BOUND_MARGIN: f64 = 0.02;

/// Summary of a dataset that passed every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub row_count: usize,
    pub approval_rate: f64,
    pub approval_count: u64,
    pub chargeback_count: u64,
    pub fraud_count: u64,
    /// The approval rate passed but sits within NEAR_BOUND_MARGIN of a bound.
    pub near_rate_bound: bool,
}

pub struct Validator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, transactions: &[Transaction]) -> GenResult<ValidationReport> {
        if transactions.is_empty() {
            return Err(GenError::configuration("generated dataset is empty"));
        }

        self.check_status_domain(transactions)?;
        check_flags(transactions)?;

        let approval_count: u64 = transactions.iter().map(|t| t.approved as u64).sum();
        let approval_rate = approval_count as f64 / transactions.len() as f64;
        let bounds = self.config.approval_rate_bounds;
        if approval_rate < bounds.min || approval_rate > bounds.max {
            return Err(GenError::Distribution {
                rate: approval_rate,
                floor: bounds.min,
                ceiling: bounds.max,
            });
        }

        let near_rate_bound = approval_rate - bounds.min < NEAR_BOUND_MARGIN
            || bounds.max - approval_rate < NEAR_BOUND_MARGIN;
        if near_rate_bound {
            log::warn!(
                "Approval rate {approval_rate:.4} is within {NEAR_BOUND_MARGIN} of [{}, {}]",
                bounds.min,
                bounds.max
            );
        }

        let report = ValidationReport {
            row_count: transactions.len(),
            approval_rate,
            approval_count,
            chargeback_count: transactions.iter().map(|t| t.chargeback as u64).sum(),
            fraud_count: transactions.iter().map(|t| t.fraud as u64).sum(),
            near_rate_bound,
        };
        log::debug!("validator: {report:?}");
        Ok(report)
    }

    /// Every normalized status must belong to the configured vocabulary.
    fn check_status_domain(&self, transactions: &[Transaction]) -> GenResult<()> {
        let vocabulary = self.config.status_vocabulary.normalized();
        let observed: BTreeSet<String> = transactions
            .iter()
            .map(|t| normalize_status(&t.status))
            .collect();
        let unknown: Vec<&String> = observed
            .iter()
            .filter(|s| !vocabulary.contains(s.as_str()))
            .collect();
        if !unknown.is_empty() {
            return Err(GenError::configuration(format!(
                "unexpected status labels after normalization: {unknown:?}"
            )));
        }
        Ok(())
    }
}

fn check_flags(transactions: &[Transaction]) -> GenResult<()> {
    for (row, t) in transactions.iter().enumerate() {
        for (column, value) in [
            ("approved", t.approved),
            ("chargeback", t.chargeback),
            ("fraud", t.fraud),
        ] {
            if value > 1 {
                return Err(GenError::InvariantViolation {
                    row,
                    detail: format!("{column} = {value}, expected 0 or 1"),
                });
            }
        }
        if t.chargeback == 1 && t.approved == 0 {
            return Err(GenError::InvariantViolation {
                row,
                detail: "chargeback on a transaction that was not approved".into(),
            });
        }
    }
    Ok(())
}
