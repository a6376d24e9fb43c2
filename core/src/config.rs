use crate::{
    error::{GenError, GenResult},
    normalize::normalize_status,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Probabilities must sum to 1 within this tolerance.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusVocabulary {
    /// Labels that count as an approved outcome, compared after normalization.
    pub approved: Vec<String>,
    /// Labels that count as a denied outcome.
    pub denied: Vec<String>,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            approved: vec!["approved".into(), "aprovado".into()],
            denied: vec!["denied".into(), "negado".into()],
        }
    }
}

impl StatusVocabulary {
    /// A copy with every alias passed through `normalize_status`, so
    /// lookups can compare normalized labels directly.
    pub fn normalized(&self) -> Self {
        Self {
            approved: self.approved.iter().map(|a| normalize_status(a)).collect(),
            denied: self.denied.iter().map(|d| normalize_status(d)).collect(),
        }
    }

    /// True if the normalized label is an approved alias.
    pub fn is_approved(&self, normalized: &str) -> bool {
        self.approved.iter().any(|a| a == normalized)
    }

    /// True if the normalized label belongs to either outcome.
    pub fn contains(&self, normalized: &str) -> bool {
        self.is_approved(normalized) || self.denied.iter().any(|d| d == normalized)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Whole days from start to end (0 when start == end).
    pub fn days_between(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub transaction_count: usize,
    pub brands: Vec<String>,
    pub statuses: Vec<String>,
    pub status_probabilities: Vec<f64>,
    pub amount: Range,
    pub dates: DateRange,
    pub chargeback_probability: f64,
    pub fraud_probability: f64,
    pub processing_time: Range,
    pub seed: u64,
    pub approval_rate_bounds: Range,
    pub status_vocabulary: StatusVocabulary,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            transaction_count: 100_000,
            brands: vec!["Visa".into(), "Mastercard".into(), "Elo".into()],
            statuses: vec!["Aprovado".into(), "Negado".into()],
            status_probabilities: vec![0.88, 0.12],
            amount: Range { min: 5000.0, max: 50000.0 },
            dates: DateRange {
                start: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or_default(),
                end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            },
            chargeback_probability: 0.05,
            fraud_probability: 0.01,
            processing_time: Range { min: 0.5, max: 2.5 },
            seed: 42,
            approval_rate_bounds: Range { min: 0.70, max: 0.95 },
            status_vocabulary: StatusVocabulary::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file. Fields absent from the file keep their defaults.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!(
            "Loaded config from {path}: n={} brands={:?} seed={}",
            config.transaction_count,
            config.brands,
            config.seed
        );
        Ok(config)
    }

    /// Reference distributions at a size that keeps tests fast.
    pub fn default_test() -> Self {
        Self {
            transaction_count: 2_000,
            ..Self::default()
        }
    }

    /// Explicit bounds check. The pipeline refuses to start on failure.
    pub fn validate(&self) -> GenResult<()> {
        if self.transaction_count == 0 {
            return Err(GenError::configuration("transaction_count must be positive"));
        }

        if self.brands.is_empty() {
            return Err(GenError::configuration("brand set is empty"));
        }
        let mut seen = HashSet::new();
        for brand in &self.brands {
            if !seen.insert(brand.as_str()) {
                return Err(GenError::configuration(format!("duplicate brand '{brand}'")));
            }
        }

        if self.statuses.is_empty() {
            return Err(GenError::configuration("status set is empty"));
        }
        if self.statuses.len() != self.status_probabilities.len() {
            return Err(GenError::configuration(format!(
                "{} statuses but {} probabilities",
                self.statuses.len(),
                self.status_probabilities.len()
            )));
        }
        if let Some(p) = self
            .status_probabilities
            .iter()
            .find(|p| !p.is_finite() || **p < 0.0)
        {
            return Err(GenError::configuration(format!(
                "status probability {p} is not a non-negative number"
            )));
        }
        let total: f64 = self.status_probabilities.iter().sum();
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(GenError::configuration(format!(
                "status probabilities sum to {total}, expected 1"
            )));
        }

        check_range("amount", self.amount)?;
        check_range("processing_time", self.processing_time)?;
        if self.dates.start > self.dates.end {
            return Err(GenError::configuration(format!(
                "date range start {} is after end {}",
                self.dates.start, self.dates.end
            )));
        }

        check_probability("chargeback_probability", self.chargeback_probability)?;
        check_probability("fraud_probability", self.fraud_probability)?;

        let bounds = self.approval_rate_bounds;
        check_range("approval_rate_bounds", bounds)?;
        if bounds.min < 0.0 || bounds.max > 1.0 {
            return Err(GenError::configuration(format!(
                "approval_rate_bounds [{}, {}] must lie within [0, 1]",
                bounds.min, bounds.max
            )));
        }

        if self.status_vocabulary.approved.is_empty() {
            return Err(GenError::configuration("status vocabulary has no approved labels"));
        }
        let vocabulary = self.status_vocabulary.normalized();
        if let Some(label) = vocabulary
            .denied
            .iter()
            .find(|d| vocabulary.is_approved(d.as_str()))
        {
            return Err(GenError::configuration(format!(
                "status label '{label}' is listed as both approved and denied"
            )));
        }

        Ok(())
    }
}

fn check_range(name: &str, range: Range) -> GenResult<()> {
    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(GenError::configuration(format!("{name} bounds must be finite")));
    }
    if range.min > range.max {
        return Err(GenError::configuration(format!(
            "{name} min {} exceeds max {}",
            range.min, range.max
        )));
    }
    Ok(())
}

fn check_probability(name: &str, p: f64) -> GenResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GenError::configuration(format!("{name} {p} outside [0, 1]")));
    }
    Ok(())
}
