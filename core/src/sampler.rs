//! Sampler — raw per-transaction attributes.
//!
//! Draws are issued column by column, never interleaved:
//!   1. calendar stream: N date offsets
//!   2. sampling stream: N brand picks
//!   3. sampling stream: N status picks
//!   4. sampling stream: N amounts
//!
//! The deriver continues both streams from where this leaves them.

use crate::{
    config::GeneratorConfig,
    rng::{DrawStreams, StreamRng},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of sampled attributes, before any derived field exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDraw {
    pub date: NaiveDate,
    pub brand: String,
    pub status: String,
    pub amount: f64,
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform draw over `[min, max]` rounded once to cents. Rounding can
/// push the value a hair past a bound that itself has sub-cent digits,
/// so the result is clamped back into range.
pub(crate) fn uniform_cents(rng: &mut StreamRng, min: f64, max: f64) -> f64 {
    round2(rng.uniform(min, max)).clamp(min, max)
}

pub struct Sampler<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Sampler<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Draw `transaction_count` rows. The config must already be validated.
    pub fn sample(&self, streams: &mut DrawStreams) -> Vec<RawDraw> {
        let n = self.config.transaction_count;

        let dates = self.sample_dates(&mut streams.calendar, n);
        let brands = self.sample_brands(&mut streams.sampling, n);
        let statuses = self.sample_statuses(&mut streams.sampling, n);
        let amounts = self.sample_amounts(&mut streams.sampling, n);

        let rows: Vec<RawDraw> = dates
            .into_iter()
            .zip(brands)
            .zip(statuses)
            .zip(amounts)
            .map(|(((date, brand), status), amount)| RawDraw {
                date,
                brand,
                status,
                amount,
            })
            .collect();

        log::debug!(
            "sampler: {} rows, {} brands, {} statuses",
            rows.len(),
            self.config.brands.len(),
            self.config.statuses.len()
        );
        rows
    }

    fn sample_dates(&self, rng: &mut StreamRng, n: usize) -> Vec<NaiveDate> {
        let range = self.config.dates;
        let span = range.days_between().max(0) as u64;
        (0..n)
            .map(|_| {
                let offset = rng.next_u64_inclusive(span);
                range.start + Duration::days(offset as i64)
            })
            .collect()
    }

    fn sample_brands(&self, rng: &mut StreamRng, n: usize) -> Vec<String> {
        let brands = &self.config.brands;
        (0..n)
            .map(|_| brands[rng.next_u64_below(brands.len() as u64) as usize].clone())
            .collect()
    }

    fn sample_statuses(&self, rng: &mut StreamRng, n: usize) -> Vec<String> {
        let statuses = &self.config.statuses;
        let weights = &self.config.status_probabilities;
        (0..n)
            .map(|_| statuses[rng.pick_weighted(weights)].clone())
            .collect()
    }

    fn sample_amounts(&self, rng: &mut StreamRng, n: usize) -> Vec<f64> {
        let range = self.config.amount;
        (0..n)
            .map(|_| uniform_cents(rng, range.min, range.max))
            .collect()
    }
}
