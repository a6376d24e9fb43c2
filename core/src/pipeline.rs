//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Sampler        raw date / brand / status / amount
//!   2. Field Deriver  approved, chargeback, fraud, processing_time, year_month
//!   3. Validator      status domain, binary flags, approval-rate bounds
//!   4. Aggregator     brand dimension
//!   5. Exporters      only reached when 1-4 succeed
//!
//! RULES:
//!   - Data flows forward only. No stage reads a later stage's output.
//!   - All randomness flows through the RngBank.
//!   - Every run() starts from fresh streams, so repeated runs with the
//!     same config produce identical tables.

use crate::{
    aggregator::{aggregate_by_brand, BrandDimension},
    config::GeneratorConfig,
    deriver::{FieldDeriver, Transaction},
    error::GenResult,
    export::DatasetExporter,
    rng::RngBank,
    sampler::Sampler,
    validator::{ValidationReport, Validator},
};
use serde::Serialize;

/// Both output tables of one run, plus the validation summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    pub brand_dimension: Vec<BrandDimension>,
    pub report: ValidationReport,
}

pub struct GenerationPipeline {
    config: GeneratorConfig,
    rng_bank: RngBank,
}

impl GenerationPipeline {
    /// Validate the config and prepare a pipeline seeded from it.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(config.seed);
        Ok(Self { config, rng_bank })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run every stage once and return both tables.
    pub fn run(&self) -> GenResult<Dataset> {
        let mut streams = self.rng_bank.streams();

        let raw = Sampler::new(&self.config).sample(&mut streams);
        log::info!("Sampled {} transactions (seed {})", raw.len(), self.rng_bank.master_seed());

        let transactions = FieldDeriver::new(&self.config).derive(raw, &mut streams);

        let report = Validator::new(&self.config).validate(&transactions)?;
        log::info!(
            "Validation passed: approval rate {:.2}%, {} chargebacks, {} fraud flags",
            report.approval_rate * 100.0,
            report.chargeback_count,
            report.fraud_count
        );

        let brand_dimension = aggregate_by_brand(&transactions);
        log::info!("Aggregated {} brand rows", brand_dimension.len());

        Ok(Dataset {
            transactions,
            brand_dimension,
            report,
        })
    }

    /// Run, then hand the dataset to each exporter in order.
    /// Nothing is exported if generation fails.
    pub fn run_and_export(
        &self,
        exporters: &mut [Box<dyn DatasetExporter>],
    ) -> GenResult<Dataset> {
        let dataset = self.run()?;
        for exporter in exporters.iter_mut() {
            exporter.export(&dataset)?;
            log::info!("Exported dataset via {}", exporter.name());
        }
        Ok(dataset)
    }
}
