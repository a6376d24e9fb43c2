//! Export collaborators.
//!
//! RULE: Exporters receive a finished, validated Dataset and persist it.
//! They never mutate it and never feed anything back into the pipeline.

use crate::{error::GenResult, pipeline::Dataset, store::DatasetStore, types::RunId};
use std::path::PathBuf;

pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const BRAND_DIMENSION_FILE: &str = "brand_dimension.csv";

/// The contract every export target must fulfill.
pub trait DatasetExporter {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    fn export(&mut self, dataset: &Dataset) -> GenResult<()>;
}

/// Writes both tables as CSV files into an output directory.
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.out_dir.join(TRANSACTIONS_FILE)
    }

    pub fn brand_dimension_path(&self) -> PathBuf {
        self.out_dir.join(BRAND_DIMENSION_FILE)
    }
}

impl DatasetExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&mut self, dataset: &Dataset) -> GenResult<()> {
        std::fs::create_dir_all(&self.out_dir)?;

        let mut writer = csv::Writer::from_path(self.transactions_path())?;
        for t in &dataset.transactions {
            writer.serialize(t)?;
        }
        writer.flush()?;

        let mut writer = csv::Writer::from_path(self.brand_dimension_path())?;
        for row in &dataset.brand_dimension {
            writer.serialize(row)?;
        }
        writer.flush()?;

        log::debug!("csv: wrote {}", self.out_dir.display());
        Ok(())
    }
}

/// Writes both tables into a SQLite database under a run id.
pub struct SqliteExporter {
    store: DatasetStore,
    run_id: RunId,
    seed: u64,
}

impl SqliteExporter {
    /// The store must already be migrated.
    pub fn new(store: DatasetStore, run_id: RunId, seed: u64) -> Self {
        Self { store, run_id, seed }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl DatasetExporter for SqliteExporter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    /// Re-exporting under an existing run id replaces that run's rows.
    fn export(&mut self, dataset: &Dataset) -> GenResult<()> {
        self.store.replace_run(
            &self.run_id,
            self.seed,
            env!("CARGO_PKG_VERSION"),
            &dataset.transactions,
            &dataset.brand_dimension,
        )
    }
}
