use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Distribution error: approval rate {rate:.4} outside [{floor:.2}, {ceiling:.2}]")]
    Distribution { rate: f64, floor: f64, ceiling: f64 },

    #[error("Invariant violated at row {row}: {detail}")]
    InvariantViolation { row: usize, detail: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }
}

pub type GenResult<T> = Result<T, GenError>;
