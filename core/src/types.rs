//! Shared primitive types used across the pipeline.

/// A binary column value: always 0 or 1.
pub type Flag = u8;

/// The canonical run identifier used by the exporters.
pub type RunId = String;

/// A `YYYY-MM` calendar bucket.
pub type YearMonth = String;
