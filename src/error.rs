//! Error types shared across the pipeline

use thiserror::Error;

/// Common result type used throughout the application
pub type Result<T> = std::result::Result<T, PersonaError>;

#[derive(Error, Debug)]
pub enum PersonaError {
    /// Bin edges and labels do not form a valid configuration.
    #[error("invalid age bins: {0}")]
    InvalidBins(String),

    /// An age fell outside the configured bin range in strict mode.
    #[error("age {age} is outside the bin range {min}..={max}")]
    OutOfRange { age: u32, min: u32, max: u32 },

    /// Too few distinct mean prices to cut into the requested tier count.
    #[error("cannot cut {distinct} distinct mean prices into {tiers} tiers")]
    InsufficientData { distinct: usize, tiers: usize },

    /// No persona in the table matches the derived key. The key is included
    /// so bin-edge mismatches between build and query paths show up directly.
    #[error("no persona matches key `{key}`; this combination never appeared in the training data")]
    UnknownPersona { key: String },

    /// Missing or malformed input columns/values, detected at ingestion.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("CSV error: {0}")]
    Csv(#[from] polars::prelude::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
