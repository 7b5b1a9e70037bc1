//! Error types for generation and rendering.

use thiserror::Error;

/// Errors that abort a generation pass.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A fabricator produced no value for a required field.
    #[error("fabrication source exhausted while generating {0}")]
    Exhausted(&'static str),

    /// The parameters cannot produce a consistent dataset.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    /// A date fell outside chrono's representable range.
    #[error("date out of range: {0}")]
    DateRange(String),

    /// The rating weight table was rejected by the sampler.
    #[error("weighted sampling failed: {0}")]
    Weights(String),
}

/// Errors that can occur while writing the CSV files.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output path {0} exists and is not a directory")]
    NotADirectory(String),
}
