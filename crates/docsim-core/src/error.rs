//! Error types for docsim-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by pairwise comparison.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    /// Fewer than two documents were supplied.
    #[error("at least 2 documents are required for comparison (got {provided})")]
    InsufficientInput {
        /// Number of documents actually supplied.
        provided: usize,
    },
}

/// Result type alias using [`CompareError`].
pub type CompareResult<T> = Result<T, CompareError>;

/// Errors that can occur at the text-analysis boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input text is empty or whitespace only.
    #[error("no text to analyze")]
    EmptyInput,

    /// The input is shorter than the configured minimum.
    #[error("text is too short to analyze: {length} characters (minimum: {minimum})")]
    TextTooShort {
        /// Character count of the trimmed input.
        length: usize,
        /// Configured minimum character count.
        minimum: usize,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
