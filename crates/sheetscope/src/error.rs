//! Error types for the Sheetscope library.

use thiserror::Error;

/// Main error type for Sheetscope operations.
///
/// Only malformed input produces an error. Degenerate datasets (no rows,
/// all-null columns, a single row) always yield a well-formed result.
#[derive(Debug, Error)]
pub enum SheetscopeError {
    /// The header list was empty.
    #[error("Empty headers: a dataset needs at least one column")]
    EmptyHeaders,

    /// Too many rows carry keys that match none of the headers.
    #[error("Key mismatch: {unmatched} of {total} rows share no key with the headers")]
    KeyMismatch { unmatched: usize, total: usize },

    /// Column statistics and headers disagree in length.
    #[error("Column count mismatch: {stats} column profiles for {headers} headers")]
    ColumnCountMismatch { stats: usize, headers: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Sheetscope operations.
pub type Result<T> = std::result::Result<T, SheetscopeError>;
