//! Error types for session construction and data loading

/// Errors raised while building a session or loading its inputs
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Layout needs at least one full week of records
    #[error("need at least 7 activity records to build a layout, got {got}")]
    TooFewRecords { got: usize },

    /// Malformed calendar date
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for fallible construction and loading
pub type Result<T> = std::result::Result<T, GameError>;
