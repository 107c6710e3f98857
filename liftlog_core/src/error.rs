//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single data line of the workout log was skipped.
///
/// These never abort a load; they are collected next to the parsed rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RowParseError {
    #[error("expected 10 columns, found {found}")]
    ColumnCount { found: usize },

    #[error("unrecognised date {value:?}")]
    Date { value: String },

    #[error("invalid set number {value:?}")]
    SetNumber { value: String },

    #[error("invalid weight {value:?}")]
    Weight { value: String },

    #[error("invalid reps {value:?}")]
    Reps { value: String },

    /// Row could not be decoded as UTF-8
    #[error("unreadable row: {message}")]
    Encoding { message: String },
}
