//! Core error types for pastel-core.
//!
//! Only infrastructure can fail: opening the store, reading configuration,
//! and caller-side input validation. Ledger and timer operations are total.

use std::path::PathBuf;
use thiserror::Error;

/// Anything that can stop the application from starting.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The background writer thread is gone
    #[error("Storage writer is no longer running")]
    WriterClosed,

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Input validation errors raised by front ends before they call the core.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank or too short
    #[error("'{field}' must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Amounts must be strictly positive
    #[error("Amount must be a positive number, got {0}")]
    NonPositiveAmount(String),

    /// Budgets may be zero but never negative
    #[error("Budget cannot be negative, got {0}")]
    NegativeBudget(String),

    /// Malformed date or time slot
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_wraps_startup_failures() {
        let err: CoreError = ConfigError::UnknownKey("display.currency".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown config key: display.currency"
        );

        let err: CoreError = StorageError::WriterClosed.into();
        assert!(err.to_string().starts_with("Storage error:"));
    }
}
