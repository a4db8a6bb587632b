//! Error types for the DR status engine
//!
//! The status pipeline itself never fails: classifiers and builders fall back
//! to fail-safe grades. These errors surface from the parsing helpers, the
//! configuration layer and the snapshot loader.

use thiserror::Error;

/// Unified error type for the engine
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Duration parse error: {0}")]
    DurationParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error was caused by malformed input data
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::DurationParse(_) | Error::JsonParse(_) | Error::YamlParse(_)
        )
    }
}

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, Error>;
