//! Error types for the income tax engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors only ever come out of configuration construction and loading; a
//! breakdown computation over a validated configuration cannot fail.

use thiserror::Error;

/// The main error type for the income tax engine.
///
/// # Example
///
/// ```
/// use income_tax_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rates.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rates.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rate table is malformed (bad bracket ordering, missing unbounded
    /// top bracket, negative rates, zero taper).
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// A description of what made the configuration invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed. A bracket table that breaks
    /// its ordering rules is reported here when it comes from a file.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
