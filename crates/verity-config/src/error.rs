//! Error types for configuration loading and resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The config file is not valid TOML or does not match the schema.
    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A required setting was not supplied by any source.
    #[error("no {field} configured; {hint}")]
    MissingValue {
        /// Setting that is missing.
        field: &'static str,
        /// How the user can supply it.
        hint: &'static str,
    },
    /// A resolved setting has an unusable value.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        /// Setting that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Human-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
