//! Error types for the CLI.
//!
//! Engine errors are wrapped unchanged; the CLI adds configuration problems,
//! bad positional paths and the out-of-date result of `--check`.

use std::path::PathBuf;
use thiserror::Error;

use templar::GenerateError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error reported by a generator run.
    #[error("{0}")]
    Generate(#[from] GenerateError),

    /// Error loading or applying configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// A command line path that must name an existing directory.
    #[error("Invalid {role} path {path}: not an existing directory")]
    InvalidPath { role: &'static str, path: PathBuf },

    /// `--check` found files that a run would create or update.
    #[error("{count} generated file(s) are out of date")]
    OutOfDate { count: usize },
}

impl CliError {
    /// Create an invalid path error.
    pub fn invalid_path(role: &'static str, path: PathBuf) -> Self {
        Self::InvalidPath { role, path }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::OutOfDate { .. } => 2,
            _ => 1,
        }
    }
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
