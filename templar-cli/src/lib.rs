//! # templar-cli
//!
//! CLI library for running the compiled-in templar templates.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`logging`] - Tracing subscriber setup
//! - [`templates`] - The template units and their registry
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod logging;
pub mod templates;

// Re-export main types for convenience
pub use config::{require_dirs, CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult, ConfigError};
pub use logging::init_logging;
pub use templates::registry;
