//! Error types for the generation engine.
//!
//! Errors are split by the phase that raises them. Discovery problems are
//! mostly non-fatal, render problems are contained to the profile that
//! produced them, and [`GenerateError`] is what a whole run reports.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator runs.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Main error type for a generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Error while discovering template units.
    #[error("Failed to discover templates: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error while rendering a target.
    #[error("Failed to render target: {0}")]
    Render(#[from] RenderError),

    /// Error while writing a generated file.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Two profiles produce a file at the same location.
    #[error("Output path {} is produced by both '{first}' and '{second}'", .path.display())]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    Pool(String),

    /// At least one profile failed; reported once all profiles finished.
    #[error("Generation failed: {failed} of {total} profile(s) reported errors")]
    Failed { failed: usize, total: usize },
}

/// Error during template discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Template root does not exist or is not a directory.
    #[error("Template directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Invalid include/exclude pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Non-fatal discovery problem; the affected unit is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryWarning {
    /// A template file has no registered factories.
    #[error("No template registered for unit '{unit}' ({})", .path.display())]
    UnresolvedUnit { unit: String, path: PathBuf },
}

/// Error while building or rendering the targets of a profile.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Category tag does not have the `<digits>_<label>` form.
    #[error("Category '{category}' of member '{member}' does not match pattern <digits>_<label>")]
    MalformedCategory { category: String, member: String },

    /// Modifier that is not legal in the given declaration context.
    #[error("Illegal modifier \"{modifier}\" on {context} '{name}'")]
    IllegalModifier {
        modifier: &'static str,
        context: &'static str,
        name: String,
    },

    /// An abstract method that also carries a body.
    #[error("\"abstract\" modifier combined with method body on '{method}'")]
    AbstractWithBody { method: String },

    /// No emitter exists for the target language.
    #[error("No emitter available for language '{language}' (target '{target}')")]
    UnsupportedLanguage { language: String, target: String },

    /// Building or rendering the profile panicked.
    #[error("Profile '{profile}' panicked: {message}")]
    Panicked { profile: String, message: String },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create a parent directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the existing file for comparison.
    #[error("Failed to read existing file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to update the modification time of an unchanged file.
    #[error("Failed to update timestamp of {path}: {source}")]
    Touch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl RenderError {
    /// Create a malformed category error.
    pub fn malformed_category(category: impl Into<String>, member: impl Into<String>) -> Self {
        Self::MalformedCategory {
            category: category.into(),
            member: member.into(),
        }
    }

    /// Create an illegal modifier error.
    pub fn illegal_modifier(
        modifier: &'static str,
        context: &'static str,
        name: impl Into<String>,
    ) -> Self {
        Self::IllegalModifier {
            modifier,
            context,
            name: name.into(),
        }
    }
}
