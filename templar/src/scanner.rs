//! Template discovery.
//!
//! This module walks a template tree and turns every matching file into a
//! [`TemplateUnit`], respecting `.gitignore` files and include/exclude glob
//! patterns. Units come back sorted by path so runs are reproducible.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::DiscoveryError;

/// Default file extension of template sources.
pub const DEFAULT_EXTENSION: &str = "rs";

/// A discovered template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateUnit {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// Path relative to the template root.
    pub relative_path: PathBuf,

    /// Dotted unit name used to look up factories.
    pub name: String,
}

/// Scanner for discovering template units.
#[derive(Debug)]
pub struct TemplateScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Extension template files must have.
    extension: String,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob a relative path must match.
    include: Option<glob::Pattern>,

    /// Globs excluding relative paths.
    exclude: Vec<glob::Pattern>,
}

impl TemplateScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            respect_gitignore: true,
            include: None,
            exclude: Vec::new(),
        }
    }

    /// Set the template file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Only include files whose relative path matches `pattern`.
    pub fn with_include(mut self, pattern: &str) -> Result<Self, DiscoveryError> {
        self.include = Some(compile(pattern)?);
        Ok(self)
    }

    /// Skip files whose relative path matches `pattern`.
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self, DiscoveryError> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Scan the directory and return all template units, sorted by path.
    pub fn scan(&self) -> Result<Vec<TemplateUnit>, DiscoveryError> {
        if !self.root.is_dir() {
            return Err(DiscoveryError::not_found(self.root.clone()));
        }

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        let mut units = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path.extension().map_or(true, |ext| ext != self.extension.as_str()) {
                continue;
            }

            let relative = self.relative_path(path);
            if let Some(ref include) = self.include {
                if !include.matches_path(&relative) {
                    continue;
                }
            }
            if self.exclude.iter().any(|p| p.matches_path(&relative)) {
                tracing::trace!(path = %relative.display(), "excluded template file");
                continue;
            }

            units.push(TemplateUnit {
                path: path.to_path_buf(),
                name: unit_name(&relative),
                relative_path: relative,
            });
        }

        // Lexicographic on the whole path string, not per component.
        units.sort_by_cached_key(|u| u.relative_path.to_string_lossy().into_owned());
        tracing::debug!(root = %self.root.display(), count = units.len(), "discovered template units");
        Ok(units)
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn compile(pattern: &str) -> Result<glob::Pattern, DiscoveryError> {
    glob::Pattern::new(pattern).map_err(|e| DiscoveryError::invalid_pattern(pattern, e.to_string()))
}

/// Dotted unit name of a relative template path: directories and the file
/// stem joined by `.`.
pub fn unit_name(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components())
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if let Some(stem) = relative.file_stem() {
        segments.push(stem.to_string_lossy().into_owned());
    }
    segments.join(".")
}
