//! Incremental file writer.
//!
//! Generated text is compared byte for byte against what is already on
//! disk and only written when it differs, so an unchanged run performs no
//! writes at all. Dry-run mode goes through the same comparison without
//! touching the file system.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::WriteError;

/// How far past the minimum timestamp an unchanged file is moved.
pub const TIMESTAMP_TICK: Duration = Duration::from_millis(1);

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content and was overwritten.
    Updated,
    /// The file already had the generated content.
    Unchanged,
    /// Content was identical; only the modification time was bumped.
    Touched,
}

impl WriteOutcome {
    /// Whether file content was (or in dry-run mode would be) written.
    pub fn wrote_content(self) -> bool {
        matches!(self, WriteOutcome::Created | WriteOutcome::Updated)
    }

    /// Short label used in log output.
    pub fn label(self) -> &'static str {
        match self {
            WriteOutcome::Created => "new",
            WriteOutcome::Updated => "updated",
            WriteOutcome::Unchanged => "unchanged",
            WriteOutcome::Touched => "touched",
        }
    }
}

/// Diff-before-write file writer.
#[derive(Debug, Clone, Default)]
pub struct IncrementalWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,

    /// Unchanged files get their mtime set just past this instant.
    min_timestamp: Option<SystemTime>,
}

impl IncrementalWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the minimum timestamp hint for unchanged files.
    pub fn with_min_timestamp(mut self, min_timestamp: Option<SystemTime>) -> Self {
        self.min_timestamp = min_timestamp;
        self
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Write `content` to `path` unless the file already holds exactly
    /// that content.
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteOutcome, WriteError> {
        let existing = match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(WriteError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        match existing {
            None => {
                if !self.dry_run {
                    self.ensure_parent(path)?;
                    self.write_file(path, content)?;
                }
                Ok(WriteOutcome::Created)
            }
            Some(bytes) if bytes != content.as_bytes() => {
                if !self.dry_run {
                    self.write_file(path, content)?;
                }
                Ok(WriteOutcome::Updated)
            }
            Some(_) => match self.min_timestamp {
                Some(min) => {
                    if !self.dry_run {
                        touch(path, min + TIMESTAMP_TICK)?;
                    }
                    Ok(WriteOutcome::Touched)
                }
                None => Ok(WriteOutcome::Unchanged),
            },
        }
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), WriteError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                tracing::debug!(path = %parent.display(), "creating output directory");
                fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), WriteError> {
        fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn touch(path: &Path, time: SystemTime) -> Result<(), WriteError> {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(time))
        .map_err(|e| WriteError::Touch {
            path: path.to_path_buf(),
            source: e,
        })
}
