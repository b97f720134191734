//! Artifact host contract
//!
//! Loading a compiled artifact is the host module system's business; the
//! runner only consumes the resulting export mapping. [`StaticHost`] is
//! the provided implementation: embedders register each build unit's
//! exports up front, keyed by artifact path.

use crate::export::ExportMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors the host contract can signal. Both are non-fatal to a run:
/// the loader records a diagnostic and continues with the remaining
/// artifacts.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No artifact exists at the given path.
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The artifact exists but could not be loaded.
    #[error("artifact failed to load: {path}: {reason}")]
    Failed {
        /// Artifact path as requested.
        path: String,
        /// Host-specific failure description.
        reason: String,
    },
}

/// Maps an absolute artifact path to its exported bindings.
pub trait ArtifactHost {
    /// Load the artifact at `path` and produce its exports.
    ///
    /// # Errors
    /// [`HostError::NotFound`] when no artifact exists at `path`;
    /// [`HostError::Failed`] when loading failed.
    fn load(&self, path: &Path) -> Result<ExportMap, HostError>;
}

/// In-memory host over pre-registered artifacts.
#[derive(Debug, Default)]
pub struct StaticHost {
    artifacts: HashMap<PathBuf, ExportMap>,
}

impl StaticHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the exports of one artifact.
    pub fn register(&mut self, path: impl Into<PathBuf>, exports: ExportMap) {
        self.artifacts.insert(path.into(), exports);
    }
}

impl ArtifactHost for StaticHost {
    fn load(&self, path: &Path) -> Result<ExportMap, HostError> {
        self.artifacts
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_path_buf()))
    }
}
