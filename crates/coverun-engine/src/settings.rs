//! Designated-target persistence
//!
//! The runner remembers one designated target per workspace through the
//! [`TargetStore`] contract. [`TargetsFile`] is the JSON-file
//! implementation (one document mapping workspace paths to targets);
//! [`MemoryStore`] backs embedders and tests that need no durability.
//! Reading tolerates a missing or malformed file by treating it as empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The target a workspace has designated for its default run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignatedTarget {
    /// Directory of the project the target's source file belongs to;
    /// graph resolution for the designated run starts here.
    pub project_path: PathBuf,

    /// Namespace path enclosing the function.
    pub namespace: Vec<String>,

    /// Exact cover function name.
    pub name: String,
}

/// Errors from the store contract.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("targets file access failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the targets document failed.
    #[error("targets file encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read/write contract for designated targets, keyed by workspace
/// directory.
pub trait TargetStore {
    /// The target designated for `workspace`, when one exists.
    ///
    /// # Errors
    /// [`StoreError`] when the backing storage cannot be accessed.
    fn read(&self, workspace: &Path) -> Result<Option<DesignatedTarget>, StoreError>;

    /// Designate `target` for `workspace`, replacing any previous one.
    ///
    /// # Errors
    /// [`StoreError`] when the backing storage cannot be written.
    fn write(&mut self, workspace: &Path, target: DesignatedTarget) -> Result<(), StoreError>;
}

/// JSON-file store: one document mapping workspace path to target.
#[derive(Debug)]
pub struct TargetsFile {
    path: PathBuf,
}

impl TargetsFile {
    /// Store backed by an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform's conventional config location.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::at(dir.join("coverun").join("targets.json")))
    }

    /// A missing or malformed file reads as an empty map.
    fn read_map(&self) -> BTreeMap<String, DesignatedTarget> {
        let Ok(text) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&text).unwrap_or_else(|err| {
            tracing::warn!("malformed targets file treated as empty: {err}");
            BTreeMap::new()
        })
    }
}

impl TargetStore for TargetsFile {
    fn read(&self, workspace: &Path) -> Result<Option<DesignatedTarget>, StoreError> {
        Ok(self.read_map().get(&workspace_key(workspace)).cloned())
    }

    fn write(&mut self, workspace: &Path, target: DesignatedTarget) -> Result<(), StoreError> {
        let mut map = self.read_map();
        map.insert(workspace_key(workspace), target);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// In-memory store for embedders and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    targets: BTreeMap<String, DesignatedTarget>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TargetStore for MemoryStore {
    fn read(&self, workspace: &Path) -> Result<Option<DesignatedTarget>, StoreError> {
        Ok(self.targets.get(&workspace_key(workspace)).cloned())
    }

    fn write(&mut self, workspace: &Path, target: DesignatedTarget) -> Result<(), StoreError> {
        self.targets.insert(workspace_key(workspace), target);
        Ok(())
    }
}

fn workspace_key(workspace: &Path) -> String {
    coverun_project::config::normalize(workspace)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DesignatedTarget {
        DesignatedTarget {
            project_path: PathBuf::from("/ws/app"),
            namespace: vec!["CoverExample".to_string()],
            name: "coverAddition".to_string(),
        }
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TargetsFile::at(dir.path().join("targets.json"));

        store.write(Path::new("/ws"), sample()).unwrap();
        let read = store.read(Path::new("/ws")).unwrap();
        assert_eq!(read, Some(sample()));
    }

    #[test]
    fn file_store_keeps_other_workspaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TargetsFile::at(dir.path().join("targets.json"));

        store.write(Path::new("/ws/one"), sample()).unwrap();
        let mut other = sample();
        other.name = "coverOther".to_string();
        store.write(Path::new("/ws/two"), other.clone()).unwrap();

        assert_eq!(store.read(Path::new("/ws/one")).unwrap(), Some(sample()));
        assert_eq!(store.read(Path::new("/ws/two")).unwrap(), Some(other));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TargetsFile::at(dir.path().join("absent.json"));
        assert_eq!(store.read(Path::new("/ws")).unwrap(), None);
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");
        std::fs::write(&path, "{{{not json").unwrap();

        let store = TargetsFile::at(path);
        assert_eq!(store.read(Path::new("/ws")).unwrap(), None);
    }

    #[test]
    fn workspace_keys_are_normalized() {
        let mut store = MemoryStore::new();
        store.write(Path::new("/ws/app/sub/.."), sample()).unwrap();
        assert_eq!(store.read(Path::new("/ws/app")).unwrap(), Some(sample()));
    }
}
