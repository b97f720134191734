//! Artifact loading
//!
//! Walks the ordered artifact list produced by the project graph and
//! merges each artifact's exports into a fresh [`Registry`]. This is the
//! only place a registry is populated, and it runs at most once per run
//! (the merge rule is additive, so repeating it is not idempotent).

use crate::host::{ArtifactHost, HostError};
use crate::registry::Registry;
use std::path::PathBuf;

/// Load every artifact in order and merge their exports.
///
/// A missing or failing artifact is a per-artifact diagnostic, never an
/// abort: independent verification targets elsewhere in the graph must
/// stay discoverable.
#[must_use]
pub fn load_all(host: &dyn ArtifactHost, artifact_paths: &[PathBuf]) -> Registry {
    let mut registry = Registry::new();

    for path in artifact_paths {
        match host.load(path) {
            Ok(exports) => {
                tracing::debug!("loaded artifact: {}", path.display());
                for (name, export) in exports {
                    registry.install(&name, export);
                }
            }
            Err(HostError::NotFound(_)) => {
                tracing::warn!("artifact missing: {}", path.display());
            }
            Err(err) => {
                tracing::warn!("{err}");
            }
        }
    }

    registry
}
