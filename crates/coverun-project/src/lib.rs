//! Project graph resolution for coverun
//!
//! Parses declarative project config files, recursively resolves their
//! inter-project references into a memoized dependency graph, and flattens
//! the graph into an ordered list of build artifacts for loading.
//!
//! # Core Concepts
//!
//! - [`ProjectConfig`]: one parsed config file (permissive; every field
//!   defaults)
//! - [`ProjectGraph`]: memoized node map plus reference edges, resolved
//!   from a root config
//! - [`ProjectGraph::artifact_order`]: post-order artifact paths —
//!   dependencies always precede dependents
//!
//! Resolution is deliberately non-fatal: missing files, malformed
//! documents and cyclic references are logged and skipped so that
//! unrelated parts of the graph stay discoverable.

pub mod config;
pub mod graph;
pub mod relaxed;

pub use config::{find_containing_config, resolve_reference, ProjectConfig, Reference, CONFIG_FILE_NAME};
pub use graph::{EdgeKind, Project, ProjectGraph};
