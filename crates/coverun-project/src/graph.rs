//! Project dependency graph
//!
//! Recursively resolves a root config file and every project it references
//! into a memoized node map plus a directed edge set. Resolution is never
//! fatal: missing config files and cyclic references are logged and the
//! offending edge is omitted.

use crate::config::{self, ProjectConfig, CONFIG_FILE_NAME};
use indexmap::IndexMap;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{DfsPostOrder, EdgeFiltered, EdgeRef};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Kind of a reference edge between two projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Ordinary reference: the target's artifact loads before the
    /// referencing project's artifact.
    Reference,

    /// Prepended reference: recorded in the graph, but the target's
    /// artifact is already folded into the referencing unit's output and
    /// is excluded from independent traversal.
    Prepend,
}

/// One resolved project node.
///
/// Uniquely identified by the absolute path of its config file; immutable
/// after construction and owned by the graph that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Logical project name (explicit field or derived from the artifact
    /// file stem; may be empty).
    pub name: String,

    /// Absolute path of the config file.
    pub config_path: PathBuf,

    /// Directory containing the config file.
    pub dir: PathBuf,

    /// Absolute path of the produced artifact, when the project produces
    /// one.
    pub out_file: Option<PathBuf>,

    /// Tool extension scripts, carried for availability checking.
    pub scripts: Vec<String>,
}

/// The resolved project graph: memoized node map, edge set and root.
#[derive(Debug, Default)]
pub struct ProjectGraph {
    nodes: IndexMap<PathBuf, Project>,
    edges: DiGraphMap<usize, EdgeKind>,
    root: Option<usize>,
}

impl ProjectGraph {
    /// Resolve the graph rooted at `start_dir`'s conventional config file.
    ///
    /// A missing root config yields an empty graph.
    #[must_use]
    pub fn resolve(start_dir: &Path) -> Self {
        let root_config = config::normalize(&start_dir.join(CONFIG_FILE_NAME));
        let mut graph = Self::default();
        let mut constructing = HashSet::new();
        graph.root = graph.create_recursive(&root_config, &mut constructing);

        for project in graph.nodes.values() {
            tracing::debug!("project in graph: {}", project.config_path.display());
        }

        graph
    }

    /// Resolve `config_path` into a node index, creating referenced
    /// projects first. Returns `None` for missing files and for
    /// re-entrant (cyclic) references, which are dropped as dangling
    /// edges.
    fn create_recursive(
        &mut self,
        config_path: &Path,
        constructing: &mut HashSet<PathBuf>,
    ) -> Option<usize> {
        let config_path = config::normalize(config_path);

        if !config_path.is_file() {
            tracing::warn!("config file does not exist: {}", config_path.display());
            return None;
        }

        if let Some(existing) = self.nodes.get_index_of(&config_path) {
            return Some(existing);
        }

        if constructing.contains(&config_path) {
            tracing::warn!(
                "cyclic reference back into {}; edge skipped",
                config_path.display()
            );
            return None;
        }

        constructing.insert(config_path.clone());
        let parsed = ProjectConfig::load(&config_path);

        let mut edges = Vec::new();
        for reference in &parsed.references {
            let target = config::resolve_reference(&config_path, &reference.path);
            let kind = if reference.prepend {
                EdgeKind::Prepend
            } else {
                EdgeKind::Reference
            };
            if let Some(child) = self.create_recursive(&target, constructing) {
                edges.push((child, kind));
            }
        }
        constructing.remove(&config_path);

        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let project = Project {
            name: parsed.name,
            config_path: config_path.clone(),
            dir,
            out_file: parsed.out_file,
            scripts: parsed.scripts,
        };

        let (index, _) = self.nodes.insert_full(config_path, project);
        self.edges.add_node(index);
        for (child, kind) in edges {
            self.edges.add_edge(index, child, kind);
        }

        Some(index)
    }

    /// The node the resolution started from, when it exists.
    #[must_use]
    pub fn root(&self) -> Option<&Project> {
        self.root.and_then(|i| self.nodes.get_index(i)).map(|(_, p)| p)
    }

    /// Look up a project by its absolute config path.
    #[must_use]
    pub fn get(&self, config_path: &Path) -> Option<&Project> {
        self.nodes.get(&config::normalize(config_path))
    }

    /// Iterate every resolved project in creation order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.nodes.values()
    }

    /// Number of resolved projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether resolution produced no projects at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Output-artifact paths in dependency order: depth-first post-order
    /// from the root over non-prepend edges, de-duplicated. Loading
    /// artifacts in this order guarantees a project's dependencies are
    /// loaded before the project itself.
    #[must_use]
    pub fn artifact_order(&self) -> Vec<PathBuf> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        let filtered =
            EdgeFiltered::from_fn(&self.edges, |edge| *edge.weight() == EdgeKind::Reference);
        let mut dfs = DfsPostOrder::new(&filtered, root);
        let mut order = Vec::new();

        while let Some(index) = dfs.next(&filtered) {
            let Some((_, project)) = self.nodes.get_index(index) else {
                continue;
            };
            if let Some(out_file) = &project.out_file {
                if !order.contains(out_file) {
                    order.push(out_file.clone());
                }
            }
        }

        order
    }
}
