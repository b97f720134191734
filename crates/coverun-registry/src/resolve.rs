//! Target resolution
//!
//! Locates the cover function(s) a request names inside the merged
//! namespace. Candidate roots are tried in priority order: the registry's
//! own top level, then each verification root, then the ambient registry
//! (an explicit secondary registry, not a process global). The first root
//! that yields a match wins; results are never merged across roots.

use crate::check::Cover;
use crate::convention;
use crate::export::{Export, ExportMap};
use crate::registry::Registry;
use regex::Regex;
use std::fmt;

/// What to select at the leaf container. Exactly one mode is active per
/// request.
#[derive(Debug, Clone)]
pub enum Selector {
    /// A single member by exact name.
    Exact(String),

    /// Every callable member whose name starts with the prefix.
    Prefix(String),

    /// Every callable member whose name matches the pattern.
    Pattern(Regex),
}

impl Selector {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix),
            Self::Pattern(pattern) => pattern.is_match(name),
        }
    }
}

/// A resolved verification request: a namespace path locating a container
/// plus a member selector.
#[derive(Debug, Clone)]
pub struct Target {
    /// Identifier segments locating the leaf container; empty addresses
    /// the candidate root itself.
    pub namespace: Vec<String>,

    /// Member selection mode.
    pub selector: Selector,
}

impl Target {
    /// Target selecting one member by exact name.
    #[must_use]
    pub fn exact(namespace: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            namespace,
            selector: Selector::Exact(name.into()),
        }
    }

    /// Target selecting members by name prefix.
    #[must_use]
    pub fn prefix(namespace: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            namespace,
            selector: Selector::Prefix(prefix.into()),
        }
    }

    /// Target selecting every convention-named check in the container.
    #[must_use]
    pub fn checks(namespace: Vec<String>) -> Self {
        Self {
            namespace,
            selector: Selector::Pattern(convention::check_name_pattern()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}.")?;
        }
        match &self.selector {
            Selector::Exact(name) => write!(f, "{name}"),
            Selector::Prefix(prefix) => write!(f, "{prefix}*"),
            Selector::Pattern(pattern) => write!(f, "/{pattern}/"),
        }
    }
}

/// Successful resolution: matched covers in enumeration order plus the
/// reset hook shared by them, when one is defined.
#[derive(Debug)]
pub struct Resolution {
    /// `(exported name, cover)` pairs in the container's declaration
    /// order. May be empty for prefix/pattern selectors: "nothing
    /// applicable" is a valid outcome, reported distinctly by the caller.
    pub matches: Vec<(String, Cover)>,

    /// Reset hook reachable from the winning candidate (leaf container
    /// first, then the verification root the walk started in).
    pub reset: Option<Cover>,
}

/// Resolution failures. Both are fatal to the current request only.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Every candidate root was exhausted without completing the
    /// namespace walk.
    #[error("target not resolved: {target}")]
    TargetNotResolved {
        /// Rendered form of the requested target.
        target: String,
    },

    /// An exactly-named member exists but is not callable.
    #[error("member is not callable: {name}")]
    NotCallable {
        /// The offending member name.
        name: String,
    },
}

/// Resolve `target` against the merged namespace, falling back to the
/// ambient registry.
///
/// # Errors
/// [`ResolveError::TargetNotResolved`] when no candidate root contains
/// the namespace path; [`ResolveError::NotCallable`] when an exact-name
/// request hits a non-callable member.
pub fn resolve(
    target: &Target,
    registry: &Registry,
    ambient: Option<&Registry>,
) -> Result<Resolution, ResolveError> {
    let mut candidates: Vec<&ExportMap> = vec![registry.bindings()];
    for root in registry.roots() {
        if let Some(members) = registry.get(root).and_then(Export::as_container) {
            candidates.push(members);
        }
    }
    if let Some(ambient) = ambient {
        candidates.push(ambient.bindings());
    }

    let mut empty_leaf: Option<Resolution> = None;

    for start in candidates {
        let Some(leaf) = walk(start, &target.namespace) else {
            continue;
        };

        match &target.selector {
            Selector::Exact(name) => match leaf.get(name) {
                Some(Export::Function(cover)) => {
                    return Ok(Resolution {
                        matches: vec![(name.clone(), cover.clone())],
                        reset: reset_hook(start, &target.namespace, leaf),
                    });
                }
                Some(_) => {
                    return Err(ResolveError::NotCallable { name: name.clone() });
                }
                None => continue,
            },
            selector => {
                let matches: Vec<(String, Cover)> = leaf
                    .iter()
                    .filter(|(name, _)| name.as_str() != convention::RESET_HOOK)
                    .filter(|(name, _)| selector.matches(name))
                    .filter_map(|(name, export)| {
                        export.as_function().map(|cover| (name.clone(), cover.clone()))
                    })
                    .collect();

                if !matches.is_empty() {
                    return Ok(Resolution {
                        matches,
                        reset: reset_hook(start, &target.namespace, leaf),
                    });
                }

                if empty_leaf.is_none() {
                    empty_leaf = Some(Resolution {
                        matches: Vec::new(),
                        reset: None,
                    });
                }
            }
        }
    }

    empty_leaf.ok_or_else(|| ResolveError::TargetNotResolved {
        target: target.to_string(),
    })
}

/// Follow the namespace path from a candidate root, abandoning as soon as
/// a segment is missing or the current value is not a container.
fn walk<'a>(start: &'a ExportMap, namespace: &[String]) -> Option<&'a ExportMap> {
    let mut current = start;
    for segment in namespace {
        current = current.get(segment)?.as_container()?;
    }
    Some(current)
}

fn reset_hook(start: &ExportMap, namespace: &[String], leaf: &ExportMap) -> Option<Cover> {
    if let Some(cover) = leaf.get(convention::RESET_HOOK).and_then(Export::as_function) {
        return Some(cover.clone());
    }

    let root = namespace
        .first()
        .and_then(|segment| start.get(segment))
        .and_then(Export::as_container)?;
    root.get(convention::RESET_HOOK)
        .and_then(Export::as_function)
        .cloned()
}
