//! Project configuration files
//!
//! One config file per project root. The document carries an optional
//! `name`, an optional `outFile` (the compiled artifact the project
//! produces), a `references` list pointing at other projects, and an
//! optional `coverun` extension block. Every field defaults when missing
//! or malformed; loading a config never fails.

use crate::relaxed;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// Conventional file name looked for when a reference points at a
/// directory rather than at a config file.
pub const CONFIG_FILE_NAME: &str = "coverun.json";

/// Upward search bound for [`find_containing_config`].
const MAX_UPWARD_STEPS: usize = 100;

/// One entry of a config file's `references` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Path string as written in the config file, relative to it.
    pub path: String,

    /// Prepended references are folded into the referencing unit's own
    /// artifact and must not be loaded independently.
    pub prepend: bool,
}

/// Parsed contents of one project config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Logical project name; empty when neither the explicit field nor an
    /// output artifact is available to derive it from.
    pub name: String,

    /// Absolute path of the produced artifact; `None` for
    /// aggregation-only projects.
    pub out_file: Option<PathBuf>,

    /// Reference entries in declaration order.
    pub references: Vec<Reference>,

    /// `coverun.scripts` extension block, carried for availability
    /// checking only.
    pub scripts: Vec<String>,
}

impl ProjectConfig {
    /// Read and parse the config file at `config_path`.
    ///
    /// A missing or unreadable file parses like an empty document.
    #[must_use]
    pub fn load(config_path: &Path) -> Self {
        let text = std::fs::read_to_string(config_path).unwrap_or_default();
        let value = relaxed::parse(&text);
        let dir = config_path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_value(&value, dir)
    }

    /// Build a config from a parsed document, resolving the output path
    /// against the config file's directory.
    #[must_use]
    pub fn from_value(value: &Value, config_dir: &Path) -> Self {
        let out_file = value
            .get("outFile")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| normalize(&config_dir.join(s)));

        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .filter(|s| !s.is_empty())
            .or_else(|| derived_name(out_file.as_deref()))
            .unwrap_or_default();

        let references = value
            .get("references")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let path = entry.get("path")?.as_str()?.to_owned();
                        let prepend = entry
                            .get("prepend")
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        Some(Reference { path, prepend })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let scripts = match value.get("coverun").and_then(|ext| ext.get("scripts")) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name,
            out_file,
            references,
            scripts,
        }
    }
}

fn derived_name(out_file: Option<&Path>) -> Option<String> {
    out_file
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Resolve one `references` entry against the config file it appears in.
///
/// A reference may point directly at a config file (a `.json` path) or at
/// a directory holding the conventional [`CONFIG_FILE_NAME`]; both forms
/// normalize to an absolute config file path.
#[must_use]
pub fn resolve_reference(source_config: &Path, referenced: &str) -> PathBuf {
    let source_dir = if source_config.extension().is_some_and(|e| e == "json") {
        source_config.parent().unwrap_or_else(|| Path::new(""))
    } else {
        source_config
    };

    let referenced = Path::new(referenced);
    let joined = if referenced.extension().is_some_and(|e| e == "json") {
        source_dir.join(referenced)
    } else {
        source_dir.join(referenced).join(CONFIG_FILE_NAME)
    };

    normalize(&joined)
}

/// Find the nearest [`CONFIG_FILE_NAME`] in `start_dir` or a containing
/// directory, walking upward a bounded number of steps.
#[must_use]
pub fn find_containing_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = normalize(start_dir);

    for _ in 0..MAX_UPWARD_STEPS {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }

    None
}

/// Lexically normalize a path, folding `.` and `..` components.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value(text: &str) -> Value {
        relaxed::parse(text)
    }

    #[test]
    fn explicit_name_wins() {
        let config = ProjectConfig::from_value(
            &value(r#"{"name": "custom", "outFile": "build/lib.art"}"#),
            Path::new("/proj"),
        );
        assert_eq!(config.name, "custom");
    }

    #[test]
    fn name_derived_from_out_file() {
        let config = ProjectConfig::from_value(
            &value(r#"{"outFile": "./build/widgets.art"}"#),
            Path::new("/proj"),
        );
        assert_eq!(config.name, "widgets");
        assert_eq!(config.out_file.as_deref(), Some(Path::new("/proj/build/widgets.art")));
    }

    #[test]
    fn missing_fields_default() {
        let config = ProjectConfig::from_value(&value("{}"), Path::new("/proj"));
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn malformed_document_defaults() {
        let config = ProjectConfig::from_value(&value("not json at all"), Path::new("/proj"));
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn references_with_prepend_flag() {
        let config = ProjectConfig::from_value(
            &value(r#"{"references": [{"path": "../lib"}, {"path": "../base", "prepend": true}]}"#),
            Path::new("/proj"),
        );
        assert_eq!(
            config.references,
            vec![
                Reference { path: "../lib".into(), prepend: false },
                Reference { path: "../base".into(), prepend: true },
            ]
        );
    }

    #[test]
    fn reference_entries_without_path_are_dropped() {
        let config = ProjectConfig::from_value(
            &value(r#"{"references": [{"prepend": true}, {"path": "../lib"}]}"#),
            Path::new("/proj"),
        );
        assert_eq!(config.references.len(), 1);
    }

    #[test]
    fn scripts_accepts_string_and_list_forms() {
        let single = ProjectConfig::from_value(
            &value(r#"{"coverun": {"scripts": "setup.art"}}"#),
            Path::new("/p"),
        );
        assert_eq!(single.scripts, vec!["setup.art"]);

        let many = ProjectConfig::from_value(
            &value(r#"{"coverun": {"scripts": ["a.art", "b.art"]}}"#),
            Path::new("/p"),
        );
        assert_eq!(many.scripts, vec!["a.art", "b.art"]);
    }

    #[test]
    fn resolve_reference_directory_form() {
        let resolved = resolve_reference(Path::new("/ws/app/coverun.json"), "../lib");
        assert_eq!(resolved, PathBuf::from("/ws/lib/coverun.json"));
    }

    #[test]
    fn resolve_reference_file_form() {
        let resolved = resolve_reference(Path::new("/ws/app/coverun.json"), "../lib/custom.json");
        assert_eq!(resolved, PathBuf::from("/ws/lib/custom.json"));
    }

    #[test]
    fn normalize_folds_dot_segments() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
    }

    #[test]
    fn find_containing_config_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = find_containing_config(&nested).unwrap();
        assert_eq!(found, normalize(&dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn find_containing_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_containing_config(dir.path()), None);
    }
}
