//! Line-based target designation
//!
//! "Point at a source line" designation needs only pure text analysis:
//! extract a function name when the line is a declaration matching the
//! cover convention, and recover the enclosing namespace path by matching
//! namespace declarations at decreasing indentation in the preceding
//! lines.

use crate::settings::DesignatedTarget;
use coverun_project::find_containing_config;
use coverun_registry::convention;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:async\s+)?function[\s*]+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(")
        .expect("static pattern")
});

static NAMESPACE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*namespace\s+([A-Za-z_$][A-Za-z0-9_$.]*)").expect("static pattern")
});

/// Errors raised while designating a target from a source location.
#[derive(Debug, thiserror::Error)]
pub enum DesignateError {
    /// The source file could not be read.
    #[error("could not read source file {path}: {source}")]
    Unreadable {
        /// Path as given.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The 1-based line number does not exist in the file.
    #[error("line {line} is out of range for {path}")]
    LineOutOfRange {
        /// Path as given.
        path: PathBuf,
        /// Offending line number.
        line: usize,
    },

    /// The line does not declare a convention-named cover function.
    #[error("line does not declare a cover function: {text}")]
    NotACoverDeclaration {
        /// The offending line, trimmed.
        text: String,
    },

    /// No project config file exists above the source file.
    #[error("no containing config file above {}", .0.display())]
    NoContainingConfig(PathBuf),
}

/// Extract the declared function name from one line of source text, or
/// `None` when the line is not a function declaration.
#[must_use]
pub fn function_name_from_line(line: &str) -> Option<String> {
    FUNCTION_DECL
        .captures(line)
        .map(|captures| captures[1].to_string())
}

/// Recover the enclosing namespace path for the last line of `lines`,
/// matching namespace declarations at strictly decreasing indentation.
#[must_use]
pub fn enclosing_namespace(lines: &[&str]) -> Vec<String> {
    let Some(last) = lines.last() else {
        return Vec::new();
    };

    let mut namespace = Vec::new();
    let mut current_indent = indent_of(last);
    if current_indent == 0 {
        return namespace;
    }

    for line in lines.iter().rev().skip(1) {
        let line_indent = indent_of(line);
        if line_indent < current_indent {
            if let Some(captures) = NAMESPACE_DECL.captures(line) {
                let segments = captures[1].split('.').map(str::to_owned);
                namespace.splice(0..0, segments);
                current_indent = line_indent;
            }
            if current_indent == 0 {
                break;
            }
        }
    }

    namespace
}

/// Designate the cover function declared at `file:line` (1-based).
///
/// # Errors
/// See [`DesignateError`]: unreadable file, out-of-range line, a line
/// that is not a convention-named cover declaration, or a source file
/// with no containing project config.
pub fn designate(file: &Path, line: usize) -> Result<DesignatedTarget, DesignateError> {
    let text = std::fs::read_to_string(file).map_err(|source| DesignateError::Unreadable {
        path: file.to_path_buf(),
        source,
    })?;

    let lines: Vec<&str> = text.lines().collect();
    if line == 0 || line > lines.len() {
        return Err(DesignateError::LineOutOfRange {
            path: file.to_path_buf(),
            line,
        });
    }

    let declaration = lines[line - 1];
    let name = function_name_from_line(declaration)
        .filter(|name| convention::is_check_name(name))
        .ok_or_else(|| DesignateError::NotACoverDeclaration {
            text: declaration.trim().to_string(),
        })?;

    let namespace = enclosing_namespace(&lines[..line]);

    let start_dir = file.parent().unwrap_or_else(|| Path::new(""));
    let config_path = find_containing_config(start_dir)
        .ok_or_else(|| DesignateError::NoContainingConfig(file.to_path_buf()))?;
    let project_path = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Ok(DesignatedTarget {
        project_path,
        namespace,
        name,
    })
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
