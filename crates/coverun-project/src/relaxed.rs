//! Permissive config-document parsing
//!
//! Project config files are written by hand and accumulate `//` comments,
//! `/* */` blocks and trailing commas. [`parse`] strips that relaxed syntax
//! (string-aware) and hands the remainder to serde_json. Text that still
//! fails to parse yields an empty object — config parsing never fails
//! fatally; callers substitute defaults field by field.

use serde_json::{Map, Value};

/// Parse relaxed JSON text into a [`Value`].
///
/// Comments and trailing commas are tolerated. Malformed input (including
/// an empty document) parses to an empty object rather than an error.
#[must_use]
pub fn parse(text: &str) -> Value {
    let stripped = strip_trailing_commas(&strip_comments(text));
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return Value::Object(Map::new());
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("malformed config document treated as empty: {err}");
            Value::Object(Map::new())
        }
    }
}

/// Remove `//` line comments and `/* */` block comments, preserving
/// string literals (escape-aware).
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Remove commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        if c == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}
