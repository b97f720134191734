//! Cover naming conventions
//!
//! Discovery is driven by one marker word. A top-level container whose
//! name starts with the capitalized marker is a verification root; a
//! member whose name starts with the lowercase marker followed by an
//! uppercase letter or digit is a check; the bare lowercase marker names
//! the reset hook invoked between checks sharing a root.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase marker prefixing check names.
pub const MARKER: &str = "cover";

/// Capitalized marker prefixing verification-root names.
pub const ROOT_MARKER: &str = "Cover";

/// Reserved member name of the reset hook: the bare marker, which the
/// check pattern never matches.
pub const RESET_HOOK: &str = MARKER;

static CHECK_NAME: Lazy<Regex> = Lazy::new(|| Regex::new("^cover[A-Z0-9]").expect("static pattern"));

/// Whether a top-level binding name marks a verification root.
#[must_use]
pub fn is_verification_root(name: &str) -> bool {
    name.strip_prefix(ROOT_MARKER)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Whether a member name marks an invocable check.
#[must_use]
pub fn is_check_name(name: &str) -> bool {
    CHECK_NAME.is_match(name)
}

/// Pattern selecting every convention-named check in a container.
#[must_use]
pub fn check_name_pattern() -> Regex {
    CHECK_NAME.clone()
}

/// Display name of a check: the marker prefix stripped.
#[must_use]
pub fn display_label(name: &str) -> &str {
    match name.strip_prefix(MARKER) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}
