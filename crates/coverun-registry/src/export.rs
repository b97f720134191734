//! Exported binding values
//!
//! The host module system hands the loader a mapping of exported binding
//! names to values. Three shapes matter to the runner: addressable
//! containers (namespaces), invocable covers, and everything else, which
//! is carried opaquely.

use crate::check::Cover;
use indexmap::IndexMap;

/// Name → value mapping with insertion-order enumeration.
pub type ExportMap = IndexMap<String, Export>;

/// One exported binding value.
#[derive(Debug, Clone)]
pub enum Export {
    /// Addressable container of named members.
    Container(ExportMap),

    /// An invocable cover function.
    Function(Cover),

    /// Any other exported value, kept only so collisions can be detected
    /// and diagnosed.
    Data(serde_json::Value),
}

impl Export {
    /// Container from an iterator of named members.
    #[must_use]
    pub fn container(members: impl IntoIterator<Item = (String, Export)>) -> Self {
        Self::Container(members.into_iter().collect())
    }

    /// View as a container.
    #[must_use]
    pub fn as_container(&self) -> Option<&ExportMap> {
        match self {
            Self::Container(map) => Some(map),
            _ => None,
        }
    }

    /// View as a cover function.
    #[must_use]
    pub fn as_function(&self) -> Option<&Cover> {
        match self {
            Self::Function(cover) => Some(cover),
            _ => None,
        }
    }

    /// Whether this export is an addressable container.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckResult;

    #[test]
    fn container_preserves_insertion_order() {
        let container = Export::container([
            ("b".to_string(), Export::Data(1.into())),
            ("a".to_string(), Export::Data(2.into())),
        ]);
        let names: Vec<_> = container.as_container().unwrap().keys().collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn accessors_discriminate_shapes() {
        let func = Export::Function(Cover::new(|| Ok(CheckResult::Implicit)));
        assert!(func.as_function().is_some());
        assert!(func.as_container().is_none());
        assert!(!func.is_container());

        let data = Export::Data(serde_json::json!({"k": 1}));
        assert!(data.as_function().is_none());
        assert!(!data.is_container());
    }
}
