//! The merged export namespace
//!
//! One [`Registry`] per run, owned by the run context and handed
//! explicitly to the resolver — discovery never reads process globals.
//! The loader populates it in artifact dependency order; afterwards it is
//! read-mostly.

use crate::convention;
use crate::export::{Export, ExportMap};

/// Merged namespace of exported bindings plus the verification roots
/// discovered among them.
#[derive(Debug, Default)]
pub struct Registry {
    bindings: ExportMap,
    roots: Vec<String>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install one exported binding under `name`, applying the additive
    /// merge rule.
    ///
    /// Same-named container bindings merge member-wise (recursively);
    /// any collision involving a non-container keeps the existing binding
    /// unchanged and emits a diagnostic. Container bindings whose name
    /// matches the verification-root convention are registered as roots.
    pub fn install(&mut self, name: &str, export: Export) {
        merge_into(&mut self.bindings, name, export);

        if convention::is_verification_root(name)
            && self.bindings.get(name).is_some_and(Export::is_container)
            && !self.roots.iter().any(|r| r == name)
        {
            self.roots.push(name.to_owned());
        }
    }

    /// All top-level bindings, in installation order.
    #[must_use]
    pub fn bindings(&self) -> &ExportMap {
        &self.bindings
    }

    /// Look up a top-level binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Export> {
        self.bindings.get(name)
    }

    /// Verification-root names in discovery order.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Number of top-level bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no bindings have been installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn merge_into(target: &mut ExportMap, name: &str, incoming: Export) {
    if !target.contains_key(name) {
        target.insert(name.to_owned(), incoming);
        return;
    }

    match (target.get_mut(name), incoming) {
        (Some(Export::Container(existing)), Export::Container(members)) => {
            for (member, value) in members {
                merge_into(existing, &member, value);
            }
        }
        _ => {
            tracing::warn!("binding {name} collides with an existing binding; keeping original");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckResult, Cover};

    fn noop() -> Export {
        Export::Function(Cover::new(|| Ok(CheckResult::Implicit)))
    }

    #[test]
    fn merge_is_additive_across_artifacts() {
        let mut registry = Registry::new();
        registry.install("CoverUi", Export::container([("coverA".to_string(), noop())]));
        registry.install("CoverUi", Export::container([("coverB".to_string(), noop())]));

        let members = registry.get("CoverUi").unwrap().as_container().unwrap();
        let names: Vec<_> = members.keys().collect();
        assert_eq!(names, ["coverA", "coverB"]);
    }

    #[test]
    fn merge_recurses_into_nested_containers() {
        let mut registry = Registry::new();
        registry.install(
            "CoverUi",
            Export::container([(
                "widgets".to_string(),
                Export::container([("coverA".to_string(), noop())]),
            )]),
        );
        registry.install(
            "CoverUi",
            Export::container([(
                "widgets".to_string(),
                Export::container([("coverB".to_string(), noop())]),
            )]),
        );

        let widgets = registry
            .get("CoverUi")
            .and_then(Export::as_container)
            .and_then(|m| m.get("widgets"))
            .and_then(Export::as_container)
            .unwrap();
        assert_eq!(widgets.len(), 2);
    }

    #[test]
    fn non_container_collision_keeps_original() {
        let mut registry = Registry::new();
        registry.install("version", Export::Data(1.into()));
        registry.install("version", Export::Data(2.into()));

        match registry.get("version").unwrap() {
            Export::Data(v) => assert_eq!(v, &serde_json::json!(1)),
            other => panic!("unexpected export: {other:?}"),
        }
    }

    #[test]
    fn function_collision_with_container_keeps_container() {
        let mut registry = Registry::new();
        registry.install("CoverUi", Export::container([("coverA".to_string(), noop())]));
        registry.install("CoverUi", noop());

        assert!(registry.get("CoverUi").unwrap().is_container());
    }

    #[test]
    fn verification_roots_register_in_order() {
        let mut registry = Registry::new();
        registry.install("Helpers", Export::container([]));
        registry.install("CoverB", Export::container([]));
        registry.install("CoverA", Export::container([]));
        registry.install("CoverB", Export::container([]));

        assert_eq!(registry.roots(), ["CoverB", "CoverA"]);
    }

    #[test]
    fn non_container_marker_binding_is_not_a_root() {
        let mut registry = Registry::new();
        registry.install("CoverData", Export::Data(1.into()));
        assert!(registry.roots().is_empty());
    }
}
