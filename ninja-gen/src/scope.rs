/// Variable scopes: the lookup side of escapable strings.
///
/// A scope answers two questions: is a name declared (asked while parsing a
/// `NinjaString`), and what text does it currently hold (asked while
/// rendering). Lookups never mutate the scope.
use std::collections::{BTreeMap, HashMap};

/// Read-only variable lookup consulted during parsing and rendering.
pub trait Scope {
    /// Whether `name` may be referenced from strings validated against this scope.
    fn is_declared(&self, name: &str) -> bool;

    /// Current value of `name`, or `None` if it has no binding here.
    fn resolve(&self, name: &str) -> Option<&str>;
}

impl Scope for BTreeMap<String, String> {
    fn is_declared(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Scope for HashMap<String, String> {
    fn is_declared(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// An ordered set of variable bindings with an optional enclosing scope.
///
/// Lookups fall through to the parent when a name is not bound locally, which
/// mirrors how Ninja resolves build-edge variables before file-level ones.
#[derive(Debug, Clone, Default)]
pub struct VariableScope<'p> {
    vars: BTreeMap<String, String>,
    parent: Option<&'p VariableScope<'p>>,
}

impl<'p> VariableScope<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope whose unresolved lookups go to `parent`.
    pub fn with_parent(parent: &'p VariableScope<'p>) -> Self {
        Self {
            vars: BTreeMap::new(),
            parent: Some(parent),
        }
    }

    /// Bind `name` to `value`, replacing any previous local binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Number of local bindings (parents excluded).
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Scope for VariableScope<'_> {
    fn is_declared(&self, name: &str) -> bool {
        self.vars.contains_key(name) || self.parent.is_some_and(|p| p.is_declared(name))
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .or_else(|| self.parent.and_then(|p| p.resolve(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_resolve() {
        let mut scope = VariableScope::new();
        scope.set("cflags", "-O2");
        assert!(scope.is_declared("cflags"));
        assert_eq!(scope.resolve("cflags"), Some("-O2"));
        assert!(!scope.is_declared("ldflags"));
        assert_eq!(scope.resolve("ldflags"), None);
    }

    #[test]
    fn test_set_replaces_binding() {
        let mut scope = VariableScope::new();
        scope.set("out", "a");
        scope.set("out", "b");
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.resolve("out"), Some("b"));
    }

    #[test]
    fn test_child_falls_through_to_parent() {
        let mut root = VariableScope::new();
        root.set("builddir", "out");
        root.set("cflags", "-O2");

        let mut child = VariableScope::with_parent(&root);
        child.set("cflags", "-O0");

        assert!(child.is_declared("builddir"));
        assert_eq!(child.resolve("builddir"), Some("out"));
        assert_eq!(child.resolve("cflags"), Some("-O0"));
        assert_eq!(root.resolve("cflags"), Some("-O2"));
        assert!(!child.is_empty());
        assert_eq!(child.len(), 1);
    }

    #[test]
    fn test_std_maps_are_scopes() {
        let mut btree = BTreeMap::new();
        btree.insert("a".to_string(), "1".to_string());
        let mut hash = HashMap::new();
        hash.insert("b".to_string(), "2".to_string());

        assert_eq!(Scope::resolve(&btree, "a"), Some("1"));
        assert!(Scope::is_declared(&hash, "b"));
        assert!(!Scope::is_declared(&hash, "a"));
    }
}
