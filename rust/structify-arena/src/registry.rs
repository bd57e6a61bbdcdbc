//! Named-scope registry.

use std::collections::HashMap;

use log::debug;

use crate::scope::Scope;

/// A registry of named scopes.
///
/// Scopes are created lazily on first lookup and persist until explicitly
/// disposed. The registry is an ordinary value meant to be owned and passed
/// around (or held once at the application root), not a hidden process-wide
/// singleton; this keeps it testable and its lifetime explicit.
///
/// Not thread-safe: concurrent access from multiple threads requires
/// external synchronization.
#[derive(Default)]
pub struct ScopeRegistry {
    scopes: HashMap<String, Scope>,
}

impl ScopeRegistry {
    /// Creates an empty registry.
    pub fn new() -> ScopeRegistry {
        ScopeRegistry {
            scopes: HashMap::new(),
        }
    }

    /// Returns the scope registered under `name`, creating it on first
    /// lookup.
    pub fn scope(&mut self, name: &str) -> &mut Scope {
        self.scopes.entry(name.to_string()).or_default()
    }

    /// Returns the scope registered under `name` without creating it.
    pub fn get(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Returns the number of registered scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Checks whether the registry holds no scopes.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Disposes the scope registered under `name` and forgets it.
    ///
    /// Unknown names are ignored.
    pub fn dispose_scope(&mut self, name: &str) {
        if let Some(mut scope) = self.scopes.remove(name) {
            debug!("disposing named scope '{name}'");
            scope.dispose();
        }
    }

    /// Disposes and forgets every registered scope.
    pub fn dispose_all(&mut self) {
        debug!("disposing all {} named scope(s)", self.scopes.len());
        for scope in self.scopes.values_mut() {
            scope.dispose();
        }
        self.scopes.clear();
    }
}

impl std::fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("scopes", &self.scopes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation() {
        let mut registry = ScopeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("render").is_none());

        registry.scope("render").alloc(16, 8).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("render").unwrap().owned(), 1);

        // Same name resolves to the same scope.
        registry.scope("render").alloc(16, 8).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("render").unwrap().owned(), 2);
    }

    #[test]
    fn test_dispose_scope_forgets_entry() {
        let mut registry = ScopeRegistry::new();
        registry.scope("a").alloc(8, 4).unwrap();
        registry.dispose_scope("a");
        assert!(registry.get("a").is_none());

        // Unknown names are ignored; a fresh scope appears on next lookup.
        registry.dispose_scope("missing");
        assert!(!registry.scope("a").is_disposed());
        assert_eq!(registry.get("a").unwrap().owned(), 0);
    }

    #[test]
    fn test_dispose_all() {
        let mut registry = ScopeRegistry::new();
        registry.scope("a").alloc(8, 4).unwrap();
        registry.scope("b").alloc(8, 4).unwrap();
        registry.scope("c");
        registry.dispose_all();
        assert!(registry.is_empty());
    }
}
