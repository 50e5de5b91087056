//! Virtual modules handed to a host build tool's resolver.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A host module resolver that accepts in-memory files.
pub trait VirtualModuleRegistry: Send + Sync {
    /// Registers (or replaces) a module at `path`.
    fn register(&self, path: &Path, content: &str);

    /// Removes the module at `path`, if registered.
    fn unregister(&self, path: &Path);
}

/// A [`VirtualModuleRegistry`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    modules: RwLock<BTreeMap<PathBuf, String>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content registered at `path`.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.modules.read().get(path).cloned()
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.modules.read().keys().cloned().collect()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

impl VirtualModuleRegistry for InMemoryRegistry {
    fn register(&self, path: &Path, content: &str) {
        self.modules
            .write()
            .insert(path.to_path_buf(), content.to_string());
    }

    fn unregister(&self, path: &Path) {
        self.modules.write().remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_replaces() {
        let registry = InMemoryRegistry::new();
        registry.register(Path::new("/g/a.ts"), "1");
        registry.register(Path::new("/g/a.ts"), "2");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Path::new("/g/a.ts")).as_deref(), Some("2"));
        assert_eq!(registry.paths(), vec![PathBuf::from("/g/a.ts")]);

        registry.unregister(Path::new("/g/a.ts"));
        assert!(registry.is_empty());
    }
}
