//! The file-system view the [`SourceCache`](crate::SourceCache) reads through.

use crate::error::SourceError;
use crate::path::normalize_path;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only file-system operations needed by the cache and host adapter.
pub trait FileSystem: Send + Sync {
    /// Reads a file's entire content as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, SourceError>;

    /// Returns `true` if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists the direct children of a directory, sorted by path.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, SourceError>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, SourceError> {
        std::fs::read_to_string(path).map_err(|e| SourceError::from_io(path, e))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| SourceError::from_io(path, e))? {
            let entry = entry.map_err(|e| SourceError::from_io(path, e))?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }
}

/// An in-memory file system, mutable through a shared reference.
///
/// Used by tests and by embedders that hold sources in memory. Directories
/// exist implicitly as ancestors of stored files.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .write()
            .insert(normalize_path(path.as_ref()), content.into());
    }

    /// Deletes a file, returning `true` if it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files
            .write()
            .remove(&normalize_path(path.as_ref()))
            .is_some()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, SourceError> {
        self.files
            .read()
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().contains_key(&normalize_path(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let dir = normalize_path(path);
        self.files
            .read()
            .keys()
            .any(|p| p != &dir && p.starts_with(&dir))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let dir = normalize_path(path);
        if !self.is_dir(&dir) {
            return Err(SourceError::NotFound(dir));
        }
        let mut children: Vec<PathBuf> = self
            .files
            .read()
            .keys()
            .filter_map(|p| {
                let rest = p.strip_prefix(&dir).ok()?;
                let first = rest.components().next()?;
                Some(dir.join(first.as_os_str()))
            })
            .collect();
        children.sort();
        children.dedup();
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_read_and_exists() {
        let fs = MemoryFileSystem::new();
        fs.insert("/app/src/main.ts", "bootstrap();");
        assert!(fs.is_file(Path::new("/app/src/main.ts")));
        assert!(fs.is_dir(Path::new("/app/src")));
        assert!(fs.is_dir(Path::new("/app")));
        assert!(!fs.is_dir(Path::new("/app/src/main.ts")));
        assert_eq!(
            fs.read_to_string(Path::new("/app/src/./main.ts")).unwrap(),
            "bootstrap();"
        );
    }

    #[test]
    fn memory_missing_is_not_found() {
        let fs = MemoryFileSystem::new();
        let err = fs.read_to_string(Path::new("/nope.ts")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn memory_read_dir_lists_direct_children() {
        let fs = MemoryFileSystem::new();
        fs.insert("/app/a.ts", "");
        fs.insert("/app/lazy/lazy.module.ts", "");
        fs.insert("/app/lazy/other.ts", "");
        let children = fs.read_dir(Path::new("/app")).unwrap();
        assert_eq!(
            children,
            vec![PathBuf::from("/app/a.ts"), PathBuf::from("/app/lazy")]
        );
    }

    #[test]
    fn memory_remove() {
        let fs = MemoryFileSystem::new();
        fs.insert("/a.ts", "x");
        assert!(fs.remove("/a.ts"));
        assert!(!fs.remove("/a.ts"));
        assert!(!fs.is_file(Path::new("/a.ts")));
    }

    #[test]
    fn disk_reads_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.ts"), "b").unwrap();
        std::fs::write(dir.path().join("a.ts"), "a").unwrap();
        let fs = DiskFileSystem;
        assert_eq!(fs.read_to_string(&dir.path().join("a.ts")).unwrap(), "a");
        let listed = fs.read_dir(dir.path()).unwrap();
        assert_eq!(listed, vec![dir.path().join("a.ts"), dir.path().join("b.ts")]);
        assert!(fs
            .read_to_string(&dir.path().join("missing.ts"))
            .unwrap_err()
            .is_not_found());
    }
}
