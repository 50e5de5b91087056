//! Content fingerprints for change detection between watch polls.
//!
//! A [`Fingerprints`] snapshot maps paths to content hashes. Diffing two
//! snapshots categorizes every path as new, modified, deleted or unchanged;
//! the watch driver feeds the dirty paths into the orchestrator's
//! invalidation queue.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use aot_common::ContentHash;

use crate::error::SourceError;
use crate::fs::FileSystem;

/// Result of comparing two fingerprint snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Paths absent from the previous snapshot.
    pub new_files: Vec<PathBuf>,
    /// Paths whose content hash differs.
    pub modified_files: Vec<PathBuf>,
    /// Paths present before but unreadable now.
    pub deleted_files: Vec<PathBuf>,
    /// Paths whose content hash matches.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if there are no new, modified, or deleted files.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Every path that must be invalidated: new, modified and deleted, sorted.
    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        let mut dirty: Vec<PathBuf> = self
            .new_files
            .iter()
            .chain(&self.modified_files)
            .chain(&self.deleted_files)
            .cloned()
            .collect();
        dirty.sort();
        dirty
    }
}

/// A snapshot of content hashes keyed by path.
#[derive(Debug, Clone, Default)]
pub struct Fingerprints {
    hashes: HashMap<PathBuf, ContentHash>,
}

impl Fingerprints {
    /// Hashes a single file.
    pub fn hash_file(fs: &dyn FileSystem, path: &Path) -> Result<ContentHash, SourceError> {
        let content = fs.read_to_string(path)?;
        Ok(ContentHash::of(&content))
    }

    /// Hashes every readable path. Unreadable paths are skipped and will
    /// appear as deleted when diffed against an older snapshot.
    pub fn capture(fs: &dyn FileSystem, paths: &[PathBuf]) -> Self {
        let mut hashes = HashMap::with_capacity(paths.len());
        for path in paths {
            if let Ok(hash) = Self::hash_file(fs, path) {
                hashes.insert(path.clone(), hash);
            }
        }
        Self { hashes }
    }

    /// Number of fingerprinted paths.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns `true` if no path was fingerprinted.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Compares `current` against `self` (the older snapshot).
    pub fn diff(&self, current: &Fingerprints) -> ChangeSet {
        let mut cs = ChangeSet::default();

        for (path, hash) in &current.hashes {
            match self.hashes.get(path) {
                Some(old) if old == hash => cs.unchanged_files.push(path.clone()),
                Some(_) => cs.modified_files.push(path.clone()),
                None => cs.new_files.push(path.clone()),
            }
        }
        cs.deleted_files = self
            .hashes
            .keys()
            .filter(|p| !current.hashes.contains_key(*p))
            .cloned()
            .collect();

        cs.new_files.sort();
        cs.modified_files.sort();
        cs.deleted_files.sort();
        cs.unchanged_files.sort();
        cs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn fs_with(files: &[(&str, &str)]) -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        for (p, c) in files {
            fs.insert(p, *c);
        }
        fs
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn capture_skips_unreadable() {
        let fs = fs_with(&[("/a.ts", "a")]);
        let fp = Fingerprints::capture(&fs, &paths(&["/a.ts", "/missing.ts"]));
        assert_eq!(fp.len(), 1);
    }

    #[test]
    fn unchanged_snapshot_is_empty() {
        let fs = fs_with(&[("/a.ts", "a"), ("/b.ts", "b")]);
        let list = paths(&["/a.ts", "/b.ts"]);
        let before = Fingerprints::capture(&fs, &list);
        let after = Fingerprints::capture(&fs, &list);
        let cs = before.diff(&after);
        assert!(cs.is_empty());
        assert_eq!(cs.unchanged_files.len(), 2);
    }

    #[test]
    fn detects_modified_new_and_deleted() {
        let fs = fs_with(&[("/a.ts", "a"), ("/b.ts", "b")]);
        let before = Fingerprints::capture(&fs, &paths(&["/a.ts", "/b.ts"]));

        fs.insert("/a.ts", "a2");
        fs.remove("/b.ts");
        fs.insert("/c.ts", "c");
        let after = Fingerprints::capture(&fs, &paths(&["/a.ts", "/b.ts", "/c.ts"]));

        let cs = before.diff(&after);
        assert_eq!(cs.modified_files, paths(&["/a.ts"]));
        assert_eq!(cs.deleted_files, paths(&["/b.ts"]));
        assert_eq!(cs.new_files, paths(&["/c.ts"]));
        assert_eq!(cs.dirty_paths(), paths(&["/a.ts", "/b.ts", "/c.ts"]));
    }

    #[test]
    fn hash_file_matches_content_hash() {
        let fs = fs_with(&[("/a.ts", "export {}")]);
        assert_eq!(
            Fingerprints::hash_file(&fs, Path::new("/a.ts")).unwrap(),
            ContentHash::of("export {}")
        );
    }
}
