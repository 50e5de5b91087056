//! Write-through, invalidatable cache of file contents and parsed sources.
//!
//! The cache sits between the type checker's file-system expectations and
//! the real (or in-memory) [`FileSystem`]. It has a two-phase lifecycle:
//! while the first program is being constructed caching is off and parsed
//! [`SourceFile`]s are handed out without being retained; after
//! [`enable_caching`](SourceCache::enable_caching) both disk reads and parse
//! artifacts are kept until the path is invalidated or rewritten.
//!
//! Every write or invalidation adds the path to the changed-set and bumps
//! the cache [`revision`](SourceCache::revision). The changed-set is drained
//! exactly once per build cycle.

use crate::error::SourceError;
use crate::fs::FileSystem;
use crate::path::normalize_path;
use crate::source_file::SourceFile;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a cache entry's content came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryOrigin {
    /// Read from the backing file system.
    Disk,
    /// Written through [`SourceCache::write`].
    Written {
        /// Whether the file is build output for the consumer.
        /// `false` marks a purely in-memory module.
        emit: bool,
    },
}

#[derive(Debug)]
struct CacheEntry {
    content: String,
    source: Option<Arc<SourceFile>>,
    origin: EntryOrigin,
}

/// A file written through the cache, as seen by resolver population.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFile {
    /// Normalized path of the file.
    pub path: PathBuf,
    /// The written content.
    pub content: String,
    /// Whether the file is build output rather than an in-memory module.
    pub emit: bool,
}

/// The source cache. See the [module documentation](self).
pub struct SourceCache {
    fs: Arc<dyn FileSystem>,
    entries: BTreeMap<PathBuf, CacheEntry>,
    changed: BTreeSet<PathBuf>,
    caching: bool,
    revision: u64,
}

impl SourceCache {
    /// Creates an empty cache over `fs` with caching disabled.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            entries: BTreeMap::new(),
            changed: BTreeSet::new(),
            caching: false,
            revision: 0,
        }
    }

    /// Turns on retention of disk reads and parse artifacts.
    pub fn enable_caching(&mut self) {
        if !self.caching {
            tracing::debug!("source cache: caching enabled");
        }
        self.caching = true;
    }

    /// Returns `true` once [`enable_caching`](Self::enable_caching) has been called.
    pub fn is_caching(&self) -> bool {
        self.caching
    }

    /// A counter bumped by every write and invalidation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stores `content` for `path` and marks it changed.
    ///
    /// Written content is always retained, regardless of the caching phase,
    /// so it is visible to the very next program creation.
    pub fn write(&mut self, path: &Path, content: impl Into<String>, should_emit: bool) {
        let path = normalize_path(path);
        tracing::debug!(path = %path.display(), emit = should_emit, "source cache: write");
        self.entries.insert(
            path.clone(),
            CacheEntry {
                content: content.into(),
                source: None,
                origin: EntryOrigin::Written { emit: should_emit },
            },
        );
        self.changed.insert(path);
        self.revision += 1;
    }

    /// Marks `path` changed and forgets any cached content for it.
    ///
    /// The content is re-read lazily from the file system on the next access.
    pub fn invalidate(&mut self, path: &Path) {
        let path = normalize_path(path);
        tracing::debug!(path = %path.display(), "source cache: invalidate");
        self.entries.remove(&path);
        self.changed.insert(path);
        self.revision += 1;
    }

    /// Returns the content of `path`, reading through to the file system on a miss.
    ///
    /// Fails with [`SourceError::NotFound`] when the file is neither cached
    /// nor present on the file system.
    pub fn read(&mut self, path: &Path) -> Result<String, SourceError> {
        let path = normalize_path(path);
        if let Some(entry) = self.entries.get(&path) {
            return Ok(entry.content.clone());
        }
        let content = self.fs.read_to_string(&path)?;
        if self.caching {
            self.entries.insert(
                path,
                CacheEntry {
                    content: content.clone(),
                    source: None,
                    origin: EntryOrigin::Disk,
                },
            );
        }
        Ok(content)
    }

    /// Returns the parsed [`SourceFile`] for `path`.
    ///
    /// While caching is disabled a fresh parse is returned on every call and
    /// nothing is retained.
    pub fn source_file(&mut self, path: &Path) -> Result<Arc<SourceFile>, SourceError> {
        let path = normalize_path(path);
        if let Some(source) = self.entries.get(&path).and_then(|e| e.source.clone()) {
            return Ok(source);
        }
        let content = self.read(&path)?;
        let source = Arc::new(SourceFile::parse(path.clone(), content));
        if self.caching {
            if let Some(entry) = self.entries.get_mut(&path) {
                entry.source = Some(Arc::clone(&source));
            }
        }
        Ok(source)
    }

    /// Returns `true` if `path` is cached or exists on the file system.
    pub fn exists(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.entries.contains_key(&path) || self.fs.is_file(&path)
    }

    /// Returns `true` if `path` is a directory on disk or an ancestor of a written file.
    pub fn dir_exists(&self, path: &Path) -> bool {
        let dir = normalize_path(path);
        self.fs.is_dir(&dir) || self.written_under(&dir).next().is_some()
    }

    /// Lists the direct children of `dir`: disk entries merged with written files.
    pub fn list_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let dir = normalize_path(dir);
        let mut children: BTreeSet<PathBuf> = self
            .fs
            .read_dir(&dir)
            .map(|entries| entries.into_iter().collect())
            .unwrap_or_default();
        for path in self.written_under(&dir) {
            if let Ok(rest) = path.strip_prefix(&dir) {
                if let Some(first) = rest.components().next() {
                    children.insert(dir.join(first.as_os_str()));
                }
            }
        }
        children.into_iter().collect()
    }

    fn written_under<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.entries
            .iter()
            .filter(move |(p, e)| {
                matches!(e.origin, EntryOrigin::Written { .. }) && p.as_path() != dir && p.starts_with(dir)
            })
            .map(|(p, _)| p)
    }

    /// Drops written entries under `dir` that are not in `keep`.
    ///
    /// Each dropped path joins the changed-set. Returns the dropped paths.
    pub fn retire_written(&mut self, dir: &Path, keep: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
        let dir = normalize_path(dir);
        let stale: Vec<PathBuf> = self
            .written_under(&dir)
            .filter(|p| !keep.contains(*p))
            .cloned()
            .collect();
        for path in &stale {
            tracing::debug!(path = %path.display(), "source cache: retire");
            self.entries.remove(path);
            self.changed.insert(path.clone());
            self.revision += 1;
        }
        stale
    }

    /// Returns every file written through the cache, sorted by path.
    pub fn written_files(&self) -> Vec<WrittenFile> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| match entry.origin {
                EntryOrigin::Written { emit } => Some(WrittenFile {
                    path: path.clone(),
                    content: entry.content.clone(),
                    emit,
                }),
                EntryOrigin::Disk => None,
            })
            .collect()
    }

    /// Returns `true` if `path` is in the changed-set.
    pub fn is_changed(&self, path: &Path) -> bool {
        self.changed.contains(&normalize_path(path))
    }

    /// Returns the changed-set without clearing it, sorted by path.
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        self.changed.iter().cloned().collect()
    }

    /// Returns the changed-set and clears it.
    pub fn drain_changed_paths(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.changed).into_iter().collect()
    }
}
