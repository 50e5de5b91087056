//! The compiler host adapter: file-system answers for the type checker.

use crate::error::HostError;
use crate::registry::VirtualModuleRegistry;
use aot_source::{normalize_path, FileSystem, SourceCache, SourceError, SourceFile, WrittenFile};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extensions tried, in order, after the bare specifier.
const MODULE_SUFFIXES: &[&str] = &[".ts", ".d.ts", "/index.ts"];

/// Bridges the type checker's file-system expectations to a [`SourceCache`].
///
/// Every question the checker asks (does this file exist, what does it
/// contain, what is in this directory) is answered by the cache, which reads
/// through to the real [`FileSystem`] on a miss. Files written with
/// `should_emit = false` live only here and in the virtual-module registry.
pub struct CompilerHost {
    cache: Mutex<SourceCache>,
    published: Mutex<BTreeSet<PathBuf>>,
    base_path: PathBuf,
}

impl CompilerHost {
    /// Creates a host over `fs` with an empty, not-yet-caching source cache.
    pub fn new(fs: Arc<dyn FileSystem>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: Mutex::new(SourceCache::new(fs)),
            published: Mutex::new(BTreeSet::new()),
            base_path: normalize_path(&base_path.into()),
        }
    }

    /// The directory non-relative module specifiers resolve against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns `true` if `path` names a file.
    pub fn file_exists(&self, path: &Path) -> bool {
        self.cache.lock().exists(path)
    }

    /// Reads a file, or `None` when it does not exist.
    ///
    /// A missing file is an answer for the checker, not an error. Other
    /// failures propagate.
    pub fn read_file(&self, path: &Path) -> Result<Option<String>, HostError> {
        match self.cache.lock().read(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the parsed source for `path`, or `None` when it does not exist.
    pub fn source_file(&self, path: &Path) -> Result<Option<Arc<SourceFile>>, HostError> {
        match self.cache.lock().source_file(path) {
            Ok(file) => Ok(Some(file)),
            Err(SourceError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns `true` if `path` is a directory, on disk or virtually.
    pub fn directory_exists(&self, path: &Path) -> bool {
        self.cache.lock().dir_exists(path)
    }

    /// Lists the direct children of `dir`.
    pub fn read_directory(&self, dir: &Path) -> Vec<PathBuf> {
        self.cache.lock().list_dir(dir)
    }

    /// Writes a file into the cache.
    ///
    /// `should_emit = false` marks an in-memory module served to the resolver.
    pub fn write_file(&self, path: &Path, content: impl Into<String>, should_emit: bool) {
        self.cache.lock().write(path, content, should_emit);
    }

    /// Marks `path` changed so its content is re-read.
    pub fn invalidate(&self, path: &Path) {
        self.cache.lock().invalidate(path);
    }

    /// Ends the uncached construction phase.
    pub fn enable_caching(&self) {
        self.cache.lock().enable_caching();
    }

    /// The cache revision; moves on every write and invalidation.
    pub fn revision(&self) -> u64 {
        self.cache.lock().revision()
    }

    /// Returns `true` if `path` changed since the changed-set was last drained.
    pub fn is_changed(&self, path: &Path) -> bool {
        self.cache.lock().is_changed(path)
    }

    /// The changed-set, left in place.
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        self.cache.lock().changed_paths()
    }

    /// The changed-set, cleared.
    pub fn drain_changed_paths(&self) -> Vec<PathBuf> {
        self.cache.lock().drain_changed_paths()
    }

    /// Every file written through the host.
    pub fn written_files(&self) -> Vec<WrittenFile> {
        self.cache.lock().written_files()
    }

    /// Resolves a module specifier as seen from `containing_file`.
    ///
    /// Relative specifiers (`./`, `../`) resolve against the containing
    /// file's directory, all others against the base path. The bare path is
    /// tried first, then `.ts`, `.d.ts` and `/index.ts`.
    pub fn resolve_module(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        let anchor = if is_relative(specifier) {
            containing_file.parent().unwrap_or(self.base_path.as_path())
        } else {
            self.base_path.as_path()
        };
        let stem = normalize_path(&anchor.join(specifier));
        let cache = self.cache.lock();
        if cache.exists(&stem) {
            return Some(stem);
        }
        let stem_text = stem.to_string_lossy();
        MODULE_SUFFIXES
            .iter()
            .map(|suffix| PathBuf::from(format!("{stem_text}{suffix}")))
            .find(|candidate| cache.exists(candidate))
    }

    /// Drops generated files under `dir` that are not in `keep`.
    ///
    /// The dropped paths count as changed and are withdrawn from the
    /// resolver on the next [`populate_resolver`](Self::populate_resolver).
    pub fn retire_generated(&self, dir: &Path, keep: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
        let retired = self.cache.lock().retire_written(dir, keep);
        if !retired.is_empty() {
            tracing::debug!(count = retired.len(), "generated files retired");
        }
        retired
    }

    /// Registers every generated, in-memory file with a host module resolver
    /// and withdraws the ones published earlier that no longer exist.
    ///
    /// Returns the number of modules registered.
    pub fn populate_resolver(&self, registry: &dyn VirtualModuleRegistry) -> usize {
        let mut current = BTreeSet::new();
        for file in self.written_files().into_iter().filter(|f| !f.emit) {
            registry.register(&file.path, &file.content);
            current.insert(file.path);
        }
        let mut published = self.published.lock();
        let mut withdrawn = 0usize;
        for gone in published.difference(&current) {
            registry.unregister(gone);
            withdrawn += 1;
        }
        tracing::debug!(count = current.len(), withdrawn, "virtual modules registered");
        let count = current.len();
        *published = current;
        count
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}
