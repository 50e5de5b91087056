//! The compiled-program handle.

use aot_config::CompilerOptions;
use aot_source::SourceFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// All files plus type information currently believed correct.
///
/// A program is immutable once created: each build cycle replaces the handle
/// rather than mutating it.
pub trait Program: Send + Sync {
    /// The root files the program was created from.
    fn root_files(&self) -> &[PathBuf];

    /// Every source file in the program, roots and their dependencies.
    fn source_files(&self) -> Vec<Arc<SourceFile>>;

    /// Looks up one source file by normalized path.
    fn source_file(&self, path: &Path) -> Option<Arc<SourceFile>>;

    /// The compiler options the program was created with.
    fn options(&self) -> &CompilerOptions;

    /// Returns `true` if `path` is part of the program.
    fn contains(&self, path: &Path) -> bool {
        self.source_file(path).is_some()
    }
}

/// A shared reference to a [`Program`].
pub type ProgramHandle = Arc<dyn Program>;
