//! The type-checking compiler collaborator.

use crate::error::HostError;
use crate::host::CompilerHost;
use crate::program::ProgramHandle;
use aot_config::{CompilerOptions, ParsedConfig};
use aot_diagnostics::Diagnostic;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Capability contract of the external type checker.
///
/// The orchestrator never inspects source semantics itself; everything it
/// knows about types and diagnostics comes through this trait.
pub trait TypeChecker: Send + Sync {
    /// Interprets raw tsconfig JSON relative to `base_path`.
    ///
    /// Root-file globs are expanded through `host`, so files seeded into the
    /// source cache are visible.
    fn parse_config(
        &self,
        raw: &Value,
        base_path: &Path,
        host: &CompilerHost,
    ) -> Result<ParsedConfig, HostError>;

    /// Creates a program over `host`.
    ///
    /// When `previous` is given, unchanged files may be reused from it; the
    /// host's changed-set says which files must not be.
    fn create_program(
        &self,
        root_files: &[PathBuf],
        options: &CompilerOptions,
        host: &CompilerHost,
        previous: Option<&ProgramHandle>,
    ) -> Result<ProgramHandle, HostError>;

    /// Diagnostics not tied to a single file.
    fn global_diagnostics(&self, program: &ProgramHandle) -> Vec<Diagnostic>;

    /// Syntax diagnostics for one file.
    fn syntactic_diagnostics(&self, program: &ProgramHandle, file: &Path) -> Vec<Diagnostic>;

    /// Type diagnostics for one file.
    fn semantic_diagnostics(&self, program: &ProgramHandle, file: &Path) -> Vec<Diagnostic>;

    /// Declaration-emit diagnostics for one file.
    fn declaration_diagnostics(&self, program: &ProgramHandle, file: &Path) -> Vec<Diagnostic>;
}
