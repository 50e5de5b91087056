//! A type checker that scans sources instead of type-checking them.

use crate::imports::{scan_imports, ImportRef};
use crate::tsconfig::parse_ts_config;
use aot_config::{CompilerOptions, ParsedConfig};
use aot_diagnostics::{Category, Diagnostic, DiagnosticCode};
use aot_host::{CompilerHost, HostError, Program, ProgramHandle, TypeChecker};
use aot_source::SourceFile;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MISSING_ROOT: DiagnosticCode = DiagnosticCode {
    category: Category::Global,
    number: 1,
};
const LEX_ERROR: DiagnosticCode = DiagnosticCode {
    category: Category::Syntactic,
    number: 1,
};
const UNRESOLVED_IMPORT: DiagnosticCode = DiagnosticCode {
    category: Category::Semantic,
    number: 2307,
};

/// A program built by [`ScanChecker`].
pub struct ScanProgram {
    roots: Vec<PathBuf>,
    files: BTreeMap<PathBuf, Arc<SourceFile>>,
    options: CompilerOptions,
    reused: usize,
}

impl Program for ScanProgram {
    fn root_files(&self) -> &[PathBuf] {
        &self.roots
    }

    fn source_files(&self) -> Vec<Arc<SourceFile>> {
        self.files.values().cloned().collect()
    }

    fn source_file(&self, path: &Path) -> Option<Arc<SourceFile>> {
        self.files.get(path).cloned()
    }

    fn options(&self) -> &CompilerOptions {
        &self.options
    }
}

/// Builds programs from root files plus everything they import relatively.
///
/// In-memory generated `.ts` files written through the host are added as
/// extra roots so the post-generation program sees them. A file whose
/// content hash matches the previous program's copy is taken over as is.
#[derive(Debug, Default)]
pub struct ScanChecker;

impl ScanChecker {
    /// Creates a checker.
    pub fn new() -> Self {
        Self
    }

    fn find(program: &ProgramHandle, file: &Path) -> Option<Arc<SourceFile>> {
        program.source_file(&aot_source::normalize_path(file))
    }
}

impl TypeChecker for ScanChecker {
    fn parse_config(
        &self,
        raw: &Value,
        base_path: &Path,
        host: &CompilerHost,
    ) -> Result<ParsedConfig, HostError> {
        Ok(parse_ts_config(raw, base_path, host)?)
    }

    fn create_program(
        &self,
        root_files: &[PathBuf],
        options: &CompilerOptions,
        host: &CompilerHost,
        previous: Option<&ProgramHandle>,
    ) -> Result<ProgramHandle, HostError> {
        let generated = host
            .written_files()
            .into_iter()
            .filter(|f| !f.emit && f.path.to_string_lossy().ends_with(".ts"))
            .map(|f| f.path);
        let mut queue: VecDeque<PathBuf> = root_files.iter().cloned().chain(generated).collect();

        let mut program = ScanProgram {
            roots: root_files.to_vec(),
            files: BTreeMap::new(),
            options: options.clone(),
            reused: 0,
        };

        while let Some(path) = queue.pop_front() {
            let path = aot_source::normalize_path(&path);
            if program.files.contains_key(&path) {
                continue;
            }
            let Some(fresh) = host.source_file(&path)? else {
                continue;
            };
            let file = match previous.and_then(|p| p.source_file(&path)) {
                Some(old) if old.content_hash == fresh.content_hash => {
                    program.reused += 1;
                    old
                }
                _ => fresh,
            };
            for import in scan_imports(&file).into_iter().filter(ImportRef::is_relative) {
                if let Some(target) = host.resolve_module(&import.specifier, &path) {
                    queue.push_back(target);
                }
            }
            program.files.insert(path, file);
        }

        tracing::debug!(
            files = program.files.len(),
            reused = program.reused,
            "scan program built"
        );
        Ok(Arc::new(program))
    }

    fn global_diagnostics(&self, program: &ProgramHandle) -> Vec<Diagnostic> {
        let roots: Vec<PathBuf> = program
            .root_files()
            .iter()
            .map(|r| aot_source::normalize_path(r))
            .filter(|r| !program.contains(r))
            .collect();
        roots
            .into_iter()
            .map(|root| {
                Diagnostic::error(
                    MISSING_ROOT,
                    format!("File '{}' not found.", root.display()),
                )
            })
            .collect()
    }

    fn syntactic_diagnostics(&self, program: &ProgramHandle, file: &Path) -> Vec<Diagnostic> {
        let Some(source) = Self::find(program, file) else {
            return Vec::new();
        };
        source
            .lex_errors()
            .iter()
            .map(|err| {
                Diagnostic::error(LEX_ERROR, err.message.clone()).in_file(
                    &source,
                    err.offset,
                    err.offset + 1,
                )
            })
            .collect()
    }

    fn semantic_diagnostics(&self, program: &ProgramHandle, file: &Path) -> Vec<Diagnostic> {
        let Some(source) = Self::find(program, file) else {
            return Vec::new();
        };
        let dir = source.path.parent().map(Path::to_path_buf).unwrap_or_default();
        scan_imports(&source)
            .into_iter()
            .filter(ImportRef::is_relative)
            .filter(|import| {
                let target = aot_source::normalize_path(&dir.join(&import.specifier));
                ![".ts", ".d.ts", "/index.ts", ""].iter().any(|suffix| {
                    let candidate = PathBuf::from(format!("{}{suffix}", target.display()));
                    program.contains(&candidate)
                })
            })
            .map(|import| {
                Diagnostic::error(
                    UNRESOLVED_IMPORT,
                    format!("Cannot find module '{}'.", import.specifier),
                )
                .in_file(&source, import.start, import.end)
            })
            .collect()
    }

    fn declaration_diagnostics(&self, _program: &ProgramHandle, _file: &Path) -> Vec<Diagnostic> {
        Vec::new()
    }
}
