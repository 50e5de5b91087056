//! Ownership of the current program handle across build cycles.

use crate::checker::TypeChecker;
use crate::error::HostError;
use crate::host::CompilerHost;
use crate::program::ProgramHandle;
use aot_config::CompilerOptions;
use std::path::PathBuf;
use std::sync::Arc;

/// Owns the live [`ProgramHandle`] and creates its replacements.
///
/// At most one handle is current. Each creation passes the current handle
/// as `previous` so the checker may reuse unchanged files; correctness never
/// depends on that reuse.
pub struct ProgramManager {
    checker: Arc<dyn TypeChecker>,
    current: Option<ProgramHandle>,
    creations: usize,
    created_at_revision: Option<u64>,
}

impl ProgramManager {
    /// Creates a manager with no program yet.
    pub fn new(checker: Arc<dyn TypeChecker>) -> Self {
        Self {
            checker,
            current: None,
            creations: 0,
            created_at_revision: None,
        }
    }

    /// The type checker programs are created with.
    pub fn checker(&self) -> &Arc<dyn TypeChecker> {
        &self.checker
    }

    /// Creates a new program, reusing the current one where the checker can.
    ///
    /// On failure the current handle is kept.
    pub fn create_or_update(
        &mut self,
        root_files: &[PathBuf],
        options: &CompilerOptions,
        host: &CompilerHost,
    ) -> Result<ProgramHandle, HostError> {
        let revision = host.revision();
        let reused = self.current.is_some();
        let program =
            self.checker
                .create_program(root_files, options, host, self.current.as_ref())?;
        self.creations += 1;
        self.created_at_revision = Some(revision);
        tracing::debug!(
            roots = root_files.len(),
            files = program.source_files().len(),
            revision,
            reused,
            "program created"
        );
        self.current = Some(Arc::clone(&program));
        Ok(program)
    }

    /// The current program, if one has been created.
    pub fn current(&self) -> Option<&ProgramHandle> {
        self.current.as_ref()
    }

    /// How many programs have been created.
    pub fn creation_count(&self) -> usize {
        self.creations
    }

    /// Returns `true` if the host's cache moved since the current program was created.
    pub fn is_stale(&self, host: &CompilerHost) -> bool {
        self.created_at_revision != Some(host.revision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;
    use aot_config::ParsedConfig;
    use aot_diagnostics::Diagnostic;
    use aot_source::{MemoryFileSystem, SourceFile};
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::path::Path;

    struct RootsOnly {
        roots: Vec<PathBuf>,
        files: BTreeMap<PathBuf, Arc<SourceFile>>,
        options: CompilerOptions,
    }

    impl Program for RootsOnly {
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

    #[derive(Default)]
    struct RootsOnlyChecker {
        reused: Mutex<usize>,
    }

    impl TypeChecker for RootsOnlyChecker {
        fn parse_config(
            &self,
            _raw: &Value,
            _base_path: &Path,
            _host: &CompilerHost,
        ) -> Result<ParsedConfig, HostError> {
            Ok(ParsedConfig::default())
        }

        fn create_program(
            &self,
            root_files: &[PathBuf],
            options: &CompilerOptions,
            host: &CompilerHost,
            previous: Option<&ProgramHandle>,
        ) -> Result<ProgramHandle, HostError> {
            let mut files = BTreeMap::new();
            for root in root_files {
                let kept = previous
                    .filter(|_| !host.is_changed(root))
                    .and_then(|p| p.source_file(root));
                let file = match kept {
                    Some(file) => {
                        *self.reused.lock() += 1;
                        file
                    }
                    None => match host.source_file(root)? {
                        Some(file) => file,
                        None => return Err(HostError::Program(format!("missing {}", root.display()))),
                    },
                };
                files.insert(root.clone(), file);
            }
            Ok(Arc::new(RootsOnly {
                roots: root_files.to_vec(),
                files,
                options: options.clone(),
            }))
        }

        fn global_diagnostics(&self, _program: &ProgramHandle) -> Vec<Diagnostic> {
            Vec::new()
        }
        fn syntactic_diagnostics(&self, _program: &ProgramHandle, _file: &Path) -> Vec<Diagnostic> {
            Vec::new()
        }
        fn semantic_diagnostics(&self, _program: &ProgramHandle, _file: &Path) -> Vec<Diagnostic> {
            Vec::new()
        }
        fn declaration_diagnostics(&self, _program: &ProgramHandle, _file: &Path) -> Vec<Diagnostic> {
            Vec::new()
        }
    }

    fn setup() -> (Arc<RootsOnlyChecker>, ProgramManager, CompilerHost) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/app/a.ts", "export const a = 1;");
        fs.insert("/app/b.ts", "export const b = 2;");
        let checker = Arc::new(RootsOnlyChecker::default());
        let manager = ProgramManager::new(checker.clone());
        (checker, manager, CompilerHost::new(fs, "/app"))
    }

    fn roots() -> Vec<PathBuf> {
        vec![PathBuf::from("/app/a.ts"), PathBuf::from("/app/b.ts")]
    }

    #[test]
    fn first_creation_has_no_previous() {
        let (checker, mut manager, host) = setup();
        assert!(manager.current().is_none());
        let program = manager
            .create_or_update(&roots(), &CompilerOptions::default(), &host)
            .unwrap();
        assert_eq!(program.source_files().len(), 2);
        assert_eq!(manager.creation_count(), 1);
        assert_eq!(*checker.reused.lock(), 0);
    }

    #[test]
    fn update_reuses_only_unchanged_files() {
        let (checker, mut manager, host) = setup();
        host.enable_caching();
        manager
            .create_or_update(&roots(), &CompilerOptions::default(), &host)
            .unwrap();
        host.write_file(Path::new("/app/b.ts"), "export const b = 3;", true);
        let program = manager
            .create_or_update(&roots(), &CompilerOptions::default(), &host)
            .unwrap();
        assert_eq!(*checker.reused.lock(), 1);
        assert_eq!(
            program.source_file(Path::new("/app/b.ts")).unwrap().content,
            "export const b = 3;"
        );
        assert_eq!(manager.creation_count(), 2);
    }

    #[test]
    fn staleness_tracks_cache_revision() {
        let (_checker, mut manager, host) = setup();
        assert!(manager.is_stale(&host));
        manager
            .create_or_update(&roots(), &CompilerOptions::default(), &host)
            .unwrap();
        assert!(!manager.is_stale(&host));
        host.invalidate(Path::new("/app/a.ts"));
        assert!(manager.is_stale(&host));
    }

    #[test]
    fn failed_creation_keeps_current() {
        let (_checker, mut manager, host) = setup();
        let first = manager
            .create_or_update(&roots(), &CompilerOptions::default(), &host)
            .unwrap();
        let err = manager
            .create_or_update(&[PathBuf::from("/app/missing.ts")], &CompilerOptions::default(), &host)
            .err().unwrap();
        assert!(matches!(err, HostError::Program(_)));
        assert!(Arc::ptr_eq(manager.current().unwrap(), &first));
        assert_eq!(manager.creation_count(), 1);
    }
}
