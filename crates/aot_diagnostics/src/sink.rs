//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use parking_lot::Mutex;
use std::path::Path;

/// Collects diagnostics in arrival order.
///
/// Records are never deduplicated; the orchestrator's per-cycle diagnosed
/// markers keep one file from being reported twice.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.records.lock().push(diag);
    }

    /// Adds every diagnostic from an iterator.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        self.records.lock().extend(diags);
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.records.lock().iter().any(|d| d.severity.is_error())
    }

    /// Counts diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// The diagnostics located in `file`.
    pub fn for_file(&self, file: &Path) -> Vec<Diagnostic> {
        self.records
            .lock()
            .iter()
            .filter(|d| d.location.as_ref().is_some_and(|l| l.file == file))
            .cloned()
            .collect()
    }

    /// A snapshot of everything emitted so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use aot_source::Location;

    fn unresolved(file: &str) -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Semantic, 2307),
            "Cannot find module './x'.",
        )
        .at(Location::new(file, 1, 1))
    }

    fn conflict() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Build, 1), "route moved")
    }

    #[test]
    fn warnings_are_not_errors() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        sink.emit(conflict());
        assert!(!sink.has_errors());
        assert_eq!(sink.count(Severity::Warning), 1);
    }

    #[test]
    fn same_message_in_two_files_is_kept_twice() {
        let sink = DiagnosticSink::new();
        sink.extend([unresolved("/app/a.ts"), unresolved("/app/b.ts"), conflict()]);
        assert!(sink.has_errors());
        assert_eq!(sink.count(Severity::Error), 2);
        assert_eq!(sink.for_file(Path::new("/app/a.ts")).len(), 1);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || sink.emit(unresolved(&format!("/app/{i}.ts"))))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.count(Severity::Error), 4);
    }
}
