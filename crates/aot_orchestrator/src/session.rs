//! The host build tool's compilation session.

use aot_diagnostics::{Diagnostic, DiagnosticSink};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Identifies one [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// One compilation of the host build tool.
///
/// The orchestrator reports everything it finds here: cycle failures as
/// error messages, route conflicts as warnings, and per-file diagnostics as
/// structured records. A session accepts at most one bound orchestrator at
/// a time.
pub struct Session {
    id: SessionId,
    bound: AtomicBool,
    errors: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    diagnostics: DiagnosticSink,
}

impl Session {
    /// Creates a fresh session with a unique id.
    pub fn new() -> Self {
        Self {
            id: SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed)),
            bound: AtomicBool::new(false),
            errors: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// This session's id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Binds an orchestrator. Returns `false` if one is already bound.
    pub fn try_bind(&self) -> bool {
        !self.bound.swap(true, Ordering::AcqRel)
    }

    /// Releases the binding.
    pub fn unbind(&self) {
        self.bound.store(false, Ordering::Release);
    }

    /// Returns `true` while an orchestrator is bound.
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    /// Appends an error message.
    pub fn push_error(&self, message: impl fmt::Display) {
        let message = message.to_string();
        tracing::debug!(session = %self.id, %message, "session error");
        self.errors.lock().push(message);
    }

    /// Appends a warning message.
    pub fn push_warning(&self, message: impl fmt::Display) {
        self.warnings.lock().push(message.to_string());
    }

    /// Records structured diagnostics.
    pub fn record(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diags);
    }

    /// Error messages so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Warning messages so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    /// Structured diagnostics recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.diagnostics()
    }

    /// Returns `true` if any error was pushed.
    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn binding_is_exclusive_until_released() {
        let session = Session::new();
        assert!(session.try_bind());
        assert!(!session.try_bind());
        session.unbind();
        assert!(session.try_bind());
    }

    #[test]
    fn errors_and_warnings_accumulate() {
        let session = Session::new();
        assert!(!session.has_errors());
        session.push_error("boom");
        session.push_warning("careful");
        assert_eq!(session.errors(), vec!["boom"]);
        assert_eq!(session.warnings(), vec!["careful"]);
        assert!(session.has_errors());
    }
}
