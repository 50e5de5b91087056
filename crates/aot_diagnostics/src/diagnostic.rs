//! Structured diagnostic records.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use aot_source::{Location, SourceFile};
use serde::{Deserialize, Serialize};

/// A diagnostic record: severity, code, message and an optional location.
///
/// Diagnostics produced against a specific file carry a 1-based
/// [`Location`] and the text of the offending line so renderers do not need
/// access to the source cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where the problem was detected, if tied to a file.
    pub location: Option<Location>,
    /// The full source line containing the location.
    pub source_line: Option<String>,
    /// Length of the highlighted range in bytes (at least 1 when rendered).
    pub span_len: u32,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            source_line: None,
            span_len: 0,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Attaches a bare location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches the location of the byte range `start..end` in `file`,
    /// capturing the source line for rendering.
    pub fn in_file(mut self, file: &SourceFile, start: u32, end: u32) -> Self {
        self.location = Some(file.location(start));
        self.source_line = Some(line_containing(&file.content, start).to_string());
        self.span_len = end.saturating_sub(start);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

fn line_containing(content: &str, byte_offset: u32) -> &str {
    let offset = (byte_offset as usize).min(content.len());
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;
    use std::path::PathBuf;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Semantic, 101);
        let diag = Diagnostic::error(code, "cannot find module './missing'");
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.location.is_none());
        assert_eq!(format!("{}", diag.code), "E101");
    }

    #[test]
    fn create_warning() {
        let code = DiagnosticCode::new(Category::Build, 2);
        let diag = Diagnostic::warning(code, "route overridden");
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn in_file_resolves_location_and_line() {
        let file = SourceFile::parse("/app/a.ts", "const a = 1;\nimport x from './x';\n");
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Semantic, 1), "bad import")
            .in_file(&file, 27, 32);
        let loc = diag.location.clone().unwrap();
        assert_eq!(loc.file, PathBuf::from("/app/a.ts"));
        assert_eq!((loc.line, loc.column), (2, 15));
        assert_eq!(diag.source_line.as_deref(), Some("import x from './x';"));
        assert_eq!(diag.span_len, 5);
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Global, 1), "no inputs")
            .with_note("tsconfig lists no files")
            .with_help("add an entry to \"files\"");
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }
}
