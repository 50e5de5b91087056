//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders `<file> (<line>,<col>): <message>`, or just the message when the
/// diagnostic has no location.
///
/// This is the form used for aggregated type-check and per-file errors on a
/// build session.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompactRenderer;

impl DiagnosticRenderer for CompactRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        match &diag.location {
            Some(loc) => format!(
                "{} ({},{}): {}",
                loc.file.display(),
                loc.line,
                loc.column,
                diag.message
            ),
            None => diag.message.clone(),
        }
    }
}

/// Renders every diagnostic compactly, one per line.
pub fn aggregate(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .map(|d| CompactRenderer.render(d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[E101]: cannot find module './missing'
///   --> src/app/app.module.ts:3:22
///    |
///  3 | import { X } from './missing';
///    |                   ^^^^^^^^^^^
///    = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_header(&self, diag: &Diagnostic) -> String {
        let header = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return header;
        }
        let ansi = match diag.severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        };
        format!("{ansi}{header}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}: {}\n", self.paint_header(diag), diag.message));

        if let Some(loc) = &diag.location {
            out.push_str(&format!("  --> {loc}\n"));
            if let Some(line) = &diag.source_line {
                let line_num = format!("{}", loc.line);
                let padding = " ".repeat(line_num.len());
                let col_padding = " ".repeat((loc.column as usize).saturating_sub(1));
                let carets = "^".repeat(diag.span_len.max(1) as usize);
                out.push_str(&format!("{padding} |\n"));
                out.push_str(&format!("{line_num} | {line}\n"));
                out.push_str(&format!("{padding} | {col_padding}{carets}\n"));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}
