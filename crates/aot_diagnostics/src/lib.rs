//! Diagnostic records, severity management, and rendering.
//!
//! This crate provides the structured [`Diagnostic`] reported by the type
//! checker collaborator and by the orchestrator itself, the thread-safe
//! [`DiagnosticSink`] that accumulates them, and [`DiagnosticRenderer`]
//! implementations for the compact `file (line,col): message` form used in
//! aggregated build errors and a rustc-style terminal form.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{aggregate, CompactRenderer, DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
