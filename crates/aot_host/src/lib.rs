//! The type checker's side of the orchestrator.
//!
//! This crate defines the capability contracts of the external type checker
//! ([`TypeChecker`], [`Program`]), the [`CompilerHost`] adapter that answers
//! the checker's file-system questions from the
//! [`SourceCache`](aot_source::SourceCache), the [`VirtualModuleRegistry`]
//! through which generated files are handed to a host build tool's module
//! resolver, and the [`ProgramManager`] that owns the current program
//! handle across build cycles.

#![warn(missing_docs)]

pub mod checker;
pub mod error;
pub mod host;
pub mod manager;
pub mod program;
pub mod registry;

pub use checker::TypeChecker;
pub use error::HostError;
pub use host::CompilerHost;
pub use manager::ProgramManager;
pub use program::{Program, ProgramHandle};
pub use registry::{InMemoryRegistry, VirtualModuleRegistry};
