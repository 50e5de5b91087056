//! Reference implementations of the orchestrator's external collaborators.
//!
//! - [`ScanChecker`]: a [`TypeChecker`](aot_host::TypeChecker) that builds
//!   programs by following relative imports and reports missing files,
//!   unresolved imports and lexical errors.
//! - [`FactoryGenerator`]: a [`CodeGenerator`](aot_orchestrator::CodeGenerator)
//!   that writes one in-memory `.ngfactory.ts` module per `@NgModule` or
//!   `@Component` source (lazy route targets included), retires factories
//!   that lost their source, and lists every reachable lazy route.
//! - [`FsResourceLoader`]: a [`ResourceLoader`](aot_orchestrator::ResourceLoader)
//!   reading from disk.
//!
//! [`collaborators`] wires all three over a file system.

#![warn(missing_docs)]

pub mod checker;
pub mod generator;
pub mod imports;
pub mod resources;
pub mod tsconfig;

pub use checker::{ScanChecker, ScanProgram};
pub use generator::FactoryGenerator;
pub use imports::{scan_imports, ImportRef};
pub use resources::FsResourceLoader;

use aot_orchestrator::Collaborators;
use aot_source::FileSystem;
use std::sync::Arc;

/// The reference collaborators over `fs`.
pub fn collaborators(fs: Arc<dyn FileSystem>) -> Collaborators {
    Collaborators {
        fs,
        checker: Arc::new(ScanChecker::new()),
        generator: Arc::new(FactoryGenerator::new()),
        resources: Arc::new(FsResourceLoader::new()),
    }
}
