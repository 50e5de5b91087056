//! The incremental build orchestrator.
//!
//! [`Orchestrator`] sequences one build cycle at a time:
//!
//! ```text
//! Idle -> Generating -> ProgramBuilding -> TypeChecking -> RouteDiscovery -> Finalizing -> Idle
//!   ^                                                                                       |
//!   +-------------------------------- Invalidated <-- on_invalid ---------------------------+
//! ```
//!
//! Code generation goes through the [`CodegenBridge`], programs through the
//! [`ProgramManager`](aot_host::ProgramManager), and lazy routes through
//! [`aot_routes`]. Every per-cycle failure lands on the host's [`Session`]
//! and the cycle's [`ReadySignal`] always completes, so module resolution
//! waiting in [`ResolverHooks::before_resolve`] or the
//! [`LazyDependencyProvider`] is never left hanging.

#![warn(missing_docs)]

pub mod codegen;
pub mod error;
pub mod invalidation;
pub mod orchestrator;
pub mod provider;
pub mod ready;
pub mod resource;
pub mod session;
pub mod state;

pub use codegen::{CodeGenerator, CodegenBridge, GenerationContext};
pub use error::{BuildError, GenerationError};
pub use invalidation::InvalidationQueue;
pub use orchestrator::{Collaborators, DiscoveryReport, Orchestrator, ResolverHooks};
pub use provider::{
    ContextDependency, ContextRequest, Dependency, LazyDependencyProvider, DEFAULT_CONTEXT_MARKER,
};
pub use ready::{CycleOutcome, ReadySignal, ReadyWaiter};
pub use resource::ResourceLoader;
pub use session::{Session, SessionId};
pub use state::BuildState;
