//! Per-cycle error taxonomy.

use aot_host::HostError;
use std::path::PathBuf;

/// Failures of the external code generator or the resources it loads.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A resource referenced by a template could not be loaded.
    #[error("failed to load resource {}: {reason}", path.display())]
    Resource {
        /// The resource path.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },

    /// The generator reported a failure of its own.
    #[error("code generation failed: {0}")]
    Failed(String),

    /// Reading program files or writing generated output failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// An error that fails one build cycle.
///
/// Cycle errors never propagate out of [`Orchestrator::make`](crate::Orchestrator::make);
/// they are pushed onto the session's error list.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The session already has an orchestrator bound to it.
    #[error("An orchestrator already exists for this compilation.")]
    DuplicateSession,

    /// Code generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Global diagnostics were found with type checking enabled; the
    /// message is every diagnostic rendered compactly, one per line.
    #[error("{0}")]
    TypeCheck(String),

    /// Program creation failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_session_message() {
        assert_eq!(
            BuildError::DuplicateSession.to_string(),
            "An orchestrator already exists for this compilation."
        );
    }

    #[test]
    fn generation_error_is_transparent() {
        let err: BuildError = GenerationError::Resource {
            path: PathBuf::from("/app/a.html"),
            reason: "not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "failed to load resource /app/a.html: not found");
    }

    #[test]
    fn type_check_message_is_verbatim() {
        let err = BuildError::TypeCheck("a.ts (1,1): x\nb.ts (2,2): y".to_string());
        assert_eq!(err.to_string(), "a.ts (1,1): x\nb.ts (2,2): y");
    }
}
