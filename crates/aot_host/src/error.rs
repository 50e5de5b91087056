//! Error types for the host adapter and type checker collaborator.

use aot_config::ConfigError;
use aot_source::SourceError;

/// Errors raised by the compiler host or the type checker.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A file could not be read through the source cache.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The tsconfig handed to the checker is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The type checker failed to build a program.
    #[error("program creation failed: {0}")]
    Program(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn source_error_is_transparent() {
        let err: HostError = SourceError::NotFound(PathBuf::from("/a.ts")).into();
        assert_eq!(
            err.to_string(),
            SourceError::NotFound(PathBuf::from("/a.ts")).to_string()
        );
    }

    #[test]
    fn program_error_display() {
        assert_eq!(
            HostError::Program("no root files".to_string()).to_string(),
            "program creation failed: no root files"
        );
    }
}
