//! Error types for source reads.

use std::path::PathBuf;

/// Errors produced when reading through the [`SourceCache`](crate::SourceCache).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file is neither cached nor present on the backing file system.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The backing file system failed for a reason other than absence.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl SourceError {
    /// Builds a `SourceError` from an I/O error, mapping `NotFound` to [`SourceError::NotFound`].
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path)
        } else {
            SourceError::Io { path, source: err }
        }
    }

    /// Returns `true` if this error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}
