//! Human-readable source locations with 1-based line/column coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position inside a file, resolved for display.
///
/// Line and column are 1-based. Produced by
/// [`SourceFile::location`](crate::SourceFile::location).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the file the position belongs to.
    pub file: PathBuf,
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based).
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
