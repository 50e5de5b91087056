//! Source text management for the build orchestrator.
//!
//! This crate provides the [`SourceCache`], a write-through, invalidatable
//! cache of file contents and parsed [`SourceFile`] artifacts keyed by
//! normalized path, the [`FileSystem`] abstraction it reads through, a small
//! token [`lexer`] used to scan sources, and [`Fingerprints`] for detecting
//! changes between watch polls.

#![warn(missing_docs)]

pub mod cache;
pub mod cursor;
pub mod error;
pub mod fingerprint;
pub mod fs;
pub mod lexer;
pub mod location;
pub mod path;
pub mod source_file;
pub mod token;

pub use cache::{SourceCache, WrittenFile};
pub use cursor::TokenCursor;
pub use error::SourceError;
pub use fingerprint::{ChangeSet, Fingerprints};
pub use fs::{DiskFileSystem, FileSystem, MemoryFileSystem};
pub use location::Location;
pub use path::{normalize_path, relative_to};
pub use source_file::SourceFile;
pub use token::{Token, TokenKind};
