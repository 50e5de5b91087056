//! Parsed source files: content, line index, content hash and token stream.

use crate::lexer::{self, LexError};
use crate::location::Location;
use crate::token::Token;
use aot_common::ContentHash;
use std::path::PathBuf;

/// A source file parsed for the type checker and the route scanner.
///
/// This is the derived parse artifact the [`SourceCache`](crate::SourceCache)
/// stores next to raw content. It is immutable; a changed file produces a
/// new `SourceFile`.
#[derive(Debug)]
pub struct SourceFile {
    /// The normalized path of this file.
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Hash of the content, used to decide whether a previous program's copy can be reused.
    pub content_hash: ContentHash,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    tokens: Vec<Token>,
    lex_errors: Vec<LexError>,
}

impl SourceFile {
    /// Parses `content` into a `SourceFile`.
    pub fn parse(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::of(&content);
        let lexed = lexer::lex(&content);
        Self {
            path: path.into(),
            content,
            content_hash,
            line_starts,
            tokens: lexed.tokens,
            lex_errors: lexed.errors,
        }
    }

    /// The token stream of this file.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Lexical errors found while parsing.
    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Resolves a byte offset to a [`Location`] in this file.
    pub fn location(&self, byte_offset: u32) -> Location {
        let (line, column) = self.line_col(byte_offset);
        Location::new(self.path.clone(), line, column)
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::parse("/app/src/main.ts", content)
    }

    #[test]
    fn line_starts_computation() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_starts, vec![0, 4, 8]);
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn location_carries_path() {
        let f = make_file("a\nbc");
        let loc = f.location(3);
        assert_eq!(loc.file, PathBuf::from("/app/src/main.ts"));
        assert_eq!((loc.line, loc.column), (2, 2));
    }

    #[test]
    fn snippet_extraction() {
        let f = make_file("hello world");
        assert_eq!(f.snippet(0, 5), "hello");
        assert_eq!(f.snippet(6, 11), "world");
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_starts, vec![0]);
        assert_eq!(f.line_col(0), (1, 1));
        assert!(f.tokens().is_empty());
    }

    #[test]
    fn tokens_and_hash_computed() {
        let f = make_file("export class AppModule {}");
        assert_eq!(f.tokens().len(), 5);
        assert_eq!(f.content_hash, ContentHash::of("export class AppModule {}"));
        assert!(f.lex_errors().is_empty());
    }
}
