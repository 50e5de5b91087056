//! Token types produced by the source [`lexer`](crate::lexer).

use serde::{Deserialize, Serialize};

/// The syntactic category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// An identifier or keyword (`loadChildren`, `import`, `const`, ...).
    Ident,
    /// A quoted string or a template literal without substitutions.
    Str,
    /// A template literal containing `${...}` substitutions.
    TemplateExpr,
    /// A numeric literal.
    Number,
    /// A single punctuation character.
    Punct(char),
}

/// A lexed token with its byte range in the source.
///
/// For [`TokenKind::Str`] the `text` is the literal's value with quotes
/// removed and escapes resolved; for every other kind it is the raw text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token's category.
    pub kind: TokenKind,
    /// Token text (unquoted value for strings).
    pub text: String,
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset past the last character (exclusive).
    pub end: u32,
}

impl Token {
    /// Returns `true` if this token is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// Returns `true` if this token is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    /// Returns the string value if this token is a plain string literal.
    pub fn as_str_literal(&self) -> Option<&str> {
        (self.kind == TokenKind::Str).then_some(self.text.as_str())
    }
}
