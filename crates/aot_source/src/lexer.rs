//! Lexical scanner for TypeScript-like source text.
//!
//! Produces a flat token stream sufficient for locating import specifiers,
//! decorators and route declarations. Comments and whitespace are skipped.
//! Regular-expression literals are not recognised; a `/` is always
//! punctuation. Malformed input never aborts the scan: unterminated string
//! literals and block comments are recorded as [`LexError`]s and scanning
//! continues.

use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};

/// A recoverable lexical error with its byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexError {
    /// Byte offset where the malformed construct starts.
    pub offset: u32,
    /// Human-readable description.
    pub message: String,
}

/// The output of [`lex`]: tokens plus any recoverable errors.
#[derive(Clone, Debug, Default)]
pub struct Lexed {
    /// Tokens in source order.
    pub tokens: Vec<Token>,
    /// Lexical errors in source order.
    pub errors: Vec<LexError>,
}

/// Lexes `source` into tokens.
pub fn lex(source: &str) -> Lexed {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        out: Lexed::default(),
    };
    lexer.lex_all();
    lexer.out
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Lexed,
}

impl Lexer<'_> {
    fn lex_all(&mut self) {
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= self.bytes.len() {
                break;
            }
            self.next_token();
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn error(&mut self, offset: usize, message: &str) {
        self.out.errors.push(LexError {
            offset: offset as u32,
            message: message.to_string(),
        });
    }

    fn push(&mut self, kind: TokenKind, text: String, start: usize) {
        self.out.tokens.push(Token {
            kind,
            text,
            start: start as u32,
            end: self.pos as u32,
        });
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.bytes.len() {
                        self.error(start, "unterminated block comment");
                        break;
                    }
                    if self.bytes[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) {
        let start = self.pos;
        let b = self.peek();
        match b {
            b'\'' | b'"' => self.lex_string(b),
            b'`' => self.lex_template(),
            b'0'..=b'9' => {
                while self.peek().is_ascii_alphanumeric() || self.peek() == b'.' || self.peek() == b'_'
                {
                    self.pos += 1;
                }
                let text = self.source[start..self.pos].to_string();
                self.push(TokenKind::Number, text, start);
            }
            _ if is_ident_start(b) => {
                while is_ident_continue(self.peek()) {
                    self.pos += 1;
                }
                let text = self.source[start..self.pos].to_string();
                self.push(TokenKind::Ident, text, start);
            }
            _ => {
                let c = self.source[start..].chars().next().unwrap_or('\0');
                self.pos += c.len_utf8().max(1);
                self.push(TokenKind::Punct(c), c.to_string(), start);
            }
        }
    }

    fn lex_string(&mut self, quote: u8) {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            if self.pos >= self.bytes.len() || self.bytes[self.pos] == b'\n' {
                self.error(start, "unterminated string literal");
                break;
            }
            let b = self.bytes[self.pos];
            if b == quote {
                self.pos += 1;
                break;
            }
            if b == b'\\' {
                self.pos += 1;
                if let Some(c) = self.source[self.pos..].chars().next() {
                    value.push(unescape(c));
                    self.pos += c.len_utf8();
                }
                continue;
            }
            if let Some(c) = self.source[self.pos..].chars().next() {
                value.push(c);
                self.pos += c.len_utf8();
            }
        }
        self.push(TokenKind::Str, value, start);
    }

    fn lex_template(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut substituted = false;
        let mut depth = 0usize;
        loop {
            if self.pos >= self.bytes.len() {
                self.error(start, "unterminated template literal");
                break;
            }
            let b = self.bytes[self.pos];
            if depth == 0 && b == b'`' {
                self.pos += 1;
                break;
            }
            if b == b'$' && self.peek_at(1) == b'{' {
                substituted = true;
                depth += 1;
                self.pos += 2;
                continue;
            }
            if depth > 0 {
                match b {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                self.pos += 1;
                continue;
            }
            if b == b'\\' {
                self.pos += 1;
                if let Some(c) = self.source[self.pos..].chars().next() {
                    value.push(unescape(c));
                    self.pos += c.len_utf8();
                }
                continue;
            }
            if let Some(c) = self.source[self.pos..].chars().next() {
                value.push(c);
                self.pos += c.len_utf8();
            }
        }
        if substituted {
            let raw = self.source[start..self.pos].to_string();
            self.push(TokenKind::TemplateExpr, raw, start);
        } else {
            self.push(TokenKind::Str, value, start);
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
