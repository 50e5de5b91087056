//! A forward-only cursor over a token slice, for pattern scanners.

use crate::token::{Token, TokenKind};

/// Walks a token slice with lookahead and conditional consumption.
///
/// Scanners use it to recognise small fixed shapes (`loadChildren: '...'`,
/// `import { X } from '...'`) without building a syntax tree. Every `eat_*`
/// method leaves the position untouched when it does not match.
#[derive(Clone, Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor at the first token.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Creates a cursor at index `pos`.
    pub fn at_index(tokens: &'a [Token], pos: usize) -> Self {
        Self { tokens, pos }
    }

    /// The current index.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the current token.
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Returns the token `offset` positions ahead.
    pub fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Returns `true` when every token has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Moves past the current token.
    pub fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Consumes the punctuation `c` if it is current.
    pub fn eat_punct(&mut self, c: char) -> bool {
        self.eat_if(|t| t.is_punct(c)).is_some()
    }

    /// Consumes consecutive punctuation forming `seq` (e.g. `"=>"`).
    pub fn eat_puncts(&mut self, seq: &str) -> bool {
        let matches = seq
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek(i).is_some_and(|t| t.is_punct(c)));
        if matches {
            self.pos += seq.chars().count();
        }
        matches
    }

    /// Consumes the identifier `name` if it is current.
    pub fn eat_keyword(&mut self, name: &str) -> bool {
        self.eat_if(|t| t.is_ident(name)).is_some()
    }

    /// Consumes and returns any identifier.
    pub fn eat_ident(&mut self) -> Option<&'a Token> {
        self.eat_if(|t| t.kind == TokenKind::Ident)
    }

    /// Consumes and returns a plain string literal.
    pub fn eat_str(&mut self) -> Option<&'a Token> {
        self.eat_if(|t| t.kind == TokenKind::Str)
    }

    fn eat_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Option<&'a Token> {
        let token = self.current().filter(|t| pred(t))?;
        self.pos += 1;
        Some(token)
    }
}
