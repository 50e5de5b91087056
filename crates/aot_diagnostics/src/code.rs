//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a diagnostic originated, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Syntax problems in a single file, prefixed with `S`.
    Syntactic,
    /// Semantic (type) problems in a single file, prefixed with `E`.
    Semantic,
    /// Declaration-emit problems in a single file, prefixed with `D`.
    Declaration,
    /// Whole-program problems not tied to one file, prefixed with `G`.
    Global,
    /// Orchestration problems (generation, routes), prefixed with `B`.
    Build,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Syntactic => 'S',
            Category::Semantic => 'E',
            Category::Declaration => 'D',
            Category::Global => 'G',
            Category::Build => 'B',
        }
    }
}

/// A structured diagnostic code: category prefix plus a numeric identifier.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g. `S001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Syntactic.prefix(), 'S');
        assert_eq!(Category::Semantic.prefix(), 'E');
        assert_eq!(Category::Declaration.prefix(), 'D');
        assert_eq!(Category::Global.prefix(), 'G');
        assert_eq!(Category::Build.prefix(), 'B');
    }

    #[test]
    fn display_format() {
        assert_eq!(
            format!("{}", DiagnosticCode::new(Category::Semantic, 101)),
            "E101"
        );
        assert_eq!(
            format!("{}", DiagnosticCode::new(Category::Syntactic, 3)),
            "S003"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Global, 1);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
