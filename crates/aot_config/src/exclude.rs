//! Exclude patterns: glob strings translated to anchored regular expressions.

use crate::error::ConfigError;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Applied when the options leave `exclude` unset.
pub const DEFAULT_EXCLUDE: &[&str] = &["**/*.spec.ts"];

/// Translates a glob into a regular expression source anchored at both ends.
///
/// `**/` matches any number of leading directories (including none), `**`
/// matches anything, `*` matches within one path segment and `?` matches a
/// single non-separator character. Every other character is literal. When
/// `base` is given, the pattern may optionally be prefixed by it, so the
/// same glob matches both relative and absolute paths.
pub fn glob_to_regex(glob: &str, base: Option<&Path>) -> String {
    let glob = glob.replace('\\', "/");
    let mut out = String::from("^");
    if let Some(base) = base {
        let base = base.to_string_lossy().replace('\\', "/");
        let base = base.trim_end_matches('/');
        out.push_str("(?:");
        out.push_str(&regex::escape(base));
        out.push_str("/)?");
    }

    let chars: Vec<char> = glob.trim_start_matches("./").chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            c => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                i += 1;
            }
        }
    }
    out.push('$');
    out
}

/// A compiled set of exclude patterns.
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    patterns: Vec<(String, Regex)>,
}

impl ExcludeFilter {
    /// Compiles `globs` relative to `base`.
    ///
    /// `None` selects [`DEFAULT_EXCLUDE`]; an empty list excludes nothing.
    pub fn new(globs: Option<&[String]>, base: &Path) -> Result<Self, ConfigError> {
        let globs: Vec<String> = match globs {
            Some(globs) => globs.to_vec(),
            None => DEFAULT_EXCLUDE.iter().map(|g| g.to_string()).collect(),
        };
        let mut patterns = Vec::with_capacity(globs.len());
        for glob in globs {
            let source = glob_to_regex(&glob, Some(base));
            let regex = Regex::new(&source).map_err(|e| ConfigError::InvalidPattern {
                pattern: glob.clone(),
                reason: e.to_string(),
            })?;
            patterns.push((glob, regex));
        }
        Ok(Self { patterns })
    }

    /// Returns `true` if any pattern matches `path`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy().replace('\\', "/");
        self.patterns.iter().any(|(_, re)| re.is_match(&text))
    }

    /// Removes every excluded path, preserving order.
    pub fn filter(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let before = files.len();
        let kept: Vec<PathBuf> = files.into_iter().filter(|f| !self.is_excluded(f)).collect();
        if kept.len() != before {
            tracing::debug!(removed = before - kept.len(), "exclude patterns applied");
        }
        kept
    }

    /// The globs as written.
    pub fn globs(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(g, _)| g.as_str())
    }
}
