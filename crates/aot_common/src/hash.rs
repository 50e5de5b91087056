//! Source text fingerprints.

use std::fmt;
use xxhash_rust::xxh3::xxh3_128;

/// XXH3-128 of a file's text.
///
/// Equal hashes are treated as equal text: a parsed file carried over from
/// the previous program, or a watched file that did not change.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hashes `text` as UTF-8.
    pub fn of(text: &str) -> Self {
        Self(xxh3_128(text.as_bytes()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Only the leading eight hex digits; enough to tell files apart in logs.
impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0 >> 96)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_edits_change_the_hash() {
        let original = ContentHash::of("export class AppModule {}");
        assert_eq!(original, ContentHash::of("export class AppModule {}"));
        assert_ne!(original, ContentHash::of("export class AppModule { }"));
    }

    #[test]
    fn display_is_full_width_hex() {
        let text = ContentHash::of("").to_string();
        assert_eq!(text.len(), 32);
        assert!(text.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_is_the_display_prefix() {
        let hash = ContentHash::of("import './polyfills';");
        let debug = format!("{hash:?}");
        assert_eq!(debug, format!("#{}", &hash.to_string()[..8]));
    }
}
