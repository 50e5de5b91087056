//! Error types for configuration loading and resolution.

use std::path::PathBuf;

/// Errors raised while setting up the orchestrator.
///
/// These are the only errors allowed to escape as hard failures: they abort
/// the whole build before any cycle starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The options do not name a tsconfig.
    #[error("Must specify \"tsConfigPath\" in the configuration.")]
    MissingTsConfigPath,

    /// The tsconfig (or its directory) could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The tsconfig is not valid JSON.
    #[error("An error happened while parsing {} JSON: {reason}.", path.display())]
    TsConfigParse {
        /// The tsconfig path.
        path: PathBuf,
        /// The JSON parser's message.
        reason: String,
    },

    /// The options file could not be parsed.
    #[error("failed to parse options: {0}")]
    OptionsParse(String),

    /// An exclude pattern could not be compiled.
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The glob as written.
        pattern: String,
        /// Why the translated expression was rejected.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_ts_config_path() {
        assert_eq!(
            ConfigError::MissingTsConfigPath.to_string(),
            "Must specify \"tsConfigPath\" in the configuration."
        );
    }

    #[test]
    fn display_ts_config_parse() {
        let err = ConfigError::TsConfigParse {
            path: PathBuf::from("/app/tsconfig.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "An error happened while parsing /app/tsconfig.json JSON: expected value at line 1 column 1."
        );
    }

    #[test]
    fn display_invalid_pattern() {
        let err = ConfigError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed".to_string(),
        };
        assert_eq!(err.to_string(), "invalid exclude pattern '[': unclosed");
    }

    #[test]
    fn display_read() {
        let err = ConfigError::Read {
            path: PathBuf::from("/nope/tsconfig.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("failed to read /nope/tsconfig.json"));
    }
}
