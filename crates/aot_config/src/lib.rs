//! Plugin options, tsconfig loading, and resolution to [`CompilationOptions`].
//!
//! Options arrive as a [`PluginOptions`] (from an `aot.toml` file or built in
//! code). Setup locates the tsconfig, derives the base path, lets the type
//! checker parse the tsconfig into a [`ParsedConfig`], and then
//! [`resolve_options`] produces the immutable [`CompilationOptions`] used for
//! the rest of the run.

#![warn(missing_docs)]

pub mod error;
pub mod exclude;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use exclude::{glob_to_regex, ExcludeFilter, DEFAULT_EXCLUDE};
pub use loader::{load_options, load_options_from_str, read_ts_config, read_ts_config_from_str};
pub use resolve::{locate_config, resolve_options, ConfigLocation, DEFAULT_GEN_DIR};
pub use types::*;
