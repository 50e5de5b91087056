//! Configuration types: raw plugin options, parsed tsconfig, resolved options.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Options as given by the user, before resolution.
///
/// Every field is optional in the file; defaults are applied by
/// [`resolve_options`](crate::resolve_options):
///
/// | field | default |
/// |---|---|
/// | `basePath` | directory of the tsconfig |
/// | `exclude` | `["**/*.spec.ts"]` |
/// | `typeChecking` | `true` |
/// | `skipCodeGeneration` | `false` |
/// | `entryModule` | tsconfig `angularCompilerOptions.entryModule`, then `mainPath` |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginOptions {
    /// Path to the tsconfig, relative to the working directory. Required.
    pub ts_config_path: Option<String>,
    /// Overrides the base path derived from the tsconfig location.
    pub base_path: Option<String>,
    /// Glob pattern(s) removed from the root-file list.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub exclude: Option<Vec<String>>,
    /// Whether global diagnostics fail a cycle.
    pub type_checking: Option<bool>,
    /// Whether to skip the code generation step entirely.
    pub skip_code_generation: Option<bool>,
    /// Entry module as `path#exportName`.
    pub entry_module: Option<String>,
    /// Application main file used to infer the entry module.
    pub main_path: Option<String>,
    /// Translation file handed to the code generator.
    pub i18n_file: Option<String>,
    /// Format of the translation file.
    pub i18n_format: Option<String>,
    /// Locale handed to the code generator.
    pub locale: Option<String>,
    /// Files seeded into the source cache before the first program is created.
    #[serde(default)]
    pub host_override_file_system: BTreeMap<String, String>,
}

/// Deserializes an optional field that may be a single string or a list of strings.
fn deserialize_opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec).map(Some)
}

/// A module reference: a path plus an exported symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryModule {
    /// Module path, without extension.
    pub path: String,
    /// Exported symbol name (`default` when unspecified).
    pub export_name: String,
}

impl EntryModule {
    /// The export name used when a reference omits `#exportName`.
    pub const DEFAULT_EXPORT: &'static str = "default";

    /// Parses `path#exportName`; a missing or empty export becomes `default`.
    pub fn parse(reference: &str) -> Self {
        let (path, export) = match reference.split_once('#') {
            Some((path, export)) if !export.is_empty() => (path, export),
            Some((path, _)) => (path, Self::DEFAULT_EXPORT),
            None => (reference, Self::DEFAULT_EXPORT),
        };
        Self {
            path: path.to_string(),
            export_name: export.to_string(),
        }
    }
}

impl fmt::Display for EntryModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.export_name)
    }
}

/// The type checker's compiler options, kept as the tsconfig wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerOptions(pub Map<String, Value>);

impl CompilerOptions {
    /// Returns a raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a boolean option, `false` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Whether declaration files are emitted (enables declaration diagnostics).
    pub fn declaration(&self) -> bool {
        self.flag("declaration")
    }

    /// `baseUrl` resolved against `base_path`, if set.
    pub fn base_url(&self, base_path: &Path) -> Option<PathBuf> {
        self.get("baseUrl")
            .and_then(Value::as_str)
            .map(|url| base_path.join(url))
    }
}

/// Code-generation options (`angularCompilerOptions` in the tsconfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenOptions {
    /// Generated-output directory, relative to the base path.
    pub gen_dir: Option<String>,
    /// Entry module as `path#exportName`, relative to the base path.
    pub entry_module: Option<String>,
    /// Options the orchestrator does not interpret, passed to the generator.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The tsconfig as parsed by the type checker collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConfig {
    /// Root file list (absolute, normalized).
    pub root_files: Vec<PathBuf>,
    /// Compiler options.
    pub compiler_options: CompilerOptions,
    /// Code-generation options.
    pub codegen_options: CodegenOptions,
}

/// Internationalization settings handed to the code generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nSettings {
    /// Translation file.
    pub file: Option<String>,
    /// Translation file format.
    pub format: Option<String>,
    /// Target locale.
    pub locale: Option<String>,
}

/// Immutable per-run configuration.
///
/// Resolved once at orchestrator construction and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationOptions {
    /// Absolute path of the tsconfig.
    pub ts_config_path: PathBuf,
    /// Base path all relative paths are resolved against.
    pub base_path: PathBuf,
    /// Root files after exclude filtering.
    pub root_files: Vec<PathBuf>,
    /// Compiler options from the tsconfig.
    pub compiler_options: CompilerOptions,
    /// Code-generation options with `genDir` resolved.
    pub codegen_options: CodegenOptions,
    /// Absolute generated-output directory.
    pub gen_dir: PathBuf,
    /// Whether code generation runs.
    pub skip_code_generation: bool,
    /// Whether global diagnostics fail a cycle.
    pub type_checking: bool,
    /// Internationalization settings.
    pub i18n: I18nSettings,
    /// Entry module, when known.
    pub entry_module: Option<EntryModule>,
    /// Absolute main file path, when given.
    pub main_path: Option<PathBuf>,
    /// Files seeded into the source cache, keyed by absolute path.
    pub host_override_file_system: BTreeMap<PathBuf, String>,
}
