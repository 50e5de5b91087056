//! Resolution of [`PluginOptions`] into [`CompilationOptions`].

use crate::error::ConfigError;
use crate::exclude::ExcludeFilter;
use crate::loader::validate_options;
use crate::types::{CompilationOptions, EntryModule, I18nSettings, ParsedConfig, PluginOptions};
use aot_source::{normalize_path, FileSystem};
use std::path::{Path, PathBuf};

/// Generated-output directory name used when the tsconfig sets none.
pub const DEFAULT_GEN_DIR: &str = "$$_gendir";

/// Where the tsconfig lives and which directory everything is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Absolute tsconfig path.
    pub ts_config_path: PathBuf,
    /// Absolute base path.
    pub base_path: PathBuf,
}

/// Locates the tsconfig relative to `cwd` and derives the base path.
///
/// The base path is the tsconfig's directory (or the tsconfig path itself
/// when `fs` reports it as a directory), unless `basePath` overrides it.
pub fn locate_config(
    options: &PluginOptions,
    cwd: &Path,
    fs: &dyn FileSystem,
) -> Result<ConfigLocation, ConfigError> {
    validate_options(options)?;
    let ts_config = options
        .ts_config_path
        .as_deref()
        .ok_or(ConfigError::MissingTsConfigPath)?;
    let ts_config_path = lexical_join(cwd, Path::new(ts_config));

    let mut base_path = if fs.is_dir(&ts_config_path) {
        ts_config_path.clone()
    } else {
        ts_config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf())
    };
    if let Some(base) = options.base_path.as_deref() {
        base_path = lexical_join(cwd, Path::new(base));
    }

    tracing::debug!(
        ts_config = %ts_config_path.display(),
        base = %base_path.display(),
        "config located"
    );
    Ok(ConfigLocation {
        ts_config_path,
        base_path,
    })
}

/// Applies defaults and exclude filtering to produce the per-run options.
pub fn resolve_options(
    options: &PluginOptions,
    location: &ConfigLocation,
    parsed: ParsedConfig,
) -> Result<CompilationOptions, ConfigError> {
    let base = &location.base_path;

    let filter = ExcludeFilter::new(options.exclude.as_deref(), base)?;
    let root_files = filter.filter(parsed.root_files);

    let mut codegen_options = parsed.codegen_options;
    let gen_dir = match codegen_options.gen_dir.as_deref() {
        Some(dir) => lexical_join(base, Path::new(dir)),
        None => base.join(DEFAULT_GEN_DIR),
    };
    codegen_options.gen_dir = Some(gen_dir.to_string_lossy().into_owned());

    let entry_module = match (&options.entry_module, &codegen_options.entry_module) {
        (Some(entry), _) => Some(EntryModule::parse(entry)),
        (None, Some(entry)) => {
            let mut module = EntryModule::parse(entry);
            module.path = lexical_join(base, Path::new(&module.path))
                .to_string_lossy()
                .into_owned();
            Some(module)
        }
        (None, None) => None,
    };

    let host_override_file_system = options
        .host_override_file_system
        .iter()
        .map(|(path, content)| (lexical_join(base, Path::new(path)), content.clone()))
        .collect();

    let resolved = CompilationOptions {
        ts_config_path: location.ts_config_path.clone(),
        base_path: base.clone(),
        root_files,
        compiler_options: parsed.compiler_options,
        codegen_options,
        gen_dir,
        skip_code_generation: options.skip_code_generation.unwrap_or(false),
        type_checking: options.type_checking.unwrap_or(true),
        i18n: I18nSettings {
            file: options.i18n_file.clone(),
            format: options.i18n_format.clone(),
            locale: options.locale.clone(),
        },
        entry_module,
        main_path: options
            .main_path
            .as_deref()
            .map(|main| lexical_join(base, Path::new(main))),
        host_override_file_system,
    };
    tracing::info!(
        root_files = resolved.root_files.len(),
        skip_codegen = resolved.skip_code_generation,
        type_checking = resolved.type_checking,
        entry = ?resolved.entry_module.as_ref().map(ToString::to_string),
        "compilation options resolved"
    );
    Ok(resolved)
}

/// Joins `rel` onto `base` (absolute `rel` wins), normalized.
fn lexical_join(base: &Path, rel: &Path) -> PathBuf {
    normalize_path(&base.join(rel))
}
