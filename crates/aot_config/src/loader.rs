//! Options file and tsconfig loading.

use crate::error::ConfigError;
use crate::types::PluginOptions;
use serde_json::Value;
use std::path::Path;

/// Loads and validates plugin options from an `aot.toml` file.
pub fn load_options(path: &Path) -> Result<PluginOptions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_options_from_str(&content)
}

/// Parses and validates plugin options from TOML text.
pub fn load_options_from_str(content: &str) -> Result<PluginOptions, ConfigError> {
    let options: PluginOptions =
        toml::from_str(content).map_err(|e| ConfigError::OptionsParse(e.to_string()))?;
    validate_options(&options)?;
    Ok(options)
}

/// Checks required fields and value consistency.
pub(crate) fn validate_options(options: &PluginOptions) -> Result<(), ConfigError> {
    match options.ts_config_path.as_deref() {
        None | Some("") => return Err(ConfigError::MissingTsConfigPath),
        Some(_) => {}
    }
    if let Some(entry) = options.entry_module.as_deref() {
        if entry.starts_with('#') || entry.is_empty() {
            return Err(ConfigError::Validation(format!(
                "entryModule '{entry}' has no module path"
            )));
        }
    }
    if options.i18n_format.is_some() && options.i18n_file.is_none() {
        return Err(ConfigError::Validation(
            "i18nFormat requires i18nFile".to_string(),
        ));
    }
    Ok(())
}

/// Reads a tsconfig file as raw JSON.
pub fn read_ts_config(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_ts_config_from_str(path, &content)
}

/// Parses tsconfig text; `path` is used only for the error message.
pub fn read_ts_config_from_str(path: &Path, content: &str) -> Result<Value, ConfigError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ConfigError::TsConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(ConfigError::TsConfigParse {
            path: path.to_path_buf(),
            reason: "top-level value is not an object".to_string(),
        });
    }
    tracing::debug!(path = %path.display(), "tsconfig read");
    Ok(value)
}
