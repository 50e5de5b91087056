//! tsconfig interpretation for the scanning checker.

use aot_config::{glob_to_regex, CodegenOptions, CompilerOptions, ConfigError, ParsedConfig};
use aot_host::CompilerHost;
use aot_source::normalize_path;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const DEFAULT_INCLUDE: &str = "**/*";
const DEFAULT_EXCLUDE: &str = "node_modules/**";
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Interprets `files`, `include`, `exclude`, `compilerOptions` and
/// `angularCompilerOptions`.
///
/// Explicit `files` come first in the order written, followed by
/// `include` matches sorted by path. `include` defaults to everything only
/// when `files` is absent.
pub fn parse_ts_config(
    raw: &Value,
    base: &Path,
    host: &CompilerHost,
) -> Result<ParsedConfig, ConfigError> {
    let files = string_list(raw, "files")?;
    let include = match string_list(raw, "include")? {
        Some(include) => include,
        None if files.is_none() => vec![DEFAULT_INCLUDE.to_string()],
        None => Vec::new(),
    };
    let exclude = string_list(raw, "exclude")?.unwrap_or_else(|| vec![DEFAULT_EXCLUDE.to_string()]);

    let mut root_files: Vec<PathBuf> = files
        .unwrap_or_default()
        .iter()
        .map(|f| normalize_path(&base.join(f)))
        .collect();
    if !include.is_empty() {
        let include = compile(&include, base)?;
        let exclude = compile(&exclude, base)?;
        let seen: BTreeSet<PathBuf> = root_files.iter().cloned().collect();
        for file in walk_sources(base, host) {
            let text = file.to_string_lossy().replace('\\', "/");
            let included = include.iter().any(|re| re.is_match(&text));
            let excluded = exclude.iter().any(|re| re.is_match(&text));
            if included && !excluded && !seen.contains(&file) {
                root_files.push(file);
            }
        }
    }

    let compiler_options = match raw.get("compilerOptions") {
        None | Some(Value::Null) => CompilerOptions::default(),
        Some(Value::Object(map)) => CompilerOptions(map.clone()),
        Some(_) => {
            return Err(ConfigError::Validation(
                "\"compilerOptions\" must be an object".to_string(),
            ))
        }
    };
    let codegen_options = match raw.get("angularCompilerOptions") {
        None | Some(Value::Null) => CodegenOptions::default(),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            ConfigError::Validation(format!("\"angularCompilerOptions\": {e}"))
        })?,
    };

    tracing::debug!(roots = root_files.len(), "tsconfig parsed");
    Ok(ParsedConfig {
        root_files,
        compiler_options,
        codegen_options,
    })
}

fn string_list(raw: &Value, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ConfigError::Validation(format!("\"{key}\" must contain only strings"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ConfigError::Validation(format!("\"{key}\" must be an array"))),
    }
}

fn compile(globs: &[String], base: &Path) -> Result<Vec<Regex>, ConfigError> {
    globs
        .iter()
        .map(|glob| {
            Regex::new(&glob_to_regex(glob, Some(base))).map_err(|e| ConfigError::InvalidPattern {
                pattern: glob.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Every `.ts` file under `base`, sorted.
fn walk_sources(base: &Path, host: &CompilerHost) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![base.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for child in host.read_directory(&dir) {
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if host.directory_exists(&child) {
                if !SKIPPED_DIRS.contains(&name.as_str()) {
                    stack.push(child);
                }
            } else if name.ends_with(".ts") {
                found.push(child);
            }
        }
    }
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use aot_source::MemoryFileSystem;
    use serde_json::json;
    use std::sync::Arc;

    fn host() -> CompilerHost {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/app/src/main.ts", "");
        fs.insert("/app/src/app/app.module.ts", "");
        fs.insert("/app/src/app/app.component.spec.ts", "");
        fs.insert("/app/src/styles.css", "");
        fs.insert("/app/node_modules/lib/index.ts", "");
        CompilerHost::new(fs, "/app")
    }

    #[test]
    fn files_only() {
        let parsed = parse_ts_config(&json!({"files": ["src/main.ts"]}), Path::new("/app"), &host())
            .unwrap();
        assert_eq!(parsed.root_files, vec![PathBuf::from("/app/src/main.ts")]);
    }

    #[test]
    fn default_include_skips_node_modules_and_non_ts() {
        let parsed = parse_ts_config(&json!({}), Path::new("/app"), &host()).unwrap();
        assert_eq!(
            parsed.root_files,
            vec![
                PathBuf::from("/app/src/app/app.component.spec.ts"),
                PathBuf::from("/app/src/app/app.module.ts"),
                PathBuf::from("/app/src/main.ts"),
            ]
        );
    }

    #[test]
    fn include_and_exclude() {
        let raw = json!({
            "files": ["src/main.ts"],
            "include": ["src/app/**/*.ts"],
            "exclude": ["**/*.spec.ts"]
        });
        let parsed = parse_ts_config(&raw, Path::new("/app"), &host()).unwrap();
        assert_eq!(
            parsed.root_files,
            vec![
                PathBuf::from("/app/src/main.ts"),
                PathBuf::from("/app/src/app/app.module.ts"),
            ]
        );
    }

    #[test]
    fn options_sections() {
        let raw = json!({
            "files": [],
            "compilerOptions": {"declaration": true},
            "angularCompilerOptions": {"genDir": "aot", "entryModule": "src/app/app.module#AppModule"}
        });
        let parsed = parse_ts_config(&raw, Path::new("/app"), &host()).unwrap();
        assert!(parsed.compiler_options.declaration());
        assert_eq!(parsed.codegen_options.gen_dir.as_deref(), Some("aot"));
    }

    #[test]
    fn malformed_sections_are_validation_errors() {
        for raw in [
            json!({"files": "main.ts"}),
            json!({"files": [1]}),
            json!({"compilerOptions": []}),
            json!({"angularCompilerOptions": {"genDir": 3}}),
        ] {
            let err = parse_ts_config(&raw, Path::new("/app"), &host()).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{raw}");
        }
    }
}
