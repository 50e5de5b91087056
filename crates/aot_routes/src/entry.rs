//! Inferring the entry module from an application's main file.

use aot_config::EntryModule;
use aot_host::CompilerHost;
use aot_source::{Token, TokenCursor};
use std::path::Path;

const BOOTSTRAP_CALLS: &[&str] = &["bootstrapModule", "bootstrapModuleFactory"];

/// Finds the module passed to `bootstrapModule(...)` in `main` and resolves
/// its import.
///
/// Returns `None` when the main file is missing, bootstraps nothing
/// statically, or imports the module from somewhere that does not resolve.
pub fn resolve_entry_module(main: &Path, host: &CompilerHost) -> Option<EntryModule> {
    let file = match host.source_file(main) {
        Ok(Some(file)) => file,
        Ok(None) => {
            tracing::warn!(main = %main.display(), "main file not found");
            return None;
        }
        Err(err) => {
            tracing::warn!(main = %main.display(), error = %err, "main file unreadable");
            return None;
        }
    };
    let tokens = file.tokens();
    let local = bootstrapped_name(tokens)?;
    let (specifier, export_name) = import_of(tokens, local)?;
    let resolved = host.resolve_module(&specifier, main)?;
    let text = resolved.to_string_lossy();
    let path = text.strip_suffix(".ts").unwrap_or(&text).to_string();
    let entry = EntryModule { path, export_name };
    tracing::debug!(entry = %entry, "entry module resolved from main");
    Some(entry)
}

fn bootstrapped_name(tokens: &[Token]) -> Option<&str> {
    tokens.iter().enumerate().find_map(|(i, token)| {
        if !BOOTSTRAP_CALLS.iter().any(|call| token.is_ident(call)) {
            return None;
        }
        let mut cursor = TokenCursor::at_index(tokens, i + 1);
        if !cursor.eat_punct('(') {
            return None;
        }
        cursor.eat_ident().map(|t| t.text.as_str())
    })
}

/// Finds `import { <name> } from '<spec>'` (or `{ Orig as <name> }`) and
/// returns the specifier with the exported name.
fn import_of(tokens: &[Token], local: &str) -> Option<(String, String)> {
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_ident("import") {
            continue;
        }
        let mut cursor = TokenCursor::at_index(tokens, i + 1);
        if !cursor.eat_punct('{') {
            continue;
        }
        let mut found = None;
        while let Some(name) = cursor.eat_ident() {
            let bound = if cursor.eat_keyword("as") {
                match cursor.eat_ident() {
                    Some(alias) => alias,
                    None => break,
                }
            } else {
                name
            };
            if bound.text == local {
                found = Some(name.text.clone());
            }
            if !cursor.eat_punct(',') {
                break;
            }
        }
        if !(cursor.eat_punct('}') && cursor.eat_keyword("from")) {
            continue;
        }
        if let (Some(export), Some(spec)) = (found, cursor.eat_str()) {
            return Some((spec.text.clone(), export));
        }
    }
    None
}
