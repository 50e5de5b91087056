//! Per-file scanning for `loadChildren` references.

use crate::key::RouteReference;
use crate::map::LazyRouteMap;
use aot_host::{CompilerHost, ProgramHandle};
use aot_source::{SourceFile, Token, TokenCursor};
use std::collections::HashMap;
use std::path::PathBuf;

const LOAD_CHILDREN: &str = "loadChildren";

/// A route reference found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRoute {
    /// The normalized reference.
    pub reference: RouteReference,
    /// Byte offset of the `loadChildren` property.
    pub offset: u32,
}

/// Finds every statically known `loadChildren` reference in `file`.
///
/// Recognised values are a string literal, an identifier bound to a string
/// literal by a `const` in the same file, and
/// `() => import('<module>').then(m => m.<Export>)`. Anything else is
/// dynamic and skipped.
pub fn scan_routes(file: &SourceFile) -> Vec<ScannedRoute> {
    let tokens = file.tokens();
    let constants = string_constants(tokens);
    let mut routes = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let is_property = token.is_ident(LOAD_CHILDREN) || token.as_str_literal() == Some(LOAD_CHILDREN);
        if !is_property {
            continue;
        }
        let mut cursor = TokenCursor::at_index(tokens, i + 1);
        if !cursor.eat_punct(':') {
            continue;
        }
        let reference = if let Some(lit) = cursor.eat_str() {
            Some(RouteReference::parse(&lit.text))
        } else if let Some(id) = cursor.eat_ident() {
            constants.get(id.text.as_str()).map(|lit| RouteReference::parse(lit))
        } else {
            dynamic_import(&mut cursor)
        };
        match reference {
            Some(reference) => routes.push(ScannedRoute {
                reference,
                offset: token.start,
            }),
            None => tracing::trace!(
                file = %file.path.display(),
                offset = token.start,
                "skipping dynamic loadChildren"
            ),
        }
    }
    routes
}

/// `const <id> = '<literal>'` bindings, last binding wins.
fn string_constants(tokens: &[Token]) -> HashMap<&str, &str> {
    let mut constants = HashMap::new();
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_ident("const") {
            continue;
        }
        let mut cursor = TokenCursor::at_index(tokens, i + 1);
        let Some(id) = cursor.eat_ident() else { continue };
        if !cursor.eat_punct('=') {
            continue;
        }
        let Some(lit) = cursor.eat_str() else { continue };
        let ends_expression = cursor
            .current()
            .map_or(true, |t| t.is_punct(';') || t.is_punct(',') || t.is_ident("export") || t.is_ident("const"));
        if ends_expression {
            constants.insert(id.text.as_str(), lit.text.as_str());
        }
    }
    constants
}

/// `() => import('<module>').then(m => m.<Export>)`, also with `(m) =>`.
fn dynamic_import(cursor: &mut TokenCursor<'_>) -> Option<RouteReference> {
    if !(cursor.eat_puncts("()") && cursor.eat_puncts("=>") && cursor.eat_keyword("import")) {
        return None;
    }
    if !cursor.eat_punct('(') {
        return None;
    }
    let module = cursor.eat_str()?.text.clone();
    if !(cursor.eat_punct(')') && cursor.eat_punct('.') && cursor.eat_keyword("then")) {
        return None;
    }
    if !cursor.eat_punct('(') {
        return None;
    }
    let parenthesized = cursor.eat_punct('(');
    let param = cursor.eat_ident()?.text.clone();
    if parenthesized && !cursor.eat_punct(')') {
        return None;
    }
    if !(cursor.eat_puncts("=>") && cursor.eat_keyword(&param) && cursor.eat_punct('.')) {
        return None;
    }
    let export = cursor.eat_ident()?.text.clone();
    Some(RouteReference::new(module, export))
}

/// Scans one file and resolves each reference's module through `host`.
///
/// Keys are stored with a `#default` tag stripped; unresolvable modules
/// map to `None`.
pub fn discover_in_file(file: &SourceFile, host: &CompilerHost) -> LazyRouteMap {
    let mut map = LazyRouteMap::new();
    for route in scan_routes(file) {
        let resolved = host.resolve_module(&route.reference.module, &file.path);
        if resolved.is_none() {
            tracing::debug!(
                file = %file.path.display(),
                module = %route.reference.module,
                "lazy route module could not be resolved"
            );
        }
        map.insert(route.reference.storage_key(), resolved);
    }
    map
}

/// The result of an incremental pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementalDiscovery {
    /// Routes found in the scanned files.
    pub routes: LazyRouteMap,
    /// The files whose tokens were scanned, in changed-set order.
    pub scanned: Vec<PathBuf>,
}

/// Scans only the changed files that are part of `program`.
///
/// Changed paths outside the program (deleted files, generated files the
/// program does not include) are skipped.
pub fn discover_incremental(
    program: &ProgramHandle,
    host: &CompilerHost,
    changed: &[PathBuf],
) -> IncrementalDiscovery {
    let mut result = IncrementalDiscovery::default();
    for path in changed {
        let Some(file) = program.source_file(path) else {
            continue;
        };
        result.scanned.push(path.clone());
        for (key, value) in discover_in_file(&file, host) {
            if let Some(previous) = result.routes.insert(key.clone(), value.clone()) {
                if previous != value {
                    tracing::debug!(
                        key = %key,
                        file = %path.display(),
                        previous = ?previous,
                        current = ?value,
                        "route key resolved differently within one pass; keeping the later file"
                    );
                }
            }
        }
    }
    tracing::debug!(
        changed = changed.len(),
        scanned = result.scanned.len(),
        routes = result.routes.len(),
        "incremental route discovery"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use aot_source::MemoryFileSystem;
    use std::path::Path;
    use std::sync::Arc;

    fn keys(source: &str) -> Vec<String> {
        let file = SourceFile::parse("/app/src/app/routes.ts", source);
        scan_routes(&file)
            .into_iter()
            .map(|r| r.reference.internal_key())
            .collect()
    }

    #[test]
    fn string_literal_reference() {
        assert_eq!(
            keys("const routes = [{ path: 'lazy', loadChildren: 'lazy/lazy.module#LazyModule' }];"),
            vec!["lazy/lazy.module#LazyModule"]
        );
    }

    #[test]
    fn reference_without_export_gets_default() {
        assert_eq!(
            keys("{ loadChildren: './lazy/lazy.module' }"),
            vec!["./lazy/lazy.module#default"]
        );
    }

    #[test]
    fn quoted_property_name() {
        assert_eq!(keys("{ 'loadChildren': \"a#A\" }"), vec!["a#A"]);
    }

    #[test]
    fn constant_reference() {
        let source = "
            const LAZY = 'lazy/lazy.module#LazyModule';
            export const routes = [{ loadChildren: LAZY }];
        ";
        assert_eq!(keys(source), vec!["lazy/lazy.module#LazyModule"]);
    }

    #[test]
    fn concatenated_constant_is_dynamic() {
        let source = "const LAZY = 'lazy' + suffix; const r = { loadChildren: LAZY };";
        assert!(keys(source).is_empty());
    }

    #[test]
    fn dynamic_import_reference() {
        let source = "{ loadChildren: () => import('./lazy/lazy.module').then(m => m.LazyModule) }";
        assert_eq!(keys(source), vec!["./lazy/lazy.module#LazyModule"]);
        let paren = "{ loadChildren: () => import('./x').then((mod) => mod.XModule) }";
        assert_eq!(keys(paren), vec!["./x#XModule"]);
    }

    #[test]
    fn arbitrary_expression_is_skipped() {
        assert!(keys("{ loadChildren: pick(env) }").is_empty());
        assert!(keys("{ loadChildren: `lazy/${name}` }").is_empty());
    }

    #[test]
    fn commented_reference_is_ignored() {
        assert!(keys("// { loadChildren: 'lazy/lazy.module' }").is_empty());
    }

    #[test]
    fn discover_resolves_and_strips_default() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/app/src/app/lazy/lazy.module.ts", "export class LazyModule {}");
        let host = CompilerHost::new(fs, "/app/src");
        let file = SourceFile::parse(
            "/app/src/app/app.routes.ts",
            "[{ loadChildren: './lazy/lazy.module' }, { loadChildren: 'missing/module#M' }]",
        );
        let map = discover_in_file(&file, &host);
        assert_eq!(
            map.get("./lazy/lazy.module"),
            Some(Some(Path::new("/app/src/app/lazy/lazy.module.ts")))
        );
        assert_eq!(map.get("missing/module#M"), Some(None));
        assert_eq!(map.len(), 2);
    }

    struct Files(Vec<Arc<SourceFile>>, aot_config::CompilerOptions);

    impl aot_host::Program for Files {
        fn root_files(&self) -> &[PathBuf] {
            &[]
        }
        fn source_files(&self) -> Vec<Arc<SourceFile>> {
            self.0.clone()
        }
        fn source_file(&self, path: &Path) -> Option<Arc<SourceFile>> {
            self.0.iter().find(|f| f.path == path).cloned()
        }
        fn options(&self) -> &aot_config::CompilerOptions {
            &self.1
        }
    }

    #[test]
    fn same_specifier_from_two_directories_keeps_later_file() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/app/src/a/lazy.ts", "export class A {}");
        fs.insert("/app/src/b/lazy.ts", "export class B {}");
        let host = CompilerHost::new(fs, "/app/src");
        let files = ["/app/src/a/routes.ts", "/app/src/b/routes.ts"]
            .into_iter()
            .map(|p| Arc::new(SourceFile::parse(p, "[{ loadChildren: './lazy' }]")))
            .collect();
        let program: ProgramHandle = Arc::new(Files(files, Default::default()));
        let changed = vec![
            PathBuf::from("/app/src/a/routes.ts"),
            PathBuf::from("/app/src/b/routes.ts"),
        ];

        let found = discover_incremental(&program, &host, &changed);

        assert_eq!(found.scanned, changed);
        assert_eq!(found.routes.len(), 1);
        assert_eq!(
            found.routes.get("./lazy"),
            Some(Some(Path::new("/app/src/b/lazy.ts")))
        );
    }
}
