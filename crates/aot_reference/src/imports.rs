//! Module specifiers referenced by a source file.

use aot_source::{SourceFile, TokenCursor};

/// Tokens scanned past an `import`/`export` keyword looking for `from '...'`.
const FROM_LOOKAHEAD: usize = 64;

/// One module specifier and where it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// The specifier as written.
    pub specifier: String,
    /// Byte offset of the specifier literal.
    pub start: u32,
    /// End byte offset of the specifier literal.
    pub end: u32,
}

impl ImportRef {
    /// Returns `true` for `./` and `../` specifiers.
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// Collects `import ... from '<m>'`, `import '<m>'`, `export ... from '<m>'`
/// and `import('<m>')` specifiers, in source order.
pub fn scan_imports(file: &SourceFile) -> Vec<ImportRef> {
    let tokens = file.tokens();
    let mut refs = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let is_import = token.is_ident("import");
        if !is_import && !token.is_ident("export") {
            continue;
        }
        let mut cursor = TokenCursor::at_index(tokens, i + 1);
        if is_import {
            if let Some(lit) = cursor.eat_str() {
                refs.push(to_ref(lit));
                continue;
            }
            if cursor.eat_punct('(') {
                if let Some(lit) = cursor.eat_str() {
                    refs.push(to_ref(lit));
                }
                continue;
            }
        }
        for _ in 0..FROM_LOOKAHEAD {
            let Some(current) = cursor.current() else { break };
            if current.is_punct(';') || current.is_ident("import") || current.is_ident("export") {
                break;
            }
            if current.is_ident("from") {
                cursor.advance();
                if let Some(lit) = cursor.eat_str() {
                    refs.push(to_ref(lit));
                }
                break;
            }
            cursor.advance();
        }
    }
    refs
}

fn to_ref(token: &aot_source::Token) -> ImportRef {
    ImportRef {
        specifier: token.text.clone(),
        start: token.start,
        end: token.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(source: &str) -> Vec<String> {
        scan_imports(&SourceFile::parse("/a.ts", source))
            .into_iter()
            .map(|r| r.specifier)
            .collect()
    }

    #[test]
    fn import_forms() {
        let source = "
            import { NgModule } from '@angular/core';
            import * as lib from './lib';
            import './polyfills';
            import Default, { a, b as c } from \"../shared/x\";
            export { thing } from './thing';
            export * from './all';
            const lazy = () => import('./lazy/lazy.module');
        ";
        assert_eq!(
            specifiers(source),
            vec![
                "@angular/core",
                "./lib",
                "./polyfills",
                "../shared/x",
                "./thing",
                "./all",
                "./lazy/lazy.module"
            ]
        );
    }

    #[test]
    fn local_exports_are_not_imports() {
        assert!(specifiers("export const a = 1; export class B {}").is_empty());
    }

    #[test]
    fn relative_predicate_and_offsets() {
        let source = "import { A } from './a';";
        let refs = scan_imports(&SourceFile::parse("/x.ts", source));
        assert!(refs[0].is_relative());
        assert_eq!(&source[refs[0].start as usize..refs[0].end as usize], "'./a'");
    }
}
