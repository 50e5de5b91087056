//! A factory generator: one `.ngfactory.ts` module per decorated class.

use crate::imports::scan_imports;
use aot_config::{CompilationOptions, EntryModule};
use aot_host::{CompilerHost, ProgramHandle};
use aot_orchestrator::{CodeGenerator, GenerationContext, GenerationError};
use aot_routes::{discover_in_file, LazyRouteMap};
use aot_source::{relative_to, SourceFile, TokenCursor, TokenKind};
use async_trait::async_trait;
use std::collections::{BTreeSet, VecDeque};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DECORATORS: &[&str] = &["NgModule", "Component"];

/// A class carrying one of the recognised decorators.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DecoratedClass {
    name: String,
    template_urls: Vec<String>,
}

/// Writes a factory module for every `@NgModule` or `@Component` class.
///
/// Inputs are the program's sources plus every lazy route target reachable
/// from them, since lazily loaded modules sit outside the import graph.
/// Templates named by `templateUrl` are loaded through the resource loader
/// so a missing template fails the run. Unchanged factories are not
/// rewritten, which keeps them out of the host's changed set; factories
/// whose source no longer produces one are retired.
#[derive(Debug, Default)]
pub struct FactoryGenerator;

impl FactoryGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeGenerator for FactoryGenerator {
    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<(), GenerationError> {
        let options = ctx.options;
        let mut written = 0usize;
        let mut produced = BTreeSet::new();

        if let Some(file) = &options.i18n.file {
            let path = options.base_path.join(file);
            ctx.resolve_resource(&path).await?;
        }

        let start = ctx
            .program
            .source_files()
            .into_iter()
            .map(|f| f.path.clone())
            .filter(|p| is_generator_input(p, options));
        let inputs = walk(ctx.program, ctx.host, start).files;

        for source in inputs {
            if !is_generator_input(&source.path, options) {
                continue;
            }
            let classes = decorated_classes(&source);
            if classes.is_empty() {
                continue;
            }
            let dir = source.path.parent().unwrap_or(Path::new("/"));
            for class in &classes {
                for url in &class.template_urls {
                    ctx.resolve_resource(&aot_source::normalize_path(&dir.join(url)))
                        .await?;
                }
            }

            let target = factory_file(&source.path, options);
            produced.insert(target.clone());
            let content = render_factory(&source.path, &target, &classes, options);
            if ctx.host.read_file(&target)?.as_deref() == Some(content.as_str()) {
                continue;
            }
            ctx.host.write_file(&target, content, false);
            written += 1;
        }

        let retired = ctx.host.retire_generated(&options.gen_dir, &produced);
        tracing::debug!(
            written,
            produced = produced.len(),
            retired = retired.len(),
            "factories generated"
        );
        Ok(())
    }

    fn list_all_routes(
        &self,
        program: &ProgramHandle,
        host: &CompilerHost,
        entry_module: Option<&EntryModule>,
    ) -> LazyRouteMap {
        let start = entry_module.and_then(|entry| {
            let containing = host.base_path().join("index.ts");
            host.resolve_module(&entry.path, &containing)
                .filter(|path| program.contains(path))
        });
        let start: Vec<PathBuf> = match start {
            Some(path) => vec![path],
            None => program.source_files().iter().map(|f| f.path.clone()).collect(),
        };
        walk(program, host, start).routes
    }
}

/// What a [`walk`] visited.
struct Reach {
    files: Vec<Arc<SourceFile>>,
    routes: LazyRouteMap,
}

/// Breadth-first over relative imports and resolved lazy route targets.
fn walk(
    program: &ProgramHandle,
    host: &CompilerHost,
    start: impl IntoIterator<Item = PathBuf>,
) -> Reach {
    let mut queue: VecDeque<PathBuf> = start.into_iter().collect();
    let mut seen = BTreeSet::new();
    let mut reach = Reach {
        files: Vec::new(),
        routes: LazyRouteMap::new(),
    };
    while let Some(path) = queue.pop_front() {
        if !seen.insert(path.clone()) {
            continue;
        }
        // Lazy targets are often outside the import graph.
        let file = match program.source_file(&path) {
            Some(file) => file,
            None => match host.source_file(&path) {
                Ok(Some(file)) => file,
                _ => continue,
            },
        };
        let found = discover_in_file(&file, host);
        queue.extend(found.resolved().map(|(_, target)| target.to_path_buf()));
        for import in scan_imports(&file).iter().filter(|i| i.is_relative()) {
            if let Some(target) = host.resolve_module(&import.specifier, &file.path) {
                queue.push_back(target);
            }
        }
        for (key, target) in found {
            reach.routes.insert(key, target);
        }
        reach.files.push(file);
    }
    reach
}

fn is_generator_input(path: &Path, options: &CompilationOptions) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".ts") && !name.ends_with(".d.ts") && !path.starts_with(&options.gen_dir)
}

/// The generated module path for `source`.
fn factory_file(source: &Path, options: &CompilationOptions) -> PathBuf {
    let relative = relative_to(source, &options.base_path);
    let stem = relative.to_string_lossy();
    let stem = stem.strip_suffix(".ts").unwrap_or(&stem);
    aot_source::normalize_path(&options.gen_dir.join(format!("{stem}.ngfactory.ts")))
}

fn render_factory(
    source: &Path,
    target: &Path,
    classes: &[DecoratedClass],
    options: &CompilationOptions,
) -> String {
    let dir = target.parent().unwrap_or(Path::new("/"));
    let relative = relative_to(source, dir);
    let relative = relative.to_string_lossy();
    let mut specifier = relative.strip_suffix(".ts").unwrap_or(&relative).to_string();
    if !specifier.starts_with("../") && !specifier.starts_with("./") {
        specifier.insert_str(0, "./");
    }

    let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "// Generated from {}", source.display());
    let _ = writeln!(out, "import {{ {} }} from '{specifier}';", names.join(", "));
    for name in names {
        match &options.i18n.locale {
            Some(locale) => {
                let _ = writeln!(
                    out,
                    "export const {name}NgFactory = {{ moduleType: {name}, locale: '{locale}' }};"
                );
            }
            None => {
                let _ = writeln!(out, "export const {name}NgFactory = {{ moduleType: {name} }};");
            }
        }
    }
    out
}

/// Finds decorated classes and the templates their decorators reference.
fn decorated_classes(file: &SourceFile) -> Vec<DecoratedClass> {
    let tokens = file.tokens();
    let mut classes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let mut cursor = TokenCursor::at_index(tokens, i);
        if !cursor.eat_punct('@') {
            i += 1;
            continue;
        }
        let decorator = cursor
            .eat_ident()
            .filter(|t| DECORATORS.contains(&t.text.as_str()));
        if decorator.is_none() || !cursor.eat_punct('(') {
            i = cursor.pos().max(i + 1);
            continue;
        }

        let mut depth = 1usize;
        let mut template_urls = Vec::new();
        while depth > 0 {
            let Some(token) = cursor.current() else {
                break;
            };
            match token.kind {
                TokenKind::Punct('(' | '{' | '[') => depth += 1,
                TokenKind::Punct(')' | '}' | ']') => depth -= 1,
                TokenKind::Ident if token.text == "templateUrl" => {
                    let mut value = TokenCursor::at_index(tokens, cursor.pos() + 1);
                    if value.eat_punct(':') {
                        if let Some(url) = value.eat_str() {
                            template_urls.push(url.text.clone());
                        }
                    }
                }
                _ => {}
            }
            cursor.advance();
        }

        while let Some(token) = cursor.current() {
            if token.is_punct('@') || token.is_ident("class") {
                break;
            }
            cursor.advance();
        }
        if cursor.eat_keyword("class") {
            if let Some(name) = cursor.eat_ident() {
                classes.push(DecoratedClass {
                    name: name.text.clone(),
                    template_urls,
                });
            }
        }
        i = cursor.pos().max(i + 1);
    }
    classes
}
