//! Fixture helpers for the orchestrator's end-to-end scenarios.
//!
//! A [`Fixture`] is an in-memory project rooted at [`PROJECT_ROOT`] with a
//! `src/tsconfig.json`. Orchestrators built from it use the reference
//! collaborators from `aot_reference`; [`Fixture::gated_orchestrator`]
//! swaps in a generator that pauses mid-cycle so tests can observe the
//! ready signal from another task.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aot_config::{EntryModule, PluginOptions};
use aot_host::{CompilerHost, ProgramHandle};
use aot_orchestrator::{
    CodeGenerator, CycleOutcome, GenerationContext, GenerationError, Orchestrator, Session,
};
use aot_reference::FactoryGenerator;
use aot_routes::LazyRouteMap;
use aot_source::MemoryFileSystem;
use async_trait::async_trait;
use tokio::sync::Notify;

/// The directory orchestrators are created from.
pub const PROJECT_ROOT: &str = "/project";

/// The base path: the directory holding the tsconfig.
pub const SRC: &str = "/project/src";

/// Absolute path of `relative` under [`SRC`].
pub fn src(relative: &str) -> PathBuf {
    Path::new(SRC).join(relative)
}

/// An in-memory project.
pub struct Fixture {
    fs: Arc<MemoryFileSystem>,
    /// Options handed to every orchestrator built from this fixture.
    pub options: PluginOptions,
}

impl Fixture {
    /// Creates a project whose tsconfig lists `roots` (relative to `src/`).
    pub fn new(roots: &[&str]) -> Self {
        let fs = Arc::new(MemoryFileSystem::new());
        let tsconfig = serde_json::json!({
            "files": roots,
            "compilerOptions": { "module": "es2015" },
        });
        fs.insert(src("tsconfig.json"), tsconfig.to_string());
        Self {
            fs,
            options: PluginOptions {
                ts_config_path: Some("src/tsconfig.json".to_string()),
                ..Default::default()
            },
        }
    }

    /// Writes `content` to `relative` under `src/`.
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        self.fs.insert(src(relative), content);
        self
    }

    /// Removes `relative` under `src/`.
    pub fn remove(&self, relative: &str) -> &Self {
        self.fs.remove(src(relative));
        self
    }

    /// Sets `skipCodeGeneration`.
    pub fn skip_codegen(mut self, skip: bool) -> Self {
        self.options.skip_code_generation = Some(skip);
        self
    }

    /// Sets `entryModule`.
    pub fn entry(mut self, entry: &str) -> Self {
        self.options.entry_module = Some(entry.to_string());
        self
    }

    /// The backing file system.
    pub fn fs(&self) -> &Arc<MemoryFileSystem> {
        &self.fs
    }

    /// An orchestrator over the reference collaborators.
    pub fn orchestrator(&self) -> Orchestrator {
        let collaborators = aot_reference::collaborators(self.fs.clone());
        Orchestrator::new(&self.options, Path::new(PROJECT_ROOT), collaborators).unwrap()
    }

    /// An orchestrator whose code generator waits on the returned [`Gate`].
    pub fn gated_orchestrator(&self) -> (Orchestrator, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        let mut collaborators = aot_reference::collaborators(self.fs.clone());
        collaborators.generator = Arc::new(GatedGenerator {
            inner: FactoryGenerator::new(),
            gate: gate.clone(),
        });
        let orchestrator =
            Orchestrator::new(&self.options, Path::new(PROJECT_ROOT), collaborators).unwrap();
        (orchestrator, gate)
    }
}

/// A project with one lazy route: `main.ts` imports `app/app.module.ts`,
/// which routes `lazy/lazy.module#LazyModule` lazily. `app/b.ts` is
/// imported too but has no routes.
pub fn lazy_app() -> Fixture {
    let fixture = Fixture::new(&["main.ts"]);
    fixture
        .file(
            "main.ts",
            "import { platformBrowser } from '@angular/platform-browser';\n\
             import { AppModule } from './app/app.module';\n\
             platformBrowser().bootstrapModule(AppModule);\n",
        )
        .file(
            "app/app.module.ts",
            "import { helper } from './b';\n\
             const routes = [\n\
               { path: 'lazy', loadChildren: 'lazy/lazy.module#LazyModule' },\n\
             ];\n\
             @NgModule({ imports: [RouterModule.forRoot(routes)] })\n\
             export class AppModule {}\n",
        )
        .file("app/b.ts", "export const helper = 1;\n")
        .file(
            "lazy/lazy.module.ts",
            "@NgModule({})\nexport class LazyModule {}\n",
        );
    fixture
}

/// Runs one cycle on a fresh session and releases the session.
pub async fn build(orchestrator: &mut Orchestrator) -> (Session, CycleOutcome) {
    let session = Session::new();
    let outcome = orchestrator.make(&session).await;
    orchestrator.after_emit(&session);
    (session, outcome)
}

/// Queues `changed` (absolute paths), signals invalidation and rebuilds.
pub async fn rebuild(
    orchestrator: &mut Orchestrator,
    changed: &[PathBuf],
) -> (Session, CycleOutcome) {
    orchestrator.invalidation_queue().extend(changed);
    orchestrator.on_invalid();
    build(orchestrator).await
}

/// Route map entries as `(key, path)` string pairs, for readable assertions.
pub fn route_pairs(routes: &LazyRouteMap) -> Vec<(String, Option<String>)> {
    routes
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(|p| p.display().to_string())))
        .collect()
}

/// Pauses a [`GatedGenerator`] until released.
#[derive(Debug, Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Resolves once the generator has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the generator continue.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// A [`FactoryGenerator`] that waits on a [`Gate`] before generating.
pub struct GatedGenerator {
    inner: FactoryGenerator,
    gate: Arc<Gate>,
}

#[async_trait]
impl CodeGenerator for GatedGenerator {
    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<(), GenerationError> {
        self.gate.entered.notify_one();
        self.gate.release.notified().await;
        self.inner.generate(ctx).await
    }

    fn list_all_routes(
        &self,
        program: &ProgramHandle,
        host: &CompilerHost,
        entry_module: Option<&EntryModule>,
    ) -> LazyRouteMap {
        self.inner.list_all_routes(program, host, entry_module)
    }
}
