//! The build orchestrator state machine.

use crate::codegen::{CodeGenerator, CodegenBridge};
use crate::error::BuildError;
use crate::invalidation::InvalidationQueue;
use crate::provider::LazyDependencyProvider;
use crate::ready::{CycleOutcome, ReadySignal, ReadyWaiter};
use crate::resource::ResourceLoader;
use crate::session::Session;
use crate::state::BuildState;
use aot_config::{
    locate_config, read_ts_config_from_str, resolve_options, CompilationOptions, ConfigError,
    EntryModule, PluginOptions,
};
use aot_diagnostics::aggregate;
use aot_host::{
    CompilerHost, HostError, ProgramHandle, ProgramManager, TypeChecker, VirtualModuleRegistry,
};
use aot_routes::{
    discover_incremental, resolve_entry_module, LazyRouteMap, PostProcessor, RouteTable,
};
use aot_source::FileSystem;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The external collaborators an orchestrator drives.
pub struct Collaborators {
    /// The file system the source cache reads through.
    pub fs: Arc<dyn FileSystem>,
    /// The type checker.
    pub checker: Arc<dyn TypeChecker>,
    /// The code generator.
    pub generator: Arc<dyn CodeGenerator>,
    /// The resource loader handed to the generator.
    pub resources: Arc<dyn ResourceLoader>,
}

/// How the last route discovery pass ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryReport {
    /// Whole-program listing through the code generator.
    Full {
        /// Routes listed.
        routes: usize,
    },
    /// Changed files only.
    Incremental {
        /// The files scanned.
        scanned: Vec<PathBuf>,
    },
}

/// Module-resolution hooks usable while a cycle is running.
///
/// Detached from the orchestrator so a resolver can wait on a cycle that
/// holds the orchestrator mutably.
#[derive(Debug, Clone)]
pub struct ResolverHooks {
    ready: ReadyWaiter,
    provider: LazyDependencyProvider,
}

impl ResolverHooks {
    /// Waits for the current cycle before `.ts` requests proceed.
    ///
    /// Resolves after success and failure alike. Other requests pass
    /// straight through.
    pub async fn before_resolve(&self, request: &str) {
        if request.ends_with(".ts") {
            self.ready.clone().wait().await;
        }
    }

    /// The lazy-dependency provider.
    pub fn lazy_dependencies(&self) -> &LazyDependencyProvider {
        &self.provider
    }
}

/// The incremental build orchestrator. See the [crate documentation](crate).
pub struct Orchestrator {
    options: CompilationOptions,
    host: Arc<CompilerHost>,
    programs: ProgramManager,
    bridge: CodegenBridge,
    post: PostProcessor,
    routes: RouteTable,
    published: Arc<RwLock<LazyRouteMap>>,
    registry: Option<Arc<dyn VirtualModuleRegistry>>,
    ready: ReadySignal,
    queue: InvalidationQueue,
    state: BuildState,
    first_run: bool,
    diagnosed: HashSet<PathBuf>,
    entry_module: Option<EntryModule>,
    last_discovery: Option<DiscoveryReport>,
}

impl Orchestrator {
    /// Sets up an orchestrator.
    ///
    /// Locates and parses the tsconfig, resolves options, seeds host
    /// overrides into the source cache, creates the initial program with
    /// caching disabled, then enables caching and resolves the entry module.
    /// Configuration problems are the only errors returned.
    pub fn new(
        plugin_options: &PluginOptions,
        cwd: &Path,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        let Collaborators {
            fs,
            checker,
            generator,
            resources,
        } = collaborators;

        let location = locate_config(plugin_options, cwd, fs.as_ref())?;
        let host = Arc::new(CompilerHost::new(fs, location.base_path.clone()));

        let ts_config = &location.ts_config_path;
        let raw = match host.read_file(ts_config) {
            Ok(Some(content)) => read_ts_config_from_str(ts_config, &content)?,
            Ok(None) => {
                return Err(ConfigError::Read {
                    path: ts_config.clone(),
                    source: std::io::ErrorKind::NotFound.into(),
                })
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path: ts_config.clone(),
                    source: std::io::Error::other(err.to_string()),
                })
            }
        };
        let parsed = checker
            .parse_config(&raw, &location.base_path, &host)
            .map_err(|err| match err {
                HostError::Config(err) => err,
                other => ConfigError::TsConfigParse {
                    path: ts_config.clone(),
                    reason: other.to_string(),
                },
            })?;
        let options = resolve_options(plugin_options, &location, parsed)?;

        for (path, content) in &options.host_override_file_system {
            host.write_file(path, content.clone(), false);
        }

        let mut programs = ProgramManager::new(checker);
        if let Err(err) =
            programs.create_or_update(&options.root_files, &options.compiler_options, &host)
        {
            tracing::warn!(error = %err, "initial program creation failed; retrying on first cycle");
        }
        host.enable_caching();

        let entry_module = options.entry_module.clone().or_else(|| {
            options
                .main_path
                .as_deref()
                .and_then(|main| resolve_entry_module(main, &host))
        });

        let post = PostProcessor::new(
            options.base_path.clone(),
            options.gen_dir.clone(),
            options.skip_code_generation,
        );
        tracing::info!(
            base = %options.base_path.display(),
            entry = ?entry_module.as_ref().map(ToString::to_string),
            "orchestrator ready"
        );

        Ok(Self {
            options,
            host,
            programs,
            bridge: CodegenBridge::new(generator, resources),
            post,
            routes: RouteTable::new(),
            published: Arc::new(RwLock::new(LazyRouteMap::new())),
            registry: None,
            ready: ReadySignal::new(),
            queue: InvalidationQueue::new(),
            state: BuildState::Idle,
            first_run: true,
            diagnosed: HashSet::new(),
            entry_module,
            last_discovery: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The resolved per-run options.
    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }

    /// The compiler host adapter.
    pub fn host(&self) -> &Arc<CompilerHost> {
        &self.host
    }

    /// The current program, if one exists.
    pub fn program(&self) -> Option<&ProgramHandle> {
        self.programs.current()
    }

    /// How many programs have been created, including the initial one.
    pub fn program_creations(&self) -> usize {
        self.programs.creation_count()
    }

    /// How many times the code generator has run.
    pub fn generation_runs(&self) -> usize {
        self.bridge.runs()
    }

    /// The current state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// `true` until the first successful cycle completes.
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// The entry module, when known.
    pub fn entry_module(&self) -> Option<&EntryModule> {
        self.entry_module.as_ref()
    }

    /// The persistent lazy route map.
    pub fn routes(&self) -> &LazyRouteMap {
        self.routes.routes()
    }

    /// How the last route discovery pass ran.
    pub fn last_discovery(&self) -> Option<&DiscoveryReport> {
        self.last_discovery.as_ref()
    }

    /// The queue a watcher feeds changed paths into.
    pub fn invalidation_queue(&self) -> InvalidationQueue {
        self.queue.clone()
    }

    /// Resolves once the current cycle (if any) has completed.
    pub fn when_ready(&self) -> ReadyWaiter {
        self.ready.waiter()
    }

    /// The dependency-list provider for dynamic-import contexts.
    ///
    /// Matching requests are rewritten to the base path when code
    /// generation is skipped, and to the generated-output directory
    /// otherwise.
    pub fn lazy_dependency_provider(&self) -> LazyDependencyProvider {
        let target = if self.options.skip_code_generation {
            self.options.base_path.clone()
        } else {
            self.options.gen_dir.clone()
        };
        LazyDependencyProvider::new(self.ready.waiter(), Arc::clone(&self.published), target)
    }

    /// Hooks for the host's module resolver.
    pub fn resolver_hooks(&self) -> ResolverHooks {
        ResolverHooks {
            ready: self.ready.waiter(),
            provider: self.lazy_dependency_provider(),
        }
    }

    // ========================================================================
    // Host lifecycle hooks
    // ========================================================================

    /// Registers the host's resolver; generated modules are published to it
    /// at the end of every cycle.
    pub fn after_resolvers(&mut self, registry: Arc<dyn VirtualModuleRegistry>) {
        self.registry = Some(registry);
    }

    /// A file-system change was noticed.
    ///
    /// Clears per-file diagnosed markers. The changed paths themselves go
    /// through the [`InvalidationQueue`] and are applied when the next cycle
    /// starts.
    pub fn on_invalid(&mut self) {
        self.diagnosed.clear();
        if !self.state.is_busy() {
            self.transition(BuildState::Invalidated);
        }
    }

    /// Releases the session so the next cycle may bind a fresh one.
    pub fn after_emit(&mut self, session: &Session) {
        session.unbind();
        tracing::debug!(session = %session.id(), "session released");
    }

    /// Runs one build cycle against `session`.
    ///
    /// Never fails: errors are pushed onto the session and the cycle's ready
    /// signal completes either way.
    pub async fn make(&mut self, session: &Session) -> CycleOutcome {
        self.ready.begin();
        if !session.try_bind() {
            session.push_error(BuildError::DuplicateSession);
            self.ready.complete(CycleOutcome::Failed);
            return CycleOutcome::Failed;
        }

        let outcome = match self.run_cycle(session).await {
            Ok(()) => {
                self.first_run = false;
                CycleOutcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(error = %err, state = %self.state, "build cycle failed");
                session.push_error(err);
                CycleOutcome::Failed
            }
        };
        self.transition(BuildState::Idle);
        self.ready.complete(outcome);
        outcome
    }

    /// Reports per-file diagnostics for `path` on `session`.
    ///
    /// Skipped when the file was already diagnosed this cycle or is not in
    /// the current program. Declaration diagnostics are included only when
    /// the `declaration` compiler option is set.
    pub fn diagnose(&mut self, path: &Path, session: &Session) {
        let path = aot_source::normalize_path(path);
        if self.diagnosed.contains(&path) {
            return;
        }
        let Some(program) = self.programs.current().cloned() else {
            return;
        };
        if !program.contains(&path) {
            return;
        }
        self.diagnosed.insert(path.clone());

        let checker = self.programs.checker();
        let mut diags = Vec::new();
        if self.options.compiler_options.declaration() {
            diags.extend(checker.declaration_diagnostics(&program, &path));
        }
        diags.extend(checker.syntactic_diagnostics(&program, &path));
        diags.extend(checker.semantic_diagnostics(&program, &path));
        if diags.is_empty() {
            return;
        }
        tracing::debug!(file = %path.display(), count = diags.len(), "file diagnosed");
        session.push_error(aggregate(&diags));
        session.record(diags);
    }

    // ========================================================================
    // Cycle
    // ========================================================================

    fn transition(&mut self, next: BuildState) {
        tracing::debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    async fn run_cycle(&mut self, session: &Session) -> Result<(), BuildError> {
        self.transition(BuildState::Generating);
        let queued = self.queue.drain();
        if !queued.is_empty() {
            tracing::info!(count = queued.len(), "applying queued invalidations");
        }
        for path in &queued {
            self.host.invalidate(path);
        }

        if !self.options.skip_code_generation {
            let reusable = self
                .programs
                .current()
                .filter(|_| !self.programs.is_stale(&self.host))
                .cloned();
            let program = match reusable {
                Some(program) => program,
                None => self.create_program()?,
            };
            self.bridge.run(&program, &self.host, &self.options).await?;
        }

        self.transition(BuildState::ProgramBuilding);
        let program = self.create_program()?;

        if self.options.type_checking {
            self.transition(BuildState::TypeChecking);
            let diags = self.programs.checker().global_diagnostics(&program);
            if !diags.is_empty() {
                session.record(diags.clone());
                return Err(BuildError::TypeCheck(aggregate(&diags)));
            }
        }

        self.transition(BuildState::RouteDiscovery);
        let discovered = if self.first_run {
            let routes = self.bridge.generator().list_all_routes(
                &program,
                &self.host,
                self.entry_module.as_ref(),
            );
            self.last_discovery = Some(DiscoveryReport::Full {
                routes: routes.len(),
            });
            routes
        } else {
            let changed = self.host.changed_paths();
            let found = discover_incremental(&program, &self.host, &changed);
            self.last_discovery = Some(DiscoveryReport::Incremental {
                scanned: found.scanned,
            });
            found.routes
        };
        for conflict in self.routes.merge(self.post.apply(discovered)) {
            let diag = conflict.to_diagnostic();
            session.push_warning(&diag.message);
            session.record([diag]);
        }

        self.transition(BuildState::Finalizing);
        *self.published.write() = self.routes.routes().clone();
        if let Some(registry) = &self.registry {
            self.host.populate_resolver(registry.as_ref());
        }
        self.diagnosed.clear();
        let drained = self.host.drain_changed_paths();
        tracing::info!(
            routes = self.routes.routes().len(),
            changed = drained.len(),
            "build cycle finished"
        );
        Ok(())
    }

    fn create_program(&mut self) -> Result<ProgramHandle, BuildError> {
        let program = self.programs.create_or_update(
            &self.options.root_files,
            &self.options.compiler_options,
            &self.host,
        )?;
        Ok(program)
    }
}
