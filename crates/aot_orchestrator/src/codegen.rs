//! The code generator collaborator and the bridge that sequences it.

use crate::error::GenerationError;
use crate::resource::ResourceLoader;
use aot_config::{CompilationOptions, EntryModule};
use aot_host::{CompilerHost, ProgramHandle};
use aot_routes::LazyRouteMap;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// What the generator sees during one run.
pub struct GenerationContext<'a> {
    /// The pre-generation program.
    pub program: &'a ProgramHandle,
    /// The host generated files are written to.
    pub host: &'a CompilerHost,
    /// The per-run options (generated-output directory, i18n settings).
    pub options: &'a CompilationOptions,
    resources: &'a dyn ResourceLoader,
}

impl GenerationContext<'_> {
    /// Loads a resource referenced by a template.
    pub async fn resolve_resource(&self, path: &Path) -> Result<String, GenerationError> {
        self.resources.resolve(path).await
    }
}

/// The external template-to-source generator.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Generates source files, writing them through `ctx.host`.
    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<(), GenerationError>;

    /// Lists every lazy route reachable in the whole program.
    ///
    /// Keys follow the same form as incremental discovery: the specifier as
    /// written, with a `#default` tag stripped.
    fn list_all_routes(
        &self,
        program: &ProgramHandle,
        host: &CompilerHost,
        entry_module: Option<&EntryModule>,
    ) -> LazyRouteMap;
}

/// Runs the generator for a cycle, or skips it when generation is disabled.
pub struct CodegenBridge {
    generator: Arc<dyn CodeGenerator>,
    resources: Arc<dyn ResourceLoader>,
    runs: usize,
}

impl CodegenBridge {
    /// Creates a bridge over the given collaborators.
    pub fn new(generator: Arc<dyn CodeGenerator>, resources: Arc<dyn ResourceLoader>) -> Self {
        Self {
            generator,
            resources,
            runs: 0,
        }
    }

    /// The generator, also used for full route listing.
    pub fn generator(&self) -> &Arc<dyn CodeGenerator> {
        &self.generator
    }

    /// How many times the generator has been invoked.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Runs the generator once. Failures are returned, never retried.
    pub async fn run(
        &mut self,
        program: &ProgramHandle,
        host: &CompilerHost,
        options: &CompilationOptions,
    ) -> Result<(), GenerationError> {
        if options.skip_code_generation {
            tracing::debug!("code generation skipped");
            return Ok(());
        }
        self.runs += 1;
        let ctx = GenerationContext {
            program,
            host,
            options,
            resources: self.resources.as_ref(),
        };
        self.generator.generate(ctx).await?;
        tracing::info!(
            run = self.runs,
            gen_dir = %options.gen_dir.display(),
            "code generation finished"
        );
        Ok(())
    }
}
