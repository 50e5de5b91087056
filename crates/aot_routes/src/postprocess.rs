//! Rewriting discovered routes to their generated-factory counterparts.

use crate::map::LazyRouteMap;
use aot_source::{normalize_path, relative_to};
use std::path::{Path, PathBuf};

/// Tag appended to route keys and module file stems when code generation runs.
pub const FACTORY_SUFFIX: &str = ".ngfactory";

/// Maps discovered source paths to generated factory paths.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    base_path: PathBuf,
    gen_dir: PathBuf,
    skip_code_generation: bool,
}

impl PostProcessor {
    /// Creates a post-processor for one compilation.
    pub fn new(
        base_path: impl Into<PathBuf>,
        gen_dir: impl Into<PathBuf>,
        skip_code_generation: bool,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            gen_dir: gen_dir.into(),
            skip_code_generation,
        }
    }

    /// Rewrites every route.
    ///
    /// With code generation skipped the map is returned verbatim. Otherwise
    /// each key gains [`FACTORY_SUFFIX`] and each resolved path is relocated
    /// under the generated-output directory with `.ts` replaced by
    /// `.ngfactory.ts`. Unresolved routes stay unresolved.
    pub fn apply(&self, routes: LazyRouteMap) -> LazyRouteMap {
        if self.skip_code_generation {
            return routes;
        }
        routes
            .into_iter()
            .map(|(key, path)| {
                let path = path.map(|p| self.factory_path(&p));
                (format!("{key}{FACTORY_SUFFIX}"), path)
            })
            .collect()
    }

    /// The generated-factory path for a module source path.
    pub fn factory_path(&self, source: &Path) -> PathBuf {
        let relative = relative_to(source, &self.base_path);
        let text = relative.to_string_lossy();
        let stem = text
            .strip_suffix(".d.ts")
            .or_else(|| text.strip_suffix(".ts"))
            .unwrap_or(&text);
        normalize_path(&self.gen_dir.join(format!("{stem}{FACTORY_SUFFIX}.ts")))
    }
}
