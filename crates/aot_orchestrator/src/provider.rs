//! Dependency lists for dynamic-import contexts, fed from the route map.

use crate::ready::ReadyWaiter;
use aot_routes::LazyRouteMap;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Context resources whose dynamic requests enumerate the lazy routes.
pub const DEFAULT_CONTEXT_MARKER: &str = "@angular/core/src/linker";

/// An existing dependency of a context request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The dependency request.
    pub request: String,
    /// Whether a missing target is an error.
    pub critical: bool,
}

/// A lazy route supplied to a context request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDependency {
    /// The route key.
    pub request: String,
    /// The module file the key resolves to.
    pub path: PathBuf,
}

/// A host resolver's request to resolve a dynamic-import context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextRequest {
    /// The directory the context is rooted at.
    pub resource: PathBuf,
    /// Whether subdirectories are included.
    pub recursive: bool,
    /// Dependencies the resolver already found.
    pub dependencies: Vec<Dependency>,
    /// Dependencies supplied by the provider.
    pub context_dependencies: Vec<ContextDependency>,
}

/// Rewrites matching context requests to enumerate the current lazy routes.
///
/// The provider waits for the current cycle before reading the routes, so
/// a resolver never observes a half-published map. Clones share the map.
#[derive(Debug, Clone)]
pub struct LazyDependencyProvider {
    ready: ReadyWaiter,
    routes: Arc<RwLock<LazyRouteMap>>,
    target: PathBuf,
}

impl LazyDependencyProvider {
    pub(crate) fn new(
        ready: ReadyWaiter,
        routes: Arc<RwLock<LazyRouteMap>>,
        target: PathBuf,
    ) -> Self {
        Self {
            ready,
            routes,
            target,
        }
    }

    /// The directory matching requests are rewritten to.
    pub fn target(&self) -> &PathBuf {
        &self.target
    }

    /// Returns `true` if the provider rewrites `request`.
    fn matches(&self, request: &ContextRequest) -> bool {
        request
            .resource
            .to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .ends_with(DEFAULT_CONTEXT_MARKER)
    }

    /// Rewrites a matching request after the current cycle completes.
    ///
    /// Non-matching requests are returned unchanged without waiting.
    pub async fn after_resolve(&self, mut request: ContextRequest) -> ContextRequest {
        if !self.matches(&request) {
            return request;
        }
        self.ready.clone().wait().await;

        request.resource = self.target.clone();
        request.recursive = true;
        for dep in &mut request.dependencies {
            dep.critical = false;
        }
        request.context_dependencies = self
            .routes
            .read()
            .resolved()
            .map(|(key, path)| ContextDependency {
                request: key.to_string(),
                path: path.to_path_buf(),
            })
            .collect();
        tracing::debug!(
            target = %self.target.display(),
            routes = request.context_dependencies.len(),
            "context request rewritten"
        );
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ready::{CycleOutcome, ReadySignal};
    use std::time::Duration;

    fn provider(signal: &ReadySignal) -> (Arc<RwLock<LazyRouteMap>>, LazyDependencyProvider) {
        let routes = Arc::new(RwLock::new(LazyRouteMap::new()));
        let provider =
            LazyDependencyProvider::new(signal.waiter(), routes.clone(), PathBuf::from("/app/$$_gendir"));
        (routes, provider)
    }

    fn linker_request() -> ContextRequest {
        ContextRequest {
            resource: PathBuf::from("/app/node_modules/@angular/core/src/linker"),
            recursive: false,
            dependencies: vec![Dependency {
                request: "./x".to_string(),
                critical: true,
            }],
            context_dependencies: Vec::new(),
        }
    }

    #[tokio::test]
    async fn non_matching_request_passes_through() {
        let signal = ReadySignal::new();
        signal.begin();
        let (_routes, provider) = provider(&signal);
        let request = ContextRequest {
            resource: PathBuf::from("/app/src/locales"),
            ..ContextRequest::default()
        };
        assert_eq!(provider.after_resolve(request.clone()).await, request);
    }

    #[tokio::test]
    async fn matching_request_enumerates_resolved_routes() {
        let signal = ReadySignal::new();
        let (routes, provider) = provider(&signal);
        {
            let mut map = routes.write();
            map.insert(
                "lazy/lazy.module#LazyModule.ngfactory",
                Some(PathBuf::from("/app/$$_gendir/lazy/lazy.module.ngfactory.ts")),
            );
            map.insert("broken.ngfactory", None);
        }
        let out = provider.after_resolve(linker_request()).await;
        assert_eq!(out.resource, PathBuf::from("/app/$$_gendir"));
        assert!(out.recursive);
        assert!(!out.dependencies[0].critical);
        assert_eq!(
            out.context_dependencies,
            vec![ContextDependency {
                request: "lazy/lazy.module#LazyModule.ngfactory".to_string(),
                path: PathBuf::from("/app/$$_gendir/lazy/lazy.module.ngfactory.ts"),
            }]
        );
    }

    #[tokio::test]
    async fn matching_request_waits_for_cycle() {
        let signal = ReadySignal::new();
        signal.begin();
        let (_routes, provider) = provider(&signal);
        let handle = tokio::spawn(async move { provider.after_resolve(linker_request()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());
        signal.complete(CycleOutcome::Succeeded);
        assert!(handle.await.unwrap().recursive);
    }

    #[test]
    fn marker_match_ignores_trailing_separators() {
        let signal = ReadySignal::new();
        let (_routes, provider) = provider(&signal);
        assert!(provider.matches(&linker_request()));
        let request = ContextRequest {
            resource: PathBuf::from("C:\\app\\node_modules\\@angular\\core\\src\\linker\\"),
            ..ContextRequest::default()
        };
        assert!(provider.matches(&request));
        let request = ContextRequest {
            resource: PathBuf::from("/app/node_modules/@angular/core/src/linker/extra"),
            ..ContextRequest::default()
        };
        assert!(!provider.matches(&request));
    }
}
