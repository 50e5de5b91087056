//! Route map bookkeeping across rebuilds: key normalization, conflicts,
//! null targets, idempotence and publication to the host resolver.

use std::path::PathBuf;
use std::sync::Arc;

use aot_conformance::{build, rebuild, route_pairs, src, Fixture};
use aot_host::InMemoryRegistry;
use aot_orchestrator::{ContextDependency, ContextRequest, Dependency};
use aot_routes::CONFLICT_MESSAGE;
use pretty_assertions::assert_eq;

/// `main.ts` routes `lazy` lazily; `lazy` resolves to `lazy/index.ts`.
fn indexed_lazy() -> Fixture {
    let fixture = Fixture::new(&["main.ts"]).skip_codegen(true);
    fixture
        .file("main.ts", "const routes = [{ loadChildren: 'lazy#LazyModule' }];\n")
        .file("lazy/index.ts", "export class LazyModule {}\n");
    fixture
}

#[tokio::test]
async fn default_export_is_stripped_from_keys() {
    let fixture = Fixture::new(&["main.ts"]);
    fixture
        .file(
            "main.ts",
            "const routes = [\n\
               { loadChildren: './a/a.module' },\n\
               { loadChildren: './b/b.module#default' },\n\
               { loadChildren: () => import('./c/c.module').then(m => m.CModule) },\n\
             ];\n",
        )
        .file("a/a.module.ts", "")
        .file("b/b.module.ts", "")
        .file("c/c.module.ts", "");
    let mut orchestrator = fixture.orchestrator();

    build(&mut orchestrator).await;

    let keys: Vec<String> = route_pairs(orchestrator.routes())
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        vec![
            "./a/a.module.ngfactory",
            "./b/b.module.ngfactory",
            "./c/c.module#CModule.ngfactory",
        ]
    );
}

#[tokio::test]
async fn changed_target_is_a_single_warning() {
    let fixture = indexed_lazy();
    let mut orchestrator = fixture.orchestrator();
    build(&mut orchestrator).await;
    assert_eq!(
        route_pairs(orchestrator.routes()),
        vec![(
            "lazy#LazyModule".to_string(),
            Some("/project/src/lazy/index.ts".to_string())
        )]
    );

    fixture.file("lazy.ts", "export class LazyModule {}\n");
    let (session, _) = rebuild(&mut orchestrator, &[src("main.ts"), src("lazy.ts")]).await;

    assert_eq!(session.warnings(), vec![CONFLICT_MESSAGE.to_string()]);
    assert!(session.errors().is_empty());
    assert_eq!(
        route_pairs(orchestrator.routes()),
        vec![(
            "lazy#LazyModule".to_string(),
            Some("/project/src/lazy.ts".to_string())
        )]
    );
}

#[tokio::test]
async fn unresolved_target_overwrites_silently() {
    let fixture = indexed_lazy();
    let mut orchestrator = fixture.orchestrator();
    build(&mut orchestrator).await;

    fixture.remove("lazy/index.ts");
    let (session, _) =
        rebuild(&mut orchestrator, &[src("main.ts"), src("lazy/index.ts")]).await;

    assert!(session.warnings().is_empty());
    assert_eq!(
        route_pairs(orchestrator.routes()),
        vec![("lazy#LazyModule".to_string(), None)]
    );
}

#[tokio::test]
async fn repeated_rebuilds_are_idempotent() {
    let fixture = indexed_lazy();
    let mut orchestrator = fixture.orchestrator();
    build(&mut orchestrator).await;
    let first = orchestrator.routes().clone();

    for _ in 0..2 {
        let (session, _) = rebuild(&mut orchestrator, &[src("main.ts")]).await;
        assert!(session.warnings().is_empty());
        assert_eq!(orchestrator.routes(), &first);
    }
    let (session, _) = rebuild(&mut orchestrator, &[]).await;
    assert!(session.warnings().is_empty());
    assert_eq!(orchestrator.routes(), &first);
}

#[tokio::test]
async fn generated_modules_reach_the_registry() {
    let fixture = Fixture::new(&["app.module.ts"]);
    fixture.file("app.module.ts", "@NgModule({})\nexport class AppModule {}\n");
    let mut orchestrator = fixture.orchestrator();
    let registry = Arc::new(InMemoryRegistry::new());
    orchestrator.after_resolvers(registry.clone());

    build(&mut orchestrator).await;

    assert_eq!(
        registry.paths(),
        vec![src("$$_gendir/app.module.ngfactory.ts")]
    );
}

#[tokio::test]
async fn context_requests_enumerate_resolved_routes() {
    let fixture = Fixture::new(&["main.ts"]);
    fixture
        .file(
            "main.ts",
            "const routes = [\n\
               { loadChildren: './lazy/lazy.module#LazyModule' },\n\
               { loadChildren: './gone#Gone' },\n\
             ];\n",
        )
        .file("lazy/lazy.module.ts", "export class LazyModule {}\n");
    let mut orchestrator = fixture.orchestrator();
    let provider = orchestrator.lazy_dependency_provider();
    build(&mut orchestrator).await;

    let request = ContextRequest {
        resource: PathBuf::from("/project/node_modules/@angular/core/src/linker"),
        dependencies: vec![Dependency {
            request: "./ngfactory".to_string(),
            critical: true,
        }],
        ..Default::default()
    };
    let rewritten = provider.after_resolve(request).await;

    assert_eq!(rewritten.resource, src("$$_gendir"));
    assert!(rewritten.recursive);
    assert!(rewritten.dependencies.iter().all(|d| !d.critical));
    assert_eq!(
        rewritten.context_dependencies,
        vec![ContextDependency {
            request: "./lazy/lazy.module#LazyModule.ngfactory".to_string(),
            path: src("$$_gendir/lazy/lazy.module.ngfactory.ts"),
        }]
    );

    let other = ContextRequest {
        resource: PathBuf::from("/project/src/app"),
        ..Default::default()
    };
    assert_eq!(provider.after_resolve(other.clone()).await, other);
}
