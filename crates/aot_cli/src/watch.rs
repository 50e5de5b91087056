//! `aot watch`: poll-based rebuild loop.
//!
//! Each poll fingerprints the program's on-disk files. A non-empty change
//! set is pushed onto the orchestrator's invalidation queue, followed by
//! `on_invalid` and a new cycle on a fresh session.

use std::path::PathBuf;
use std::time::Duration;

use aot_orchestrator::{Orchestrator, Session};
use aot_source::{DiskFileSystem, Fingerprints};

use crate::pipeline::{load_orchestrator, report_session};
use crate::{GlobalArgs, WatchArgs};

/// Files worth polling: everything in the current program except
/// in-memory generated output, plus the roots.
fn watched_paths(orchestrator: &Orchestrator) -> Vec<PathBuf> {
    let options = orchestrator.options();
    let mut paths: Vec<PathBuf> = orchestrator
        .program()
        .map(|p| p.source_files().iter().map(|f| f.path.clone()).collect())
        .unwrap_or_default();
    paths.extend(options.root_files.iter().cloned());
    paths.retain(|p| !p.starts_with(&options.gen_dir));
    paths.sort();
    paths.dedup();
    paths
}

async fn cycle(orchestrator: &mut Orchestrator, global: &GlobalArgs) -> bool {
    let session = Session::new();
    orchestrator.make(&session).await;
    orchestrator.after_emit(&session);
    report_session(&session, global);
    if !global.quiet {
        eprintln!(
            "   Rebuilt: {} error(s), {} route(s)",
            session.errors().len(),
            orchestrator.routes().len()
        );
    }
    !session.has_errors()
}

/// Runs the watch loop until `--cycles` rebuilds have happened (forever
/// without it). The exit code reflects the last cycle.
pub async fn run(args: &WatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut orchestrator = load_orchestrator(global)?;
    let queue = orchestrator.invalidation_queue();
    let fs = DiskFileSystem;

    let mut ok = cycle(&mut orchestrator, global).await;
    let mut snapshot = Fingerprints::capture(&fs, &watched_paths(&orchestrator));
    let mut rebuilds = 0usize;
    let interval = Duration::from_millis(args.interval.max(1));

    while args.cycles.map_or(true, |max| rebuilds < max) {
        tokio::time::sleep(interval).await;
        let current = Fingerprints::capture(&fs, &watched_paths(&orchestrator));
        let changes = snapshot.diff(&current);
        if changes.is_empty() {
            continue;
        }

        let dirty = changes.dirty_paths();
        tracing::info!(changed = dirty.len(), "files changed, rebuilding");
        queue.extend(&dirty);
        orchestrator.on_invalid();
        ok = cycle(&mut orchestrator, global).await;
        rebuilds += 1;
        snapshot = Fingerprints::capture(&fs, &watched_paths(&orchestrator));
    }

    Ok(if ok { 0 } else { 1 })
}
