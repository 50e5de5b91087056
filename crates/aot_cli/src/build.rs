//! `aot build`, `aot check` and `aot routes`: single-cycle commands.

use aot_orchestrator::{CycleOutcome, Session};

use crate::pipeline::{finish, load_orchestrator};
use crate::{BuildArgs, GlobalArgs};

/// Runs one cycle. With `diagnose_roots` every root file is diagnosed too.
///
/// Returns exit code 1 when the session collected errors.
pub async fn run(
    args: &BuildArgs,
    global: &GlobalArgs,
    diagnose_roots: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut orchestrator = load_orchestrator(global)?;
    if !global.quiet {
        eprintln!(
            "   Building {}",
            orchestrator.options().ts_config_path.display()
        );
    }

    let session = Session::new();
    let outcome = orchestrator.make(&session).await;
    if diagnose_roots && outcome == CycleOutcome::Succeeded {
        for root in orchestrator.options().root_files.clone() {
            orchestrator.diagnose(&root, &session);
        }
    }
    orchestrator.after_emit(&session);

    Ok(finish(&orchestrator, &session, args.format, global))
}

/// Runs one cycle and prints only the route map as JSON.
pub async fn routes(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut orchestrator = load_orchestrator(global)?;
    let session = Session::new();
    orchestrator.make(&session).await;
    orchestrator.after_emit(&session);

    for error in session.errors() {
        eprintln!("error: {error}");
    }
    println!("{}", serde_json::to_string_pretty(orchestrator.routes())?);
    Ok(i32::from(session.has_errors()))
}
