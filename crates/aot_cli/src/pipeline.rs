//! Shared helpers for CLI commands: project root lookup, orchestrator setup
//! and session reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aot_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use aot_orchestrator::{Orchestrator, Session};
use aot_source::DiskFileSystem;

use crate::{GlobalArgs, ReportFormat};

/// The configuration file looked up by every command.
pub const CONFIG_FILE: &str = "aot.toml";

/// Walks up from `start` looking for the nearest directory containing `aot.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file from global CLI args.
///
/// `--config` may name the file itself or the directory holding it;
/// otherwise the nearest `aot.toml` above the current directory is used.
pub fn resolve_config_file(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE)),
    }
}

/// Loads `aot.toml` and sets up an orchestrator over the real file system.
///
/// Relative paths in the configuration are resolved against the directory
/// holding the configuration file.
pub fn load_orchestrator(global: &GlobalArgs) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let config_file = resolve_config_file(global)?;
    let options = aot_config::load_options(&config_file)?;
    let project_dir = match config_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    let project_dir = if project_dir.is_absolute() {
        project_dir
    } else {
        std::env::current_dir()?.join(project_dir)
    };

    tracing::debug!(config = %config_file.display(), "loaded plugin options");
    let collaborators = aot_reference::collaborators(Arc::new(DiskFileSystem));
    Ok(Orchestrator::new(&options, &project_dir, collaborators)?)
}

/// Prints a session's errors, warnings and (with `--verbose`) its full
/// diagnostics to stderr.
pub fn report_session(session: &Session, global: &GlobalArgs) {
    if global.verbose {
        let renderer = TerminalRenderer::new(global.color);
        for diag in session.diagnostics() {
            eprintln!("{}", renderer.render(&diag));
        }
    }
    for error in session.errors() {
        eprintln!("error: {error}");
    }
    if !global.quiet {
        for warning in session.warnings() {
            eprintln!("warning: {warning}");
        }
    }
}

/// Builds the JSON report for a finished cycle.
pub fn json_report(orchestrator: &Orchestrator, session: &Session) -> serde_json::Value {
    serde_json::json!({
        "errors": session.errors(),
        "warnings": session.warnings(),
        "diagnostics": session.diagnostics(),
        "routes": orchestrator.routes(),
    })
}

/// Prints the report in the requested format and returns the exit code.
pub fn finish(
    orchestrator: &Orchestrator,
    session: &Session,
    format: ReportFormat,
    global: &GlobalArgs,
) -> i32 {
    match format {
        ReportFormat::Text => {
            report_session(session, global);
            if !global.quiet {
                for (key, path) in orchestrator.routes().iter() {
                    match path {
                        Some(path) => println!("{key} -> {}", path.display()),
                        None => println!("{key} -> (unresolved)"),
                    }
                }
                eprintln!(
                    "   Result: {} error(s), {} warning(s), {} route(s)",
                    session.errors().len(),
                    session.warnings().len(),
                    orchestrator.routes().len()
                );
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&json_report(orchestrator, session))
                .unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
    i32::from(session.has_errors())
}
