//! `aot`: drives the ahead-of-time compilation orchestrator from the command line.
//!
//! `aot build` runs one cycle and reports diagnostics and routes, `aot routes`
//! prints the lazy route map, `aot check` additionally diagnoses every root
//! file, and `aot watch` polls the program's files and rebuilds on change.

#![warn(missing_docs)]

mod build;
mod pipeline;
mod watch;

use std::process;
use std::sync::Once;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Ahead-of-time compilation orchestrator.
#[derive(Parser, Debug)]
#[command(name = "aot", version, about = "Ahead-of-time compilation orchestrator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to an `aot.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one build cycle and report diagnostics and routes.
    Build(BuildArgs),
    /// Run one build cycle and print the lazy route map as JSON.
    Routes,
    /// Run one build cycle and diagnose every root file.
    Check(BuildArgs),
    /// Rebuild whenever a program file changes.
    Watch(WatchArgs),
}

/// Arguments for `aot build` and `aot check`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `aot watch`.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Polling interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub interval: u64,

    /// Stop after this many rebuilds.
    #[arg(long)]
    pub cycles: Option<usize>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

static TRACING: Once = Once::new();

/// Installs the `fmt` subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(global: &GlobalArgs) {
    TRACING.call_once(|| {
        let default = match (global.quiet, global.verbose) {
            (true, _) => "error",
            (false, true) => "debug",
            (false, false) => "warn",
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(global.color)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global, false).await,
        Command::Routes => build::routes(&global).await,
        Command::Check(ref args) => build::run(args, &global, true).await,
        Command::Watch(ref args) => watch::run(args, &global).await,
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["aot", "build"]);
        match cli.command {
            Command::Build(ref args) => assert_eq!(args.format, ReportFormat::Text),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_json() {
        let cli = Cli::parse_from(["aot", "build", "--format", "json"]);
        match cli.command {
            Command::Build(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_routes() {
        let cli = Cli::parse_from(["aot", "routes"]);
        assert!(matches!(cli.command, Command::Routes));
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["aot", "check", "-f", "json"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_watch_default() {
        let cli = Cli::parse_from(["aot", "watch"]);
        match cli.command {
            Command::Watch(ref args) => {
                assert_eq!(args.interval, 500);
                assert!(args.cycles.is_none());
            }
            _ => panic!("expected Watch command"),
        }
    }

    #[test]
    fn parse_watch_with_args() {
        let cli = Cli::parse_from(["aot", "watch", "--interval", "50", "--cycles", "3"]);
        match cli.command {
            Command::Watch(ref args) => {
                assert_eq!(args.interval, 50);
                assert_eq!(args.cycles, Some(3));
            }
            _ => panic!("expected Watch command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["aot", "--quiet", "--color", "never", "build"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::parse_from(["aot", "routes", "--verbose", "--color", "always"]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["aot", "--config", "/path/to/aot.toml", "build"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/aot.toml"));
    }
}
