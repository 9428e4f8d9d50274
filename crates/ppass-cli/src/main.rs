//! # ppass CLI entry point
//!
//! Parses command-line arguments, resolves configuration, installs logging,
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ppass_cli::checklist::{run_checklist, ChecklistArgs};
use ppass_cli::config::{CliConfig, LogFormat};
use ppass_cli::eval::{run_eval, EvalArgs};
use ppass_cli::explain::{run_explain, ExplainArgs};

/// PermitPass CLI — supplemental document checklists.
///
/// Composes per-project checklists from a store snapshot and evaluates
/// catalog rules against project attributes.
#[derive(Parser, Debug)]
#[command(name = "ppass", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Store snapshot to read (overrides PPASS_SNAPSHOT_PATH).
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Emit logs as JSON (overrides PPASS_LOG_FORMAT).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose the supplemental document checklist for a project.
    Checklist(ChecklistArgs),

    /// Evaluate a rule against attributes.
    Eval(EvalArgs),

    /// Show how a rule source normalizes.
    Explain(ExplainArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config.with_overrides(cli.snapshot.clone(), cli.log_json),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    // Initialize tracing based on verbosity level. Logs go to stderr so
    // stdout stays machine-readable.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    tracing::debug!(snapshot = %config.snapshot_path.display(), "ppass CLI starting");

    let result = match cli.command {
        Commands::Checklist(args) => run_checklist(&args, &config),
        Commands::Eval(args) => run_eval(&args, &config),
        Commands::Explain(args) => run_explain(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
