//! driftwatch: documentation drift and hub-link auditor.
//!
//! # Usage
//!
//! ```text
//! driftwatch init [--force]
//! driftwatch verify [--fix [--dry-run]] [--json]
//! driftwatch drift [--json]
//! driftwatch diff
//! driftwatch release [PATH]
//! driftwatch workflow
//! ```
//!
//! Every command takes `--repo PATH` (default: current directory).

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, drift::DriftArgs, init::InitArgs, release::ReleaseArgs, verify::VerifyArgs,
    workflow::WorkflowArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "driftwatch",
    version,
    about = "Audit drift between a docs tree and a remote workspace page tree",
    long_about = None,
)]
struct Cli {
    /// Repository root to audit.
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter driftwatch.yaml.
    Init(InitArgs),

    /// Data-room checklist, README pointer and drift reconciliation.
    Verify(VerifyArgs),

    /// Drift reconciliation only.
    Drift(DriftArgs),

    /// Show unified diffs of what `verify --fix` would write.
    Diff(DiffArgs),

    /// Check release-notes format and ordering.
    Release(ReleaseArgs),

    /// Warn-only preflight of the emergency auto-approve workflow.
    Workflow(WorkflowArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let repo = cli.repo;
    match cli.command {
        Commands::Init(args) => args.run(&repo),
        Commands::Verify(args) => args.run(&repo),
        Commands::Drift(args) => args.run(&repo),
        Commands::Diff(args) => args.run(&repo),
        Commands::Release(args) => args.run(&repo),
        Commands::Workflow(args) => args.run(&repo),
    }
}
