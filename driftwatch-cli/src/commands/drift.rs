//! `driftwatch drift [--json]` — reconciliation only.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use driftwatch_audit::run_drift;
use driftwatch_core::config::process_env;

use super::{load_dotenv, load_manifest, print_drift, print_json, EXIT_AUDIT_FAILED};

#[derive(Args, Debug)]
pub struct DriftArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DriftArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        let manifest = load_manifest(repo)?;
        load_dotenv(repo)?;

        let report = run_drift(repo, &manifest, process_env);
        if self.json {
            print_json(&report)?;
        } else {
            print_drift(&report);
        }

        Ok(if report.passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_AUDIT_FAILED)
        })
    }
}
