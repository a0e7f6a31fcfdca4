//! `driftwatch workflow` — warn-only emergency workflow preflight.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use driftwatch_audit::workflow::preflight_at;

use super::{ok, warn};

#[derive(Args, Debug)]
pub struct WorkflowArgs {}

impl WorkflowArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        // Warn-only: even unreadable files end in exit 0.
        match preflight_at(repo) {
            Ok(warnings) => {
                for w in &warnings {
                    warn(format!("emergency workflow: {w}"));
                }
            }
            Err(e) => warn(format!("emergency workflow: {e}")),
        }
        ok("preflight completed (warn-only)");
        Ok(ExitCode::SUCCESS)
    }
}
