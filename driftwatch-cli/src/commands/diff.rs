//! `driftwatch diff` — unified diffs for what `verify --fix` would write.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use driftwatch_audit::preview_fixes;

use super::{load_manifest, now};

#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        let manifest = load_manifest(repo)?;
        let diffs = preview_fixes(repo, &manifest, now())
            .with_context(|| format!("diff failed in '{}'", repo.display()))?;

        if diffs.is_empty() {
            println!("No differences; nothing to fix.");
            return Ok(ExitCode::SUCCESS);
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}
