//! `driftwatch init [--force]`

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use driftwatch_core::manifest::{self, InitOutcome};

/// Write the starter manifest.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing driftwatch.yaml.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        let (manifest, outcome) = manifest::init_at(repo, self.force)
            .with_context(|| format!("failed to init manifest in '{}'", repo.display()))?;
        let path = manifest::manifest_path_at(repo);

        match outcome {
            InitOutcome::Created => println!("✓ Wrote {}", path.display()),
            InitOutcome::Overwritten => println!("✓ Overwrote {}", path.display()),
            InitOutcome::Existing => {
                println!("✓ {} already exists (use --force to overwrite)", path.display())
            }
        }
        println!(
            "  {} local paths, {} expected titles, {} hubs",
            manifest.local_paths.len(),
            manifest.expected_titles.len(),
            manifest.hubs.len(),
        );
        println!(
            "  Set {} and {} (or a .env file) to enable remote checks.",
            manifest.remote.api_key_env, manifest.remote.root_page_env,
        );
        Ok(ExitCode::SUCCESS)
    }
}
