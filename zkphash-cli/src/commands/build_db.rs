//! Build-db command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::info;
use zkphash_core::build_database;

use crate::config::CommitConfig;
use crate::utils::{default_database_path, print_banner, write_text};

/// Execute the build-db command.
pub fn execute(
    dir: PathBuf,
    size: Option<usize>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    if !dir.is_dir() {
        bail!("Failed to read directory: {} is not a directory", dir.display());
    }
    let config = CommitConfig::from_env().with_overrides(None, None, size);
    if config.db_size == 0 {
        bail!("Invalid option: --size must be at least 1");
    }

    let build = build_database(&dir, config.db_size)
        .with_context(|| format!("Failed to build database from {}", dir.display()))?;

    let output = output.unwrap_or_else(|| default_database_path(config.db_size));
    write_text(&output, &build.database.to_json_pretty()?)?;
    info!(
        path = %output.display(),
        processed = build.processed.len(),
        skipped = build.skipped.len(),
        entries = build.database.len(),
        "Wrote pHash database"
    );

    if !quiet {
        print_banner("DATABASE BUILT", build.skipped.is_empty());
        println!("   {} {}", "Images hashed:".dimmed(), build.processed.len());
        println!("   {} {}", "Total entries:".dimmed(), build.database.len());
        for (path, reason) in &build.skipped {
            println!(
                "   {} {} ({})",
                "Skipped:".yellow(),
                path.display(),
                reason.dimmed()
            );
        }
        println!("   {} {}", "Output:".dimmed(), output.display().to_string().cyan());
    }

    Ok(())
}
