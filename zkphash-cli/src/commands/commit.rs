//! Commit command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{info, warn};
use zkphash_core::{CircuitHasher, CommitEngine, MockHasher, PhashDatabase};

use crate::config::CommitConfig;
use crate::utils::{default_bundle_path, load_image_argument, print_banner, read_text, write_text};

/// Flags of the commit command.
pub struct CommitOptions {
    pub r2: Option<String>,
    pub threshold: Option<u32>,
    pub output: Option<PathBuf>,
    pub mock_hash: bool,
    pub json: bool,
}

fn select_hasher(mock_hash: bool, quiet: bool) -> Result<Box<dyn CircuitHasher>> {
    if mock_hash {
        warn!("Using MOCK hash (not circuit-compatible!)");
        if !quiet {
            eprintln!("{}", "Using MOCK hash (not circuit-compatible!)".yellow());
        }
        return Ok(Box::new(MockHasher::default()));
    }

    circuit_hasher()
}

#[cfg(feature = "poseidon")]
fn circuit_hasher() -> Result<Box<dyn CircuitHasher>> {
    Ok(Box::new(zkphash_core::PoseidonHasher::new()))
}

#[cfg(not(feature = "poseidon"))]
fn circuit_hasher() -> Result<Box<dyn CircuitHasher>> {
    bail!("Invalid option: built without the poseidon feature, use --mock-hash")
}

/// Execute the commit command.
pub fn execute(db_path: PathBuf, image_path: PathBuf, options: CommitOptions, quiet: bool) -> Result<()> {
    let config = CommitConfig::from_env().with_overrides(options.threshold, options.r2, None);
    let r2 = config.r2()?;

    let db = PhashDatabase::from_json(&read_text(&db_path)?)
        .with_context(|| format!("Failed to parse pHash database: {}", db_path.display()))?;
    if db.is_empty() {
        bail!("Failed to parse pHash database: {} has no entries", db_path.display());
    }
    info!(path = %db_path.display(), entries = db.len(), "Loaded database");

    let image = load_image_argument(&image_path)?;
    info!(path = %image_path.display(), "Loaded image");

    let engine = CommitEngine::new(select_hasher(options.mock_hash, quiet)?);
    let backend = engine.hasher().backend();
    let bundle = engine
        .commit(&db.phashes, image, r2, config.threshold)
        .context("Failed to compute commitments")?;

    let output = options
        .output
        .unwrap_or_else(|| default_bundle_path(&db_path, &bundle.file_name()));
    write_text(&output, &bundle.to_json_pretty()?)?;
    info!(path = %output.display(), "Wrote circuit input");

    if options.json {
        let summary = serde_json::json!({
            "output": output.display().to_string(),
            "backend": backend.to_string(),
            "entries": bundle.db_phashs.len(),
            "threshold": bundle.threshold,
            "dbHash": bundle.db_hash.to_string(),
            "imgCommitment": bundle.img_commitment.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !quiet {
        print_banner("COMMITTED", true);
        println!("   {} {}", "Backend:".dimmed(), backend);
        println!("   {} {}", "Entries:".dimmed(), bundle.db_phashs.len());
        println!("   {} {}", "Threshold:".dimmed(), bundle.threshold);
        println!("   {} {}", "dbHash:".dimmed(), bundle.db_hash);
        println!("   {} {}", "imgCommitment:".dimmed(), bundle.img_commitment);
        println!("   {} {}", "Output:".dimmed(), output.display().to_string().cyan());
    }

    Ok(())
}
