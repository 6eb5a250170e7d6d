//! Phash command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use tracing::info;
use zkphash_core::compute_phash;

use crate::utils::{load_image_argument, write_text};

/// Execute the phash command.
pub fn execute(image_path: PathBuf, output: Option<PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let grid = load_image_argument(&image_path)?;
    let phash = compute_phash(&grid);
    let packed = phash.pack();
    info!(path = %image_path.display(), hex = %phash.to_hex(), "Computed pHash");

    let document = serde_json::json!({
        "hex": phash.to_hex(),
        "packed": packed.value().to_string(),
        "phash": phash.to_rows(),
    });

    if let Some(output) = &output {
        write_text(output, &serde_json::to_string_pretty(&document)?)?;
        info!(path = %output.display(), "Wrote pHash");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else if !quiet {
        println!("{} {}", "pHash:".dimmed(), phash.to_hex().green().bold());
        println!("{} {}", "Packed:".dimmed(), packed);
        println!();
        for line in phash.to_bit_matrix().lines() {
            println!("   {}", line);
        }
        if let Some(output) = &output {
            println!();
            println!("{} {}", "Saved:".dimmed(), output.display().to_string().cyan());
        }
    }

    Ok(())
}
