//! Prepare command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;
use zkphash_core::phash::{DCT_SCALE_BITS, DCT_SIZE};
use zkphash_core::{load_image_grid, PreparedImage, IMAGE_SIZE};

use crate::utils::{default_prepared_path, write_text};

/// Execute the prepare command.
pub fn execute(image_path: PathBuf, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    if !image_path.exists() {
        anyhow::bail!("Failed to read file: {} does not exist", image_path.display());
    }
    let grid = load_image_grid(&image_path)
        .with_context(|| format!("Failed to load image: {}", image_path.display()))?;
    info!(path = %image_path.display(), "Prepared image");

    let prepared = PreparedImage::new(grid);
    let output = output.unwrap_or_else(|| default_prepared_path(&image_path));
    write_text(&output, &prepared.to_json_pretty()?)?;
    info!(path = %output.display(), "Wrote circuit input");

    if !quiet {
        println!("{} {}x{}", "Image size:".dimmed(), IMAGE_SIZE, IMAGE_SIZE);
        println!("{} {}x{}", "DCT matrix:".dimmed(), DCT_SIZE, DCT_SIZE);
        println!("{} 2^{}", "Scale:".dimmed(), DCT_SCALE_BITS);
        println!("{} {}", "Saved:".dimmed(), output.display().to_string().cyan());
    }

    Ok(())
}
