//! Image decoding and database construction.
//!
//! Images are reduced the way the circuit's preprocessing expects:
//! 8-bit luma with ITU-R 601-2 weights, then a Lanczos3 resize to 32x32.
//! Exact pixel values can differ slightly from other resamplers, which
//! changes individual pHash bits but not the commitments' structure.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use tracing::{debug, info, warn};

use crate::bundle::PhashDatabase;
use crate::error::{CommitError, Result};
use crate::grid::{ImageGrid, IMAGE_SIZE};
use crate::phash::compute_phash;

/// File extensions picked up when scanning a directory (case-insensitive).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// ITU-R 601-2 luma, in 16-bit fixed point with rounding.
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let y = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (y >> 16) as u8
}

/// Convert a decoded image into a 32x32 grayscale grid.
pub fn to_grid(image: &DynamicImage) -> ImageGrid {
    let rgb = image.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma_601(r, g, b)])
    });
    let side = IMAGE_SIZE as u32;
    let small = imageops::resize(&gray, side, side, FilterType::Lanczos3);
    ImageGrid::from_fn(|row, col| u64::from(small.get_pixel(col as u32, row as u32).0[0]))
}

/// Decode image bytes (any supported format) into a grid.
pub fn image_grid_from_bytes(bytes: &[u8]) -> Result<ImageGrid> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| CommitError::ImageError(format!("Failed to decode image: {}", e)))?;
    debug!(width = image.width(), height = image.height(), "Decoded image");
    Ok(to_grid(&image))
}

/// Read and decode an image file into a grid.
pub fn load_image_grid(path: &Path) -> Result<ImageGrid> {
    let bytes = std::fs::read(path)?;
    image_grid_from_bytes(&bytes)
        .map_err(|e| CommitError::ImageError(format!("{}: {}", path.display(), e)))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// All supported images under `dir`, recursively, sorted by path.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_supported_image(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Outcome of [`build_database`].
#[derive(Debug, Clone)]
pub struct DatabaseBuild {
    /// Computed hashes followed by zero padding.
    pub database: PhashDatabase,
    /// Images that produced a hash, in database order.
    pub processed: Vec<PathBuf>,
    /// Images that could not be decoded, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Hash every image under `dir` and pad the result to `size` entries.
///
/// At most `size` images are considered; extra files are dropped with a
/// warning. Undecodable files are skipped and reported, not fatal.
///
/// # Errors
///
/// - [`CommitError::InvalidInput`] if `size` is zero or no image is found.
/// - [`CommitError::Io`] if the directory cannot be read.
pub fn build_database(dir: &Path, size: usize) -> Result<DatabaseBuild> {
    if size == 0 {
        return Err(CommitError::InvalidInput(
            "database size must be at least 1".into(),
        ));
    }

    let mut images = scan_images(dir)?;
    if images.is_empty() {
        return Err(CommitError::InvalidInput(format!(
            "no images found under {}",
            dir.display()
        )));
    }
    if images.len() > size {
        warn!(
            found = images.len(),
            size, "More images than database slots, keeping the first ones"
        );
        images.truncate(size);
    }
    info!(images = images.len(), size, "Building pHash database");

    let mut phashes = Vec::with_capacity(size);
    let mut processed = Vec::with_capacity(images.len());
    let mut skipped = Vec::new();
    for path in images {
        match load_image_grid(&path) {
            Ok(grid) => {
                let phash = compute_phash(&grid);
                debug!(path = %path.display(), phash = %phash.to_hex(), "Hashed image");
                phashes.push(phash);
                processed.push(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping image");
                skipped.push((path, e.to_string()));
            }
        }
    }

    let mut database = PhashDatabase::new(phashes);
    database.pad_to(size);

    Ok(DatabaseBuild {
        database,
        processed,
        skipped,
    })
}
