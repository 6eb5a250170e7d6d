//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;
use zkphash_core::{image_from_json, load_image_grid, ImageGrid};

/// Default bundle path: `<N>_circom_input.json` next to the database file.
pub fn default_bundle_path(db_path: &Path, file_name: &str) -> PathBuf {
    db_path
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Default prepared-image path: `<stem>.json` next to the image.
pub fn default_prepared_path(image: &Path) -> PathBuf {
    image.with_extension("json")
}

/// Default database path: `dbphashs_<N>.json` in the working directory.
pub fn default_database_path(size: usize) -> PathBuf {
    PathBuf::from(format!("dbphashs_{size}.json"))
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Write a file, creating missing parent directories.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to write {}: cannot create directory", path.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

/// Load a 32x32 image from either a JSON document or an image file.
pub fn load_image_argument(path: &Path) -> Result<ImageGrid> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let text = read_text(path)?;
        debug!(format = "json", "Parsing image grid");
        image_from_json(&text)
            .with_context(|| format!("Failed to parse image: {}", path.display()))
    } else {
        if !path.exists() {
            anyhow::bail!("Failed to read file: {} does not exist", path.display());
        }
        debug!(format = "image", "Decoding image file");
        load_image_grid(path).with_context(|| format!("Failed to load image: {}", path.display()))
    }
}

/// Print a framed status banner.
pub fn print_banner(title: &str, success: bool) {
    let top = "╔════════════════════════════════════════╗";
    let bottom = "╚════════════════════════════════════════╝";
    let line = format!("║{:^40}║", title);
    println!();
    if success {
        println!("{}", top.green());
        println!("{}", line.green().bold());
        println!("{}", bottom.green());
    } else {
        println!("{}", top.yellow());
        println!("{}", line.yellow().bold());
        println!("{}", bottom.yellow());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_bundle_path() {
        assert_eq!(
            default_bundle_path(Path::new("work/db.json"), "4_circom_input.json"),
            PathBuf::from("work/4_circom_input.json")
        );
        assert_eq!(
            default_bundle_path(Path::new("db.json"), "4_circom_input.json"),
            PathBuf::from("4_circom_input.json")
        );
    }

    #[test]
    fn test_default_prepared_path() {
        assert_eq!(
            default_prepared_path(Path::new("img/cat.png")),
            PathBuf::from("img/cat.json")
        );
        assert_eq!(
            default_database_path(512),
            PathBuf::from("dbphashs_512.json")
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/out.json");
        write_text(&path, "{}").unwrap();
        assert_eq!(read_text(&path).unwrap(), "{}");
    }

    #[test]
    fn test_load_image_argument_json() {
        let dir = TempDir::new().unwrap();
        let grid = ImageGrid::from_fn(|r, c| (r * c) as u64);
        let path = dir.path().join("image.JSON");
        let doc = serde_json::json!({ "image": grid.to_rows() });
        std::fs::write(&path, doc.to_string()).unwrap();
        assert_eq!(load_image_argument(&path).unwrap(), grid);
    }

    #[test]
    fn test_load_image_argument_missing_file() {
        let err = load_image_argument(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }
}
