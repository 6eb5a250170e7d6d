//! CLI integration tests for zkphash-cli.
//!
//! These tests verify the CLI behavior by running the actual binary
//! and checking outputs, exit codes, and file artifacts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the zkphash binary with a clean configuration.
fn zkphash() -> Command {
    let mut cmd = Command::cargo_bin("zkphash").unwrap();
    cmd.env_remove("ZKPHASH_R2")
        .env_remove("ZKPHASH_THRESHOLD")
        .env_remove("ZKPHASH_DB_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

fn zero_grid_json() -> String {
    let row = format!("[{}]", vec!["0"; 8].join(","));
    format!("[{}]", vec![row; 8].join(","))
}

fn write_db(dir: &Path, entries: usize) -> PathBuf {
    let grids = vec![zero_grid_json(); entries].join(",");
    let path = dir.join("db.json");
    fs::write(&path, format!(r#"{{"dbPhashs": [{grids}]}}"#)).unwrap();
    path
}

fn write_image(dir: &Path, value: u64) -> PathBuf {
    let row = format!("[{}]", vec![value.to_string(); 32].join(","));
    let grid = format!("[{}]", vec![row; 32].join(","));
    let path = dir.join("image.json");
    fs::write(&path, format!(r#"{{"image": {grid}}}"#)).unwrap();
    path
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    zkphash()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("zero-knowledge perceptual-hash"))
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("phash"))
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("build-db"));
}

#[test]
fn test_version_displays_version() {
    zkphash()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zkphash"));
}

#[test]
fn test_help_shows_exit_codes() {
    zkphash()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("66"));
}

#[test]
fn test_commit_help_shows_options() {
    zkphash()
        .args(["commit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--r2"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--mock-hash"))
        .stdout(predicate::str::contains("DB_JSON"));
}

// ============================================================================
// Exit Code Tests
// ============================================================================

#[test]
fn test_missing_database_returns_input_error() {
    let temp = TempDir::new().unwrap();
    let image = write_image(temp.path(), 0);

    // Exit code 66 = EX_NOINPUT
    zkphash()
        .args(["commit", "--mock-hash", "--r2", "1", "nonexistent_db.json"])
        .arg(&image)
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_missing_r2_returns_usage_error() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 2);
    let image = write_image(temp.path(), 0);

    // Exit code 64 = EX_USAGE
    zkphash()
        .args(["commit", "--mock-hash"])
        .arg(&db)
        .arg(&image)
        .assert()
        .code(64)
        .stderr(predicate::str::contains("ZKPHASH_R2"));
}

#[test]
fn test_invalid_phash_cell_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db.json");
    let bad = zero_grid_json().replacen('0', "2", 1);
    fs::write(&db, format!(r#"{{"dbPhashs": [{bad}]}}"#)).unwrap();
    let image = write_image(temp.path(), 0);

    // Exit code 65 = EX_DATAERR
    zkphash()
        .args(["commit", "--mock-hash", "--r2", "1"])
        .arg(&db)
        .arg(&image)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("expected 0 or 1"));
}

#[test]
fn test_empty_database_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 0);
    let image = write_image(temp.path(), 0);

    zkphash()
        .args(["commit", "--mock-hash", "--r2", "1"])
        .arg(&db)
        .arg(&image)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("no entries"));
}

#[test]
fn test_wrong_image_shape_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 1);
    let image = temp.path().join("image.json");
    fs::write(&image, r#"{"image": [[1, 2], [3, 4]]}"#).unwrap();

    zkphash()
        .args(["commit", "--mock-hash", "--r2", "1"])
        .arg(&db)
        .arg(&image)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Failed to parse image"));
}

// ============================================================================
// Commit Tests
// ============================================================================

#[test]
fn test_commit_writes_default_bundle() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 4);
    let image = write_image(temp.path(), 0);

    zkphash()
        .args(["commit", "--mock-hash", "--r2", "123456789"])
        .arg(&db)
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMITTED"))
        .stderr(predicate::str::contains("MOCK"));

    let bundle_path = temp.path().join("4_circom_input.json");
    assert!(bundle_path.exists(), "Bundle should be written next to the database");

    let bundle: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
    assert_eq!(bundle["threshold"], 10);
    assert_eq!(bundle["r2"], "123456789");
    assert!(bundle["dbHash"].is_string());
    assert!(bundle["imgCommitment"].is_string());
    assert_eq!(bundle["dbPhashs"].as_array().unwrap().len(), 4);
    assert_eq!(bundle["image"].as_array().unwrap().len(), 32);
}

#[test]
fn test_commit_env_config_and_flag_override() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 2);
    let image = write_image(temp.path(), 3);
    let out = temp.path().join("out/bundle.json");

    zkphash()
        .env("ZKPHASH_R2", "77")
        .env("ZKPHASH_THRESHOLD", "5")
        .args(["commit", "--mock-hash", "--quiet", "--threshold", "7", "-o"])
        .arg(&out)
        .arg(&db)
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let bundle: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(bundle["r2"], "77");
    assert_eq!(bundle["threshold"], 7);
}

#[test]
fn test_commit_json_summary() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 3);
    let image = write_image(temp.path(), 9);

    let output = zkphash()
        .args(["commit", "--mock-hash", "--json", "--r2", "5"])
        .arg(&db)
        .arg(&image)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["entries"], 3);
    assert!(summary["backend"].as_str().unwrap().contains("Mock"));
    assert!(summary["output"]
        .as_str()
        .unwrap()
        .ends_with("3_circom_input.json"));
}

#[test]
fn test_commit_poseidon_backend() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 2);
    let image = write_image(temp.path(), 1);

    zkphash()
        .args(["commit", "--json", "--r2", "123456789"])
        .arg(&db)
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Poseidon"));
}

#[test]
fn test_commit_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let db = write_db(temp.path(), 5);
    let image = write_image(temp.path(), 42);
    let run = |name: &str| {
        let out = temp.path().join(name);
        zkphash()
            .args(["commit", "--mock-hash", "-q", "--r2", "9", "-o"])
            .arg(&out)
            .arg(&db)
            .arg(&image)
            .assert()
            .success();
        fs::read_to_string(out).unwrap()
    };
    assert_eq!(run("a.json"), run("b.json"));
}
