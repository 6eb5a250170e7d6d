//! WebAssembly bindings for zkphash commitments.
//!
//! This module computes `dbHash` and `imgCommitment` in the browser. The
//! circuit hash is supplied by the caller as a JavaScript function
//! `(inputs: string[]) => string` (for example circomlibjs' Poseidon wrapped
//! to return a decimal string), so the bindings stay free of native crypto.
//!
//! Every exported function returns a JSON string; failures are reported as
//! `{"error": "..."}`.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use zkphash_core::hasher::decode_decimal;
use zkphash_core::{
    compute_phash, image_from_json, pack, CircuitHasher, CommitEngine, CommitError, HashBackend,
    PHash, PhashDatabase,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A circuit hash implemented in JavaScript.
struct JsHasher {
    function: js_sys::Function,
}

impl CircuitHasher for JsHasher {
    fn hash(&self, inputs: &[String]) -> zkphash_core::Result<String> {
        let array: js_sys::Array = inputs.iter().map(|s| JsValue::from_str(s)).collect();
        let output = self
            .function
            .call1(&JsValue::NULL, &array)
            .map_err(|e| CommitError::HashFailure(format!("{:?}", e)))?;

        if let Some(text) = output.as_string() {
            return Ok(text);
        }
        if output.is_bigint() {
            let big: js_sys::BigInt = output.unchecked_into();
            return big
                .to_string(10)
                .map(String::from)
                .map_err(|e| CommitError::HashFailure(format!("{:?}", e)));
        }
        Err(CommitError::MalformedHashOutput(format!("{:?}", output)))
    }

    fn backend(&self) -> HashBackend {
        HashBackend::External {
            name: "javascript".into(),
        }
    }
}

/// Packed form of a single pHash.
#[derive(Debug, Serialize, Deserialize)]
pub struct PackResult {
    /// Packed 64-bit leaf value (decimal string)
    pub packed: String,
    /// Row-wise hex form
    pub hex: String,
}

/// Database commitment.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseResult {
    /// Merkle root (decimal string)
    pub db_hash: String,
    /// Number of database entries
    pub entries: usize,
    /// Padded leaf count
    pub width: usize,
    /// Tree depth
    pub depth: usize,
}

/// Image commitment with its intermediate group hashes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    /// Final commitment (decimal string)
    pub img_commitment: String,
    /// The 4 group hashes (decimal strings)
    pub group_hashes: Vec<String>,
}

fn respond<T: Serialize>(result: Result<T, String>) -> String {
    let rendered = result.and_then(|value| serde_json::to_string(&value).map_err(|e| e.to_string()));
    match rendered {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e }).to_string(),
    }
}

fn parse_phash(phash_json: &str) -> Result<PHash, String> {
    serde_json::from_str(phash_json).map_err(|e| format!("Invalid pHash: {}", e))
}

fn parse_r2(r2: &str) -> Result<BigUint, String> {
    decode_decimal(r2.trim()).map_err(|e| format!("Invalid r2: {}", e))
}

fn pack_internal(phash_json: &str) -> Result<PackResult, String> {
    let phash = parse_phash(phash_json)?;
    Ok(PackResult {
        packed: pack(&phash).to_string(),
        hex: phash.to_hex(),
    })
}

fn commit_database_internal<H: CircuitHasher>(
    db_json: &str,
    hasher: H,
) -> Result<DatabaseResult, String> {
    let db = PhashDatabase::from_json(db_json).map_err(|e| e.to_string())?;
    let tree = CommitEngine::new(hasher)
        .merkle_tree(&db.phashes)
        .map_err(|e| e.to_string())?;
    Ok(DatabaseResult {
        db_hash: tree.root().to_string(),
        entries: db.len(),
        width: tree.width(),
        depth: tree.depth(),
    })
}

fn commit_image_internal<H: CircuitHasher>(
    image_json: &str,
    r2: &str,
    hasher: H,
) -> Result<ImageResult, String> {
    let image = image_from_json(image_json).map_err(|e| e.to_string())?;
    let r2 = parse_r2(r2)?;
    let detail = CommitEngine::new(hasher)
        .commit_image_detailed(&image, &r2)
        .map_err(|e| e.to_string())?;
    Ok(ImageResult {
        img_commitment: detail.commitment.to_string(),
        group_hashes: detail.group_hashes.iter().map(ToString::to_string).collect(),
    })
}

fn commit_internal<H: CircuitHasher>(
    db_json: &str,
    image_json: &str,
    r2: &str,
    threshold: u32,
    hasher: H,
) -> Result<serde_json::Value, String> {
    let db = PhashDatabase::from_json(db_json).map_err(|e| e.to_string())?;
    let image = image_from_json(image_json).map_err(|e| e.to_string())?;
    let r2 = parse_r2(r2)?;
    let bundle = CommitEngine::new(hasher)
        .commit(&db.phashes, image, r2, threshold)
        .map_err(|e| e.to_string())?;
    serde_json::to_value(&bundle).map_err(|e| e.to_string())
}

/// Pack an 8x8 pHash (JSON nested array) into its 64-bit leaf value.
#[wasm_bindgen]
pub fn pack_phash_wasm(phash_json: &str) -> String {
    respond(pack_internal(phash_json))
}

/// Compute the circuit pHash of a 32x32 image (`{"image": ...}` or a bare array).
#[wasm_bindgen]
pub fn compute_phash_wasm(image_json: &str) -> String {
    respond(
        image_from_json(image_json)
            .map_err(|e| e.to_string())
            .map(|image| {
                let phash = compute_phash(&image);
                serde_json::json!({
                    "phash": phash.to_rows(),
                    "hex": phash.to_hex(),
                    "packed": pack(&phash).to_string(),
                })
            }),
    )
}

/// Merkle root over a `{"dbPhashs": [...]}` database.
///
/// # Arguments
/// * `db_json` - The database document
/// * `hash_fn` - JavaScript hash `(string[]) => string`
#[wasm_bindgen]
pub fn commit_database_wasm(db_json: &str, hash_fn: js_sys::Function) -> String {
    respond(commit_database_internal(db_json, JsHasher { function: hash_fn }))
}

/// Hierarchical commitment to a 32x32 image, blinded by `r2`.
///
/// # Arguments
/// * `image_json` - `{"image": [[...]]}` or a bare 32x32 array
/// * `r2` - Blinding scalar as a decimal string
/// * `hash_fn` - JavaScript hash `(string[]) => string`
#[wasm_bindgen]
pub fn commit_image_wasm(image_json: &str, r2: &str, hash_fn: js_sys::Function) -> String {
    respond(commit_image_internal(image_json, r2, JsHasher { function: hash_fn }))
}

/// Full circuit input bundle.
#[wasm_bindgen]
pub fn commit_wasm(
    db_json: &str,
    image_json: &str,
    r2: &str,
    threshold: u32,
    hash_fn: js_sys::Function,
) -> String {
    respond(commit_internal(
        db_json,
        image_json,
        r2,
        threshold,
        JsHasher { function: hash_fn },
    ))
}

/// Get the library version.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
