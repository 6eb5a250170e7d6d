//! Hierarchical image commitment.
//!
//! Three strictly ordered hashing stages, mirroring the circuit:
//!
//! 1. one hash per 4x4 block over its 16 pixels (64 block hashes);
//! 2. one hash per group of 16 consecutive block hashes (4 group hashes);
//! 3. one final hash over `[group0, group1, group2, group3, r2]`.
//!
//! The blinding scalar `r2` is supplied by the caller.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bundle::decimal;
use crate::error::{CommitError, Result};
use crate::grid::{ImageGrid, BLOCK_COUNT};
use crate::hasher::CircuitHasher;

/// Number of block-hash groups.
pub const GROUP_COUNT: usize = 4;

/// Block hashes per group.
pub const BLOCKS_PER_GROUP: usize = BLOCK_COUNT / GROUP_COUNT;

/// Every intermediate value of an image commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCommitment {
    #[serde(with = "decimal::vec")]
    pub block_hashes: Vec<BigUint>,
    #[serde(with = "decimal::vec")]
    pub group_hashes: Vec<BigUint>,
    #[serde(with = "decimal")]
    pub commitment: BigUint,
}

/// Hash each of the 64 blocks, in block order.
pub fn hash_blocks<H: CircuitHasher + ?Sized>(image: &ImageGrid, hasher: &H) -> Result<Vec<BigUint>> {
    (0..BLOCK_COUNT)
        .map(|block| {
            let pixels = image.block_pixels(block).map(BigUint::from);
            hasher.hash_integers(&pixels)
        })
        .collect()
}

/// Hash the block hashes in 4 contiguous groups of 16.
pub fn hash_groups<H: CircuitHasher + ?Sized>(
    block_hashes: &[BigUint],
    hasher: &H,
) -> Result<Vec<BigUint>> {
    if block_hashes.len() != BLOCK_COUNT {
        return Err(CommitError::InvalidInput(format!(
            "expected {BLOCK_COUNT} block hashes, got {}",
            block_hashes.len()
        )));
    }
    block_hashes
        .chunks_exact(BLOCKS_PER_GROUP)
        .map(|group| hasher.hash_integers(group))
        .collect()
}

/// Fold the group hashes and the blinding scalar into the commitment.
pub fn fold_commitment<H: CircuitHasher + ?Sized>(
    group_hashes: &[BigUint],
    r2: &BigUint,
    hasher: &H,
) -> Result<BigUint> {
    if group_hashes.len() != GROUP_COUNT {
        return Err(CommitError::InvalidInput(format!(
            "expected {GROUP_COUNT} group hashes, got {}",
            group_hashes.len()
        )));
    }
    let mut inputs = Vec::with_capacity(GROUP_COUNT + 1);
    inputs.extend_from_slice(group_hashes);
    inputs.push(r2.clone());
    hasher.hash_integers(&inputs)
}

/// Commit to an image, keeping every intermediate hash.
pub fn commit_image_detailed<H: CircuitHasher + ?Sized>(
    image: &ImageGrid,
    r2: &BigUint,
    hasher: &H,
) -> Result<ImageCommitment> {
    debug!(backend = %hasher.backend(), "Committing image");
    let block_hashes = hash_blocks(image, hasher)?;
    let group_hashes = hash_groups(&block_hashes, hasher)?;
    let commitment = fold_commitment(&group_hashes, r2, hasher)?;
    debug!(%commitment, "Image commitment computed");

    Ok(ImageCommitment {
        block_hashes,
        group_hashes,
        commitment,
    })
}

/// Commit to an image.
pub fn commit_image<H: CircuitHasher + ?Sized>(
    image: &ImageGrid,
    r2: &BigUint,
    hasher: &H,
) -> Result<BigUint> {
    Ok(commit_image_detailed(image, r2, hasher)?.commitment)
}
