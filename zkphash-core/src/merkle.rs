//! # Merkle commitment over packed pHashes
//!
//! A fixed-width binary hash tree whose layout matches the circuit's
//! Merkle template node for node.
//!
//! ## Layout
//!
//! - Width is the smallest power of two ≥ the number of leaves; unused leaf
//!   slots hold the integer 0.
//! - Level 0 holds the leaves; level `L + 1` has half the width of level `L`.
//! - Node `i` of level `L + 1` is `hash([level[L][2i], level[L][2i + 1]])`,
//!   left child first, both as decimal strings.
//! - The root is the single node of level `depth = log2(width)`.
//!
//! Zero padding is indistinguishable from real leaves equal to zero. The
//! circuit pads the same way, so this is a property of the commitment.

use num_bigint::BigUint;
use tracing::{debug, trace};

use crate::error::{CommitError, Result};
use crate::hasher::CircuitHasher;
use crate::phash::PackedHash;

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Smallest power of two ≥ `n`, or `None` for an empty tree.
pub fn tree_width(n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    n.checked_next_power_of_two()
}

/// `log2` of a power-of-two width.
pub fn tree_depth(width: usize) -> usize {
    debug_assert!(width.is_power_of_two());
    width.trailing_zeros() as usize
}

// ---------------------------------------------------------------------------
// Tree arena
// ---------------------------------------------------------------------------

/// A fully materialised Merkle tree, one flat vector per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<BigUint>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build the tree over arbitrary leaf values.
    ///
    /// # Errors
    ///
    /// - [`CommitError::EmptyDatabase`] if `leaves` is empty.
    /// - Any error from the hasher; the build stops at the first failure and
    ///   no partial tree is returned.
    pub fn build<H: CircuitHasher + ?Sized>(leaves: &[BigUint], hasher: &H) -> Result<Self> {
        let width = tree_width(leaves.len()).ok_or(CommitError::EmptyDatabase)?;
        let depth = tree_depth(width);

        let mut level0 = Vec::with_capacity(width);
        level0.extend_from_slice(leaves);
        level0.resize(width, BigUint::default());

        debug!(
            leaves = leaves.len(),
            width,
            depth,
            padding = width - leaves.len(),
            backend = %hasher.backend(),
            "Building Merkle tree"
        );

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(level0);

        for level in 0..depth {
            let current = &levels[level];
            let next = current
                .chunks_exact(2)
                .map(|pair| hasher.hash_integers(pair))
                .collect::<Result<Vec<_>>>()?;
            trace!(level = level + 1, nodes = next.len(), "Hashed tree level");
            levels.push(next);
        }

        Ok(Self {
            levels,
            leaf_count: leaves.len(),
        })
    }

    /// Build the tree over packed pHashes.
    pub fn from_packed<H: CircuitHasher + ?Sized>(
        leaves: &[PackedHash],
        hasher: &H,
    ) -> Result<Self> {
        let leaves: Vec<BigUint> = leaves.iter().map(|p| p.to_biguint()).collect();
        Self::build(&leaves, hasher)
    }

    /// The root: the single node at the top level.
    pub fn root(&self) -> &BigUint {
        &self.levels[self.depth()][0]
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of leaf slots, always a power of two.
    pub fn width(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of real (non-padding) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of zero-filled leaf slots.
    pub fn padding(&self) -> usize {
        self.width() - self.leaf_count
    }

    /// All nodes of one level, level 0 being the padded leaves.
    pub fn level(&self, level: usize) -> Option<&[BigUint]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// A single node by `(level, position)`.
    pub fn node(&self, level: usize, position: usize) -> Option<&BigUint> {
        self.levels.get(level)?.get(position)
    }
}

/// Compute only the root over packed pHashes.
pub fn build_root<H: CircuitHasher + ?Sized>(leaves: &[PackedHash], hasher: &H) -> Result<BigUint> {
    let tree = MerkleTree::from_packed(leaves, hasher)?;
    Ok(tree.root().clone())
}
