#![no_main]

//! Fuzz target for Merkle tree construction
//!
//! Interprets the input as little-endian u64 leaves and checks the tree
//! shape invariants.
//!
//! Run with: cargo +nightly fuzz run fuzz_merkle

use libfuzzer_sys::fuzz_target;
use zkphash_core::merkle::{tree_width, MerkleTree};
use zkphash_core::{MockHasher, PackedHash};

fuzz_target!(|data: &[u8]| {
    let leaves: Vec<PackedHash> = data
        .chunks_exact(8)
        .take(256)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            PackedHash::new(u64::from_le_bytes(bytes))
        })
        .collect();

    let hasher = MockHasher::default();
    match MerkleTree::from_packed(&leaves, &hasher) {
        Ok(tree) => {
            assert_eq!(Some(tree.width()), tree_width(leaves.len()));
            assert!(tree.width().is_power_of_two());
            assert_eq!(1usize << tree.depth(), tree.width());
            assert_eq!(tree.padding(), tree.width() - leaves.len());
        }
        Err(_) => assert!(leaves.is_empty()),
    }
});
