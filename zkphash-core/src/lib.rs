//! zkphash Core - commitments for zero-knowledge perceptual-hash matching
//!
//! This crate computes the public commitments a prover needs to show, in
//! zero knowledge, that a private image is perceptually close to one entry of
//! a private pHash database. Every value is computed exactly as the companion
//! circuit recomputes it.
//!
//! # Features
//!
//! - Packing of 8x8 pHash grids into 64-bit Merkle leaves
//! - Zero-padded power-of-two Merkle root over the database (`dbHash`)
//! - Three-stage hierarchical image commitment with a blinding scalar
//!   (`imgCommitment`)
//! - Circuit-exact integer DCT pHash computation
//! - Pluggable hash backends: circomlib Poseidon (feature `poseidon`) or any
//!   [`CircuitHasher`] implementation
//! - Image decoding and database building (feature `image-io`)
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use zkphash_core::{compute_phash, CommitEngine, ImageGrid, MockHasher, PHash};
//!
//! # fn example() -> zkphash_core::Result<()> {
//! // Use the mock hasher for testing (in production, use PoseidonHasher)
//! let engine = CommitEngine::new(MockHasher::default());
//!
//! let image = ImageGrid::from_fn(|r, c| ((r * 7 + c * 13) % 256) as u64);
//! let db = vec![compute_phash(&image), PHash::zero(), PHash::zero()];
//!
//! let bundle = engine.commit(&db, image, BigUint::from(123_456_789u32), 10)?;
//! println!("{}", bundle.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod commitment;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hasher;
#[cfg(feature = "image-io")]
pub mod loader;
pub mod merkle;
pub mod phash;

// Re-export main types for convenience
pub use bundle::{image_from_json, CommitBundle, PhashDatabase, PreparedImage};
pub use commitment::{commit_image, commit_image_detailed, ImageCommitment};
pub use engine::CommitEngine;
pub use error::{CommitError, Result};
pub use grid::{ImageGrid, BLOCK_COUNT, IMAGE_SIZE};
pub use hasher::{CircuitHasher, HashBackend, MockHasher, BN254_SCALAR_MODULUS};
pub use merkle::{build_root, MerkleTree};
pub use phash::{compute_phash, pack, pack_all, PHash, PackedHash};

#[cfg(feature = "poseidon")]
pub use hasher::PoseidonHasher;

#[cfg(feature = "image-io")]
pub use loader::{build_database, load_image_grid, DatabaseBuild};
