//! Perceptual hashes as seen by the circuit.
//!
//! # Components
//!
//! - **Packing**: turns an 8x8 bit grid into the 64-bit integer that the
//!   circuit uses as a Merkle leaf.
//! - **DCT hashing**: computes the 8x8 grid from a 32x32 grayscale image with
//!   the same integer arithmetic and comparator network as the circuit.

pub mod dct;
pub mod packed;

pub use dct::{bitonic_network64, compute_phash, dct_coefficients, DCT_SCALE_BITS, DCT_SIZE};
pub use packed::*;
