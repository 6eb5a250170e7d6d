//! Mock circuit hash for testing.

use num_bigint::BigUint;

use super::{bn254_modulus, decode_input, encode_decimal, CircuitHasher, HashBackend};
use crate::error::Result;

/// Deterministic positional hash over the BN254 scalar field.
///
/// `h(x_1..x_n) = fold(n, |acc, x| acc * m + x + 1) mod p`
///
/// Every input position carries a distinct power of the multiplier, so the
/// function is order-sensitive and changing any single input changes the
/// output. WARNING: Do not use in production - it is linear and trivially
/// invertible, and no circuit computes it.
#[derive(Debug, Clone)]
pub struct MockHasher {
    multiplier: BigUint,
}

impl MockHasher {
    pub fn new(seed: u64) -> Self {
        // Multipliers 0 and 1 would make positions collide.
        let multiplier = BigUint::from(seed) % bn254_modulus();
        let multiplier = if multiplier <= BigUint::from(1u32) {
            BigUint::from(2u32)
        } else {
            multiplier
        };
        Self { multiplier }
    }

    /// Create a mock with the default seed for simple tests.
    pub fn default_test() -> Self {
        Self::new(0x0000_0100_0000_01B3)
    }
}

impl Default for MockHasher {
    fn default() -> Self {
        Self::default_test()
    }
}

impl CircuitHasher for MockHasher {
    fn hash(&self, inputs: &[String]) -> Result<String> {
        let modulus = bn254_modulus();
        let mut acc = BigUint::from(inputs.len());
        for input in inputs {
            let value = decode_input(input)?;
            acc = (acc * &self.multiplier + value + 1u32) % modulus;
        }
        Ok(encode_decimal(&acc))
    }

    fn backend(&self) -> HashBackend {
        HashBackend::Mock
    }
}
