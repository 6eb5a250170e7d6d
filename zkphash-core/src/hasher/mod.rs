//! Arithmetic-circuit hash functions.
//!
//! Every commitment in this crate is recomputed inside a zero-knowledge
//! circuit, so the hash is treated as an opaque collaborator with a fixed
//! interface: an ordered sequence of non-negative integers, each encoded as
//! a canonical base-10 string, goes in; one base-10 string comes out.
//!
//! The function is never assumed to be commutative. Callers must present
//! inputs in exactly the order the circuit does.
//!
//! ## Backends
//!
//! - **Poseidon** - circomlib-compatible Poseidon over the BN254 scalar
//!   field (feature `poseidon`)
//! - **Mock** - deterministic positional hash for tests and dry runs
//!
//! ## Example
//!
//! ```
//! use num_bigint::BigUint;
//! use zkphash_core::hasher::{CircuitHasher, MockHasher};
//!
//! # fn example() -> zkphash_core::Result<()> {
//! let hasher = MockHasher::default();
//! let left = BigUint::from(1u32);
//! let right = BigUint::from(2u32);
//! let node = hasher.hash_integers(&[left.clone(), right.clone()])?;
//! assert_ne!(node, hasher.hash_integers(&[right, left])?);
//! # Ok(())
//! # }
//! ```

mod mock;
#[cfg(feature = "poseidon")]
mod poseidon;

pub use mock::MockHasher;
#[cfg(feature = "poseidon")]
pub use poseidon::{PoseidonHasher, POSEIDON_MAX_INPUTS};

use std::sync::OnceLock;

use num_bigint::BigUint;
use tracing::trace;

use crate::error::{CommitError, Result};

/// Order of the BN254 scalar field, the native field of circom circuits.
pub const BN254_SCALAR_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// The BN254 scalar field modulus as a big integer.
pub fn bn254_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| {
        BigUint::parse_bytes(BN254_SCALAR_MODULUS.as_bytes(), 10)
            .unwrap_or_else(|| unreachable!("modulus literal is valid decimal"))
    })
}

/// Trait for hash functions that a companion circuit can recompute.
///
/// Implementations must be pure and deterministic. Thread safety is not
/// required; callers that hash batches in parallel add `Send + Sync` bounds
/// themselves.
pub trait CircuitHasher {
    /// Hash an ordered sequence of decimal-encoded integers.
    ///
    /// Any failure must be reported as an error; implementations never
    /// substitute a fallback value.
    fn hash(&self, inputs: &[String]) -> Result<String>;

    /// Returns the backend identifier for logging and diagnostics.
    fn backend(&self) -> HashBackend;

    /// Hash big integers, handling the canonical decimal encoding.
    fn hash_integers(&self, inputs: &[BigUint]) -> Result<BigUint> {
        let encoded: Vec<String> = inputs.iter().map(encode_decimal).collect();
        let output = self.hash(&encoded)?;
        trace!(inputs = encoded.len(), backend = %self.backend(), "Hashed inputs");
        decode_decimal(&output)
    }
}

impl<H: CircuitHasher + ?Sized> CircuitHasher for &H {
    fn hash(&self, inputs: &[String]) -> Result<String> {
        (**self).hash(inputs)
    }

    fn backend(&self) -> HashBackend {
        (**self).backend()
    }
}

impl<H: CircuitHasher + ?Sized> CircuitHasher for Box<H> {
    fn hash(&self, inputs: &[String]) -> Result<String> {
        (**self).hash(inputs)
    }

    fn backend(&self) -> HashBackend {
        (**self).backend()
    }
}

/// Identifies the hash backend behind a [`CircuitHasher`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HashBackend {
    /// circomlib Poseidon over BN254
    Poseidon,
    /// Deterministic mock for testing only (NOT circuit-compatible!)
    Mock,
    /// Caller-provided function (e.g. a JavaScript Poseidon implementation)
    External { name: String },
}

impl std::fmt::Display for HashBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poseidon => write!(f, "Poseidon (BN254)"),
            Self::Mock => write!(f, "Mock (NOT CIRCUIT-COMPATIBLE)"),
            Self::External { name } => write!(f, "External: {name}"),
        }
    }
}

/// Encode an integer as a canonical base-10 string (no sign, no leading zeros).
pub fn encode_decimal(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Parse a canonical base-10 string.
///
/// Rejects empty strings, signs, whitespace, non-digit characters and
/// leading zeros, so that every value has exactly one accepted encoding.
pub fn decode_decimal(text: &str) -> Result<BigUint> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return Err(CommitError::MalformedHashOutput(text.to_string()));
    }

    BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| CommitError::MalformedHashOutput(text.to_string()))
}

/// Parse a hash input, reporting non-canonical text as invalid input.
pub(crate) fn decode_input(text: &str) -> Result<BigUint> {
    decode_decimal(text).map_err(|_| {
        CommitError::InvalidInput(format!(
            "hash input is not a canonical decimal integer: {text:?}"
        ))
    })
}

/// Reject values that do not fit in the BN254 scalar field.
pub fn ensure_in_field(value: &BigUint) -> Result<()> {
    let modulus = bn254_modulus();
    if value >= modulus {
        return Err(CommitError::FieldOverflow {
            value: encode_decimal(value),
            modulus: encode_decimal(modulus),
        });
    }
    Ok(())
}
