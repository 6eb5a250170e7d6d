//! circomlib-compatible Poseidon backend.
//!
//! Uses the round constants and MDS matrices published with circomlib
//! (`poseidon.circom`), so digests match `circomlibjs.poseidon` and the
//! in-circuit `Poseidon(n)` template for 1 to 16 inputs.

use ff_ce::PrimeField;
use num_bigint::BigUint;
use poseidon_rs::{Fr, Poseidon};
use tracing::debug;

use super::{decode_input, encode_decimal, ensure_in_field, CircuitHasher, HashBackend};
use crate::error::{CommitError, Result};

/// Widest input supported by the circomlib parameter set.
pub const POSEIDON_MAX_INPUTS: usize = 16;

/// Poseidon over the BN254 scalar field.
pub struct PoseidonHasher {
    inner: Poseidon,
}

impl std::fmt::Debug for PoseidonHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseidonHasher")
            .field("max_inputs", &POSEIDON_MAX_INPUTS)
            .finish_non_exhaustive()
    }
}

impl PoseidonHasher {
    /// Load the circomlib constants.
    pub fn new() -> Self {
        debug!("Loading Poseidon constants");
        Self {
            inner: Poseidon::new(),
        }
    }

    fn to_field(input: &str) -> Result<Fr> {
        let value = decode_input(input)?;
        ensure_in_field(&value)?;
        Fr::from_str(input).ok_or_else(|| {
            CommitError::HashFailure(format!("cannot map {input} into the Poseidon field"))
        })
    }

    fn from_field(element: &Fr) -> BigUint {
        let repr = element.into_repr();
        let bytes: Vec<u8> = repr
            .as_ref()
            .iter()
            .flat_map(|limb| limb.to_le_bytes())
            .collect();
        BigUint::from_bytes_le(&bytes)
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitHasher for PoseidonHasher {
    fn hash(&self, inputs: &[String]) -> Result<String> {
        if inputs.is_empty() || inputs.len() > POSEIDON_MAX_INPUTS {
            return Err(CommitError::HashFailure(format!(
                "Poseidon accepts 1 to {POSEIDON_MAX_INPUTS} inputs, got {}",
                inputs.len()
            )));
        }

        let elements = inputs
            .iter()
            .map(|input| Self::to_field(input))
            .collect::<Result<Vec<Fr>>>()?;

        let digest = self
            .inner
            .hash(elements)
            .map_err(CommitError::HashFailure)?;

        Ok(encode_decimal(&Self::from_field(&digest)))
    }

    fn backend(&self) -> HashBackend {
        HashBackend::Poseidon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{bn254_modulus, decode_decimal};

    fn strings(values: &[u64]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_poseidon_matches_circomlib_vectors() {
        let hasher = PoseidonHasher::new();
        assert_eq!(
            hasher.hash(&strings(&[1])).unwrap(),
            "18586133768512220936620570745912940619677854269274689475585506675881198879027"
        );
        assert_eq!(
            hasher.hash(&strings(&[1, 2])).unwrap(),
            "7853200120776062878684798364095072458815029376092732009249414926327459813530"
        );
    }

    #[test]
    fn test_poseidon_accepts_sixteen_inputs() {
        let hasher = PoseidonHasher::new();
        let inputs = strings(&[0; POSEIDON_MAX_INPUTS]);
        let digest = hasher.hash(&inputs).unwrap();
        assert!(decode_decimal(&digest).unwrap() < *bn254_modulus());
    }

    #[test]
    fn test_poseidon_rejects_too_many_inputs() {
        let hasher = PoseidonHasher::new();
        let inputs = strings(&[0; POSEIDON_MAX_INPUTS + 1]);
        assert!(matches!(
            hasher.hash(&inputs),
            Err(CommitError::HashFailure(_))
        ));
        assert!(matches!(hasher.hash(&[]), Err(CommitError::HashFailure(_))));
    }

    #[test]
    fn test_poseidon_rejects_out_of_field_input() {
        let hasher = PoseidonHasher::new();
        let inputs = vec![encode_decimal(bn254_modulus())];
        assert!(matches!(
            hasher.hash(&inputs),
            Err(CommitError::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_poseidon_rejects_non_canonical_input() {
        let hasher = PoseidonHasher::new();
        assert!(matches!(
            hasher.hash(&["007".to_string()]),
            Err(CommitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_poseidon_order_sensitive() {
        let hasher = PoseidonHasher::new();
        assert_ne!(
            hasher.hash(&strings(&[1, 2])).unwrap(),
            hasher.hash(&strings(&[2, 1])).unwrap()
        );
    }
}
