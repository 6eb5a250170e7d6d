//! JSON documents exchanged with the circuit toolchain.
//!
//! - [`PhashDatabase`]: `{ "dbPhashs": [[[0,1,...], ...], ...] }`
//! - [`CommitBundle`]: the witness input handed to the prover,
//!   `{ imgCommitment, dbHash, threshold, r2, image, dbPhashs }`
//! - [`PreparedImage`]: `{ image, dct_coefficients }`
//!
//! Field elements are written as decimal strings, since they routinely exceed
//! what a JSON number can carry without loss.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CommitError, Result};
use crate::grid::ImageGrid;
use crate::phash::{dct_coefficients, pack_all, PHash, PackedHash, DCT_SIZE};

/// Serde adapter writing a [`BigUint`] as a canonical decimal string.
///
/// Deserialization also accepts a plain JSON integer, which is how older
/// bundles stored small values such as `r2`.
pub mod decimal {
    use std::fmt;

    use num_bigint::BigUint;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::hasher::{decode_decimal, encode_decimal};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = BigUint;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or its decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigUint, E> {
            decode_decimal(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigUint, E> {
            Ok(BigUint::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigUint, E> {
            u64::try_from(v)
                .map(BigUint::from)
                .map_err(|_| E::custom(format!("negative value {v}")))
        }
    }

    /// The same encoding for a sequence of integers.
    pub mod vec {
        use num_bigint::BigUint;
        use serde::{Deserialize, Deserializer, Serializer};

        use crate::hasher::encode_decimal;

        #[derive(Deserialize)]
        struct Item(#[serde(deserialize_with = "crate::bundle::decimal::deserialize")] BigUint);

        pub fn serialize<S: Serializer>(
            values: &[BigUint],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(encode_decimal))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<BigUint>, D::Error> {
            let items = Vec::<Item>::deserialize(deserializer)?;
            Ok(items.into_iter().map(|Item(value)| value).collect())
        }
    }
}

fn json_error(what: &str, err: serde_json::Error) -> CommitError {
    CommitError::SerializationError(format!("{what}: {err}"))
}

/// An ordered database of perceptual hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhashDatabase {
    #[serde(rename = "dbPhashs")]
    pub phashes: Vec<PHash>,
}

impl PhashDatabase {
    pub fn new(phashes: Vec<PHash>) -> Self {
        Self { phashes }
    }

    /// Parse `{ "dbPhashs": [...] }`, validating every entry.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| json_error("Invalid pHash database", e))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| json_error("Failed to encode database", e))
    }

    pub fn len(&self) -> usize {
        self.phashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phashes.is_empty()
    }

    /// Packed leaf values, in database order.
    pub fn packed(&self) -> Vec<PackedHash> {
        pack_all(&self.phashes)
    }

    /// Append all-zero entries until the database holds `size` hashes.
    ///
    /// A database already at or above `size` is left untouched.
    pub fn pad_to(&mut self, size: usize) {
        if self.phashes.len() < size {
            self.phashes.resize(size, PHash::zero());
        }
    }
}

/// Witness input for the similarity circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitBundle {
    #[serde(with = "decimal")]
    pub img_commitment: BigUint,
    #[serde(with = "decimal")]
    pub db_hash: BigUint,
    pub threshold: u32,
    #[serde(with = "decimal")]
    pub r2: BigUint,
    pub image: ImageGrid,
    pub db_phashs: Vec<PHash>,
}

impl CommitBundle {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| json_error("Invalid commit bundle", e))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| json_error("Failed to encode bundle", e))
    }

    /// Default file name used by the circuit scripts: `<N>_circom_input.json`.
    pub fn file_name(&self) -> String {
        format!("{}_circom_input.json", self.db_phashs.len())
    }
}

/// A preprocessed image together with the DCT matrix the circuit embeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedImage {
    pub image: ImageGrid,
    pub dct_coefficients: Vec<Vec<i64>>,
}

impl PreparedImage {
    pub fn new(image: ImageGrid) -> Self {
        Self {
            image,
            dct_coefficients: dct_coefficients(DCT_SIZE),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| json_error("Failed to encode prepared image", e))
    }
}

/// Parse an image document: either `{ "image": [[...]] }` (any other keys are
/// ignored) or a bare 32x32 array.
pub fn image_from_json(json: &str) -> Result<ImageGrid> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| json_error("Invalid image document", e))?;
    let grid = match value {
        Value::Object(mut map) => map.remove("image").ok_or_else(|| {
            CommitError::InvalidInput("image document has no \"image\" field".into())
        })?,
        other => other,
    };
    serde_json::from_value(grid).map_err(|e| json_error("Invalid image grid", e))
}
