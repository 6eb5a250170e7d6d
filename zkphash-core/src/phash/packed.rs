//! Perceptual hash grids and their packed integer form.
//!
//! A pHash is an 8x8 grid of bits. The circuit consumes it as a single
//! 64-bit integer: cell `(row, col)` becomes bit `row * 8 + col`.
//!
//! # Usage
//!
//! ```
//! use zkphash_core::phash::{pack, PHash};
//!
//! let mut rows = vec![vec![0u64; 8]; 8];
//! rows[7][7] = 1;
//! let phash = PHash::from_rows(&rows).unwrap();
//! assert_eq!(pack(&phash).value(), 1u64 << 63);
//! ```

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{CommitError, Result};

/// Side length of a pHash grid.
pub const PHASH_SIZE: usize = 8;

/// Number of bits in a packed pHash.
pub const PHASH_BITS: usize = PHASH_SIZE * PHASH_SIZE;

/// Default Hamming distance under which two pHashes count as similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 10;

/// An 8x8 perceptual hash.
///
/// Only constructible from well-formed input: exactly 8 rows of 8 cells,
/// every cell 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u8>>")]
pub struct PHash {
    bits: [[u8; PHASH_SIZE]; PHASH_SIZE],
}

impl PHash {
    /// The all-zero hash, used to pad databases to a fixed size.
    pub const fn zero() -> Self {
        Self {
            bits: [[0; PHASH_SIZE]; PHASH_SIZE],
        }
    }

    /// Build a pHash from nested rows, validating shape and cell values.
    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self> {
        let shape_error = |row: usize, cols: usize| CommitError::InvalidPhashShape {
            rows: rows.len(),
            row,
            cols,
        };
        if rows.len() != PHASH_SIZE {
            return Err(shape_error(0, rows.first().map_or(0, |r| r.as_ref().len())));
        }

        let mut bits = [[0u8; PHASH_SIZE]; PHASH_SIZE];
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != PHASH_SIZE {
                return Err(shape_error(row, cells.len()));
            }
            for (col, &value) in cells.iter().enumerate() {
                bits[row][col] = match value {
                    0 => 0,
                    1 => 1,
                    _ => return Err(CommitError::InvalidPhashCell { row, col, value }),
                };
            }
        }
        Ok(Self { bits })
    }

    /// Build a pHash from a predicate over `(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut bits = [[0u8; PHASH_SIZE]; PHASH_SIZE];
        for (row, cells) in bits.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = u8::from(f(row, col));
            }
        }
        Self { bits }
    }

    /// Unpack a packed hash back into its grid.
    pub fn from_packed(packed: PackedHash) -> Self {
        Self::from_fn(|row, col| (packed.0 >> (row * PHASH_SIZE + col)) & 1 == 1)
    }

    /// Get the bit at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 8 or more.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.bits[row][col]
    }

    /// Iterate over cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits.iter().flat_map(|row| row.iter().copied())
    }

    /// Rows as nested vectors (the JSON representation).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.bits.iter().map(|row| row.to_vec()).collect()
    }

    /// Pack into the circuit's 64-bit leaf value.
    pub fn pack(&self) -> PackedHash {
        pack(self)
    }

    /// Get the hash as a hexadecimal string.
    ///
    /// Each row becomes one byte with column 0 as the most significant bit,
    /// so the string reads the grid top-to-bottom, left-to-right.
    pub fn to_hex(&self) -> String {
        let bytes: Vec<u8> = self
            .bits
            .iter()
            .map(|row| row.iter().fold(0u8, |byte, &bit| (byte << 1) | bit))
            .collect();
        hex::encode(bytes)
    }

    /// Create a pHash from the hexadecimal form produced by [`PHash::to_hex`].
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CommitError::InvalidInput(format!("Invalid hex string: {}", e)))?;
        if bytes.len() != PHASH_SIZE {
            return Err(CommitError::InvalidInput(format!(
                "pHash hex must encode {PHASH_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self::from_fn(|row, col| {
            (bytes[row] >> (PHASH_SIZE - 1 - col)) & 1 == 1
        }))
    }

    /// Render the grid as lines of `0`/`1` characters.
    pub fn to_bit_matrix(&self) -> String {
        self.bits
            .iter()
            .map(|row| row.iter().map(|bit| char::from(b'0' + bit)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PHash {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Vec<Vec<u64>>> for PHash {
    type Error = CommitError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<PHash> for Vec<Vec<u8>> {
    fn from(phash: PHash) -> Self {
        phash.to_rows()
    }
}

/// A pHash packed little-endian into 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedHash(u64);

impl PackedHash {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The leaf value handed to the Merkle builder.
    pub fn to_biguint(self) -> BigUint {
        BigUint::from(self.0)
    }

    /// Number of differing bits between two packed hashes.
    pub fn hamming_distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Check if two hashes are within a Hamming distance threshold.
    ///
    /// # Arguments
    ///
    /// * `other` - The other hash to compare against
    /// * `threshold` - Maximum distance to consider similar (default: 10)
    pub fn is_similar(self, other: Self, threshold: Option<u32>) -> bool {
        self.hamming_distance(other) <= threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl std::fmt::Display for PackedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PackedHash> for BigUint {
    fn from(packed: PackedHash) -> Self {
        packed.to_biguint()
    }
}

/// Pack a pHash: the k-th cell in row-major order contributes `cell * 2^k`.
pub fn pack(phash: &PHash) -> PackedHash {
    let packed = phash
        .cells()
        .take(PHASH_BITS)
        .enumerate()
        .fold(0u64, |acc, (k, cell)| acc | (u64::from(cell) << k));
    PackedHash(packed)
}

/// Pack every entry of a database, preserving order.
pub fn pack_all(phashes: &[PHash]) -> Vec<PackedHash> {
    phashes.iter().map(pack).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_bit(row: usize, col: usize) -> PHash {
        PHash::from_fn(|r, c| r == row && c == col)
    }

    #[test]
    fn test_pack_zero_grid() {
        assert_eq!(pack(&PHash::zero()).value(), 0);
    }

    #[test]
    fn test_pack_first_cell() {
        assert_eq!(pack(&single_bit(0, 0)).value(), 1);
    }

    #[test]
    fn test_pack_last_cell() {
        assert_eq!(pack(&single_bit(7, 7)).value(), 1u64 << 63);
    }

    #[test]
    fn test_pack_row_major_positions() {
        assert_eq!(pack(&single_bit(0, 1)).value(), 1 << 1);
        assert_eq!(pack(&single_bit(1, 0)).value(), 1 << 8);
        assert_eq!(pack(&single_bit(3, 5)).value(), 1 << 29);
    }

    #[test]
    fn test_pack_all_ones() {
        let ones = PHash::from_fn(|_, _| true);
        assert_eq!(pack(&ones).value(), u64::MAX);
    }

    #[test]
    fn test_pack_unpack_identity() {
        let phash = PHash::from_fn(|r, c| (r * 3 + c * 5) % 7 < 3);
        assert_eq!(PHash::from_packed(pack(&phash)), phash);
    }

    #[test]
    fn test_from_rows_rejects_wrong_row_count() {
        let rows = vec![vec![0u64; 8]; 7];
        assert!(matches!(
            PHash::from_rows(&rows),
            Err(CommitError::InvalidPhashShape { rows: 7, .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let mut rows = vec![vec![0u64; 8]; 8];
        rows[4].push(0);
        assert!(matches!(
            PHash::from_rows(&rows),
            Err(CommitError::InvalidPhashShape { row: 4, cols: 9, .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_non_binary_cells() {
        let mut rows = vec![vec![0u64; 8]; 8];
        rows[2][6] = 2;
        assert!(matches!(
            PHash::from_rows(&rows),
            Err(CommitError::InvalidPhashCell {
                row: 2,
                col: 6,
                value: 2
            })
        ));
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let phash = single_bit(2, 3);
        let json = serde_json::to_string(&phash).unwrap();
        assert!(json.starts_with("[[0,0,0,0,0,0,0,0],"));
        let restored: PHash = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, phash);

        let bad = "[[0,1],[1,0]]";
        assert!(serde_json::from_str::<PHash>(bad).is_err());
    }

    #[test]
    fn test_hex_is_msb_first_per_row() {
        let phash = single_bit(0, 0);
        assert_eq!(phash.to_hex(), "8000000000000000");
        let phash = single_bit(7, 7);
        assert_eq!(phash.to_hex(), "0000000000000001");
        assert_eq!(PHash::from_hex(&phash.to_hex()).unwrap(), phash);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(PHash::from_hex("deadbeef").is_err());
        assert!(PHash::from_hex("zz").is_err());
    }

    #[test]
    fn test_bit_matrix() {
        let matrix = single_bit(1, 2).to_bit_matrix();
        let lines: Vec<&str> = matrix.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "00100000");
    }

    #[test]
    fn test_hamming_distance() {
        let a = PackedHash::new(0);
        let b = PackedHash::new(0b1011);
        assert_eq!(a.hamming_distance(b), 3);
        assert_eq!(a.hamming_distance(PackedHash::new(u64::MAX)), 64);
    }

    #[test]
    fn test_similarity_threshold() {
        let a = PackedHash::new(0);
        let b = PackedHash::new(1);
        assert!(a.is_similar(b, None));
        assert!(!a.is_similar(b, Some(0)));
        assert!(!a.is_similar(PackedHash::new(0x7FF), None));
    }
}
