//! Circuit-exact DCT perceptual hashing.
//!
//! # Algorithm
//!
//! 1. Scale the orthonormal DCT-II basis by `2^64` and round to integers.
//! 2. Apply the 1-D transform to every row, then to every column, in exact
//!    integer arithmetic.
//! 3. Keep the low-frequency 8x8 corner and run it through the circuit's
//!    64-wire comparator network.
//! 4. A bit is set when twice the coefficient exceeds the sum of the two
//!    middle network outputs (wires 31 and 32).
//!
//! The comparator schedule is the one the circuit hard-codes; it is
//! reproduced as-is, including the order of its stages.

use std::f64::consts::PI;

use num_bigint::BigInt;
use tracing::trace;

use super::packed::{PHash, PHASH_BITS, PHASH_SIZE};
use crate::grid::{ImageGrid, IMAGE_SIZE};

/// Side length of the transformed image.
pub const DCT_SIZE: usize = IMAGE_SIZE;

/// Coefficients are scaled by `2^DCT_SCALE_BITS` before rounding.
pub const DCT_SCALE_BITS: i32 = 64;

/// Integer DCT-II coefficient matrix: `coeff[j][k]` weights input `k` for
/// output frequency `j`.
pub fn dct_coefficients(size: usize) -> Vec<Vec<i64>> {
    let scale = 2f64.powi(DCT_SCALE_BITS);
    let n = size as f64;
    (0..size)
        .map(|j| {
            let alpha = if j == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..size)
                .map(|k| {
                    let angle = PI * (2 * k + 1) as f64 * j as f64 / (2 * size) as f64;
                    (alpha * angle.cos() * scale).round_ties_even() as i64
                })
                .collect()
        })
        .collect()
}

fn dct1d(input: &[BigInt], coeff: &[Vec<i64>]) -> Vec<BigInt> {
    coeff
        .iter()
        .map(|weights| {
            input
                .iter()
                .zip(weights)
                .map(|(value, &weight)| value * weight)
                .sum::<BigInt>()
        })
        .collect()
}

/// The circuit's 64-wire compare-exchange network.
///
/// Stages run with `p` from 6 down to 1 and `q` from `p - 1` down to 0;
/// wire `i` is paired with `i ^ 2^q` and the pair is put in ascending order
/// when bit `p` of `i` is clear, descending otherwise.
pub fn bitonic_network64<T: PartialOrd + Clone>(values: &[T; PHASH_BITS]) -> [T; PHASH_BITS] {
    let mut wires = values.clone();
    for p in (1..=6).rev() {
        let block = 1usize << p;
        for q in (0..p).rev() {
            let distance = 1usize << q;
            for i in 0..PHASH_BITS {
                let j = i ^ distance;
                if j <= i {
                    continue;
                }
                let ascending = i & block == 0;
                let out_of_order = if ascending {
                    wires[i] > wires[j]
                } else {
                    wires[i] < wires[j]
                };
                if out_of_order {
                    wires.swap(i, j);
                }
            }
        }
    }
    wires
}

/// Compute the circuit pHash of a 32x32 grayscale image.
pub fn compute_phash(image: &ImageGrid) -> PHash {
    let coeff = dct_coefficients(DCT_SIZE);

    let row_pass: Vec<Vec<BigInt>> = (0..DCT_SIZE)
        .map(|row| {
            let pixels: Vec<BigInt> = image.row(row).iter().map(|&p| BigInt::from(p)).collect();
            dct1d(&pixels, &coeff)
        })
        .collect();

    // Only the low-frequency corner is needed from the column pass.
    let mut low_freq: Vec<BigInt> = vec![BigInt::default(); PHASH_BITS];
    for col in 0..PHASH_SIZE {
        let column: Vec<BigInt> = row_pass.iter().map(|r| r[col].clone()).collect();
        let transformed = dct1d(&column, &coeff[..PHASH_SIZE]);
        for (row, value) in transformed.into_iter().enumerate() {
            low_freq[row * PHASH_SIZE + col] = value;
        }
    }

    let flat: [BigInt; PHASH_BITS] = match low_freq.try_into() {
        Ok(flat) => flat,
        Err(_) => unreachable!("low-frequency block has exactly 64 entries"),
    };
    let sorted = bitonic_network64(&flat);
    let median_sum = &sorted[PHASH_BITS / 2 - 1] + &sorted[PHASH_BITS / 2];
    trace!(%median_sum, "Computed DCT median");

    PHash::from_fn(|row, col| {
        let value: &BigInt = &flat[row * PHASH_SIZE + col];
        value * 2 > median_sum
    })
}
