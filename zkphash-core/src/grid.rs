//! Fixed-size grayscale image grids.
//!
//! The circuit works on a 32x32 image split into 64 non-overlapping 4x4
//! blocks, laid out 8x8 in block space. Block `b` starts at row
//! `(b / 8) * 4`, column `(b % 8) * 4`.

use serde::{Deserialize, Serialize};

use crate::error::{CommitError, Result};

/// Side length of the image, in pixels.
pub const IMAGE_SIZE: usize = 32;

/// Side length of a block, in pixels.
pub const BLOCK_SIZE: usize = 4;

/// Blocks per block-space row.
pub const BLOCKS_PER_ROW: usize = IMAGE_SIZE / BLOCK_SIZE;

/// Total number of blocks.
pub const BLOCK_COUNT: usize = BLOCKS_PER_ROW * BLOCKS_PER_ROW;

/// Pixels per block.
pub const BLOCK_PIXELS: usize = BLOCK_SIZE * BLOCK_SIZE;

/// A 32x32 grid of non-negative pixel intensities, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct ImageGrid {
    pixels: Vec<u64>,
}

impl ImageGrid {
    /// Build a grid from nested rows, rejecting anything that is not 32x32.
    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self> {
        let shape_error = |row: usize, cols: usize| CommitError::InvalidImageShape {
            expected: IMAGE_SIZE,
            rows: rows.len(),
            row,
            cols,
        };
        if rows.len() != IMAGE_SIZE {
            return Err(shape_error(0, rows.first().map_or(0, |r| r.as_ref().len())));
        }

        let mut pixels = Vec::with_capacity(IMAGE_SIZE * IMAGE_SIZE);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != IMAGE_SIZE {
                return Err(shape_error(row, values.len()));
            }
            pixels.extend_from_slice(values);
        }
        Ok(Self { pixels })
    }

    /// Build a grid from a function of `(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u64) -> Self {
        let pixels = (0..IMAGE_SIZE * IMAGE_SIZE)
            .map(|i| f(i / IMAGE_SIZE, i % IMAGE_SIZE))
            .collect();
        Self { pixels }
    }

    /// An all-black image.
    pub fn zeros() -> Self {
        Self::from_fn(|_, _| 0)
    }

    /// Get the pixel at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 32 or more.
    pub fn get(&self, row: usize, col: usize) -> u64 {
        assert!(col < IMAGE_SIZE, "column {col} out of range");
        self.pixels[row * IMAGE_SIZE + col]
    }

    /// Set the pixel at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: u64) {
        assert!(col < IMAGE_SIZE, "column {col} out of range");
        self.pixels[row * IMAGE_SIZE + col] = value;
    }

    /// One row of pixels.
    pub fn row(&self, row: usize) -> &[u64] {
        &self.pixels[row * IMAGE_SIZE..(row + 1) * IMAGE_SIZE]
    }

    /// Rows as nested vectors (the JSON representation).
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.pixels
            .chunks(IMAGE_SIZE)
            .map(<[u64]>::to_vec)
            .collect()
    }

    /// Top-left `(row, col)` of block `b`.
    pub fn block_origin(block: usize) -> (usize, usize) {
        (
            (block / BLOCKS_PER_ROW) * BLOCK_SIZE,
            (block % BLOCKS_PER_ROW) * BLOCK_SIZE,
        )
    }

    /// The 16 pixels of block `b`: row offset outer, column offset inner.
    pub fn block_pixels(&self, block: usize) -> [u64; BLOCK_PIXELS] {
        let (x, y) = Self::block_origin(block);
        std::array::from_fn(|i| self.get(x + i / BLOCK_SIZE, y + i % BLOCK_SIZE))
    }
}

impl Default for ImageGrid {
    fn default() -> Self {
        Self::zeros()
    }
}

impl TryFrom<Vec<Vec<u64>>> for ImageGrid {
    type Error = CommitError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<ImageGrid> for Vec<Vec<u64>> {
    fn from(grid: ImageGrid) -> Self {
        grid.to_rows()
    }
}
