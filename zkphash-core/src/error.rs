use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Database is empty: at least one perceptual hash is required")]
    EmptyDatabase,

    #[error("Invalid pHash shape: expected 8x8, got {rows} rows (row {row} has {cols} cells)")]
    InvalidPhashShape { rows: usize, row: usize, cols: usize },

    #[error("Invalid pHash cell at ({row}, {col}): expected 0 or 1, got {value}")]
    InvalidPhashCell { row: usize, col: usize, value: u64 },

    #[error("Invalid image shape: expected {expected}x{expected}, got {rows} rows (row {row} has {cols} pixels)")]
    InvalidImageShape {
        expected: usize,
        rows: usize,
        row: usize,
        cols: usize,
    },

    #[error("Hash function failed: {0}")]
    HashFailure(String),

    #[error("Malformed hash output: {0:?} is not a canonical decimal integer")]
    MalformedHashOutput(String),

    #[error("Value {value} is outside the hash field (modulus {modulus})")]
    FieldOverflow { value: String, modulus: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommitError>;
