//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

use zkphash_core::CommitError;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (missing r2, invalid flag values).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Data format error (malformed pHash, image, JSON or hash output).
/// Maps to EX_DATAERR from sysexits.h.
pub const DATA_ERROR: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Hash backend unavailable or failing.
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const BACKEND_ERROR: i32 = 69;

/// I/O error (cannot write output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Help text appended to `--help`.
pub const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (missing --r2, invalid values)
  65  Data error (malformed pHash, image or JSON)
  66  Input file missing or unreadable
  69  Hash backend unavailable
  74  Cannot write output file";

/// Represents an exit code with error context.
pub struct ExitCode {
    pub code: i32,
    pub message: String,
}

impl ExitCode {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Typed core errors take precedence over message inspection
        let core = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<CommitError>());

        let code = match core {
            Some(CommitError::HashFailure(_)) => BACKEND_ERROR,
            Some(CommitError::Io(_)) => INPUT_ERROR,
            Some(_) => DATA_ERROR,
            None if message.contains("Failed to read") => INPUT_ERROR,
            None if message.contains("Failed to write") => IO_ERROR,
            None if message.contains("Failed to parse") => DATA_ERROR,
            None if message.contains("blinding scalar") || message.contains("Invalid option") => {
                USAGE_ERROR
            }
            None => GENERAL_ERROR,
        };

        Self { code, message }
    }
}
