//! Subcommand implementations.

pub mod build_db;
pub mod commit;
pub mod phash;
pub mod prepare;
