//! CLI configuration module
//!
//! Loads commitment settings from environment variables; command-line flags
//! override them.

use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use zkphash_core::hasher::decode_decimal;
use zkphash_core::phash::DEFAULT_SIMILARITY_THRESHOLD;

/// Default number of database slots, matching the 512-entry circuit.
pub const DEFAULT_DB_SIZE: usize = 512;

/// Commitment settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitConfig {
    /// Hamming-distance threshold written into the bundle (default: 10)
    pub threshold: u32,
    /// Blinding scalar as a decimal string (no default)
    pub r2: Option<String>,
    /// Database padding size for `build-db` (default: 512)
    pub db_size: usize,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            r2: None,
            db_size: DEFAULT_DB_SIZE,
        }
    }
}

impl CommitConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let threshold = lookup("ZKPHASH_THRESHOLD")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.threshold);

        let r2 = lookup("ZKPHASH_R2")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let db_size = lookup("ZKPHASH_DB_SIZE")
            .and_then(|v| v.trim().parse().ok())
            .filter(|&size: &usize| size > 0)
            .unwrap_or(defaults.db_size);

        Self {
            threshold,
            r2,
            db_size,
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        threshold: Option<u32>,
        r2: Option<String>,
        db_size: Option<usize>,
    ) -> Self {
        if let Some(threshold) = threshold {
            self.threshold = threshold;
        }
        if let Some(r2) = r2 {
            self.r2 = Some(r2);
        }
        if let Some(db_size) = db_size {
            self.db_size = db_size;
        }
        self
    }

    /// The blinding scalar, parsed.
    pub fn r2(&self) -> Result<BigUint> {
        let raw = self
            .r2
            .as_deref()
            .context("No blinding scalar: pass --r2 or set ZKPHASH_R2")?;
        decode_decimal(raw)
            .map_err(|_| anyhow!("Invalid blinding scalar {raw:?}: expected a non-negative decimal integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CommitConfig::from_lookup(lookup(&[]));
        assert_eq!(config, CommitConfig::default());
        assert_eq!(config.threshold, 10);
        assert_eq!(config.db_size, 512);
        assert!(config.r2().is_err());
    }

    #[test]
    fn test_env_values() {
        let config = CommitConfig::from_lookup(lookup(&[
            ("ZKPHASH_THRESHOLD", "12"),
            ("ZKPHASH_R2", " 123456789 "),
            ("ZKPHASH_DB_SIZE", "64"),
        ]));
        assert_eq!(config.threshold, 12);
        assert_eq!(config.db_size, 64);
        assert_eq!(config.r2().unwrap(), BigUint::from(123_456_789u32));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = CommitConfig::from_lookup(lookup(&[
            ("ZKPHASH_THRESHOLD", "ten"),
            ("ZKPHASH_DB_SIZE", "0"),
        ]));
        assert_eq!(config.threshold, 10);
        assert_eq!(config.db_size, 512);
    }

    #[test]
    fn test_flags_override_env() {
        let config = CommitConfig::from_lookup(lookup(&[("ZKPHASH_R2", "1")]))
            .with_overrides(Some(3), Some("2".into()), None);
        assert_eq!(config.threshold, 3);
        assert_eq!(config.r2().unwrap(), BigUint::from(2u32));
        assert_eq!(config.db_size, 512);
    }

    #[test]
    fn test_invalid_r2_rejected() {
        let config = CommitConfig::default().with_overrides(None, Some("-5".into()), None);
        let err = config.r2().unwrap_err();
        assert!(format!("{err:#}").contains("Invalid blinding scalar"));
    }
}
