//! # Domain Entities for World State
//!
//! ## Type Decisions
//!
//! - `Version: u64` - Store-wide commit height. Every successful commit
//!   increments the height by one and stamps each written key with it, so
//!   two reads of the same key observe the same version iff no commit
//!   touched the key in between.
//! - Keys are UTF-8 strings compared lexicographically by byte value,
//!   which is the ordering range scans follow.

use serde::{Deserialize, Serialize};
use std::env;

use super::WorldStateError;

/// Commit height at which a key was last written.
pub type Version = u64;

/// Default number of committed entries a range iterator fetches per page.
pub const DEFAULT_RANGE_PAGE_SIZE: usize = 100;

/// Committed value together with the version that wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// Raw value bytes.
    pub value: Vec<u8>,
    /// Commit height that produced this value.
    pub version: Version,
}

/// A key/value pair yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Identifier of the committed transaction.
    pub tx_id: String,
    /// Commit height assigned to the transaction's writes.
    /// Read-only transactions report the height they validated against.
    pub version: Version,
    /// Keys written, in key order.
    pub keys_written: Vec<String>,
}

impl CommitReceipt {
    /// True if the transaction wrote nothing.
    pub fn is_read_only(&self) -> bool {
        self.keys_written.is_empty()
    }
}

/// World state configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldStateConfig {
    /// Committed entries fetched per page by range iterators.
    pub range_page_size: usize,
}

impl Default for WorldStateConfig {
    fn default() -> Self {
        Self {
            range_page_size: DEFAULT_RANGE_PAGE_SIZE,
        }
    }
}

impl WorldStateConfig {
    /// Create configuration from environment variables.
    ///
    /// - `ML_RANGE_PAGE_SIZE`: entries per range page (default: 100)
    pub fn from_env() -> Result<Self, WorldStateError> {
        Self::from_page_size_var(env::var("ML_RANGE_PAGE_SIZE").ok().as_deref())
    }

    /// Build from the raw `ML_RANGE_PAGE_SIZE` value (`None` = unset).
    pub fn from_page_size_var(raw: Option<&str>) -> Result<Self, WorldStateError> {
        let range_page_size = match raw {
            Some(raw) => raw.trim().parse().map_err(|_| {
                WorldStateError::InvalidConfig(format!("ML_RANGE_PAGE_SIZE={raw:?} is not a number"))
            })?,
            None => DEFAULT_RANGE_PAGE_SIZE,
        };

        let config = Self { range_page_size };
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the range page size.
    pub fn with_range_page_size(mut self, range_page_size: usize) -> Self {
        self.range_page_size = range_page_size;
        self
    }

    pub fn validate(&self) -> Result<(), WorldStateError> {
        if self.range_page_size == 0 {
            return Err(WorldStateError::InvalidConfig(
                "range_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
