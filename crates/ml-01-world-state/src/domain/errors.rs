//! # Domain Errors
//!
//! Error types for the World State subsystem.

use super::Version;
use thiserror::Error;

/// World state error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldStateError {
    /// Keys must be non-empty strings.
    #[error("Key must not be empty")]
    EmptyKey,

    /// A key read by the transaction was overwritten by a later commit.
    #[error("MVCC read conflict on key {key}: read version {read_version:?}, committed version {committed_version:?}")]
    MvccReadConflict {
        /// Conflicting key
        key: String,
        /// Version observed when the transaction read the key (`None` = absent)
        read_version: Option<Version>,
        /// Version currently committed (`None` = absent)
        committed_version: Option<Version>,
    },

    /// A range scanned by the transaction changed before commit.
    #[error("Phantom read conflict in range [{start_key:?}, {end_key:?})")]
    PhantomReadConflict {
        /// Inclusive start of the scanned range (empty = unbounded)
        start_key: String,
        /// Exclusive end of the scanned range (empty = unbounded)
        end_key: String,
    },

    /// Invalid store configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backing store failure.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl WorldStateError {
    /// Returns true if the transaction was rejected by concurrency control
    /// and may succeed if re-executed against fresh state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::MvccReadConflict { .. } | Self::PhantomReadConflict { .. }
        )
    }
}
