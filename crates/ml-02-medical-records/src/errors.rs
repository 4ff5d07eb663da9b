//! # Error Types
//!
//! All error types for medical records contract operations.

use ml_01_world_state::WorldStateError;
use thiserror::Error;

/// Errors returned by contract operations and the invocation handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The aggregate could not be serialized.
    #[error("failed to encode patient record: {0}")]
    Encode(String),

    /// Stored bytes are malformed or do not match the aggregate schema.
    #[error("failed to decode patient record: {0}")]
    Decode(String),

    /// No aggregate is stored under the requested SSN.
    #[error("the patient record {ssn} does not exist")]
    NotFound {
        /// Requested SSN
        ssn: String,
    },

    /// A visit was submitted for an SSN that has no aggregate yet.
    #[error("the patient record {ssn} does not exist. Please register the patient first")]
    NotRegistered {
        /// Requested SSN
        ssn: String,
    },

    /// World state failure, including commit-time conflicts.
    #[error("world state error: {0}")]
    Store(#[from] WorldStateError),

    /// Positional arguments did not match the function signature.
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArgument {
        /// Invoked function name
        function: String,
        /// What was wrong
        reason: String,
    },

    /// The invoked function name is not part of the contract surface.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
}

impl ContractError {
    /// Returns true if the failure is a concurrency rejection and the
    /// invocation may succeed if submitted again.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotRegistered { .. })
    }
}
