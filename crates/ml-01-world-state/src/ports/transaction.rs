//! # Driven Ports (SPI)
//!
//! The world state as seen from contract code: a transaction handle scoped
//! to exactly one invocation, and the store that hands such handles out and
//! commits them.
//!
//! ## Consistency Contract
//!
//! - Writes are buffered in the transaction and visible to its own later
//!   reads; they become durable only when the store commits the transaction.
//! - If two transactions read the same version of a key and both write it,
//!   at most one commit succeeds. The other fails with a conflict error and
//!   leaves the store unchanged.

use crate::domain::{CommitReceipt, KeyValue, WorldStateError};

/// Lazy, key-ordered sequence of range scan results.
///
/// Whatever the iterator holds is released when it is dropped, whether the
/// caller drained it, stopped early, or bailed out on an error.
pub type StateIterator<'a> = Box<dyn Iterator<Item = Result<KeyValue, WorldStateError>> + 'a>;

/// Ambient transaction handle passed into every contract operation.
pub trait TransactionContext: Send + Sync {
    /// Identifier of this transaction.
    fn tx_id(&self) -> &str;

    /// Read a key. `Ok(None)` if the key does not exist.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, WorldStateError>;

    /// Buffer a write of `value` at `key`.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), WorldStateError>;

    /// Scan `[start_key, end_key)` in lexicographic key order.
    ///
    /// An empty `start_key` or `end_key` leaves that side unbounded, so
    /// `("", "")` covers the whole key space.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateIterator<'_>, WorldStateError>;
}

/// Transactional key-value store.
pub trait WorldState: Send + Sync {
    type Transaction: TransactionContext;

    /// Open a transaction against the current committed state.
    fn begin_transaction(&self) -> Result<Self::Transaction, WorldStateError>;

    /// Validate the transaction's reads and, if none went stale, apply its
    /// writes atomically.
    fn commit(&self, tx: Self::Transaction) -> Result<CommitReceipt, WorldStateError>;
}
