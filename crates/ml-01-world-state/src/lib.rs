//! # ml-01-world-state
//!
//! Transactional key-value world state for MedLedger contracts.
//!
//! ## Role in System
//!
//! - **Collaborator of the contract layer**: every contract operation runs
//!   against one `TransactionContext` and never touches storage any other way
//! - **Optimistic Concurrency Control**: transactions record what they read;
//!   commit re-checks those versions and rejects stale writers
//!
//! ## Transaction Lifecycle
//!
//! ```text
//! begin_transaction() ──→ get_state / put_state / get_state_by_range
//!                                          │
//!                                          ↓
//!                         commit(tx) ── validate read set ──┬─→ apply writes (height + 1)
//!                                                          └─→ MvccReadConflict / PhantomReadConflict
//! ```
//!
//! Dropping a transaction instead of committing it discards its writes.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
