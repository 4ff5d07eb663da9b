//! # Ports Layer
//!
//! - **Driving Port (Inbound)**: `MedicalRecordsApi`
//! - **Driven Port (Outbound)**: `TransactionContext`, re-exported from
//!   `ml-01-world-state`

pub mod inbound;

pub use inbound::*;
pub use ml_01_world_state::{StateIterator, TransactionContext};
