//! # ML-02 Medical Records - Patient Aggregate Contract
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Keeps one aggregate per patient on the world state: demographics plus
//! an append-only list of visits, stored as a single JSON value under the
//! patient's SSN.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One aggregate per SSN | `service.rs` - aggregate is always written at `record.key()` |
//! | Visits are append-only | `domain/entities.rs` - `records` is private, only `append_record` mutates it |
//! | No lost appends | world state commit validation (`ml-01-world-state`) |
//!
//! ## Outbound Dependencies
//!
//! | Crate | Trait | Purpose |
//! |-------|-------|---------|
//! | `ml-01-world-state` | `TransactionContext` | Read/write aggregates inside the caller's transaction |
//!
//! ## Usage Example
//!
//! ```ignore
//! use ml_01_world_state::{InMemoryWorldState, WorldState};
//! use ml_02_medical_records::prelude::*;
//!
//! let store = InMemoryWorldState::new();
//! let contract = MedicalRecordsContract::new();
//!
//! let tx = store.begin_transaction()?;
//! contract.register_new_patient(&tx, "111-22-3333", "Carol", 52, "Female")?;
//! contract.add_patient_record(&tx, "111-22-3333", "2023-01-01", "Dr. A", "North", "Cough", "Syrup")?;
//! store.commit(tx)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{ContractFunction, InvocationHandler};
    pub use crate::codec::{decode, encode};
    pub use crate::domain::{demo_patients, PatientRecord, Record};
    pub use crate::errors::ContractError;
    pub use crate::ports::inbound::MedicalRecordsApi;
    pub use crate::service::{ContractStats, MedicalRecordsContract};
}

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 2;

/// Subsystem name, as used in service names and log fields.
pub const SUBSYSTEM_NAME: &str = "medical-records";
