//! # Driving Ports (API - Inbound)
//!
//! Contract operations as called by the invocation layer. Every method takes
//! the ambient transaction of the invocation; nothing here opens, commits or
//! retries transactions.

use crate::domain::PatientRecord;
use crate::errors::ContractError;
use ml_01_world_state::TransactionContext;

/// Medical records contract surface.
pub trait MedicalRecordsApi: Send + Sync {
    /// Seed the demo patients. Bootstrap only.
    fn init_ledger<T>(&self, ctx: &T) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized;

    /// Write `record` under its SSN, replacing whatever was stored there.
    fn create_patient_record<T>(&self, ctx: &T, record: &PatientRecord) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized;

    /// Store a new patient with an empty visit history.
    ///
    /// Overwrites any aggregate already stored under `ssn`.
    fn register_new_patient<T>(
        &self,
        ctx: &T,
        ssn: &str,
        name: &str,
        age: u32,
        gender: &str,
    ) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized;

    /// Append one visit to an existing patient.
    #[allow(clippy::too_many_arguments)]
    fn add_patient_record<T>(
        &self,
        ctx: &T,
        ssn: &str,
        date: &str,
        doctor: &str,
        hospital: &str,
        diagnosis: &str,
        treatment: &str,
    ) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized;

    fn get_patient_record_by_ssn<T>(&self, ctx: &T, ssn: &str) -> Result<PatientRecord, ContractError>
    where
        T: TransactionContext + ?Sized;

    /// Every stored aggregate in key order. Fails on the first entry that
    /// does not decode.
    fn get_all_medical_records<T>(&self, ctx: &T) -> Result<Vec<PatientRecord>, ContractError>
    where
        T: TransactionContext + ?Sized;
}
