//! # Medical Records Contract
//!
//! Contract operations over the world state. Each call reads the current
//! aggregate through the caller's transaction, applies its change, and
//! writes the whole aggregate back through the same transaction.
//!
//! ## Append Protocol
//!
//! ```text
//! get_state(ssn) ──absent──→ NotRegistered (nothing written)
//!       │
//!       ↓
//!   decode ──malformed──→ Decode
//!       │
//!       ↓
//!  append_record → encode → put_state(ssn)
//! ```
//!
//! Two transactions appending to the same patient both read the same
//! version of the key; the world state rejects the second commit, so one
//! of the appends is never silently lost.

use crate::codec;
use crate::domain::{demo_patients, PatientRecord, Record};
use crate::errors::ContractError;
use crate::ports::inbound::MedicalRecordsApi;
use ml_01_world_state::TransactionContext;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Counters for contract invocations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContractStats {
    /// Aggregates written by registration or seeding.
    pub patients_written: u64,
    /// Visits appended.
    pub records_appended: u64,
    /// Point lookups served.
    pub lookups: u64,
    /// Full listings served.
    pub listings: u64,
    /// Operations that returned an error.
    pub failed_operations: u64,
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    CreatePatient,
    AppendRecord,
    Lookup,
    Listing,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Self::CreatePatient => "create_patient_record",
            Self::AppendRecord => "add_patient_record",
            Self::Lookup => "get_patient_record_by_ssn",
            Self::Listing => "get_all_medical_records",
        }
    }
}

/// The medical records contract.
///
/// Holds no world state of its own; the only thing it keeps between calls
/// is `ContractStats`.
#[derive(Debug, Default, Clone)]
pub struct MedicalRecordsContract {
    stats: Arc<RwLock<ContractStats>>,
}

impl MedicalRecordsContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ContractStats {
        self.stats.read().clone()
    }

    fn track<R>(&self, operation: Operation, result: Result<R, ContractError>) -> Result<R, ContractError> {
        let mut stats = self.stats.write();
        match &result {
            Ok(_) => match operation {
                Operation::CreatePatient => stats.patients_written += 1,
                Operation::AppendRecord => stats.records_appended += 1,
                Operation::Lookup => stats.lookups += 1,
                Operation::Listing => stats.listings += 1,
            },
            Err(e) => {
                stats.failed_operations += 1;
                warn!(operation = operation.name(), error = %e, "Contract operation failed");
            }
        }
        result
    }

    fn write_patient<T>(ctx: &T, record: &PatientRecord) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        let bytes = codec::encode(record)?;
        ctx.put_state(record.key(), bytes)?;
        Ok(())
    }

    fn read_patient<T>(ctx: &T, ssn: &str) -> Result<Option<PatientRecord>, ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        match ctx.get_state(ssn)? {
            Some(bytes) => codec::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Scan the whole key space, stopping at the first entry that fails to
    /// decode. Returning early drops the iterator and releases the scan.
    fn list_patients<T>(ctx: &T) -> Result<Vec<PatientRecord>, ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        let mut patients = Vec::new();
        for entry in ctx.get_state_by_range("", "")? {
            let kv = entry?;
            let patient = codec::decode(&kv.value).map_err(|e| match e {
                ContractError::Decode(reason) => {
                    ContractError::Decode(format!("key {}: {}", kv.key, reason))
                }
                other => other,
            })?;
            patients.push(patient);
        }
        debug!(count = patients.len(), "Listed patient records");
        Ok(patients)
    }
}

impl MedicalRecordsApi for MedicalRecordsContract {
    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn init_ledger<T>(&self, ctx: &T) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        for patient in demo_patients() {
            info!(name = %patient.name, "Adding patient");
            self.create_patient_record(ctx, &patient)?;
        }
        Ok(())
    }

    #[instrument(skip(self, ctx, record), fields(tx_id = %ctx.tx_id(), ssn = %record.ssn))]
    fn create_patient_record<T>(&self, ctx: &T, record: &PatientRecord) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        info!(
            name = %record.name,
            records = record.records().len(),
            "Creating patient with records"
        );
        self.track(Operation::CreatePatient, Self::write_patient(ctx, record))
    }

    #[instrument(skip(self, ctx, name, gender), fields(tx_id = %ctx.tx_id()))]
    fn register_new_patient<T>(
        &self,
        ctx: &T,
        ssn: &str,
        name: &str,
        age: u32,
        gender: &str,
    ) -> Result<(), ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        let patient = PatientRecord::new(ssn, name, age, gender);
        info!(name = %patient.name, "Registering new patient");

        self.track(Operation::CreatePatient, Self::write_patient(ctx, &patient))?;

        info!(name = %patient.name, ssn = %patient.ssn, "New patient registered");
        Ok(())
    }

    #[instrument(
        skip(self, ctx, date, doctor, hospital, diagnosis, treatment),
        fields(tx_id = %ctx.tx_id())
    )]
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
        T: TransactionContext + ?Sized,
    {
        let result = Self::read_patient(ctx, ssn).and_then(|existing| {
            let mut patient = existing.ok_or_else(|| ContractError::NotRegistered {
                ssn: ssn.to_string(),
            })?;

            patient.append_record(Record::new(date, doctor, hospital, diagnosis, treatment));
            Self::write_patient(ctx, &patient)?;

            debug!(records = patient.records().len(), "Record appended");
            Ok(())
        });
        self.track(Operation::AppendRecord, result)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn get_patient_record_by_ssn<T>(&self, ctx: &T, ssn: &str) -> Result<PatientRecord, ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        let result = Self::read_patient(ctx, ssn).and_then(|existing| {
            existing.ok_or_else(|| ContractError::NotFound {
                ssn: ssn.to_string(),
            })
        });
        self.track(Operation::Lookup, result)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn get_all_medical_records<T>(&self, ctx: &T) -> Result<Vec<PatientRecord>, ContractError>
    where
        T: TransactionContext + ?Sized,
    {
        let result = Self::list_patients(ctx);
        self.track(Operation::Listing, result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
