//! # Invocation Handler Adapter
//!
//! Routes a host invocation (function name plus positional string
//! arguments) to the matching contract operation and turns the result into
//! a response payload.
//!
//! | Function | Arguments | Payload |
//! |----------|-----------|---------|
//! | `InitLedger` | - | empty |
//! | `RegisterNewPatient` | ssn, name, age, gender | empty |
//! | `AddPatientRecord` | ssn, date, doctor, hospital, diagnosis, treatment | empty |
//! | `GetPatientRecordBySSN` | ssn | JSON aggregate |
//! | `GetAllMedicalRecords` | - | JSON array of aggregates |
//!
//! `CreatePatientRecord` is only reachable through `InitLedger`.

use crate::codec;
use crate::errors::ContractError;
use crate::ports::inbound::MedicalRecordsApi;
use ml_01_world_state::TransactionContext;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Externally invokable contract functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractFunction {
    InitLedger,
    RegisterNewPatient,
    AddPatientRecord,
    GetPatientRecordBySsn,
    GetAllMedicalRecords,
}

impl ContractFunction {
    pub const ALL: [ContractFunction; 5] = [
        Self::InitLedger,
        Self::RegisterNewPatient,
        Self::AddPatientRecord,
        Self::GetPatientRecordBySsn,
        Self::GetAllMedicalRecords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::InitLedger => "InitLedger",
            Self::RegisterNewPatient => "RegisterNewPatient",
            Self::AddPatientRecord => "AddPatientRecord",
            Self::GetPatientRecordBySsn => "GetPatientRecordBySSN",
            Self::GetAllMedicalRecords => "GetAllMedicalRecords",
        }
    }

    /// Names of the positional arguments, in order.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::InitLedger | Self::GetAllMedicalRecords => &[],
            Self::RegisterNewPatient => &["ssn", "name", "age", "gender"],
            Self::AddPatientRecord => &["ssn", "date", "doctor", "hospital", "diagnosis", "treatment"],
            Self::GetPatientRecordBySsn => &["ssn"],
        }
    }

    /// True for functions that never write.
    pub fn is_query(self) -> bool {
        matches!(self, Self::GetPatientRecordBySsn | Self::GetAllMedicalRecords)
    }
}

impl fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractFunction {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| ContractError::UnknownFunction(s.to_string()))
    }
}

/// Dispatches host invocations onto a `MedicalRecordsApi`.
pub struct InvocationHandler<A: MedicalRecordsApi> {
    api: Arc<A>,
}

impl<A: MedicalRecordsApi> InvocationHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run `function` with positional `args` inside the caller's transaction.
    ///
    /// Returns an empty payload for writes and JSON for queries.
    pub fn invoke<T, S>(&self, ctx: &T, function: &str, args: &[S]) -> Result<Vec<u8>, ContractError>
    where
        T: TransactionContext + ?Sized,
        S: AsRef<str>,
    {
        let function: ContractFunction = function.parse()?;
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        check_arity(function, &args)?;

        debug!(tx_id = %ctx.tx_id(), %function, "Dispatching invocation");

        match function {
            ContractFunction::InitLedger => {
                self.api.init_ledger(ctx)?;
                Ok(Vec::new())
            }
            ContractFunction::RegisterNewPatient => {
                let age = parse_age(function, args[2])?;
                self.api
                    .register_new_patient(ctx, args[0], args[1], age, args[3])?;
                Ok(Vec::new())
            }
            ContractFunction::AddPatientRecord => {
                self.api
                    .add_patient_record(ctx, args[0], args[1], args[2], args[3], args[4], args[5])?;
                Ok(Vec::new())
            }
            ContractFunction::GetPatientRecordBySsn => {
                let patient = self.api.get_patient_record_by_ssn(ctx, args[0])?;
                codec::encode(&patient)
            }
            ContractFunction::GetAllMedicalRecords => {
                let patients = self.api.get_all_medical_records(ctx)?;
                codec::encode_list(&patients)
            }
        }
    }
}

fn check_arity(function: ContractFunction, args: &[&str]) -> Result<(), ContractError> {
    let expected = function.parameters();
    if args.len() != expected.len() {
        return Err(ContractError::InvalidArgument {
            function: function.name().to_string(),
            reason: format!(
                "expected {} argument(s) ({}), got {}",
                expected.len(),
                expected.join(", "),
                args.len()
            ),
        });
    }
    Ok(())
}

fn parse_age(function: ContractFunction, raw: &str) -> Result<u32, ContractError> {
    raw.trim()
        .parse()
        .map_err(|_| ContractError::InvalidArgument {
            function: function.name().to_string(),
            reason: format!("age must be a non-negative integer, got {raw:?}"),
        })
}
