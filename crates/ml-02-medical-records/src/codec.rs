//! # Aggregate Codec
//!
//! JSON encoding of `PatientRecord` for the world state:
//!
//! ```text
//! {"ssn":"123-45-6789","name":"Alice","age":30,"gender":"Female",
//!  "records":[{"date":"...","doctor":"...","hospital":"...","diagnosis":"...","treatment":"..."}]}
//! ```
//!
//! The schema comes from the `serde` derives on the domain types. Every
//! field is required and unknown fields are rejected, so anything that is
//! not exactly a patient aggregate fails to decode.

use crate::domain::PatientRecord;
use crate::errors::ContractError;

pub fn encode(record: &PatientRecord) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(record).map_err(|e| ContractError::Encode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<PatientRecord, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Decode(e.to_string()))
}

/// Encode a listing result as a JSON array.
pub fn encode_list(records: &[PatientRecord]) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(records).map_err(|e| ContractError::Encode(e.to_string()))
}
