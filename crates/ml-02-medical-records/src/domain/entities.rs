//! # Domain Entities
//!
//! The patient aggregate. One `PatientRecord` is stored per SSN and carries
//! the full visit history; the whole aggregate is read and written as a unit.

use serde::{Deserialize, Serialize};

/// A single visit entry. All fields are opaque text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub date: String,
    pub doctor: String,
    pub hospital: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl Record {
    pub fn new(
        date: impl Into<String>,
        doctor: impl Into<String>,
        hospital: impl Into<String>,
        diagnosis: impl Into<String>,
        treatment: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            doctor: doctor.into(),
            hospital: hospital.into(),
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
        }
    }
}

/// Patient aggregate root.
///
/// `ssn` doubles as the world state key. `records` is append-only: the only
/// mutation this type offers is `append_record`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientRecord {
    pub ssn: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    records: Vec<Record>,
}

impl PatientRecord {
    /// A freshly registered patient with no visit history.
    pub fn new(
        ssn: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            ssn: ssn.into(),
            name: name.into(),
            age,
            gender: gender.into(),
            records: Vec::new(),
        }
    }

    /// Builder method to seed an initial visit history.
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Storage key of this aggregate.
    pub fn key(&self) -> &str {
        &self.ssn
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn append_record(&mut self, record: Record) {
        self.records.push(record);
    }
}
