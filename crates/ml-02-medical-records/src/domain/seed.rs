//! Demo aggregates written by `InitLedger`.

use super::{PatientRecord, Record};

pub fn demo_patients() -> Vec<PatientRecord> {
    vec![
        PatientRecord::new("123-45-6789", "Alice", 30, "Female").with_records(vec![
            Record::new(
                "2022-01-01",
                "Dr. Smith",
                "General Hospital",
                "Flu",
                "Rest and fluids",
            ),
            Record::new(
                "2022-02-15",
                "Dr. Johnson",
                "City Hospital",
                "Broken leg",
                "Cast",
            ),
        ]),
        PatientRecord::new("234-56-7890", "Bob", 45, "Male").with_records(vec![
            Record::new(
                "2021-11-01",
                "Dr. Lee",
                "General Hospital",
                "Headache",
                "Ibuprofen",
            ),
            Record::new(
                "2022-03-10",
                "Dr. Johnson",
                "City Hospital",
                "Appendicitis",
                "Surgery",
            ),
        ]),
    ]
}
