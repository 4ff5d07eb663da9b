//! # Integration Test Flows
//!
//! Drives `ml-02-medical-records` through its invocation handler against
//! `ml-01-world-state`, committing each invocation like a host peer.
//!
//! ## Flows Tested:
//!
//! 1. **Bootstrap**: `InitLedger` then `GetAllMedicalRecords`
//! 2. **Visit history**: registration, appends, lookups across transactions
//! 3. **Rejections**: failed invocations never reach the committed state
//! 4. **Commit races**: concurrent appends to one patient, phantom listings

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use crate::integration::{init_test_logging, TestPeer};
    use ml_01_world_state::{TransactionContext, WorldState, WorldStateError};
    use ml_02_medical_records::prelude::*;

    const NO_ARGS: [&str; 0] = [];

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn bootstrapped_peer() -> TestPeer {
        let peer = TestPeer::from_env().unwrap();
        peer.submit("InitLedger", &NO_ARGS).unwrap();
        peer
    }

    fn lookup(peer: &TestPeer, ssn: &str) -> PatientRecord {
        let payload = peer.evaluate("GetPatientRecordBySSN", &[ssn]).unwrap();
        decode(&payload).unwrap()
    }

    fn visit(ssn: &str, date: &str) -> [String; 6] {
        [
            ssn.to_string(),
            date.to_string(),
            "Dr. Patel".to_string(),
            "Mercy Clinic".to_string(),
            "Sprain".to_string(),
            "Ice".to_string(),
        ]
    }

    // =============================================================================
    // BOOTSTRAP
    // =============================================================================

    #[test]
    fn test_init_ledger_then_list_returns_demo_patients() {
        let peer = bootstrapped_peer();

        let payload = peer.evaluate("GetAllMedicalRecords", &NO_ARGS).unwrap();
        let patients: Vec<PatientRecord> = serde_json::from_slice(&payload).unwrap();

        assert_eq!(patients, demo_patients());
        assert_eq!(patients[0].ssn, "123-45-6789");
        assert_eq!(patients[0].name, "Alice");
        assert_eq!(patients[0].records()[1].diagnosis, "Broken leg");
        assert_eq!(patients[1].ssn, "234-56-7890");
        assert_eq!(patients[1].age, 45);
        assert_eq!(patients[1].records()[0].treatment, "Ibuprofen");
    }

    #[test]
    fn test_init_ledger_commits_both_patients_at_once() {
        let peer = TestPeer::new();
        let receipt = peer.submit("InitLedger", &NO_ARGS).unwrap();

        assert_eq!(receipt.version, 1);
        assert_eq!(receipt.keys_written, vec!["123-45-6789", "234-56-7890"]);
        assert_eq!(peer.store.len(), 2);
    }

    #[test]
    fn test_listing_empty_ledger() {
        let peer = TestPeer::new();
        let payload = peer.evaluate("GetAllMedicalRecords", &NO_ARGS).unwrap();
        assert_eq!(payload, b"[]");
    }

    // =============================================================================
    // VISIT HISTORY
    // =============================================================================

    #[test]
    fn test_register_then_append_across_transactions() {
        let peer = TestPeer::new();
        peer.submit("RegisterNewPatient", &["555-00-1111", "Dana", "61", "Female"])
            .unwrap();

        for date in ["2024-01-10", "2024-02-11", "2024-03-12"] {
            let args = visit("555-00-1111", date);
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            peer.submit("AddPatientRecord", &args).unwrap();
        }

        let patient = lookup(&peer, "555-00-1111");
        let dates: Vec<&str> = patient.records().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-02-11", "2024-03-12"]);
        assert_eq!(patient.age, 61);
        assert_eq!(peer.store.height(), 4);
    }

    #[test]
    fn test_append_keeps_existing_history() {
        let peer = bootstrapped_peer();
        let before = lookup(&peer, "123-45-6789");

        let args = visit("123-45-6789", "2024-05-05");
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        peer.submit("AddPatientRecord", &args).unwrap();

        let after = lookup(&peer, "123-45-6789");
        assert_eq!(after.records().len(), before.records().len() + 1);
        assert_eq!(&after.records()[..2], before.records());
        assert_eq!(after.records()[2].hospital, "Mercy Clinic");
    }

    #[test]
    fn test_reregistration_wipes_history() {
        let peer = bootstrapped_peer();

        peer.submit("RegisterNewPatient", &["123-45-6789", "Alice", "31", "Female"])
            .unwrap();

        let patient = lookup(&peer, "123-45-6789");
        assert_eq!(patient.age, 31);
        assert!(patient.records().is_empty());
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[test]
    fn test_append_to_unknown_patient_leaves_store_untouched() {
        let peer = bootstrapped_peer();
        let snapshot = peer.store.snapshot();
        let height = peer.store.height();

        let args = visit("999-99-9999", "2024-01-01");
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let err = peer.submit("AddPatientRecord", &args).unwrap_err();

        assert_eq!(
            err,
            ContractError::NotRegistered {
                ssn: "999-99-9999".to_string()
            }
        );
        assert_eq!(peer.store.snapshot(), snapshot);
        assert_eq!(peer.store.height(), height);
    }

    #[test]
    fn test_lookup_unknown_patient() {
        let peer = bootstrapped_peer();
        let err = peer
            .evaluate("GetPatientRecordBySSN", &["000-00-0000"])
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "the patient record 000-00-0000 does not exist");
    }

    #[test]
    fn test_bad_arguments_never_commit() {
        let peer = TestPeer::new();

        assert!(peer
            .submit("RegisterNewPatient", &["555-00-1111", "Dana", "sixty", "Female"])
            .is_err());
        assert!(peer.submit("RegisterNewPatient", &["555-00-1111"]).is_err());
        assert!(peer.submit("CreatePatientRecord", &NO_ARGS).is_err());

        assert!(peer.store.is_empty());
        assert_eq!(peer.store.height(), 0);
    }

    #[test]
    fn test_evaluate_refuses_writes() {
        let peer = TestPeer::new();

        let err = peer
            .evaluate("RegisterNewPatient", &["555-00-1111", "Dana", "61", "Female"])
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { ref function, .. } if function == "RegisterNewPatient"));
        assert!(peer.evaluate("InitLedger", &NO_ARGS).is_err());

        assert_eq!(peer.contract().stats(), ContractStats::default());
        assert!(peer.store.is_empty());
    }

    #[test]
    fn test_queries_do_not_advance_height() {
        let peer = bootstrapped_peer();
        let height = peer.store.height();

        peer.evaluate("GetAllMedicalRecords", &NO_ARGS).unwrap();
        peer.evaluate("GetPatientRecordBySSN", &["234-56-7890"]).unwrap();

        assert_eq!(peer.store.height(), height);
        assert_eq!(peer.contract().stats().lookups, 1);
        assert_eq!(peer.contract().stats().listings, 1);
    }

    #[test]
    fn test_corrupt_entry_fails_listing() {
        let peer = bootstrapped_peer();

        let tx = peer.store.begin_transaction().unwrap();
        tx.put_state("200-00-0000", b"{\"ssn\":".to_vec()).unwrap();
        peer.store.commit(tx).unwrap();

        let err = peer.evaluate("GetAllMedicalRecords", &NO_ARGS).unwrap_err();
        assert!(matches!(err, ContractError::Decode(ref reason) if reason.contains("200-00-0000")));
    }

    // =============================================================================
    // COMMIT RACES
    // =============================================================================

    #[test]
    fn test_interleaved_appends_one_wins() {
        let peer = bootstrapped_peer();
        let before = lookup(&peer, "234-56-7890").records().len();

        let first = peer.store.begin_transaction().unwrap();
        let second = peer.store.begin_transaction().unwrap();

        let a = visit("234-56-7890", "2024-06-01");
        let b = visit("234-56-7890", "2024-06-02");
        peer.handler.invoke(&first, "AddPatientRecord", &a).unwrap();
        peer.handler.invoke(&second, "AddPatientRecord", &b).unwrap();

        peer.store.commit(first).unwrap();
        let err = peer.store.commit(second).unwrap_err();
        assert!(matches!(err, WorldStateError::MvccReadConflict { ref key, .. } if key == "234-56-7890"));
        assert!(ContractError::from(err).is_conflict());

        let after = lookup(&peer, "234-56-7890");
        assert_eq!(after.records().len(), before + 1);
        assert_eq!(after.records()[before].date, "2024-06-01");
    }

    #[test]
    fn test_threaded_appends_exactly_one_commits() {
        const WRITERS: usize = 8;

        let peer = Arc::new(bootstrapped_peer());
        let before = lookup(&peer, "123-45-6789").records().len();
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let peer = Arc::clone(&peer);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let tx = peer.store.begin_transaction().unwrap();
                    let args = visit("123-45-6789", &format!("2024-07-{:02}", i + 1));
                    peer.handler.invoke(&tx, "AddPatientRecord", &args).unwrap();
                    // Every writer has read the aggregate before anyone commits.
                    barrier.wait();
                    peer.store.commit(tx)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let committed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(WorldStateError::is_conflict));

        assert_eq!(lookup(&peer, "123-45-6789").records().len(), before + 1);
    }

    #[test]
    fn test_registration_during_listing_is_phantom() {
        let peer = bootstrapped_peer();

        let auditor = peer.store.begin_transaction().unwrap();
        peer.handler
            .invoke(&auditor, "GetAllMedicalRecords", &NO_ARGS)
            .unwrap();
        peer.handler
            .invoke(&auditor, "RegisterNewPatient", &["777-00-0000", "Eve", "40", "Female"])
            .unwrap();

        peer.submit("RegisterNewPatient", &["345-67-8901", "Frank", "28", "Male"])
            .unwrap();

        let err = peer.store.commit(auditor).unwrap_err();
        assert!(matches!(err, WorldStateError::PhantomReadConflict { .. }));
        assert!(peer.store.get_committed("777-00-0000").is_none());
    }

    #[test]
    fn test_logging_init_is_repeatable() {
        init_test_logging();
        init_test_logging();
    }
}
