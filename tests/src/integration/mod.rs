//! # Integration Flows
//!
//! Submit/evaluate helpers shared by the flow tests and benchmarks.

use ml_01_world_state::{CommitReceipt, InMemoryWorldState, WorldState, WorldStateError};
use ml_02_medical_records::prelude::*;
use std::sync::{Arc, Once};

pub mod flows;

static LOGGING: Once = Once::new();

/// Install the test subscriber once per process. `RUST_LOG` controls output.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = ml_telemetry::TelemetryConfig::for_subsystem(
            &format!("{:02}", ml_02_medical_records::SUBSYSTEM_ID),
            ml_02_medical_records::SUBSYSTEM_NAME,
        );
        // Another harness may already own the global subscriber.
        let _ = ml_telemetry::init_logging(&config);
    });
}

/// A contract deployed on an in-memory peer.
pub struct TestPeer {
    pub store: InMemoryWorldState,
    pub handler: InvocationHandler<MedicalRecordsContract>,
}

impl TestPeer {
    pub fn new() -> Self {
        Self::with_store(InMemoryWorldState::new())
    }

    /// Peer whose store honours `ML_RANGE_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, WorldStateError> {
        Ok(Self::with_store(InMemoryWorldState::from_env()?))
    }

    pub fn with_store(store: InMemoryWorldState) -> Self {
        init_test_logging();
        Self {
            store,
            handler: InvocationHandler::new(Arc::new(MedicalRecordsContract::new())),
        }
    }

    /// Run `function` in a fresh transaction and commit it if the contract
    /// succeeds. A failed invocation is discarded without touching the store.
    pub fn submit(&self, function: &str, args: &[&str]) -> Result<CommitReceipt, ContractError> {
        let tx = self.store.begin_transaction()?;
        self.handler.invoke(&tx, function, args)?;
        Ok(self.store.commit(tx)?)
    }

    /// Run a query in a fresh transaction that is never committed. Write
    /// functions are refused; they go through `submit`.
    pub fn evaluate(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, ContractError> {
        let parsed: ContractFunction = function.parse()?;
        if !parsed.is_query() {
            return Err(ContractError::InvalidArgument {
                function: function.to_string(),
                reason: "not a query; submit it instead".to_string(),
            });
        }
        let tx = self.store.begin_transaction()?;
        self.handler.invoke(&tx, function, args)
    }

    pub fn contract(&self) -> &MedicalRecordsContract {
        self.handler.api()
    }
}

impl Default for TestPeer {
    fn default() -> Self {
        Self::new()
    }
}
