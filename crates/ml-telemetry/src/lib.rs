//! # ML Telemetry
//!
//! Structured logging for MedLedger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ml_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_subsystem("02", "medical-records");
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `medledger` | Service name in logs |
//! | `ML_LOG_LEVEL`, else `RUST_LOG` | `info` | Log level filter |
//! | `ML_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `ML_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `ML_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `ML_CHANNEL` | `mychannel` | Ledger channel name |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_CHANNEL};
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
