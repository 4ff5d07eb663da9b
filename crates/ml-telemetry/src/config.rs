//! Telemetry configuration from environment variables.

use std::env;

/// Channel used when `ML_CHANNEL` is unset.
pub const DEFAULT_CHANNEL: &str = "mychannel";

/// Configuration for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Subsystem identifier (01, 02, ...; 00 = whole node)
    pub subsystem_id: String,

    /// Log level filter (trace, debug, info, warn, error) or full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Ledger channel the contract is deployed on
    pub channel: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "medledger".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            channel: DEFAULT_CHANNEL.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: medledger)
    /// - `ML_SUBSYSTEM_ID`: Subsystem ID (default: 00)
    /// - `ML_LOG_LEVEL`, then `RUST_LOG`: Log level (default: info)
    /// - `ML_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `ML_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `ML_CHANNEL`: Ledger channel name (default: mychannel)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "medledger".to_string()),

            subsystem_id: env::var("ML_SUBSYSTEM_ID").unwrap_or_else(|_| "00".to_string()),

            log_level: resolve_log_level(env::var("ML_LOG_LEVEL").ok(), env::var("RUST_LOG").ok()),

            console_output: env::var("ML_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("ML_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            channel: env::var("ML_CHANNEL").unwrap_or_else(|_| DEFAULT_CHANNEL.to_string()),
        }
    }

    /// Create configuration for a specific subsystem.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        let mut config = Self::from_env();
        config.subsystem_id = subsystem_id.to_string();
        config.service_name = format!("ml-{}-{}", subsystem_id, subsystem_name);
        config
    }

    /// Get the full service name including subsystem.
    pub fn full_service_name(&self) -> String {
        if self.subsystem_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.subsystem_id)
        }
    }
}

/// `ML_LOG_LEVEL` wins over `RUST_LOG`; blank values count as unset.
fn resolve_log_level(ml_log_level: Option<String>, rust_log: Option<String>) -> String {
    ml_log_level
        .into_iter()
        .chain(rust_log)
        .find(|level| !level.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
