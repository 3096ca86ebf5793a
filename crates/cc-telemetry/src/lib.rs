//! # CC Telemetry
//!
//! Logging and metrics for Credential-Chain binaries.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   human-readable or JSON formatter, written to stderr
//! - **Metrics**: Prometheus invocation counters and latency histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `CC_JSON_LOGS` | `false` | Emit JSON log lines |
//! | `CC_SERVICE_NAME` | `credential-chain` | Service name attached to logs |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, record_invocation, register_metrics, InvocationTimer, INVOCATIONS,
    INVOCATION_DURATION, REGISTRY,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics and install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;
    Ok(())
}
