//! # Guard Telemetry
//!
//! Logging, tracing and metrics plumbing shared by the Referral-Guard binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).await.expect("telemetry");
//!     // spans and logs are collected until the guard is dropped
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RG_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `RG_JSON_LOGS` | `true` in containers | JSON log lines |
//! | `RG_OTLP_ENABLED` | `false` | Export spans over OTLP |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | `http://localhost:4317` | OTLP endpoint |
//! | `OTEL_SERVICE_NAME` | `referral-guard` | Service name in spans |

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, register_build_info, BUILD_INFO};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and tracing, and publish build info.
///
/// Hold the returned guard for the lifetime of the process; dropping it
/// flushes pending spans.
pub async fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_build_info();
    let tracing = tracing_setup::init_tracing(&config).await?;
    Ok(TelemetryGuard { _tracing: tracing })
}

/// Keeps telemetry active. Drop to flush and shut down.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}
