//! Referral-Guard entry point.

use anyhow::{Context, Result};
use guard_runtime::container::load_config;
use guard_runtime::GuardRuntime;
use guard_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .await
        .context("Failed to initialize telemetry")?;

    let config = load_config().context("Failed to load configuration")?;
    config
        .validate_for_production()
        .context("Configuration is not fit for production")?;

    let runtime = GuardRuntime::new(config);
    runtime.start().await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Received Ctrl-C");

    runtime.shutdown().await;
    Ok(())
}
