//! Prometheus helpers.
//!
//! Component crates register their metrics in the default registry when built
//! with their `metrics` feature; this module renders that registry.

use lazy_static::lazy_static;
use prometheus::{register_int_gauge_vec, Encoder, IntGaugeVec, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Constant 1, labelled with the build version.
    pub static ref BUILD_INFO: IntGaugeVec = register_int_gauge_vec!(
        "referral_guard_build_info",
        "Referral-Guard build information",
        &["version"]
    )
    .expect("Failed to create BUILD_INFO metric");
}

/// Publish the build info gauge.
pub fn register_build_info() {
    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1);
}

/// Encode the default registry in text exposition format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
