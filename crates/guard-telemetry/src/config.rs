//! Telemetry configuration from environment variables.

use std::env;

/// Logging and tracing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to spans.
    pub service_name: String,

    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target).
    pub log_level: String,

    /// One JSON object per line instead of the pretty format.
    pub json_logs: bool,

    /// Export spans over OTLP.
    pub otlp_enabled: bool,

    /// OTLP gRPC endpoint.
    pub otlp_endpoint: String,

    /// Deployment label (dev, staging, prod).
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "referral-guard".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            otlp_enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            environment: "dev".to_string(),
        }
    }
}

fn flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `OTEL_SERVICE_NAME`: service name (default: referral-guard)
    /// - `RG_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `RG_JSON_LOGS`: JSON output (default: true inside containers)
    /// - `RG_OTLP_ENABLED`: export spans (default: false)
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: http://localhost:4317)
    /// - `RG_ENVIRONMENT`: deployment label (default: dev)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();
        let defaults = Self::default();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: env::var("RG_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: env::var("RG_JSON_LOGS")
                .map(|v| flag(&v))
                .unwrap_or(is_container),
            otlp_enabled: env::var("RG_OTLP_ENABLED")
                .map(|v| flag(&v))
                .unwrap_or(false),
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or(defaults.otlp_endpoint),
            environment: env::var("RG_ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "referral-guard");
        assert_eq!(config.log_level, "info");
        assert!(!config.otlp_enabled);
    }

    #[test]
    fn test_flag_parsing() {
        assert!(flag("TRUE"));
        assert!(flag("1"));
        assert!(!flag("yes"));
        assert!(!flag("0"));
    }
}
