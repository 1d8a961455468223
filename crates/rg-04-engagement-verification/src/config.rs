//! # Engagement Verification Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// History-scan session lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanClientConfig {
    /// Minimum gap between reconnect attempts after a failure.
    pub reconnect_cooldown_secs: u64,
    /// Consecutive failures before the session disables itself.
    pub max_consecutive_failures: u32,
    pub connect_timeout_secs: u64,
    /// Deadline for each resolve / fetch call.
    pub call_timeout_secs: u64,
    /// Minimum gap between health probes.
    pub health_check_interval_secs: u64,
}

impl Default for ScanClientConfig {
    fn default() -> Self {
        Self {
            reconnect_cooldown_secs: 300,
            max_consecutive_failures: 5,
            connect_timeout_secs: 30,
            call_timeout_secs: 15,
            health_check_interval_secs: 3_600,
        }
    }
}

impl ScanClientConfig {
    pub fn reconnect_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reconnect_cooldown_secs as i64)
    }

    pub fn health_check_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.health_check_interval_secs as i64)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Cost bounds of one engagement scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Channel messages inspected per scan, newest first.
    pub message_cap: usize,
    /// Replies inspected per message.
    pub reply_cap: usize,
    /// Page size for history and reply fetches.
    pub page_size: usize,
    /// Whole-scan deadline.
    pub request_timeout_secs: u64,
    /// Deadline for one membership lookup.
    pub membership_timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            message_cap: 1_000,
            reply_cap: 100,
            page_size: 100,
            request_timeout_secs: 120,
            membership_timeout_secs: 10,
        }
    }
}

impl VerifierConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn membership_timeout(&self) -> Duration {
        Duration::from_secs(self.membership_timeout_secs)
    }
}
