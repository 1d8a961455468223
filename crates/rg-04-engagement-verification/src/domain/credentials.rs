//! Scan-session credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Application id/hash plus the serialised user session.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanCredentials {
    pub api_id: i32,
    pub api_hash: String,
    pub session: String,
}

impl ScanCredentials {
    pub fn new(api_id: i32, api_hash: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            api_id,
            api_hash: api_hash.into(),
            session: session.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.api_id != 0 && !self.api_hash.is_empty() && !self.session.is_empty()
    }
}

// Secrets stay out of logs.
impl fmt::Debug for ScanCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanCredentials")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("session", &"<redacted>")
            .finish()
    }
}
