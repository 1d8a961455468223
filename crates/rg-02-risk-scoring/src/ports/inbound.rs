//! Driving ports (Inbound API)

use crate::config::RiskThresholds;
use crate::domain::RiskAssessment;
use async_trait::async_trait;
use shared_types::Account;

/// Risk scoring API used by the referral validator.
#[async_trait]
pub trait RiskScoringApi: Send + Sync {
    /// Score an account. Never fails: unavailable signals fall back to neutral.
    async fn assess(&self, account: &Account, thresholds: &RiskThresholds) -> RiskAssessment;
}
