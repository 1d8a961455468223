//! Driving ports (Inbound API)

use crate::domain::{
    ActivityRequirement, ChannelRef, EngagementReport, SubscriptionVerdict, TaskRequirement,
    TaskVerdict, VerifyResult,
};
use async_trait::async_trait;
use shared_types::AccountId;

/// Channel engagement checks.
#[async_trait]
pub trait EngagementVerifierApi: Send + Sync {
    /// Scan the channel history for `user_id`'s comments.
    ///
    /// A channel that cannot be found or read is waived with a passing report.
    async fn verify(
        &self,
        user_id: AccountId,
        requirement: &ActivityRequirement,
    ) -> VerifyResult<EngagementReport>;
}

/// Channel subscription checks. Never fails: undecidable cases come back as
/// `SubscriptionVerdict::ActionRequired`.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn check(&self, user_id: AccountId, channel: &ChannelRef) -> SubscriptionVerdict;
}

/// Verification of any published task.
#[async_trait]
pub trait TaskVerificationApi: Send + Sync {
    async fn verify_task(
        &self,
        user_id: AccountId,
        requirement: &TaskRequirement,
    ) -> VerifyResult<TaskVerdict>;
}
