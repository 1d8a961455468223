//! Task verification: one arm per task kind.

use crate::domain::{TaskRequirement, TaskVerdict, VerifyResult};
use crate::ports::{EngagementVerifierApi, SubscriptionApi, TaskVerificationApi};
use async_trait::async_trait;
use shared_types::AccountId;
use std::sync::Arc;

pub struct TaskVerifier<E, S>
where
    E: EngagementVerifierApi,
    S: SubscriptionApi,
{
    engagement: Arc<E>,
    subscription: Arc<S>,
}

impl<E, S> TaskVerifier<E, S>
where
    E: EngagementVerifierApi,
    S: SubscriptionApi,
{
    pub fn new(engagement: Arc<E>, subscription: Arc<S>) -> Self {
        Self {
            engagement,
            subscription,
        }
    }
}

#[async_trait]
impl<E, S> TaskVerificationApi for TaskVerifier<E, S>
where
    E: EngagementVerifierApi,
    S: SubscriptionApi,
{
    async fn verify_task(
        &self,
        user_id: AccountId,
        requirement: &TaskRequirement,
    ) -> VerifyResult<TaskVerdict> {
        match requirement {
            TaskRequirement::ChannelActivity(activity) => self
                .engagement
                .verify(user_id, activity)
                .await
                .map(TaskVerdict::Engagement),
            TaskRequirement::ChannelSubscription { channel } => Ok(TaskVerdict::Subscription(
                self.subscription.check(user_id, channel).await,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ActivityRequirement, ChannelRef, EngagementReport, SubscriptionVerdict, VerifyError,
    };
    use chrono::{TimeZone, Utc};

    struct FixedEngagement(Result<EngagementReport, VerifyError>);

    #[async_trait]
    impl EngagementVerifierApi for FixedEngagement {
        async fn verify(
            &self,
            _user_id: AccountId,
            _requirement: &ActivityRequirement,
        ) -> VerifyResult<EngagementReport> {
            self.0.clone()
        }
    }

    struct FixedSubscription(SubscriptionVerdict);

    #[async_trait]
    impl SubscriptionApi for FixedSubscription {
        async fn check(&self, _user_id: AccountId, _channel: &ChannelRef) -> SubscriptionVerdict {
            self.0.clone()
        }
    }

    fn activity() -> TaskRequirement {
        TaskRequirement::ChannelActivity(ActivityRequirement {
            channel: ChannelRef::parse("@partner").unwrap(),
            min_comments: 5,
            min_posts: 3,
            window_days: 7,
            window_start: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        })
    }

    #[tokio::test]
    async fn test_dispatch_by_kind() {
        let report = EngagementReport {
            passed: false,
            found_comments: 5,
            found_posts: 2,
            messages_inspected: 40,
            waived: None,
        };
        let verifier = TaskVerifier::new(
            Arc::new(FixedEngagement(Ok(report.clone()))),
            Arc::new(FixedSubscription(SubscriptionVerdict::Subscribed)),
        );

        let verdict = verifier.verify_task(1, &activity()).await.unwrap();
        assert_eq!(verdict, TaskVerdict::Engagement(report));
        assert!(!verdict.passed());

        let subscription = TaskRequirement::ChannelSubscription {
            channel: ChannelRef::parse("@partner").unwrap(),
        };
        let verdict = verifier.verify_task(1, &subscription).await.unwrap();
        assert!(verdict.passed());
    }

    #[tokio::test]
    async fn test_engagement_error_propagates() {
        let verifier = TaskVerifier::new(
            Arc::new(FixedEngagement(Err(VerifyError::RateLimited {
                retry_after_secs: 60,
            }))),
            Arc::new(FixedSubscription(SubscriptionVerdict::Subscribed)),
        );
        assert_eq!(
            verifier.verify_task(1, &activity()).await,
            Err(VerifyError::RateLimited {
                retry_after_secs: 60
            })
        );
    }
}
