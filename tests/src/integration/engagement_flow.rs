//! # Engagement Flow
//!
//! Task verification through the wired container:
//!
//! - **Channel activity**: comments per post inside the task window, read
//!   through the history-scan session
//! - **Channel subscription**: one membership lookup, failing closed
//! - **Session lifecycle**: expired credentials disable the session until
//!   they are rotated

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use rg_04_engagement_verification::{
        ActivityRequirement, ChannelRef, MemberStatus, ScanCredentials, SessionState,
        SubscriptionVerdict, TaskRequirement, TaskVerdict, TaskVerificationApi, VerifyError,
    };
    use shared_types::{AccountId, ExternalError, Timestamp};

    use super::super::fixtures::{container, t0};
    use guard_runtime::RuntimeConfig;

    const USER: AccountId = 310_000_000;
    const STRANGER: AccountId = 310_000_001;
    const CHANNEL: &str = "partner_news";

    fn config() -> RuntimeConfig {
        RuntimeConfig {
            engagement_tasks_enabled: true,
            scan_credentials: Some(ScanCredentials::new(1001, "api-hash", "session-blob")),
            ..RuntimeConfig::default()
        }
    }

    fn channel() -> ChannelRef {
        ChannelRef::parse(&format!("https://t.me/{CHANNEL}")).unwrap()
    }

    fn activity(min_comments: u32, min_posts: u32) -> TaskRequirement {
        TaskRequirement::ChannelActivity(ActivityRequirement {
            channel: channel(),
            min_comments,
            min_posts,
            window_days: 7,
            window_start: t0(),
        })
    }

    fn at(hours: i64) -> Timestamp {
        t0() + Duration::hours(hours)
    }

    fn engagement(verdict: TaskVerdict) -> rg_04_engagement_verification::EngagementReport {
        match verdict {
            TaskVerdict::Engagement(report) => report,
            other => panic!("expected an engagement verdict, got {other:?}"),
        }
    }

    // =========================================================================
    // CHANNEL ACTIVITY
    // =========================================================================

    /// Five comments spread over only two posts do not satisfy a
    /// three-post requirement.
    #[tokio::test]
    async fn test_comments_on_too_few_posts_fail() {
        let (c, _clock) = container(config(), t0() + Duration::days(10));
        for (post, hour) in [(1, 2), (2, 20), (3, 40)] {
            c.history.add_post(CHANNEL, post, at(hour));
        }
        for (reply, hour) in [(101, 3), (102, 4), (103, 5)] {
            c.history.add_reply(CHANNEL, 1, reply, USER, at(hour));
        }
        for (reply, hour) in [(201, 21), (202, 30)] {
            c.history.add_reply(CHANNEL, 2, reply, USER, at(hour));
        }
        c.history.add_reply(CHANNEL, 3, 301, STRANGER, at(41));

        let verdict = c.tasks.verify_task(USER, &activity(5, 3)).await.unwrap();
        assert!(!verdict.passed());
        let report = engagement(verdict);
        assert!(!report.passed);
        assert_eq!(report.found_comments, 5);
        assert_eq!(report.found_posts, 2);
        assert!(report.waived.is_none());
    }

    #[tokio::test]
    async fn test_comments_on_enough_posts_pass() {
        let (c, _clock) = container(config(), t0() + Duration::days(10));
        for (post, hour) in [(1, 2), (2, 20), (3, 40)] {
            c.history.add_post(CHANNEL, post, at(hour));
            c.history.add_reply(CHANNEL, post, post * 100, USER, at(hour + 1));
        }
        c.history.add_reply(CHANNEL, 3, 301, USER, at(50));
        c.history.add_reply(CHANNEL, 3, 302, USER, at(60));

        let report = engagement(c.tasks.verify_task(USER, &activity(5, 3)).await.unwrap());
        assert!(report.passed);
        assert_eq!((report.found_comments, report.found_posts), (5, 3));
    }

    /// Replies after the seven-day window do not count even on in-window posts.
    #[tokio::test]
    async fn test_replies_outside_window_ignored() {
        let (c, _clock) = container(config(), t0() + Duration::days(30));
        c.history.add_post(CHANNEL, 1, at(1));
        c.history.add_reply(CHANNEL, 1, 101, USER, at(2));
        c.history
            .add_reply(CHANNEL, 1, 102, USER, t0() + Duration::days(8));
        c.history
            .add_reply(CHANNEL, 1, 103, USER, t0() - Duration::hours(1));

        let report = engagement(c.tasks.verify_task(USER, &activity(2, 1)).await.unwrap());
        assert!(!report.passed);
        assert_eq!(report.found_comments, 1);
    }

    /// A channel that no longer exists is not the user's fault.
    #[tokio::test]
    async fn test_missing_channel_waived() {
        let (c, _clock) = container(config(), t0() + Duration::days(10));
        c.history.set_unavailable(CHANNEL, ExternalError::ChannelNotFound);

        let verdict = c.tasks.verify_task(USER, &activity(5, 3)).await.unwrap();
        assert!(verdict.passed());
    }

    // =========================================================================
    // CHANNEL SUBSCRIPTION
    // =========================================================================

    #[tokio::test]
    async fn test_subscription_task_verdicts() {
        let (c, _clock) = container(config(), t0());
        let task = TaskRequirement::ChannelSubscription { channel: channel() };
        c.members.set_status(&channel(), USER, MemberStatus::Member);
        c.members.set_status(&channel(), STRANGER, MemberStatus::Kicked);

        let member = c.tasks.verify_task(USER, &task).await.unwrap();
        assert!(member.passed());
        assert_eq!(
            member,
            TaskVerdict::Subscription(SubscriptionVerdict::Subscribed)
        );

        let banned = c.tasks.verify_task(STRANGER, &task).await.unwrap();
        assert_eq!(banned, TaskVerdict::Subscription(SubscriptionVerdict::Banned));

        let unknown = c.tasks.verify_task(USER + 2, &task).await.unwrap();
        assert_eq!(
            unknown,
            TaskVerdict::Subscription(SubscriptionVerdict::NotSubscribed)
        );
    }

    #[tokio::test]
    async fn test_subscription_lookup_failure_fails_closed() {
        let (c, _clock) = container(config(), t0());
        c.members
            .set_channel_error(&channel(), ExternalError::Transient("bot api 502".into()));
        let task = TaskRequirement::ChannelSubscription { channel: channel() };

        let verdict = c.tasks.verify_task(USER, &task).await.unwrap();
        assert!(!verdict.passed());
        assert!(matches!(
            verdict,
            TaskVerdict::Subscription(SubscriptionVerdict::ActionRequired(_))
        ));
    }

    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_expired_session_disabled_until_rotation() {
        let (c, _clock) = container(config(), t0() + Duration::days(10));
        c.history.add_post(CHANNEL, 1, at(1));
        c.history.add_reply(CHANNEL, 1, 101, USER, at(2));
        c.history
            .fail_next_connects([ExternalError::AuthExpired("session revoked".into())]);

        let err = c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap_err();
        assert!(matches!(err, VerifyError::AuthExpired(_)));
        assert_eq!(c.scan_client.status().await.state, SessionState::Disabled);

        // Still disabled: no further connect attempts.
        let calls = c.history.connect_calls();
        assert!(c.tasks.verify_task(USER, &activity(1, 1)).await.is_err());
        assert_eq!(c.history.connect_calls(), calls);

        c.scan_client
            .rotate_credentials(ScanCredentials::new(1001, "api-hash", "fresh-session"))
            .await;
        let report = engagement(c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap());
        assert!(report.passed);
        assert!(c.scan_client.is_healthy().await);
    }

    #[tokio::test]
    async fn test_transient_connect_failure_cools_down() {
        let (c, clock) = container(config(), t0() + Duration::days(10));
        c.history.add_post(CHANNEL, 1, at(1));
        c.history.add_reply(CHANNEL, 1, 101, USER, at(2));
        c.history
            .fail_next_connects([ExternalError::Transient("connection reset".into())]);

        let err = c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap_err();
        assert!(matches!(err, VerifyError::TechnicalError(_)));
        let status = c.scan_client.status().await;
        assert_eq!(status.consecutive_failures, 1);
        assert!(status.retry_at.is_some());

        let err = c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap_err();
        assert!(matches!(err, VerifyError::TechnicalError(ref m) if m.contains("cooling down")));

        clock.advance_secs(c.config.scan_client.reconnect_cooldown_secs as i64 + 1);
        let report = engagement(c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap());
        assert!(report.passed);
        assert_eq!(c.scan_client.status().await.consecutive_failures, 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_reported_as_auth_expired() {
        let config = RuntimeConfig {
            engagement_tasks_enabled: true,
            ..RuntimeConfig::default()
        };
        let (c, _clock) = container(config, t0() + Duration::days(10));

        let err = c.tasks.verify_task(USER, &activity(1, 1)).await.unwrap_err();
        assert!(matches!(err, VerifyError::AuthExpired(_)));
        assert!(!c.scan_client.status().await.credentials_configured);
    }
}
