//! # Referral Flow
//!
//! Registration through decision:
//!
//! 1. **Challenge**: the solve latency becomes the account's challenge score
//! 2. **Intake**: the referral lands as `Pending`
//! 3. **Quarantine**: no decision before it elapses
//! 4. **Validator**: risk decides `Accepted` or `Rejected`, the referrer is
//!    credited exactly once

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tokio::sync::watch;

    use rg_01_challenge::{ChallengeApi, ChallengeSessionStore};
    use rg_03_referral_validation::{
        Decision, RejectReason, ReferralIntakeApi, ReferralValidationApi, ValidationError,
        ValidationStatus,
    };
    use shared_types::{Account, AccountId, AccountProfile, MockTimeSource, TimeSource, UnitScore};

    use super::super::fixtures::{container, t0};
    use guard_runtime::{GuardContainer, RuntimeConfig};

    const REFERRER: AccountId = 40_000_000;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn test_config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.validator.record_delay_ms = 0;
        config.validator.iteration_interval_secs = 0;
        config
    }

    /// Register `user` under the referrer and solve the challenge after
    /// `solve_ms`. Returns the challenge score that was recorded.
    async fn join_and_solve(
        c: &GuardContainer,
        clock: &MockTimeSource,
        user: AccountId,
        solve_ms: i64,
    ) -> UnitScore {
        c.database.upsert_account(Account::new(REFERRER, t0() - Duration::days(90)));
        c.database
            .upsert_account(Account::new(user, t0()).with_referrer(REFERRER));

        let issued = c.challenge.issue(user).await.unwrap();
        let expected = c
            .database
            .get(issued.session_id)
            .await
            .unwrap()
            .unwrap()
            .expected_answer;
        assert!(issued.candidates.contains(&expected));

        clock.advance(Duration::milliseconds(solve_ms));
        let outcome = c.challenge.complete(issued.session_id, expected).await.unwrap();
        assert!(outcome.evaluation.correct);
        outcome.score.unwrap()
    }

    // =========================================================================
    // END-TO-END SCENARIOS
    // =========================================================================

    /// Human-paced solve, late subscription, clean profile: accepted and
    /// credited once.
    #[tokio::test]
    async fn test_trustworthy_referral_accepted() {
        let (c, clock) = container(test_config(), t0());
        let user = 120_000_000;

        let score = join_and_solve(&c, &clock, user, 18_000).await;
        assert!(score.value() > 0.85, "18s solve should score near the top, got {score}");
        c.database
            .set_profile(user, AccountProfile::new(Some("Marta"), Some("marta_k")));

        let record = c.intake.register(REFERRER, user).await.unwrap();

        clock.advance(Duration::hours(1) + Duration::seconds(1));
        assert!(c.database.confirm_subscription(user, clock.now()));

        let report = c.validator.decide(record.id).await.unwrap();
        assert_eq!(report.decision, Decision::Accept);
        assert!(report.assessment.unwrap().risk.value() < 0.7);
        assert!(report.reward_credited);
        assert!(report.notified);

        assert_eq!(c.database.account(REFERRER).unwrap().validated_referrals, 1);
        assert_eq!(c.ledger.credit_count(), 1);
        assert_eq!(
            c.database.record(record.id).unwrap().status,
            ValidationStatus::Accepted
        );

        // A second decision must not credit again.
        let err = c.validator.decide(record.id).await.unwrap_err();
        assert!(matches!(err, ValidationError::AlreadyDecided { .. }));
        assert_eq!(c.database.account(REFERRER).unwrap().validated_referrals, 1);
        assert_eq!(c.ledger.credit_count(), 1);
    }

    /// Instant solve, instant subscription, newest-band id, no profile:
    /// rejected for risk and never credited.
    #[tokio::test]
    async fn test_bot_paced_referral_rejected() {
        let (c, clock) = container(test_config(), t0());
        let user = 6_100_000_000;

        let score = join_and_solve(&c, &clock, user, 500).await;
        assert_eq!(score.value(), 0.1);
        // 10s after registration.
        clock.advance(Duration::milliseconds(9_500));
        assert!(c.database.confirm_subscription(user, clock.now()));

        let record = c.intake.register(REFERRER, user).await.unwrap();
        clock.advance(Duration::hours(1));

        let report = c.validator.decide(record.id).await.unwrap();
        match &report.decision {
            Decision::Reject(RejectReason::HighRiskScore(risk)) => assert!(*risk >= 0.7),
            other => panic!("expected a high-risk rejection, got {other:?}"),
        }
        assert!(!report.reward_credited);

        let stored = c.database.record(record.id).unwrap();
        assert_eq!(stored.status, ValidationStatus::Rejected);
        assert!(stored.reason.unwrap().starts_with("high_risk_score_"));
        assert_eq!(c.database.account(REFERRER).unwrap().validated_referrals, 0);
        assert_eq!(c.ledger.credit_count(), 0);
        assert!(c.database.account(user).unwrap().risk_score.is_some());
    }

    // =========================================================================
    // QUARANTINE AND PRE-CHECKS
    // =========================================================================

    #[tokio::test]
    async fn test_no_decision_inside_quarantine() {
        let (c, clock) = container(test_config(), t0());
        let user = 130_000_000;
        join_and_solve(&c, &clock, user, 20_000).await;
        let record = c.intake.register(REFERRER, user).await.unwrap();

        clock.advance(Duration::minutes(59));
        let err = c.validator.decide(record.id).await.unwrap_err();
        assert!(matches!(err, ValidationError::QuarantineActive { .. }));
        assert_eq!(c.database.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_unsubscribed_referral_rejected() {
        let (c, clock) = container(test_config(), t0());
        let user = 140_000_000;
        join_and_solve(&c, &clock, user, 20_000).await;
        let record = c.intake.register(REFERRER, user).await.unwrap();
        clock.advance(Duration::hours(2));

        let report = c.validator.decide(record.id).await.unwrap();
        assert_eq!(report.decision, Decision::Reject(RejectReason::NoSubscriptionCheck));
        assert_eq!(
            c.database.record(record.id).unwrap().reason.as_deref(),
            Some("no_subscription_check")
        );
    }

    #[tokio::test]
    async fn test_deleted_account_rejected() {
        let (c, clock) = container(test_config(), t0());
        let user = 150_000_000;
        join_and_solve(&c, &clock, user, 20_000).await;
        let record = c.intake.register(REFERRER, user).await.unwrap();
        c.database.remove_account(user);
        clock.advance(Duration::hours(2));

        let report = c.validator.decide(record.id).await.unwrap();
        assert_eq!(report.decision, Decision::Reject(RejectReason::UserNotFound));
    }

    // =========================================================================
    // INTAKE GUARDS
    // =========================================================================

    #[tokio::test]
    async fn test_intake_refuses_self_and_duplicate_referrals() {
        let (c, _clock) = container(test_config(), t0());
        assert!(matches!(
            c.intake.register(REFERRER, REFERRER).await,
            Err(ValidationError::SelfReferral(_))
        ));

        c.intake.register(REFERRER, 160_000_000).await.unwrap();
        assert!(matches!(
            c.intake.register(REFERRER + 1, 160_000_000).await,
            Err(ValidationError::DuplicateReferral(_))
        ));
    }

    #[tokio::test]
    async fn test_intake_hourly_velocity_limit() {
        let (c, clock) = container(test_config(), t0());
        let limit = c.config.validator.thresholds.max_refs_per_hour;
        for offset in 0..limit as i64 {
            c.intake.register(REFERRER, 200_000_000 + offset).await.unwrap();
        }
        assert!(matches!(
            c.intake.register(REFERRER, 299_999_999).await,
            Err(ValidationError::HourlyLimitExceeded { .. })
        ));

        clock.advance(Duration::hours(1) + Duration::seconds(1));
        c.intake.register(REFERRER, 299_999_999).await.unwrap();
    }

    // =========================================================================
    // VALIDATOR LOOP
    // =========================================================================

    /// The worker decides released records oldest first and leaves the
    /// quarantined tail for a later pass.
    #[tokio::test]
    async fn test_worker_pass_respects_quarantine_order() {
        let (c, clock) = container(test_config(), t0());
        let early = 170_000_000;
        join_and_solve(&c, &clock, early, 20_000).await;
        c.intake.register(REFERRER, early).await.unwrap();

        clock.advance(Duration::minutes(30));
        let late = 171_000_000;
        c.database
            .upsert_account(Account::new(late, clock.now()).with_referrer(REFERRER));
        c.intake.register(REFERRER, late).await.unwrap();

        clock.advance(Duration::minutes(31));
        assert!(c.database.confirm_subscription(early, clock.now()));

        let (_tx, rx) = watch::channel(false);
        let worker = c.worker(rx);
        let summary = worker.run_iteration().await.unwrap();
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.quarantined, 1);
        assert_eq!(c.database.pending_count(), 1);

        clock.advance(Duration::minutes(30));
        let summary = worker.run_iteration().await.unwrap();
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.rejected, 1, "late account never confirmed its subscription");
        assert_eq!(c.database.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_blocked_referrer_keeps_decision() {
        let (c, clock) = container(test_config(), t0());
        let user = 180_000_000;
        join_and_solve(&c, &clock, user, 20_000).await;
        let record = c.intake.register(REFERRER, user).await.unwrap();
        c.notifier.block(REFERRER);
        clock.advance(Duration::hours(2));
        assert!(c.database.confirm_subscription(user, clock.now()));

        let report = c.validator.decide(record.id).await.unwrap();
        assert!(report.decision.is_accept());
        assert!(!report.notified);
        assert_eq!(c.database.account(REFERRER).unwrap().validated_referrals, 1);
    }
}
