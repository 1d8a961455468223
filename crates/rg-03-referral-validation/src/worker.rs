//! Validator Worker - the background loop that drains pending referrals.
//!
//! One iteration reads the oldest pending records and decides each one whose
//! quarantine has elapsed, pausing between records. Records come back in
//! creation order, so the first still-quarantined record ends the batch.

use crate::config::ValidatorConfig;
use crate::domain::{Decision, ValidationError, ValidationResult};
use crate::metrics;
use crate::ports::{ReferralValidationApi, ValidationStore};
use shared_types::TimeSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Counters for one pass over the pending queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterationSummary {
    pub fetched: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Records left for a later iteration because they are still quarantined.
    pub quarantined: usize,
    /// Records someone else decided first.
    pub already_decided: usize,
    pub failed: usize,
    /// Shutdown was requested mid-batch.
    pub interrupted: bool,
}

/// Resets the running flag however `run` exits.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ValidatorWorker<V, S, T>
where
    V: ReferralValidationApi,
    S: ValidationStore,
    T: TimeSource,
{
    config: ValidatorConfig,
    validator: Arc<V>,
    store: Arc<S>,
    clock: Arc<T>,
    shutdown: watch::Receiver<bool>,
    running: AtomicBool,
}

impl<V, S, T> ValidatorWorker<V, S, T>
where
    V: ReferralValidationApi,
    S: ValidationStore,
    T: TimeSource,
{
    pub fn new(
        config: ValidatorConfig,
        validator: Arc<V>,
        store: Arc<S>,
        clock: Arc<T>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            validator,
            store,
            clock,
            shutdown,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleep unless shutdown arrives first. Returns `false` on shutdown.
    async fn pause(&self, duration: Duration) -> bool {
        if self.shutdown_requested() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = shutdown.changed() => false,
        }
    }

    /// Loop until shutdown. Refuses to start a second concurrent loop.
    pub async fn run(&self) -> ValidationResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ValidationError::WorkerAlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);
        info!(
            batch_size = self.config.batch_size,
            interval_secs = self.config.iteration_interval_secs,
            "Validator loop started"
        );

        loop {
            match self.run_iteration().await {
                Ok(summary) if summary.fetched > 0 => info!(
                    fetched = summary.fetched,
                    accepted = summary.accepted,
                    rejected = summary.rejected,
                    quarantined = summary.quarantined,
                    failed = summary.failed,
                    "Validator iteration complete"
                ),
                Ok(_) => {}
                Err(e) => error!(error = %e, "Validator iteration failed"),
            }
            metrics::record_iteration();

            if !self.pause(self.config.iteration_interval()).await {
                break;
            }
        }

        info!("Validator loop stopped");
        Ok(())
    }

    /// One pass over at most `batch_size` pending records.
    pub async fn run_iteration(&self) -> ValidationResult<IterationSummary> {
        let pending = self
            .store
            .fetch_oldest_pending(self.config.batch_size)
            .await?;
        let quarantine = self.config.thresholds.quarantine();
        let mut summary = IterationSummary {
            fetched: pending.len(),
            ..IterationSummary::default()
        };

        for (index, record) in pending.iter().enumerate() {
            if self.shutdown_requested() {
                summary.interrupted = true;
                break;
            }
            if record.in_quarantine(self.clock.now(), quarantine) {
                summary.quarantined = pending.len() - index;
                debug!(
                    record_id = %record.id,
                    until = %record.quarantine_ends_at(quarantine),
                    "Referral still in quarantine"
                );
                break;
            }

            match self.validator.decide(record.id).await {
                Ok(report) => match report.decision {
                    Decision::Accept => summary.accepted += 1,
                    Decision::Reject(_) => summary.rejected += 1,
                },
                Err(ValidationError::AlreadyDecided { .. }) => summary.already_decided += 1,
                Err(ValidationError::QuarantineActive { .. }) => {
                    summary.quarantined = pending.len() - index;
                    break;
                }
                Err(e) => {
                    error!(
                        record_id = %record.id,
                        referrer_id = record.referrer_id,
                        referred_id = record.referred_id,
                        error = %e,
                        "Referral decision failed"
                    );
                    summary.failed += 1;
                }
            }

            if !self.pause(self.config.record_delay()).await {
                summary.interrupted = true;
                break;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationStatus;
    use crate::test_support::*;
    use chrono::Duration as ChronoDuration;
    use shared_types::ExternalError;

    fn worker(h: &Harness, config: ValidatorConfig) -> (Arc<TestWorker>, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let worker = ValidatorWorker::new(
            config,
            h.validator.clone(),
            h.store.clone(),
            h.clock.clone(),
            rx,
        );
        (Arc::new(worker), tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_first_and_stop_at_first_quarantined() {
        let h = Harness::new(0.2);
        let a = h.pending_referral(1, 11, true).await;
        h.clock.advance(ChronoDuration::minutes(5));
        let b = h.pending_referral(2, 12, true).await;
        h.clock.advance(ChronoDuration::minutes(40));
        let c = h.pending_referral(3, 13, true).await;
        // a and b are at least an hour old, c is not.
        h.clock.advance(ChronoDuration::minutes(20));

        let (worker, _tx) = worker(&h, ValidatorConfig::default());
        let started = tokio::time::Instant::now();
        let summary = worker.run_iteration().await.unwrap();

        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.quarantined, 1);
        // One pause per decided record.
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        let credited: Vec<_> = h.ledger.credits().into_iter().map(|c| c.0).collect();
        assert_eq!(credited, vec![1, 2]);
        assert_eq!(h.store.record(a.id).status, ValidationStatus::Accepted);
        assert_eq!(h.store.record(b.id).status, ValidationStatus::Accepted);
        assert!(h.store.record(c.id).is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_batch() {
        let h = Harness::new(0.2);
        let a = h.pending_referral(1, 11, true).await;
        let b = h.pending_referral(2, 12, true).await;
        h.clock.advance(ChronoDuration::hours(2));
        h.store.fail_account_reads_for(11, ExternalError::timeout("get_account"));

        let (worker, _tx) = worker(&h, ValidatorConfig::for_testing());
        let summary = worker.run_iteration().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.accepted, 1);
        // The failed record stays pending for the next iteration.
        assert!(h.store.record(a.id).is_pending());
        assert_eq!(h.store.record(b.id).status, ValidationStatus::Accepted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let h = Harness::new(0.2);
        h.pending_referral(1, 11, true).await;

        let (worker, tx) = worker(&h, ValidatorConfig::default());
        let handle = {
            let worker = worker.clone();
            tokio::spawn(async move { worker.run().await })
        };

        // First iteration finds nothing past quarantine.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(worker.is_running());
        assert!(matches!(
            worker.run().await,
            Err(ValidationError::WorkerAlreadyRunning)
        ));
        assert!(h.ledger.credits().is_empty());

        h.clock.advance(ChronoDuration::hours(1));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(h.ledger.credits().len(), 1);

        tx.send(true).unwrap();
        handle.await.unwrap().unwrap();
        assert!(!worker.is_running());
    }
}
