//! Long-running tasks and their shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use rg_04_engagement_verification::HealthStatus;

use crate::container::{GuardContainer, RuntimeConfig};

/// How long shutdown waits for background tasks.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Owns the container and the background tasks.
pub struct GuardRuntime {
    container: Arc<GuardContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl GuardRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::from_container(GuardContainer::new(config))
    }

    pub fn from_container(container: GuardContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn container(&self) -> Arc<GuardContainer> {
        Arc::clone(&self.container)
    }

    /// Spawn the validator loop and, when engagement tasks are enabled, the
    /// scan-session health monitor.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Referral-Guard Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let mut tasks = self.tasks.lock();
        tasks.push(self.spawn_validator());
        if self.container.config.engagement_tasks_enabled {
            tasks.push(self.spawn_health_monitor());
        }

        let thresholds = &self.container.config.validator.thresholds;
        info!(
            quarantine_hours = thresholds.quarantine_hours,
            rejection_threshold = thresholds.rejection_threshold,
            engagement_tasks = self.container.config.engagement_tasks_enabled,
            "Background tasks started"
        );
        Ok(())
    }

    fn spawn_validator(&self) -> JoinHandle<()> {
        let worker = self.container.worker(self.shutdown_rx.clone());
        tokio::spawn(async move {
            if let Err(e) = worker.run().await {
                error!(error = %e, "Validator loop exited with error");
            }
        })
    }

    fn spawn_health_monitor(&self) -> JoinHandle<()> {
        let client = Arc::clone(&self.container.scan_client);
        let period = Duration::from_secs(
            self.container
                .config
                .scan_client
                .health_check_interval_secs
                .max(1),
        );
        let mut shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => match client.health_check().await {
                        HealthStatus::Skipped | HealthStatus::Healthy => {}
                        HealthStatus::Recovered => info!("Scan session connected by health monitor"),
                        HealthStatus::Failed { consecutive_failures } => {
                            warn!(consecutive_failures, "Scan session health check failed");
                        }
                        HealthStatus::Unauthorized | HealthStatus::Disabled => {
                            error!("Scan session disabled, rotate credentials");
                        }
                    },
                    _ = shutdown.changed() => {
                        info!("Health monitor received shutdown signal");
                        break;
                    }
                }
            }
        })
    }

    /// Graceful shutdown.
    ///
    /// 1. Signal every task
    /// 2. Wait for them, bounded by a grace period (the validator finishes
    ///    its current record)
    /// 3. Close the scan session
    /// 4. Log a final metrics snapshot
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Background task panicked"),
                Err(_) => warn!("Background task did not stop within the grace period"),
            }
        }

        self.container.scan_client.close().await;

        match guard_telemetry::encode_metrics() {
            Ok(snapshot) => info!(metrics = %snapshot, "Final metrics snapshot"),
            Err(e) => warn!(error = %e, "Failed to encode metrics"),
        }
        info!("Shutdown complete");
    }
}
