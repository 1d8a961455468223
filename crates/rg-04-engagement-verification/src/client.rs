//! History-scan client: owns the stateful messaging session and its circuit
//! breaker.
//!
//! All access goes through one `tokio::sync::Mutex`, so the session is only
//! ever driven by a single caller. Reusing one session from several origins at
//! once gets it revoked by the remote.

use crate::config::ScanClientConfig;
use crate::domain::{
    ChannelRef, ScanCredentials, SessionBreaker, SessionEvent, SessionState, VerifyError,
    VerifyResult,
};
use crate::metrics;
use crate::ports::{ChannelHandle, HistoryScanTransport, MessageId, ScanMessage};
use serde::Serialize;
use shared_types::{ExternalError, ExternalResult, TimeSource, Timestamp};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Outcome of one health probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthStatus {
    /// Probed too recently, or a reconnect cooldown is running.
    Skipped,
    Healthy,
    /// Was disconnected, reconnected now.
    Recovered,
    /// A connected session was rejected by the remote and is now disabled.
    Unauthorized,
    Failed { consecutive_failures: u32 },
    /// Waiting for credential rotation.
    Disabled,
}

/// Point-in-time view of the session, for logs and operators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub consecutive_failures: u32,
    pub last_attempt: Option<Timestamp>,
    pub retry_at: Option<Timestamp>,
    pub credentials_configured: bool,
}

struct ClientInner<T> {
    transport: T,
    credentials: Option<ScanCredentials>,
    breaker: SessionBreaker,
    last_health_check: Option<Timestamp>,
}

impl<T> ClientInner<T> {
    fn apply(&mut self, event: SessionEvent) -> SessionState {
        let before = self.breaker.state();
        let after = self.breaker.process_event(event);
        if before != after {
            metrics::record_session_transition(after.as_str());
            match after {
                SessionState::Disabled => error!(
                    from = before.as_str(),
                    failures = self.breaker.consecutive_failures(),
                    "Scan session disabled, rotate credentials to re-enable"
                ),
                _ => debug!(from = before.as_str(), to = after.as_str(), "Scan session transition"),
            }
        }
        after
    }
}

async fn with_timeout<F, R>(limit: Duration, operation: &str, call: F) -> ExternalResult<R>
where
    F: Future<Output = ExternalResult<R>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ExternalError::timeout(operation)),
    }
}

fn disabled_error() -> VerifyError {
    VerifyError::AuthExpired("scan session disabled until credentials are rotated".into())
}

/// Process-wide client for the history-scan session.
///
/// Connects lazily on first use, waits out a cooldown after a failed connect,
/// and disables itself after `max_consecutive_failures` failures or any
/// authorization error.
pub struct HistoryScanClient<T, C>
where
    T: HistoryScanTransport,
    C: TimeSource,
{
    config: ScanClientConfig,
    inner: Mutex<ClientInner<T>>,
    clock: Arc<C>,
}

impl<T, C> HistoryScanClient<T, C>
where
    T: HistoryScanTransport,
    C: TimeSource,
{
    pub fn new(
        config: ScanClientConfig,
        transport: T,
        credentials: Option<ScanCredentials>,
        clock: Arc<C>,
    ) -> Self {
        let breaker = SessionBreaker::new(config.max_consecutive_failures);
        Self {
            config,
            inner: Mutex::new(ClientInner {
                transport,
                credentials,
                breaker,
                last_health_check: None,
            }),
            clock,
        }
    }

    pub fn config(&self) -> &ScanClientConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Connect now unless already connected.
    pub async fn connect(&self) -> VerifyResult<()> {
        let mut inner = self.inner.lock().await;
        self.ensure_connected(&mut inner).await
    }

    /// Probe the session. A rejected or failing probe is fed to the breaker.
    pub async fn is_healthy(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.breaker.is_connected() {
            return false;
        }
        matches!(self.probe(&mut inner).await, HealthStatus::Healthy)
    }

    /// Disconnect. Safe to call in any state.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if inner.breaker.is_connected() {
            self.disconnect_transport(&mut inner).await;
            info!("Scan session closed");
        }
        inner.apply(SessionEvent::Closed);
    }

    /// Periodic health check, rate limited by `health_check_interval`.
    ///
    /// Reconnects a disconnected session (respecting the cooldown) and
    /// re-probes a connected one.
    pub async fn health_check(&self) -> HealthStatus {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();

        if inner.breaker.is_disabled() {
            return HealthStatus::Disabled;
        }
        if let Some(last) = inner.last_health_check {
            if now < last + self.config.health_check_interval() {
                return HealthStatus::Skipped;
            }
        }
        if !inner
            .breaker
            .may_attempt(now, self.config.reconnect_cooldown())
        {
            return HealthStatus::Skipped;
        }
        inner.last_health_check = Some(now);

        if inner.breaker.is_connected() {
            return self.probe(&mut inner).await;
        }

        match self.ensure_connected(&mut inner).await {
            Ok(()) => {
                info!("Scan session recovered by health check");
                HealthStatus::Recovered
            }
            Err(_) if inner.breaker.is_disabled() => HealthStatus::Disabled,
            Err(_) => HealthStatus::Failed {
                consecutive_failures: inner.breaker.consecutive_failures(),
            },
        }
    }

    /// Replace the credentials. The only way out of the disabled state.
    pub async fn rotate_credentials(&self, credentials: ScanCredentials) {
        let mut inner = self.inner.lock().await;
        if inner.breaker.is_connected() {
            self.disconnect_transport(&mut inner).await;
        }
        inner.credentials = Some(credentials);
        inner.last_health_check = None;
        inner.apply(SessionEvent::CredentialsRotated);
        info!("Scan session credentials rotated");
    }

    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        SessionStatus {
            state: inner.breaker.state(),
            consecutive_failures: inner.breaker.consecutive_failures(),
            last_attempt: inner.breaker.last_attempt(),
            retry_at: inner.breaker.retry_at(self.config.reconnect_cooldown()),
            credentials_configured: inner
                .credentials
                .as_ref()
                .is_some_and(ScanCredentials::is_complete),
        }
    }

    /// Exclusive lease on a connected session. Other callers wait until the
    /// lease is dropped.
    pub async fn session(&self) -> VerifyResult<ScanSession<'_, T>> {
        let mut inner = self.inner.lock().await;
        self.ensure_connected(&mut inner).await?;
        Ok(ScanSession {
            inner,
            call_timeout: self.config.call_timeout(),
        })
    }

    async fn ensure_connected(&self, inner: &mut ClientInner<T>) -> VerifyResult<()> {
        if inner.breaker.is_connected() {
            return Ok(());
        }
        if inner.breaker.is_disabled() {
            return Err(disabled_error());
        }

        let now = self.clock.now();
        let cooldown = self.config.reconnect_cooldown();
        if !inner.breaker.may_attempt(now, cooldown) {
            let retry_at = inner
                .breaker
                .retry_at(cooldown)
                .map(|at| at.to_rfc3339())
                .unwrap_or_default();
            return Err(VerifyError::TechnicalError(format!(
                "scan session cooling down until {retry_at}"
            )));
        }

        let credentials = match inner.credentials.clone() {
            Some(credentials) if credentials.is_complete() => credentials,
            _ => {
                inner.apply(SessionEvent::Fatal);
                return Err(VerifyError::AuthExpired(
                    "scan credentials are not configured".into(),
                ));
            }
        };

        inner.breaker.record_attempt(now);
        let connected = with_timeout(
            self.config.connect_timeout(),
            "connect",
            inner.transport.connect(&credentials),
        )
        .await;
        let authorized = match connected {
            Ok(()) => {
                with_timeout(
                    self.config.call_timeout(),
                    "is_authorized",
                    inner.transport.is_authorized(),
                )
                .await
            }
            Err(e) => Err(e),
        };

        match authorized {
            Ok(true) => {
                inner.apply(SessionEvent::Connected);
                info!("Scan session connected");
                Ok(())
            }
            Ok(false) => {
                self.disconnect_transport(inner).await;
                inner.apply(SessionEvent::Fatal);
                Err(VerifyError::AuthExpired(
                    "scan session is not authorized".into(),
                ))
            }
            Err(e) if e.is_fatal_for_session() => {
                inner.apply(SessionEvent::Fatal);
                Err(e.into())
            }
            Err(e) => {
                let state = inner.apply(SessionEvent::Failure);
                warn!(
                    error = %e,
                    failures = inner.breaker.consecutive_failures(),
                    state = state.as_str(),
                    "Scan session connect failed"
                );
                if inner.breaker.is_disabled() {
                    return Err(disabled_error());
                }
                Err(e.into())
            }
        }
    }

    /// Best-effort disconnect under the per-call timeout.
    async fn disconnect_transport(&self, inner: &mut ClientInner<T>) {
        if let Err(e) =
            with_timeout(self.config.call_timeout(), "disconnect", inner.transport.disconnect())
                .await
        {
            warn!(error = %e, "Scan session disconnect failed");
        }
    }

    async fn probe(&self, inner: &mut ClientInner<T>) -> HealthStatus {
        let result = with_timeout(
            self.config.call_timeout(),
            "is_authorized",
            inner.transport.is_authorized(),
        )
        .await;

        match result {
            Ok(true) => HealthStatus::Healthy,
            Ok(false) => {
                inner.apply(SessionEvent::Fatal);
                HealthStatus::Unauthorized
            }
            Err(e) if e.is_fatal_for_session() => {
                inner.apply(SessionEvent::Fatal);
                HealthStatus::Unauthorized
            }
            Err(e) => {
                warn!(error = %e, "Scan session health probe failed");
                self.disconnect_transport(inner).await;
                inner.breaker.record_attempt(self.clock.now());
                inner.apply(SessionEvent::Failure);
                if inner.breaker.is_disabled() {
                    HealthStatus::Disabled
                } else {
                    HealthStatus::Failed {
                        consecutive_failures: inner.breaker.consecutive_failures(),
                    }
                }
            }
        }
    }
}

/// Exclusive, connected session. Every call carries the per-call timeout; an
/// authorization failure disables the session.
pub struct ScanSession<'a, T> {
    inner: MutexGuard<'a, ClientInner<T>>,
    call_timeout: Duration,
}

impl<T> ScanSession<'_, T>
where
    T: HistoryScanTransport,
{
    pub async fn resolve_channel(&mut self, channel: &ChannelRef) -> ExternalResult<ChannelHandle> {
        let result = with_timeout(
            self.call_timeout,
            "resolve_channel",
            self.inner.transport.resolve_channel(channel),
        )
        .await;
        self.observe(result)
    }

    pub async fn fetch_messages(
        &mut self,
        channel: &ChannelHandle,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>> {
        let result = with_timeout(
            self.call_timeout,
            "fetch_messages",
            self.inner.transport.fetch_messages(channel, offset_id, limit),
        )
        .await;
        self.observe(result)
    }

    pub async fn fetch_replies(
        &mut self,
        channel: &ChannelHandle,
        message_id: MessageId,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>> {
        let result = with_timeout(
            self.call_timeout,
            "fetch_replies",
            self.inner
                .transport
                .fetch_replies(channel, message_id, offset_id, limit),
        )
        .await;
        self.observe(result)
    }

    fn observe<R>(&mut self, result: ExternalResult<R>) -> ExternalResult<R> {
        if let Err(e) = &result {
            if e.is_fatal_for_session() {
                error!(error = %e, "Scan session rejected by remote");
                self.inner.apply(SessionEvent::Fatal);
            }
        }
        result
    }
}
