//! Circuit breaker for the history-scan session.
//!
//! A failing connect puts the session into a cooldown before the next attempt;
//! after `max_failures` consecutive failures, or on any authorization error,
//! the session disables itself and stays disabled until credentials are rotated.

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// Session lifecycle state.
///
/// State Machine:
/// ```text
/// [DISCONNECTED] ──Connected──→ [CONNECTED] ──Closed──→ [DISCONNECTED]
///       │                            │
///       └────Failure────→ [COOLING_DOWN {failures: n}] ──Failure, n+1 ≥ max──→ [DISABLED]
///                                    │                                            │
///                                    └──Connected──→ [CONNECTED]                  │
///  Fatal from any state ──────────────────────────────────────────────────→ [DISABLED]
///  [DISABLED] ──CredentialsRotated──→ [DISCONNECTED]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
    /// Last attempt failed; wait for the cooldown before trying again.
    CoolingDown { failures: u32 },
    /// Needs an operator. Every call fails fast.
    Disabled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::CoolingDown { .. } => "cooling_down",
            SessionState::Disabled => "disabled",
        }
    }
}

/// Inputs to the breaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Connected and authorized.
    Connected,
    /// Connect or health probe failed for a retryable reason.
    Failure,
    /// Authorization expired or the session was compromised.
    Fatal,
    /// Closed on purpose.
    Closed,
    /// Operator supplied new credentials.
    CredentialsRotated,
}

/// Deterministic breaker owned by the scan client.
#[derive(Debug, Clone)]
pub struct SessionBreaker {
    state: SessionState,
    max_failures: u32,
    consecutive_failures: u32,
    last_attempt: Option<Timestamp>,
}

impl SessionBreaker {
    pub fn new(max_failures: u32) -> Self {
        Self {
            state: SessionState::Disconnected,
            max_failures: max_failures.max(1),
            consecutive_failures: 0,
            last_attempt: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, SessionState::Disabled)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    pub fn last_attempt(&self) -> Option<Timestamp> {
        self.last_attempt
    }

    /// Whether a connect attempt is allowed at `now`.
    pub fn may_attempt(&self, now: Timestamp, cooldown: chrono::Duration) -> bool {
        match self.state {
            SessionState::Disabled => false,
            SessionState::CoolingDown { .. } => match self.last_attempt {
                Some(last) => now >= last + cooldown,
                None => true,
            },
            SessionState::Disconnected | SessionState::Connected => true,
        }
    }

    /// When the cooldown ends, if one is running.
    pub fn retry_at(&self, cooldown: chrono::Duration) -> Option<Timestamp> {
        match self.state {
            SessionState::CoolingDown { .. } => self.last_attempt.map(|last| last + cooldown),
            _ => None,
        }
    }

    pub fn record_attempt(&mut self, now: Timestamp) {
        self.last_attempt = Some(now);
    }

    /// Apply an event and return the new state.
    pub fn process_event(&mut self, event: SessionEvent) -> SessionState {
        let new_state = self.next_state(event);

        match event {
            SessionEvent::Failure if !self.is_disabled() => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
            SessionEvent::Connected if new_state == SessionState::Connected => {
                self.consecutive_failures = 0;
            }
            SessionEvent::CredentialsRotated => {
                self.consecutive_failures = 0;
                self.last_attempt = None;
            }
            _ => {}
        }

        self.state = new_state;
        new_state
    }

    /// Pure transition function.
    fn next_state(&self, event: SessionEvent) -> SessionState {
        match (self.state, event) {
            (SessionState::Disabled, SessionEvent::CredentialsRotated) => {
                SessionState::Disconnected
            }
            (SessionState::Disabled, _) => SessionState::Disabled,

            (_, SessionEvent::Fatal) => SessionState::Disabled,
            (_, SessionEvent::Connected) => SessionState::Connected,
            (_, SessionEvent::CredentialsRotated) => SessionState::Disconnected,

            (_, SessionEvent::Failure) => {
                let failures = self.consecutive_failures.saturating_add(1);
                if failures >= self.max_failures {
                    SessionState::Disabled
                } else {
                    SessionState::CoolingDown { failures }
                }
            }

            // Closing never shortens a running cooldown.
            (SessionState::CoolingDown { failures }, SessionEvent::Closed) => {
                SessionState::CoolingDown { failures }
            }
            (_, SessionEvent::Closed) => SessionState::Disconnected,
        }
    }

    #[cfg(test)]
    pub fn force_state(&mut self, state: SessionState) {
        self.state = state;
    }
}
