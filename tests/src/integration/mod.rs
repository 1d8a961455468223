//! End-to-end flows through [`guard_runtime::GuardContainer`] with a
//! manually driven clock.

pub mod engagement_flow;
pub mod referral_flow;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use guard_runtime::adapters::SharedClock;
    use guard_runtime::{GuardContainer, RuntimeConfig};
    use shared_types::{MockTimeSource, Timestamp};

    /// Registration time used by every scenario.
    pub fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()
    }

    pub fn container(config: RuntimeConfig, start: Timestamp) -> (GuardContainer, Arc<MockTimeSource>) {
        let clock = Arc::new(MockTimeSource::new(start));
        let container = GuardContainer::with_clock(config, SharedClock::new(clock.clone()));
        (container, clock)
    }
}
