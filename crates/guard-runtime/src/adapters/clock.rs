//! Clock handle shared by every component.

use shared_types::{SystemTimeSource, TimeSource, Timestamp};
use std::sync::Arc;

/// Type-erased [`TimeSource`], so the container has one concrete clock type
/// whether it runs on the system clock or a test clock.
#[derive(Clone)]
pub struct SharedClock(Arc<dyn TimeSource>);

impl SharedClock {
    pub fn system() -> Self {
        Self(Arc::new(SystemTimeSource))
    }

    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self(source)
    }
}

impl TimeSource for SharedClock {
    fn now(&self) -> Timestamp {
        self.0.now()
    }
}
