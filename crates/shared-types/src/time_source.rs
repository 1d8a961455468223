//! Time source for consistent timestamp handling.
//!
//! Abstracted to allow testing with deterministic time.

use crate::entities::Timestamp;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

/// Source of the current UTC time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Manually driven clock for tests.
#[derive(Debug)]
pub struct MockTimeSource {
    time: Mutex<Timestamp>,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: Mutex::new(initial),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock();
        *time += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn set(&self, time: Timestamp) {
        *self.time.lock() = time;
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        *self.time.lock()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
