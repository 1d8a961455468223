//! Evaluation window and the running tally of a history scan.

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::collections::HashSet;

/// Closed interval `[start, end]` in UTC, where `end` never lies in the future.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ScanWindow {
    /// `end = min(start + days, now)`. A window too long to represent ends at `now`.
    pub fn new(start: Timestamp, window_days: u32, now: Timestamp) -> Self {
        let end = chrono::Duration::try_days(i64::from(window_days))
            .and_then(|days| start.checked_add_signed(days))
            .map_or(now, |nominal_end| nominal_end.min(now));
        Self { start, end }
    }

    /// Whether a comment posted at `at` counts.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at <= self.end
    }

    /// Posts newer than the window cannot carry in-window comments.
    pub fn is_after(&self, at: Timestamp) -> bool {
        at > self.end
    }
}

/// Qualifying comments and the distinct posts they were left on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngagementTally {
    min_comments: u32,
    min_posts: u32,
    comments: u32,
    posts: HashSet<i64>,
}

impl EngagementTally {
    pub fn new(min_comments: u32, min_posts: u32) -> Self {
        Self {
            min_comments,
            min_posts,
            ..Self::default()
        }
    }

    /// Add `qualifying_replies` found under post `post_id`. A post counts once,
    /// the first time it has at least one qualifying reply.
    pub fn record(&mut self, post_id: i64, qualifying_replies: u32) {
        if qualifying_replies == 0 {
            return;
        }
        self.comments += qualifying_replies;
        self.posts.insert(post_id);
    }

    pub fn comments(&self) -> u32 {
        self.comments
    }

    pub fn posts(&self) -> u32 {
        self.posts.len() as u32
    }

    /// Both thresholds met at once.
    pub fn satisfied(&self) -> bool {
        self.comments >= self.min_comments && self.posts() >= self.min_posts
    }
}
