//! Verification outcomes.

use super::scan::EngagementTally;
use serde::{Deserialize, Serialize};

/// Why an engagement requirement was waived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverReason {
    ChannelNotFound,
    ChannelPrivate,
}

/// Evidence of one engagement scan. Not persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementReport {
    pub passed: bool,
    pub found_comments: u32,
    pub found_posts: u32,
    pub messages_inspected: usize,
    /// Set when the channel could not be inspected and the user got the
    /// benefit of the doubt.
    pub waived: Option<WaiverReason>,
}

impl EngagementReport {
    pub fn from_tally(tally: &EngagementTally, messages_inspected: usize) -> Self {
        Self {
            passed: tally.satisfied(),
            found_comments: tally.comments(),
            found_posts: tally.posts(),
            messages_inspected,
            waived: None,
        }
    }

    pub fn waived(reason: WaiverReason) -> Self {
        Self {
            passed: true,
            found_comments: 0,
            found_posts: 0,
            messages_inspected: 0,
            waived: Some(reason),
        }
    }
}

/// Member status reported by the chat API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Left,
    Kicked,
    /// Any status this crate does not interpret.
    Other(String),
}

/// Outcome of a subscription check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionVerdict {
    Subscribed,
    NotSubscribed,
    Banned,
    /// Membership could not be confirmed; the user has to act first.
    ActionRequired(String),
}

impl SubscriptionVerdict {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, SubscriptionVerdict::Subscribed)
    }
}

/// Outcome of verifying any task kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum TaskVerdict {
    Engagement(EngagementReport),
    Subscription(SubscriptionVerdict),
}

impl TaskVerdict {
    pub fn passed(&self) -> bool {
        match self {
            TaskVerdict::Engagement(report) => report.passed,
            TaskVerdict::Subscription(verdict) => verdict.is_subscribed(),
        }
    }
}
