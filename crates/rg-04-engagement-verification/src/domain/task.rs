//! Task requirements.

use super::channel::ChannelRef;
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// Comment-activity requirement for one channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRequirement {
    pub channel: ChannelRef,
    pub min_comments: u32,
    pub min_posts: u32,
    pub window_days: u32,
    pub window_start: Timestamp,
}

/// What a published task asks of the user. Immutable once published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskRequirement {
    ChannelActivity(ActivityRequirement),
    ChannelSubscription { channel: ChannelRef },
}

impl TaskRequirement {
    pub fn channel(&self) -> &ChannelRef {
        match self {
            TaskRequirement::ChannelActivity(req) => &req.channel,
            TaskRequirement::ChannelSubscription { channel } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_tagged_json() {
        let json = r#"{"kind":"channel_subscription","channel":"https://t.me/partner"}"#;
        let task: TaskRequirement = serde_json::from_str(json).unwrap();
        assert_eq!(task.channel().handle(), "partner");

        let activity = TaskRequirement::ChannelActivity(ActivityRequirement {
            channel: ChannelRef::parse("@partner").unwrap(),
            min_comments: 5,
            min_posts: 3,
            window_days: 7,
            window_start: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        });
        let encoded = serde_json::to_string(&activity).unwrap();
        assert!(encoded.contains("\"kind\":\"channel_activity\""));
        let decoded: TaskRequirement = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, activity);
    }
}
