//! Public channel references.

use serde::{Deserialize, Serialize};
use std::fmt;

const LINK_MARKER: &str = "t.me/";

/// A public channel, identified by its handle without `@`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelRef(String);

impl ChannelRef {
    /// Accepts `https://t.me/name`, `http://t.me/name`, `t.me/name` and `@name`.
    /// Private invite links (`t.me/+…`) cannot be resolved and are rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let handle = if let Some(pos) = input.find(LINK_MARKER) {
            let rest = &input[pos + LINK_MARKER.len()..];
            rest.split(&['/', '?'][..]).next().unwrap_or_default().trim_start_matches('@')
        } else {
            input.strip_prefix('@')?
        };

        if handle.is_empty() || handle.starts_with('+') {
            return None;
        }
        Some(Self(handle.to_string()))
    }

    /// Handle without the leading `@`.
    pub fn handle(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ChannelRef::parse(&value).ok_or_else(|| format!("not a public channel reference: {value}"))
    }
}

impl From<ChannelRef> for String {
    fn from(channel: ChannelRef) -> Self {
        format!("@{}", channel.0)
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_forms() {
        for input in [
            "https://t.me/simple_news",
            "http://t.me/simple_news",
            "t.me/simple_news",
            "@simple_news",
            "  https://t.me/simple_news/42  ",
            "https://t.me/simple_news?start=1",
        ] {
            let channel = ChannelRef::parse(input).unwrap();
            assert_eq!(channel.handle(), "simple_news", "input {input:?}");
        }
    }

    #[test]
    fn test_rejected_forms() {
        for input in ["https://t.me/+AbCdEf", "t.me/", "simple_news", "@", "@+invite", ""] {
            assert!(ChannelRef::parse(input).is_none(), "input {input:?}");
        }
    }

    #[test]
    fn test_serde_as_handle_string() {
        let channel = ChannelRef::parse("t.me/partner").unwrap();
        let json = serde_json::to_string(&channel).unwrap();
        assert_eq!(json, "\"@partner\"");
        let back: ChannelRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, channel);
        assert!(serde_json::from_str::<ChannelRef>("\"t.me/+secret\"").is_err());
    }
}
