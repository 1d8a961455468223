//! Subscription checker over the request/response chat API.
//!
//! Fails closed: whenever membership cannot be confirmed the user is asked to
//! act, never waved through.

use crate::config::VerifierConfig;
use crate::domain::{ChannelRef, MemberStatus, SubscriptionVerdict};
use crate::metrics;
use crate::ports::{ChatMemberApi, SubscriptionApi};
use async_trait::async_trait;
use shared_types::{AccountId, ExternalError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct SubscriptionChecker<A: ChatMemberApi> {
    api: Arc<A>,
    timeout: Duration,
}

impl<A: ChatMemberApi> SubscriptionChecker<A> {
    pub fn new(config: &VerifierConfig, api: Arc<A>) -> Self {
        Self {
            api,
            timeout: config.membership_timeout(),
        }
    }
}

fn verdict_for(status: MemberStatus) -> SubscriptionVerdict {
    match status {
        MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member => {
            SubscriptionVerdict::Subscribed
        }
        MemberStatus::Left => SubscriptionVerdict::NotSubscribed,
        MemberStatus::Kicked => SubscriptionVerdict::Banned,
        MemberStatus::Other(status) => {
            SubscriptionVerdict::ActionRequired(format!("unsupported member status {status}"))
        }
    }
}

fn action_for(error: &ExternalError) -> SubscriptionVerdict {
    let reason = match error {
        ExternalError::ChannelNotFound => "channel not found".to_string(),
        ExternalError::ChannelPrivate => "channel is private".to_string(),
        ExternalError::NotAMember | ExternalError::UserNotFound => {
            "membership could not be confirmed".to_string()
        }
        ExternalError::RateLimited { retry_after_secs } => {
            format!("try again in {retry_after_secs}s")
        }
        other => format!("membership lookup failed: {other}"),
    };
    SubscriptionVerdict::ActionRequired(reason)
}

#[async_trait]
impl<A: ChatMemberApi> SubscriptionApi for SubscriptionChecker<A> {
    async fn check(&self, user_id: AccountId, channel: &ChannelRef) -> SubscriptionVerdict {
        let lookup = tokio::time::timeout(self.timeout, self.api.get_chat_member(channel, user_id));
        let verdict = match lookup.await {
            Ok(Ok(status)) => verdict_for(status),
            Ok(Err(e)) => {
                warn!(user_id, channel = %channel, error = %e, "Membership lookup failed");
                action_for(&e)
            }
            Err(_) => {
                warn!(user_id, channel = %channel, "Membership lookup timed out");
                action_for(&ExternalError::timeout("get_chat_member"))
            }
        };

        let label = match &verdict {
            SubscriptionVerdict::Subscribed => "subscribed",
            SubscriptionVerdict::NotSubscribed => "not_subscribed",
            SubscriptionVerdict::Banned => "banned",
            SubscriptionVerdict::ActionRequired(_) => "action_required",
        };
        metrics::record_subscription_check(label);
        debug!(user_id, channel = %channel, verdict = label, "Subscription checked");
        verdict
    }
}
