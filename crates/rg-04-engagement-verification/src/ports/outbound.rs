//! Driven ports (Outbound dependencies)

use crate::domain::{ChannelRef, MemberStatus, ScanCredentials};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ExternalResult, Timestamp};

/// Message identifier, unique within a channel and increasing with time.
pub type MessageId = i64;

/// A channel resolved by the scan transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHandle {
    pub id: i64,
    pub handle: String,
}

/// A channel post or a reply to one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMessage {
    pub id: MessageId,
    /// As reported by the transport, in whatever offset it uses.
    pub sent_at: DateTime<FixedOffset>,
    /// `None` for anonymous channel posts.
    pub sender_id: Option<AccountId>,
}

impl ScanMessage {
    /// Send time normalised to UTC. Only this value may be compared with the
    /// scan window.
    pub fn sent_at_utc(&self) -> Timestamp {
        self.sent_at.with_timezone(&Utc)
    }
}

/// Stateful, session-based client able to read channel history.
///
/// Calls take `&mut self`: one logical connection, one caller at a time.
#[async_trait]
pub trait HistoryScanTransport: Send {
    async fn connect(&mut self, credentials: &ScanCredentials) -> ExternalResult<()>;

    /// Whether the connected session is still authorized.
    async fn is_authorized(&mut self) -> ExternalResult<bool>;

    async fn disconnect(&mut self) -> ExternalResult<()>;

    async fn resolve_channel(&mut self, channel: &ChannelRef) -> ExternalResult<ChannelHandle>;

    /// Up to `limit` channel messages, newest first, with ids strictly below
    /// `offset_id` when given.
    async fn fetch_messages(
        &mut self,
        channel: &ChannelHandle,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>>;

    /// Up to `limit` replies to `message_id`, newest first, with ids strictly
    /// below `offset_id` when given.
    async fn fetch_replies(
        &mut self,
        channel: &ChannelHandle,
        message_id: MessageId,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>>;
}

/// Request/response chat API used for membership lookups.
#[async_trait]
pub trait ChatMemberApi: Send + Sync {
    async fn get_chat_member(
        &self,
        channel: &ChannelRef,
        user_id: AccountId,
    ) -> ExternalResult<MemberStatus>;
}
