//! In-memory scan transport and member directory.

use crate::domain::{ChannelRef, MemberStatus, ScanCredentials};
use crate::ports::{ChannelHandle, ChatMemberApi, HistoryScanTransport, MessageId, ScanMessage};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{AccountId, ExternalError, ExternalResult, Timestamp};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

#[derive(Default)]
struct ChannelHistory {
    id: i64,
    posts: BTreeMap<MessageId, Post>,
}

struct Post {
    message: ScanMessage,
    /// Sorted by id.
    replies: Vec<ScanMessage>,
}

#[derive(Default)]
struct HistoryState {
    channels: HashMap<String, ChannelHistory>,
    unavailable: HashMap<String, ExternalError>,
    reply_failures: HashMap<MessageId, ExternalError>,
    connect_failures: VecDeque<ExternalError>,
    authorized: bool,
    connected: bool,
    hang_on_disconnect: bool,
    connect_calls: u32,
    reply_fetches: u32,
}

/// Scripted channel history behind the scan transport port.
///
/// Clones share state, so a test can keep a handle while the client owns the
/// transport.
#[derive(Clone)]
pub struct InMemoryHistory {
    state: Arc<Mutex<HistoryState>>,
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHistory {
    pub fn new() -> Self {
        let state = HistoryState {
            authorized: true,
            ..HistoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Publish a post in `channel` (handle without `@`).
    pub fn add_post(&self, channel: &str, post_id: MessageId, sent_at: Timestamp) {
        let mut state = self.state.lock();
        let next_id = state.channels.len() as i64 + 1;
        let history = state
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| ChannelHistory {
                id: next_id,
                ..ChannelHistory::default()
            });
        history.posts.insert(
            post_id,
            Post {
                message: ScanMessage {
                    id: post_id,
                    sent_at: sent_at.fixed_offset(),
                    sender_id: None,
                },
                replies: Vec::new(),
            },
        );
    }

    /// Comment under an existing post. Unknown posts are ignored.
    pub fn add_reply(
        &self,
        channel: &str,
        post_id: MessageId,
        reply_id: MessageId,
        sender_id: AccountId,
        sent_at: Timestamp,
    ) {
        let mut state = self.state.lock();
        let Some(post) = state
            .channels
            .get_mut(channel)
            .and_then(|history| history.posts.get_mut(&post_id))
        else {
            return;
        };
        post.replies.push(ScanMessage {
            id: reply_id,
            sent_at: sent_at.fixed_offset(),
            sender_id: Some(sender_id),
        });
        post.replies.sort_by_key(|reply| reply.id);
    }

    /// Make `resolve_channel` fail for `channel`.
    pub fn set_unavailable(&self, channel: &str, error: ExternalError) {
        self.state.lock().unavailable.insert(channel.to_string(), error);
    }

    /// Make reply fetches for `post_id` fail.
    pub fn fail_replies_for(&self, post_id: MessageId, error: ExternalError) {
        self.state.lock().reply_failures.insert(post_id, error);
    }

    /// Queue errors returned by the next connect calls, in order.
    pub fn fail_next_connects(&self, errors: impl IntoIterator<Item = ExternalError>) {
        self.state.lock().connect_failures.extend(errors);
    }

    /// Whether the remote still accepts the session.
    /// Make `disconnect` never complete.
    pub fn hang_on_disconnect(&self, hang: bool) {
        self.state.lock().hang_on_disconnect = hang;
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.state.lock().authorized = authorized;
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn connect_calls(&self) -> u32 {
        self.state.lock().connect_calls
    }

    pub fn reply_fetches(&self) -> u32 {
        self.state.lock().reply_fetches
    }
}

impl HistoryState {
    fn require_session(&self) -> ExternalResult<()> {
        if !self.connected {
            return Err(ExternalError::Transient("not connected".into()));
        }
        if !self.authorized {
            return Err(ExternalError::AuthExpired("session revoked".into()));
        }
        Ok(())
    }

    fn channel(&self, channel: &ChannelHandle) -> ExternalResult<&ChannelHistory> {
        self.channels
            .get(&channel.handle)
            .ok_or(ExternalError::ChannelNotFound)
    }
}

fn newest_first<'a>(
    messages: impl DoubleEndedIterator<Item = &'a ScanMessage>,
    offset_id: Option<MessageId>,
    limit: usize,
) -> Vec<ScanMessage> {
    messages
        .rev()
        .filter(|message| offset_id.map_or(true, |offset| message.id < offset))
        .take(limit)
        .cloned()
        .collect()
}

#[async_trait]
impl HistoryScanTransport for InMemoryHistory {
    async fn connect(&mut self, _credentials: &ScanCredentials) -> ExternalResult<()> {
        let mut state = self.state.lock();
        state.connect_calls += 1;
        if let Some(error) = state.connect_failures.pop_front() {
            return Err(error);
        }
        state.connected = true;
        Ok(())
    }

    async fn is_authorized(&mut self) -> ExternalResult<bool> {
        let state = self.state.lock();
        if !state.connected {
            return Err(ExternalError::Transient("not connected".into()));
        }
        Ok(state.authorized)
    }

    async fn disconnect(&mut self) -> ExternalResult<()> {
        let hang = {
            let mut state = self.state.lock();
            state.connected = false;
            state.hang_on_disconnect
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn resolve_channel(&mut self, channel: &ChannelRef) -> ExternalResult<ChannelHandle> {
        let state = self.state.lock();
        state.require_session()?;
        if let Some(error) = state.unavailable.get(channel.handle()) {
            return Err(error.clone());
        }
        let history = state
            .channels
            .get(channel.handle())
            .ok_or(ExternalError::ChannelNotFound)?;
        Ok(ChannelHandle {
            id: history.id,
            handle: channel.handle().to_string(),
        })
    }

    async fn fetch_messages(
        &mut self,
        channel: &ChannelHandle,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>> {
        let state = self.state.lock();
        state.require_session()?;
        let history = state.channel(channel)?;
        Ok(newest_first(
            history.posts.values().map(|post| &post.message),
            offset_id,
            limit,
        ))
    }

    async fn fetch_replies(
        &mut self,
        channel: &ChannelHandle,
        message_id: MessageId,
        offset_id: Option<MessageId>,
        limit: usize,
    ) -> ExternalResult<Vec<ScanMessage>> {
        let mut state = self.state.lock();
        state.require_session()?;
        state.reply_fetches += 1;
        if let Some(error) = state.reply_failures.get(&message_id) {
            return Err(error.clone());
        }
        let history = state.channel(channel)?;
        let post = history
            .posts
            .get(&message_id)
            .ok_or_else(|| ExternalError::Unknown(format!("message {message_id} not found")))?;
        Ok(newest_first(post.replies.iter(), offset_id, limit))
    }
}

/// Membership directory behind the chat member port.
///
/// Users never seen in a channel are reported as `Left`.
#[derive(Default)]
pub struct InMemoryChatMembers {
    members: Mutex<HashMap<(String, AccountId), MemberStatus>>,
    channel_errors: Mutex<HashMap<String, ExternalError>>,
}

impl InMemoryChatMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, channel: &ChannelRef, user_id: AccountId, status: MemberStatus) {
        self.members
            .lock()
            .insert((channel.handle().to_string(), user_id), status);
    }

    /// Every lookup in `channel` fails with `error`.
    pub fn set_channel_error(&self, channel: &ChannelRef, error: ExternalError) {
        self.channel_errors
            .lock()
            .insert(channel.handle().to_string(), error);
    }
}

#[async_trait]
impl ChatMemberApi for InMemoryChatMembers {
    async fn get_chat_member(
        &self,
        channel: &ChannelRef,
        user_id: AccountId,
    ) -> ExternalResult<MemberStatus> {
        if let Some(error) = self.channel_errors.lock().get(channel.handle()) {
            return Err(error.clone());
        }
        Ok(self
            .members
            .lock()
            .get(&(channel.handle().to_string(), user_id))
            .cloned()
            .unwrap_or(MemberStatus::Left))
    }
}
