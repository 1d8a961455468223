//! Channel engagement verifier: walks a channel's history backwards and counts
//! the user's in-window comments.

use crate::client::{HistoryScanClient, ScanSession};
use crate::config::VerifierConfig;
use crate::domain::{
    ActivityRequirement, EngagementReport, EngagementTally, ScanWindow, VerifyError,
    VerifyResult, WaiverReason,
};
use crate::metrics;
use crate::ports::{ChannelHandle, EngagementVerifierApi, HistoryScanTransport, MessageId};
use async_trait::async_trait;
use shared_types::{AccountId, ExternalError, TimeSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Errors under a single post that abort the whole scan. Anything else skips
/// the post.
fn aborts_scan(error: &ExternalError) -> bool {
    error.is_fatal_for_session()
        || matches!(
            error,
            ExternalError::RateLimited { .. } | ExternalError::NotAMember
        )
}

/// Scans through the shared [`HistoryScanClient`]; concurrent verifications
/// queue on the client's session lease.
pub struct ChannelEngagementVerifier<T, C>
where
    T: HistoryScanTransport,
    C: TimeSource,
{
    config: VerifierConfig,
    client: Arc<HistoryScanClient<T, C>>,
}

impl<T, C> ChannelEngagementVerifier<T, C>
where
    T: HistoryScanTransport,
    C: TimeSource,
{
    pub fn new(config: VerifierConfig, client: Arc<HistoryScanClient<T, C>>) -> Self {
        Self { config, client }
    }

    async fn scan(
        &self,
        user_id: AccountId,
        requirement: &ActivityRequirement,
    ) -> VerifyResult<EngagementReport> {
        let window = ScanWindow::new(
            requirement.window_start,
            requirement.window_days,
            self.client.clock().now(),
        );
        let mut tally = EngagementTally::new(requirement.min_comments, requirement.min_posts);
        let mut session = self.client.session().await?;

        let channel = match session.resolve_channel(&requirement.channel).await {
            Ok(channel) => channel,
            Err(ExternalError::ChannelNotFound) => {
                return Ok(self.waive(requirement, WaiverReason::ChannelNotFound));
            }
            Err(ExternalError::ChannelPrivate) => {
                return Ok(self.waive(requirement, WaiverReason::ChannelPrivate));
            }
            Err(e) => return Err(e.into()),
        };

        let cap = self.config.message_cap;
        let mut inspected = 0usize;
        let mut offset_id = None;

        'walk: while inspected < cap && !tally.satisfied() {
            let limit = self.config.page_size.min(cap - inspected).max(1);
            let page = session.fetch_messages(&channel, offset_id, limit).await?;
            let exhausted = page.len() < limit;
            offset_id = page.last().map(|message| message.id);

            for message in page {
                inspected += 1;
                // Newer than the window: none of its replies can be in it.
                if window.is_after(message.sent_at_utc()) {
                    continue;
                }

                match self
                    .count_replies(&mut session, &channel, message.id, user_id, &window)
                    .await
                {
                    Ok(found) => tally.record(message.id, found),
                    Err(e) if aborts_scan(&e) => return Err(e.into()),
                    Err(e) => {
                        debug!(message_id = message.id, error = %e, "Skipping post, replies unavailable");
                    }
                }

                if tally.satisfied() || inspected >= cap {
                    break 'walk;
                }
            }

            if exhausted {
                break;
            }
        }

        Ok(EngagementReport::from_tally(&tally, inspected))
    }

    /// Qualifying replies by `user_id` under one post, bounded by `reply_cap`.
    async fn count_replies(
        &self,
        session: &mut ScanSession<'_, T>,
        channel: &ChannelHandle,
        message_id: MessageId,
        user_id: AccountId,
        window: &ScanWindow,
    ) -> Result<u32, ExternalError> {
        let cap = self.config.reply_cap;
        let mut seen = 0usize;
        let mut found = 0u32;
        let mut offset_id = None;

        while seen < cap {
            let limit = self.config.page_size.min(cap - seen).max(1);
            let replies = session
                .fetch_replies(channel, message_id, offset_id, limit)
                .await?;
            seen += replies.len();
            offset_id = replies.last().map(|reply| reply.id);

            found += replies
                .iter()
                .filter(|reply| {
                    reply.sender_id == Some(user_id) && window.contains(reply.sent_at_utc())
                })
                .count() as u32;

            if replies.len() < limit {
                break;
            }
        }
        Ok(found)
    }

    fn waive(&self, requirement: &ActivityRequirement, reason: WaiverReason) -> EngagementReport {
        info!(
            channel = %requirement.channel,
            reason = ?reason,
            "Channel cannot be inspected, engagement requirement waived"
        );
        EngagementReport::waived(reason)
    }
}

#[async_trait]
impl<T, C> EngagementVerifierApi for ChannelEngagementVerifier<T, C>
where
    T: HistoryScanTransport,
    C: TimeSource,
{
    async fn verify(
        &self,
        user_id: AccountId,
        requirement: &ActivityRequirement,
    ) -> VerifyResult<EngagementReport> {
        let result =
            match tokio::time::timeout(self.config.request_timeout(), self.scan(user_id, requirement))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(VerifyError::TechnicalError(format!(
                    "engagement scan exceeded {}s",
                    self.config.request_timeout_secs
                ))),
            };

        match &result {
            Ok(report) => {
                let outcome = match (report.waived, report.passed) {
                    (Some(_), _) => "waived",
                    (None, true) => "passed",
                    (None, false) => "failed",
                };
                metrics::record_verification(outcome, report.messages_inspected);
                info!(
                    user_id,
                    channel = %requirement.channel,
                    passed = report.passed,
                    found_comments = report.found_comments,
                    found_posts = report.found_posts,
                    messages_inspected = report.messages_inspected,
                    "Engagement verified"
                );
            }
            Err(e) => {
                metrics::record_verification(e.kind(), 0);
                warn!(user_id, channel = %requirement.channel, error = %e, "Engagement verification failed");
            }
        }
        result
    }
}
