use crate::cache::{CacheError, TtlCache};
use crate::citation::embed::build_reply_embed;
use crate::citation::link::{LinkError, parse_message_link};
use crate::citation::rules;
use crate::discord::{
    ChannelId, ChannelInfo, DiscordApi, DiscordMessage, MessageCreateHandler, MessageId,
    ReplyRequest,
};
use crate::error::{FelmError, Result};
use crate::trace::TraceId;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BotAuthor,
    NoLink,
    CrossGuild,
    NsfwChannel,
    NotExpandable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::BotAuthor => "sent by bot",
            SkipReason::NoLink => "message link not found",
            SkipReason::CrossGuild => "link points into a different guild",
            SkipReason::NsfwChannel => "linked channel is NSFW",
            SkipReason::NotExpandable => "linked message is not expandable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationOutcome {
    Replied(MessageId),
    Skipped(SkipReason),
}

/// Replies to messages containing a message link with a preview of the
/// linked message
pub struct CitationService {
    api: Arc<dyn DiscordApi>,
    channel_cache: Arc<TtlCache<ChannelInfo>>,
}

impl CitationService {
    pub fn new(api: Arc<dyn DiscordApi>, channel_cache: Arc<TtlCache<ChannelInfo>>) -> Self {
        Self { api, channel_cache }
    }

    pub async fn cite(
        &self,
        trace_id: &TraceId,
        message: &DiscordMessage,
    ) -> Result<CitationOutcome> {
        let wrap = |operation: &'static str, err: FelmError| {
            FelmError::citation(operation, message.context(), trace_id.clone(), err)
        };

        if rules::is_bot(&message.author) {
            return Ok(CitationOutcome::Skipped(SkipReason::BotAuthor));
        }

        let link = match parse_message_link(&message.content) {
            Ok(link) => link,
            Err(LinkError::NotFound) => return Ok(CitationOutcome::Skipped(SkipReason::NoLink)),
        };

        tracing::info!(
            link_guild_id = %link.guild_id,
            link_channel_id = %link.channel_id,
            link_message_id = %link.message_id,
            "message link detected"
        );

        if !rules::is_same_guild(&link.guild_id, message) {
            return Ok(CitationOutcome::Skipped(SkipReason::CrossGuild));
        }

        let channel = self
            .resolve_channel(&link.channel_id)
            .await
            .map_err(|e| wrap("fetching channel information", e))?;

        if rules::is_nsfw(&channel) {
            return Ok(CitationOutcome::Skipped(SkipReason::NsfwChannel));
        }

        let source = self
            .api
            .fetch_message(&link.channel_id, &link.message_id)
            .await
            .map_err(|e| wrap("fetching message information", e))?;

        let Some(embed) = build_reply_embed(&channel, &source) else {
            return Ok(CitationOutcome::Skipped(SkipReason::NotExpandable));
        };

        let reply = ReplyRequest {
            channel_id: message.channel_id.clone(),
            reference: message.context(),
            embed,
            mention_replied_user: false,
        };
        let sent = self
            .api
            .send_reply(&reply)
            .await
            .map_err(|e| wrap("sending message", e))?;

        Ok(CitationOutcome::Replied(sent))
    }

    /// Channel metadata from the cache, falling back to the API on a miss
    async fn resolve_channel(&self, channel_id: &ChannelId) -> Result<ChannelInfo> {
        match self.channel_cache.get(channel_id.as_str()) {
            Ok(channel) => {
                tracing::trace!(
                    channel_id = %channel_id,
                    channel = %channel.name,
                    "Channel cache hit"
                );
                return Ok(channel);
            }
            Err(CacheError::NotFound) => {
                tracing::debug!(
                    channel_id = %channel_id,
                    "cache not found, fetching channel information from API"
                );
            }
        }

        let channel = self.api.fetch_channel(channel_id).await?;
        self.channel_cache.set(channel_id.as_str(), channel.clone());
        tracing::debug!(channel_id = %channel_id, "channel information was cached");

        Ok(channel)
    }
}

#[async_trait]
impl MessageCreateHandler for CitationService {
    fn name(&self) -> &'static str {
        "citation"
    }

    async fn on_message_create(
        &self,
        trace_id: &TraceId,
        message: &DiscordMessage,
    ) -> Result<()> {
        tracing::debug!(
            author_id = %message.author.id,
            author = %message.author.username,
            is_bot = message.author.bot,
            "citation handler called"
        );

        match self.cite(trace_id, message).await? {
            CitationOutcome::Replied(reply_id) => {
                tracing::info!(reply_id = %reply_id, "citation sent");
            }
            CitationOutcome::Skipped(reason) => {
                tracing::debug!(reason = reason.as_str(), "skip processing message");
            }
        }
        Ok(())
    }
}
