//! In-memory [`DiscordApi`] used by unit tests

use crate::discord::{
    Attachment, Author, ChannelId, ChannelInfo, DiscordApi, DiscordMessage, GuildId, MessageId,
    ReplyRequest, UserId,
};
use crate::error::{FelmError, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serenity::model::channel::Embed;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchChannel(String),
    FetchMessage(String, String),
    SendReply(String),
}

#[derive(Default)]
pub struct FakeDiscordApi {
    channels: Mutex<HashMap<String, ChannelInfo>>,
    messages: Mutex<HashMap<(String, String), DiscordMessage>>,
    calls: Mutex<Vec<ApiCall>>,
    sent: Mutex<Vec<ReplyRequest>>,
    fail_send: bool,
}

impl FakeDiscordApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub fn add_channel(&self, id: &str, name: &str, nsfw: bool) {
        self.channels.lock().unwrap().insert(
            id.to_string(),
            ChannelInfo {
                id: ChannelId::new(id),
                name: name.to_string(),
                nsfw,
            },
        );
    }

    pub fn add_message(&self, message: DiscordMessage) {
        let key = (
            message.channel_id.as_str().to_string(),
            message.id.as_str().to_string(),
        );
        self.messages.lock().unwrap().insert(key, message);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<ReplyRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DiscordApi for FakeDiscordApi {
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelInfo> {
        self.record(ApiCall::FetchChannel(channel_id.to_string()));
        self.channels
            .lock()
            .unwrap()
            .get(channel_id.as_str())
            .cloned()
            .ok_or_else(|| FelmError::DiscordApi("Unknown Channel".to_string()))
    }

    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> Result<DiscordMessage> {
        self.record(ApiCall::FetchMessage(
            channel_id.to_string(),
            message_id.to_string(),
        ));
        self.messages
            .lock()
            .unwrap()
            .get(&(channel_id.to_string(), message_id.to_string()))
            .cloned()
            .ok_or_else(|| FelmError::DiscordApi("Unknown Message".to_string()))
    }

    async fn send_reply(&self, reply: &ReplyRequest) -> Result<MessageId> {
        self.record(ApiCall::SendReply(reply.channel_id.to_string()));
        if self.fail_send {
            return Err(FelmError::DiscordApi("Missing Permissions".to_string()));
        }
        self.sent.lock().unwrap().push(reply.clone());
        Ok(MessageId::new("999"))
    }
}

/// Build a plain text message from a human author
pub fn message(
    id: &str,
    channel_id: &str,
    guild_id: Option<&str>,
    content: &str,
) -> DiscordMessage {
    DiscordMessage {
        id: MessageId::new(id),
        channel_id: ChannelId::new(channel_id),
        guild_id: guild_id.map(GuildId::new),
        author: Author {
            id: UserId::new("42"),
            username: "alice".to_string(),
            avatar_url: Some("https://cdn.discordapp.com/avatars/42/a.png".to_string()),
            bot: false,
        },
        content: content.to_string(),
        attachments: Vec::new(),
        embeds: Vec::new(),
        timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    }
}

pub fn attachment(content_type: Option<&str>) -> Attachment {
    Attachment {
        url: "https://cdn.discordapp.com/attachments/1/2/file".to_string(),
        content_type: content_type.map(str::to_string),
    }
}

pub fn embed(title: &str) -> Embed {
    let mut embed = Embed::default();
    embed.kind = Some("link".to_string());
    embed.title = Some(title.to_string());
    embed.url = Some("https://example.com/".to_string());
    embed
}
