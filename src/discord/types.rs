use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serenity::model::channel::Embed;
use std::fmt;

macro_rules! snowflake {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a decimal snowflake as received from Discord
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

snowflake!(GuildId);
snowflake!(ChannelId);
snowflake!(MessageId);
snowflake!(UserId);

/// Message author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// User ID
    pub id: UserId,
    /// Account name (not the guild nickname)
    pub username: String,
    /// Avatar URL, falling back to the default avatar
    pub avatar_url: Option<String>,
    /// Whether the account is a bot
    pub bot: bool,
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// CDN URL of the file
    pub url: String,
    /// MIME type reported by Discord, if any
    pub content_type: Option<String>,
}

/// A message as seen on the gateway or fetched over REST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordMessage {
    /// Message ID
    pub id: MessageId,
    /// Channel the message was posted in
    pub channel_id: ChannelId,
    /// `None` for direct messages
    pub guild_id: Option<GuildId>,
    /// Message author
    pub author: Author,
    /// Text content, empty for attachment-only messages
    pub content: String,
    /// Attachments in upload order
    pub attachments: Vec<Attachment>,
    /// Embeds exactly as Discord returned them
    pub embeds: Vec<Embed>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl DiscordMessage {
    /// IDs of this message, used to annotate errors and replies
    pub fn context(&self) -> MessageContext {
        MessageContext {
            guild_id: self.guild_id.clone(),
            channel_id: self.channel_id.clone(),
            message_id: self.id.clone(),
        }
    }
}

/// Channel metadata kept in the channel cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel ID
    pub id: ChannelId,
    /// Channel name
    pub name: String,
    /// Whether the channel is age-restricted
    pub nsfw: bool,
}

/// IDs identifying the message an event is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl fmt::Display for MessageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "guild_id = {}, channel_id = {}, message_id = {}",
            self.guild_id.as_ref().map(GuildId::as_str).unwrap_or("none"),
            self.channel_id,
            self.message_id
        )
    }
}

/// Embed synthesized from a cited message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationEmbed {
    /// Username of the cited message's author
    pub author_name: String,
    /// Avatar of the cited message's author
    pub author_icon_url: Option<String>,
    /// Cited text, possibly empty
    pub description: String,
    /// First attachment when it is an image
    pub image_url: Option<String>,
    /// `from {channel name}`
    pub footer: String,
    /// Creation time of the cited message
    pub timestamp: DateTime<Utc>,
    /// Accent colour
    pub colour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplyEmbed {
    Citation(CitationEmbed),
    /// The cited message's own first embed, reused as-is
    Existing(Embed),
}

/// Outbound reply to a message that contained a link
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    /// Channel to post the reply in
    pub channel_id: ChannelId,
    /// Message being replied to
    pub reference: MessageContext,
    /// Embed to send
    pub embed: ReplyEmbed,
    /// Whether the replied-to author gets pinged
    pub mention_replied_user: bool,
}
