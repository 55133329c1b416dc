use crate::discord::{
    Attachment, Author, ChannelId, ChannelInfo, CitationEmbed, DiscordMessage, GuildId,
    MessageId, ReplyEmbed, ReplyRequest, UserId,
};
use crate::error::{FelmError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::builder::{
    CreateAllowedMentions, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage,
};
use serenity::http::Http;
use serenity::model::Timestamp;
use serenity::model::channel::{Channel, Message};
use serenity::model::id;
use std::num::NonZeroU64;
use std::sync::Arc;

/// The Discord REST calls the bot depends on
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelInfo>;

    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> Result<DiscordMessage>;

    async fn send_reply(&self, reply: &ReplyRequest) -> Result<MessageId>;
}

/// [`DiscordApi`] backed by serenity's REST client
pub struct DiscordClient {
    http: Arc<Http>,
}

impl DiscordClient {
    /// Create a client authenticated with a bot token
    pub fn new(token: &str) -> Self {
        Self::from_http(Arc::new(Http::new(token)))
    }

    /// Reuse an existing serenity HTTP client
    pub fn from_http(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn fetch_channel(&self, channel_id: &ChannelId) -> Result<ChannelInfo> {
        let id = id::ChannelId::from(parse_snowflake(channel_id.as_str())?);
        let channel = self.http.get_channel(id).await?;

        let info = match channel {
            Channel::Guild(channel) => ChannelInfo {
                id: channel_id.clone(),
                name: channel.name,
                nsfw: channel.nsfw,
            },
            Channel::Private(channel) => ChannelInfo {
                id: channel_id.clone(),
                name: channel.name(),
                nsfw: false,
            },
            _ => ChannelInfo {
                id: channel_id.clone(),
                name: channel_id.to_string(),
                nsfw: false,
            },
        };

        tracing::debug!(
            channel_id = %info.id,
            channel = %info.name,
            nsfw = info.nsfw,
            "Fetched channel info"
        );
        Ok(info)
    }

    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> Result<DiscordMessage> {
        let channel = id::ChannelId::from(parse_snowflake(channel_id.as_str())?);
        let message = id::MessageId::from(parse_snowflake(message_id.as_str())?);

        let message = self.http.get_message(channel, message).await?;
        Ok(DiscordMessage::from(&message))
    }

    async fn send_reply(&self, reply: &ReplyRequest) -> Result<MessageId> {
        let channel = id::ChannelId::from(parse_snowflake(reply.channel_id.as_str())?);
        let reference_channel =
            id::ChannelId::from(parse_snowflake(reply.reference.channel_id.as_str())?);
        let reference_message =
            id::MessageId::from(parse_snowflake(reply.reference.message_id.as_str())?);

        let builder = CreateMessage::new()
            .embed(build_embed(&reply.embed))
            .reference_message((reference_channel, reference_message))
            .allowed_mentions(
                CreateAllowedMentions::new().replied_user(reply.mention_replied_user),
            );

        let sent = channel.send_message(&self.http, builder).await?;
        Ok(MessageId::new(sent.id.to_string()))
    }
}

fn parse_snowflake(raw: &str) -> Result<NonZeroU64> {
    raw.parse::<NonZeroU64>()
        .map_err(|_| FelmError::DiscordApi(format!("invalid snowflake: {:?}", raw)))
}

// Sub-second precision is kept.
fn to_chrono(timestamp: Timestamp) -> DateTime<Utc> {
    *timestamp
}

/// Convert a domain embed into a serenity builder
fn build_embed(embed: &ReplyEmbed) -> CreateEmbed {
    match embed {
        ReplyEmbed::Citation(embed) => build_citation_embed(embed),
        ReplyEmbed::Existing(embed) => CreateEmbed::from(embed.clone()),
    }
}

fn build_citation_embed(embed: &CitationEmbed) -> CreateEmbed {
    let mut author = CreateEmbedAuthor::new(&embed.author_name);
    if let Some(ref icon) = embed.author_icon_url {
        author = author.icon_url(icon);
    }

    let mut builder = CreateEmbed::new()
        .author(author)
        .description(&embed.description)
        .colour(embed.colour)
        .footer(CreateEmbedFooter::new(&embed.footer));
    if let Some(ref image) = embed.image_url {
        builder = builder.image(image);
    }
    builder.timestamp(embed.timestamp)
}

impl From<&Message> for DiscordMessage {
    fn from(m: &Message) -> Self {
        DiscordMessage {
            id: MessageId::new(m.id.to_string()),
            channel_id: ChannelId::new(m.channel_id.to_string()),
            guild_id: m.guild_id.map(|g| GuildId::new(g.to_string())),
            author: Author {
                id: UserId::new(m.author.id.to_string()),
                username: m.author.name.clone(),
                avatar_url: Some(m.author.face()),
                bot: m.author.bot,
            },
            content: m.content.clone(),
            attachments: m
                .attachments
                .iter()
                .map(|a| Attachment {
                    url: a.url.clone(),
                    content_type: a.content_type.clone(),
                })
                .collect(),
            embeds: m.embeds.clone(),
            timestamp: to_chrono(m.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_snowflake() {
        assert_eq!(parse_snowflake("1234").unwrap().get(), 1234);
        assert!(parse_snowflake("0").is_err());
        assert!(parse_snowflake("abc").is_err());
        assert!(parse_snowflake("99999999999999999999999").is_err());
    }

    #[test]
    fn test_timestamp_conversion_keeps_milliseconds() {
        let timestamp = Timestamp::parse("2023-11-14T22:13:20.789Z").unwrap();
        let datetime = to_chrono(timestamp);

        assert_eq!(datetime.timestamp(), 1_700_000_000);
        assert_eq!(datetime.timestamp_subsec_millis(), 789);
        assert_eq!(Timestamp::from(datetime), timestamp);
    }

    #[test]
    fn test_existing_embed_is_sent_unchanged() {
        let raw = json!({
            "type": "video",
            "title": "Launch stream",
            "url": "https://www.youtube.com/watch?v=abc",
            "color": 16711680,
            "timestamp": "2024-01-01T00:00:00.789Z",
            "provider": { "name": "YouTube", "url": "https://www.youtube.com" },
            "video": {
                "url": "https://www.youtube.com/embed/abc",
                "width": 1280,
                "height": 720
            },
            "thumbnail": {
                "url": "https://i.ytimg.com/vi/abc/hqdefault.jpg",
                "proxy_url": "https://images-ext-1.discordapp.net/abc.jpg",
                "width": 480,
                "height": 360
            },
            "fields": [{ "name": "Views", "value": "1000", "inline": true }]
        });
        let embed: serenity::model::channel::Embed = serde_json::from_value(raw).unwrap();

        let sent = build_embed(&ReplyEmbed::Existing(embed.clone()));
        let sent = serde_json::to_value(&sent).unwrap();

        assert_eq!(sent, serde_json::to_value(&embed).unwrap());
        assert_eq!(sent["type"], "video");
        assert_eq!(sent["provider"]["name"], "YouTube");
        assert_eq!(sent["video"]["width"], 1280);
        assert_eq!(sent["timestamp"], "2024-01-01T00:00:00.789Z");
    }

    #[test]
    fn test_citation_embed_keeps_source_timestamp() {
        let timestamp = Timestamp::parse("2023-11-14T22:13:20.789Z").unwrap();
        let embed = CitationEmbed {
            author_name: "bob".to_string(),
            author_icon_url: None,
            description: "hello".to_string(),
            image_url: None,
            footer: "from random".to_string(),
            timestamp: to_chrono(timestamp),
            colour: 0x7fffff,
        };

        let sent = serde_json::to_value(build_embed(&ReplyEmbed::Citation(embed))).unwrap();

        assert_eq!(sent["timestamp"], "2023-11-14T22:13:20.789Z");
        assert_eq!(sent["description"], "hello");
        assert_eq!(sent["footer"]["text"], "from random");
        assert_eq!(sent["color"], 0x7fffff);
    }
}
