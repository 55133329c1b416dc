use crate::discord::{ChannelId, GuildId, MessageId};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static MESSAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https://(?:ptb\.|canary\.|www\.)?discord\.com/channels/(?P<guild_id>\d+)/(?P<channel_id>\d+)/(?P<message_id>\d+)",
    )
    .expect("message link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("message link not found")]
    NotFound,
}

/// IDs pointed at by a message permalink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Guild the linked message lives in
    pub guild_id: GuildId,
    /// Channel the linked message lives in
    pub channel_id: ChannelId,
    /// Linked message
    pub message_id: MessageId,
}

/// Extract the first message permalink from `text`
///
/// Segments are returned as captured. Whether they name a real snowflake is
/// left to the API call that uses them.
pub fn parse_message_link(text: &str) -> Result<LinkReference, LinkError> {
    let caps = MESSAGE_LINK.captures(text).ok_or(LinkError::NotFound)?;
    let segment = |name: &str| caps.name(name).map(|m| m.as_str()).ok_or(LinkError::NotFound);

    Ok(LinkReference {
        guild_id: GuildId::new(segment("guild_id")?),
        channel_id: ChannelId::new(segment("channel_id")?),
        message_id: MessageId::new(segment("message_id")?),
    })
}
