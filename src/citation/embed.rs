use crate::citation::rules;
use crate::discord::{ChannelInfo, CitationEmbed, DiscordMessage, ReplyEmbed};

/// Accent colour of synthesized citation embeds
pub const CITATION_COLOUR: u32 = 0x7fffff;

/// Pick the embed to reply with, or `None` when there is nothing to show
///
/// Messages with text or an image get a synthesized preview; otherwise the
/// message's own first embed (e.g. a link preview) is reused.
pub fn build_reply_embed(channel: &ChannelInfo, message: &DiscordMessage) -> Option<ReplyEmbed> {
    if rules::is_expandable(message) {
        return Some(ReplyEmbed::Citation(citation_embed(channel, message)));
    }

    if rules::has_embed(message) {
        return Some(ReplyEmbed::Existing(message.embeds[0].clone()));
    }

    None
}

fn citation_embed(channel: &ChannelInfo, message: &DiscordMessage) -> CitationEmbed {
    let image_url = if rules::has_image(message) {
        message.attachments.first().map(|a| a.url.clone())
    } else {
        None
    };

    CitationEmbed {
        author_name: message.author.username.clone(),
        author_icon_url: message.author.avatar_url.clone(),
        description: message.content.clone(),
        image_url,
        footer: format!("from {}", channel.name),
        timestamp: message.timestamp,
        colour: CITATION_COLOUR,
    }
}
