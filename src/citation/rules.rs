//! Predicates deciding whether a linked message may be expanded

use crate::discord::{Author, ChannelInfo, DiscordMessage, GuildId};

const IMAGE_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

pub fn is_bot(author: &Author) -> bool {
    author.bot
}

/// A link only expands inside the guild it points into
pub fn is_same_guild(guild_id: &GuildId, event: &DiscordMessage) -> bool {
    event.guild_id.as_ref() == Some(guild_id)
}

pub fn is_nsfw(channel: &ChannelInfo) -> bool {
    channel.nsfw
}

pub fn has_content(message: &DiscordMessage) -> bool {
    !message.content.is_empty()
}

/// Only the first attachment is considered.
pub fn has_image(message: &DiscordMessage) -> bool {
    message
        .attachments
        .first()
        .and_then(|a| a.content_type.as_deref())
        .is_some_and(|t| IMAGE_CONTENT_TYPES.contains(&t))
}

pub fn has_embed(message: &DiscordMessage) -> bool {
    !message.embeds.is_empty()
}

pub fn is_expandable(message: &DiscordMessage) -> bool {
    has_content(message) || has_image(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::fake::{attachment, embed, message};
    use crate::discord::ChannelId;

    #[test]
    fn test_is_bot() {
        let mut msg = message("1", "2", Some("3"), "hi");
        assert!(!is_bot(&msg.author));

        msg.author.bot = true;
        assert!(is_bot(&msg.author));
    }

    #[test]
    fn test_is_same_guild() {
        let msg = message("1", "2", Some("A"), "hi");

        assert!(is_same_guild(&GuildId::new("A"), &msg));
        assert!(!is_same_guild(&GuildId::new("B"), &msg));
    }

    #[test]
    fn test_direct_message_is_never_same_guild() {
        let msg = message("1", "2", None, "hi");

        assert!(!is_same_guild(&GuildId::new("A"), &msg));
    }

    #[test]
    fn test_is_nsfw() {
        let mut channel = ChannelInfo {
            id: ChannelId::new("2"),
            name: "general".to_string(),
            nsfw: false,
        };
        assert!(!is_nsfw(&channel));

        channel.nsfw = true;
        assert!(is_nsfw(&channel));
    }

    #[test]
    fn test_has_content() {
        assert!(has_content(&message("1", "2", None, "hi")));
        assert!(!has_content(&message("1", "2", None, "")));
    }

    #[test]
    fn test_has_image_accepts_allow_list() {
        for content_type in ["image/jpeg", "image/png", "image/gif"] {
            let mut msg = message("1", "2", None, "");
            msg.attachments.push(attachment(Some(content_type)));
            assert!(has_image(&msg), "{}", content_type);
        }
    }

    #[test]
    fn test_has_image_rejects_everything_else() {
        let msg = message("1", "2", None, "");
        assert!(!has_image(&msg));

        for content_type in [
            Some("video/mp4"),
            Some("image/webp"),
            Some("application/pdf"),
            None,
        ] {
            let mut msg = message("1", "2", None, "");
            msg.attachments.push(attachment(content_type));
            assert!(!has_image(&msg), "{:?}", content_type);
        }
    }

    #[test]
    fn test_has_image_only_checks_first_attachment() {
        let mut msg = message("1", "2", None, "");
        msg.attachments.push(attachment(Some("video/mp4")));
        msg.attachments.push(attachment(Some("image/png")));

        assert!(!has_image(&msg));
    }

    #[test]
    fn test_has_embed() {
        let mut msg = message("1", "2", None, "");
        assert!(!has_embed(&msg));

        msg.embeds.push(embed("preview"));
        assert!(has_embed(&msg));
    }

    #[test]
    fn test_is_expandable_matches_content_or_image() {
        let cases = [
            ("", None, false),
            ("", Some("video/mp4"), false),
            ("", Some("image/png"), true),
            ("text", None, true),
            ("text", Some("video/mp4"), true),
            ("text", Some("image/gif"), true),
        ];

        for (content, content_type, expected) in cases {
            let mut msg = message("1", "2", None, content);
            if let Some(content_type) = content_type {
                msg.attachments.push(attachment(Some(content_type)));
            }
            assert_eq!(is_expandable(&msg), expected, "{:?} {:?}", content, content_type);
            assert_eq!(is_expandable(&msg), has_content(&msg) || has_image(&msg));
        }
    }
}
