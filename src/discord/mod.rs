mod client;
mod events;
#[cfg(test)]
pub(crate) mod fake;
mod gateway;
mod types;

pub use client::{DiscordApi, DiscordClient};
pub use events::{DispatchOutcome, Dispatcher, MINIMUM_HANDLER_TIMEOUT, MessageCreateHandler};
pub use gateway::Gateway;
pub use types::{
    Attachment, Author, ChannelId, ChannelInfo, CitationEmbed, DiscordMessage, GuildId,
    MessageContext, MessageId, ReplyEmbed, ReplyRequest, UserId,
};
