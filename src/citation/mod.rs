//! Message link expansion
//!
//! When someone posts a link to another message in the same guild, the bot
//! replies with an embed previewing that message: its text and first image,
//! or the embed it already carried. Bot authors, links into other guilds and
//! NSFW channels are left alone.

mod embed;
mod link;
pub mod rules;
mod service;

pub use embed::{CITATION_COLOUR, build_reply_embed};
pub use link::{LinkError, LinkReference, parse_message_link};
pub use service::{CitationOutcome, CitationService, SkipReason};
