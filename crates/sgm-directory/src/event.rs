//! Inbound events delivered by the remote store's gateway

use crate::types::{ActorId, GuildId, MessageId};

/// A reaction added to or removed from a message
///
/// The emoji arrives as the raw string the reacting client sent; compound
/// sequences may be in either Unicode normalization form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub emoji: String,
    pub actor_id: ActorId,
    pub guild_id: GuildId,
}

impl ReactionEvent {
    /// Event with the given coordinates
    #[must_use]
    pub fn new(
        message_id: MessageId,
        emoji: impl Into<String>,
        actor_id: ActorId,
        guild_id: GuildId,
    ) -> Self {
        Self {
            message_id,
            emoji: emoji.into(),
            actor_id,
            guild_id,
        }
    }
}
