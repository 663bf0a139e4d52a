//! Previous channel topics of decks.

use chrono::{DateTime, Utc};

/// Raw channel topic of a deck as it was before a rewrite.
///
/// Kept so that a topic written in an older format, or overwritten by a bad
/// edit, can be recovered by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckTopicArchive {
    pub id: i32,
    pub deck_id: String,
    /// Default channel of the deck (stored as String).
    pub channel_id: String,
    pub topic: String,
    pub archived_at: DateTime<Utc>,
}

impl DeckTopicArchive {
    /// Converts an entity model to a deck topic archive domain model at the repository boundary.
    pub fn from_entity(entity: entity::deck_topic_archive::Model) -> Self {
        Self {
            id: entity.id,
            deck_id: entity.deck_id,
            channel_id: entity.channel_id,
            topic: entity.topic,
            archived_at: entity.archived_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDeckTopicArchiveParam {
    pub deck_id: String,
    pub channel_id: u64,
    pub topic: String,
}
