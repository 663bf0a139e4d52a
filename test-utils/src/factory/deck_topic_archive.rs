//! Deck topic archive factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{next_sequence, snowflake};

/// Factory for creating archived deck topics with customizable fields.
pub struct DeckTopicArchiveFactory<'a> {
    db: &'a DatabaseConnection,
    deck_id: String,
    channel_id: String,
    topic: String,
}

impl<'a> DeckTopicArchiveFactory<'a> {
    /// Creates a factory with a unique channel and a minimal current-format topic.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_sequence();
        Self {
            db,
            deck_id: "a1c2".to_string(),
            channel_id: snowflake(3, id),
            topic: "*id: a1c2\n매니저: <@1>".to_string(),
        }
    }

    pub fn deck_id(mut self, deck_id: impl Into<String>) -> Self {
        self.deck_id = deck_id.into();
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Builds and inserts the archive row.
    pub async fn build(self) -> Result<entity::deck_topic_archive::Model, DbErr> {
        entity::deck_topic_archive::ActiveModel {
            id: ActiveValue::NotSet,
            deck_id: ActiveValue::Set(self.deck_id),
            channel_id: ActiveValue::Set(self.channel_id),
            topic: ActiveValue::Set(self.topic),
            archived_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an archived deck topic with default values.
pub async fn create_deck_topic_archive(
    db: &DatabaseConnection,
) -> Result<entity::deck_topic_archive::Model, DbErr> {
    DeckTopicArchiveFactory::new(db).build().await
}
