//! Deck topic archive repository.
//!
//! Every time the bot rewrites a deck's channel topic it first stores the raw
//! previous topic here.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::model::deck_topic_archive::{CreateDeckTopicArchiveParam, DeckTopicArchive};

pub struct DeckTopicArchiveRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DeckTopicArchiveRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a raw topic.
    ///
    /// # Returns
    /// - `Ok(DeckTopicArchive)` - The created record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateDeckTopicArchiveParam) -> Result<DeckTopicArchive, DbErr> {
        let entity = entity::deck_topic_archive::ActiveModel {
            id: ActiveValue::NotSet,
            deck_id: ActiveValue::Set(param.deck_id),
            channel_id: ActiveValue::Set(param.channel_id.to_string()),
            topic: ActiveValue::Set(param.topic),
            archived_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(DeckTopicArchive::from_entity(entity))
    }

    /// Gets the most recent archived topics of a deck channel, newest first.
    ///
    /// Archives are looked up by channel since the deck id itself can change.
    ///
    /// # Arguments
    /// - `channel_id` - Default channel of the deck
    /// - `limit` - Maximum number of records
    ///
    /// # Returns
    /// - `Ok(Vec<DeckTopicArchive>)` - Archived topics, possibly empty
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_recent_by_channel(
        &self,
        channel_id: u64,
        limit: u64,
    ) -> Result<Vec<DeckTopicArchive>, DbErr> {
        let entities = entity::prelude::DeckTopicArchive::find()
            .filter(entity::deck_topic_archive::Column::ChannelId.eq(channel_id.to_string()))
            .order_by_desc(entity::deck_topic_archive::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(DeckTopicArchive::from_entity)
            .collect())
    }
}
