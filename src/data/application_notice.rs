//! Application notice repository.
//!
//! Records which spreadsheet submissions the application poller already announced
//! so that a restart does not announce them again.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::model::application_notice::{ApplicationNotice, CreateApplicationNoticeParam};

pub struct ApplicationNoticeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ApplicationNoticeRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the subset of `keys` that already have a notice.
    ///
    /// # Arguments
    /// - `keys` - Submission keys to check
    ///
    /// # Returns
    /// - `Ok(HashSet<String>)` - Keys that were announced before
    /// - `Err(DbErr)` - Database error during query
    pub async fn notified_keys(&self, keys: &[String]) -> Result<HashSet<String>, DbErr> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }

        let entities = entity::prelude::ApplicationNotice::find()
            .filter(entity::application_notice::Column::ApplicationKey.is_in(keys.iter().cloned()))
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| entity.application_key)
            .collect())
    }

    /// Records an announcement.
    ///
    /// # Returns
    /// - `Ok(ApplicationNotice)` - The created record
    /// - `Err(DbErr)` - Database error, including a duplicate key
    pub async fn create(&self, param: CreateApplicationNoticeParam) -> Result<ApplicationNotice, DbErr> {
        let entity = entity::application_notice::ActiveModel {
            id: ActiveValue::NotSet,
            application_key: ActiveValue::Set(param.application_key),
            discord_id: ActiveValue::Set(param.discord_id),
            channel_id: ActiveValue::Set(param.channel_id.to_string()),
            message_id: ActiveValue::Set(param.message_id.to_string()),
            notified_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(ApplicationNotice::from_entity(entity))
    }
}
