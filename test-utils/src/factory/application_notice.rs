//! Application notice factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{next_sequence, snowflake};

/// Factory for creating application notices with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let notice = ApplicationNoticeFactory::new(&db)
///     .application_key("2026. 3. 1 오후 1:00:00#kenken")
///     .build()
///     .await?;
/// ```
pub struct ApplicationNoticeFactory<'a> {
    db: &'a DatabaseConnection,
    application_key: String,
    discord_id: String,
    channel_id: String,
    message_id: String,
}

impl<'a> ApplicationNoticeFactory<'a> {
    /// Creates a factory with a unique key and ids.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_sequence();
        Self {
            db,
            application_key: format!("2026. 3. 1 오후 1:00:{:02}#user{}", id % 60, id),
            discord_id: format!("user{}", id),
            channel_id: snowflake(1, 0),
            message_id: snowflake(2, id),
        }
    }

    pub fn application_key(mut self, application_key: impl Into<String>) -> Self {
        self.application_key = application_key.into();
        self
    }

    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = discord_id.into();
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Builds and inserts the notice.
    ///
    /// # Returns
    /// - `Ok(entity::application_notice::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::application_notice::Model, DbErr> {
        entity::application_notice::ActiveModel {
            id: ActiveValue::NotSet,
            application_key: ActiveValue::Set(self.application_key),
            discord_id: ActiveValue::Set(self.discord_id),
            channel_id: ActiveValue::Set(self.channel_id),
            message_id: ActiveValue::Set(self.message_id),
            notified_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an application notice with default values.
pub async fn create_application_notice(
    db: &DatabaseConnection,
) -> Result<entity::application_notice::Model, DbErr> {
    ApplicationNoticeFactory::new(db).build().await
}
