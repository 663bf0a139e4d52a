//! Announcements of membership applications posted by the poller.

use chrono::{DateTime, Utc};

/// A submission that was already announced to the partner channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationNotice {
    pub id: i32,
    /// Submission key, see `Application::key`.
    pub application_key: String,
    /// Discord tag written in the submission (stored as String).
    pub discord_id: String,
    /// Channel the announcement was posted in (stored as String).
    pub channel_id: String,
    /// Announcement message (stored as String).
    pub message_id: String,
    pub notified_at: DateTime<Utc>,
}

impl ApplicationNotice {
    /// Converts an entity model to an application notice domain model at the repository boundary.
    pub fn from_entity(entity: entity::application_notice::Model) -> Self {
        Self {
            id: entity.id,
            application_key: entity.application_key,
            discord_id: entity.discord_id,
            channel_id: entity.channel_id,
            message_id: entity.message_id,
            notified_at: entity.notified_at,
        }
    }
}

/// Parameters for recording an announced application.
#[derive(Debug, Clone)]
pub struct CreateApplicationNoticeParam {
    pub application_key: String,
    pub discord_id: String,
    pub channel_id: u64,
    pub message_id: u64,
}
