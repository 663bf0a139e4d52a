//! Error types for the bot.
//!
//! `AppError` is the top-level error that wraps every infrastructure failure the
//! bot can run into (configuration, database, Discord, Google APIs, the deck
//! topic codec). Command handlers return `CommandError` instead, which separates
//! failures the invoking user should be told about from internal ones.

pub mod command;
pub mod config;
pub mod deck;
pub mod game;
pub mod google;

use thiserror::Error;

use crate::error::{config::ConfigError, deck::DeckError, google::GoogleError};

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic error conversion so that `?` can be
/// used across repository, service and startup code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Google Sheets or Docs API error.
    #[error(transparent)]
    GoogleErr(#[from] GoogleError),

    /// Deck topic could not be encoded or decoded.
    #[error(transparent)]
    DeckErr(#[from] DeckError),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Literal store JSON could not be parsed.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Literal store file could not be read.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Internal error with custom message.
    ///
    /// # Fields
    /// - Detailed error message for logging
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
