use std::time::Duration;

use thiserror::Error;

use crate::error::{deck::DeckError, game::GameError, google::GoogleError, AppError};

/// Error returned by command handlers.
///
/// Every variant except `App` is a user-facing failure: the router answers it in
/// the invoking channel. `App` wraps internal failures which are logged and
/// reported to the bot owner.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A required positional argument was not given.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// An argument could not be converted to the expected type.
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// A command check did not pass. Holds the check key.
    #[error("Check '{0}' failed")]
    CheckFailure(&'static str),

    /// The shared cooldown bucket is exhausted.
    #[error("Command is on cooldown, retry after {0:?}")]
    Cooldown(Duration),

    /// The command was refused with a message for the user.
    #[error("{0}")]
    Refused(String),

    /// Internal failure.
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<serenity::Error> for CommandError {
    fn from(err: serenity::Error) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<sea_orm::DbErr> for CommandError {
    fn from(err: sea_orm::DbErr) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<DeckError> for CommandError {
    fn from(err: DeckError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<GoogleError> for CommandError {
    fn from(err: GoogleError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<GameError> for CommandError {
    fn from(err: GameError) -> Self {
        CommandError::Refused(err.to_string())
    }
}
