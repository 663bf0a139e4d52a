use serenity::all::UserId;
use thiserror::Error;

/// Failures when opening or playing a minigame session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The player already takes part in another session.
    #[error("User {0} is already playing a game")]
    AlreadyPlaying(UserId),

    /// The same user was listed twice as a participant.
    #[error("User {0} was listed more than once")]
    DuplicatePlayer(UserId),

    /// The Yacht category was already scored this game.
    #[error("Category '{0}' was already used")]
    CategoryUsed(&'static str),

    /// A dice index outside A-E was selected.
    #[error("Dice index {0} is out of range")]
    InvalidDice(usize),
}
