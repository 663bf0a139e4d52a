use thiserror::Error;

/// Failures of the deck topic codec and deck lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// The channel topic does not start with a deck header in any known format.
    #[error("Channel topic is not a deck topic")]
    NotDeckTopic,

    /// A mandatory line of the topic grammar is absent or malformed.
    #[error("Deck topic is missing the '{0}' line")]
    MissingLine(&'static str),

    /// The deck id contains characters outside the allowed alphabet.
    #[error("Invalid deck id '{0}'")]
    InvalidId(String),

    /// A mention inside the topic could not be parsed.
    #[error("Invalid mention '{0}' in deck topic")]
    InvalidMention(String),

    /// Encoded topic exceeds Discord's channel topic limit.
    #[error("Encoded deck topic is {0} characters long, over the channel topic limit")]
    TopicTooLong(usize),

    /// The deck's role could not be found in the guild.
    #[error("Role for deck '{0}' not found")]
    RoleNotFound(String),
}
