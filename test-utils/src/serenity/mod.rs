//! Test factories for creating Serenity API objects.
//!
//! The factories deserialize JSON shaped like Discord API payloads, so the
//! resulting objects are exactly what the gateway would hand the bot.
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_deck_role, create_test_channel, ChannelKind};
//!
//! let category = create_test_channel(10, "보드게임", ChannelKind::Category, None, None);
//! let role = create_deck_role(12, "보드게임");
//! ```

pub mod channel;
pub mod guild;
pub mod member;
pub mod role;

pub use channel::{create_test_channel, ChannelKind};
pub use guild::create_test_guild;
pub use member::create_test_member;
pub use role::{create_deck_role, create_test_role};
