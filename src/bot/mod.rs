//! Discord side of the bot: gateway client, event handlers and command cogs.
//!
//! The client is started from `main` after the state is built and runs until
//! the gateway connection shuts down. Every handler receives the shared
//! [`BotState`](crate::state::BotState).
//!
//! # Gateway Intents
//!
//! - `GUILDS`, `GUILD_MEMBERS` - Channels, roles and members of the community guild
//! - `GUILD_MESSAGES`, `DIRECT_MESSAGES` - Commands, chatter and protocol requests
//! - `GUILD_MESSAGE_REACTIONS`, `DIRECT_MESSAGE_REACTIONS` - Toggles, pagers and games
//! - `MESSAGE_CONTENT` - Reading command text
//!
//! `GUILD_MEMBERS` and `MESSAGE_CONTENT` are privileged intents and must be
//! enabled in the Discord Developer Portal.

pub mod cog;
pub mod handler;
pub mod start;
