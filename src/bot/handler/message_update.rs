//! Message update event handler.
//!
//! An edit that turns a message into a valid command runs that command, so a
//! typo can be fixed without sending the command again.

use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::{Context, Message, MessageUpdateEvent};

use crate::command::router::{self, Dispatch};
use crate::state::BotState;

/// Handle an edited message
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context for refetching the message
/// - `_old` - Cached message before the edit (unused)
/// - `new` - Cached message after the edit, if the cache holds it
/// - `event` - Raw update; `content` is only set when the text changed
pub async fn handle_message_update(
    state: &Arc<BotState>,
    ctx: Context,
    _old: Option<Message>,
    new: Option<Message>,
    event: MessageUpdateEvent,
) {
    if event.content.is_none() {
        return;
    }
    let message = match new {
        Some(message) => message,
        None => match event.channel_id.message(&ctx, event.id).await {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Could not fetch edited message {}: {}", event.id, e);
                return;
            }
        },
    };
    if message.author.bot {
        return;
    }

    let prefix = &state.config.command_prefix;
    if router::dispatch(&ctx, &message, state, prefix).await == Dispatch::Handled {
        tracing::debug!("Ran edited message {} as a command", message.id);
    }
}
