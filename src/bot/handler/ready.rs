//! Ready event handler for bot initialization.
//!
//! Fired once the gateway handshake completes. Sets the bot's activity and
//! starts loading the deck registry, which commands marked `deck_ready` wait on.

use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

use crate::service::deck::DeckService;
use crate::state::BotState;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &Arc<BotState>, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    let activity = format!("{}도움말", state.config.command_prefix);
    ctx.set_activity(Some(ActivityData::playing(activity)));

    let state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = DeckService::new(&ctx, &state).fetch_decks().await {
            tracing::error!("Failed to load decks: {}", e);
        }
    });
}
