//! Channel event handlers.
//!
//! A deck's state lives in the topic of its default channel. An update to that
//! channel reloads the deck; an update to any other channel of a deck reloads
//! the registry.

use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::{Context, GuildChannel};

use crate::service::deck::DeckService;
use crate::state::BotState;

/// Handles the channel_update event when a channel is updated in a guild.
///
/// # Arguments
/// - `state` - Shared bot state holding the deck registry
/// - `ctx` - Discord context for refetching channels
/// - `_old` - Previous channel state if cached (unused)
/// - `new` - Updated channel state from Discord
pub async fn handle_channel_update(
    state: &Arc<BotState>,
    ctx: Context,
    _old: Option<GuildChannel>,
    new: GuildChannel,
) {
    if new.guild_id != state.config.shtelo_guild_id || !state.decks.is_ready() {
        return;
    }
    let deck = state
        .decks
        .read()
        .await
        .by_channel(new.id, new.parent_id)
        .cloned();
    let Some(deck) = deck else {
        return;
    };

    let service = DeckService::new(&ctx, state);
    if new.id == deck.default_channel_id {
        tracing::debug!("Topic channel of deck {} updated, reloading it", deck.id);
        match service.fetch_deck(&deck).await {
            Ok(Some(_)) => {}
            Ok(None) => tracing::info!("Deck {} no longer has a deck topic", deck.id),
            Err(e) => tracing::error!("Failed to reload deck {}: {}", deck.id, e),
        }
        return;
    }

    tracing::debug!("Deck channel {} updated, reloading decks", new.name);
    if let Err(e) = service.fetch_decks().await {
        tracing::error!("Failed to reload decks after update of {}: {}", new.id, e);
    }
}
