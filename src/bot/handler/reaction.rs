//! Reaction event handlers.

use dioxus_logger::tracing;
use serenity::all::{Context, Reaction, ReactionType};

pub const WASTEBASKET: &str = "🗑️";

/// Whether `emoji` asks for a message to be removed.
pub fn is_wastebasket(emoji: &ReactionType) -> bool {
    match emoji {
        // Clients send the wastebasket with or without the variation selector.
        ReactionType::Unicode(name) => name.trim_end_matches('\u{fe0f}') == "🗑",
        _ => false,
    }
}

/// Handles the reaction_add event.
///
/// A wastebasket reaction on one of our own messages deletes it.
///
/// # Arguments
/// - `ctx` - Discord context for fetching and deleting the message
/// - `reaction` - The added reaction
pub async fn handle_reaction_add(ctx: Context, reaction: Reaction) {
    let me = ctx.cache.current_user().id;
    if reaction.user_id == Some(me) || !is_wastebasket(&reaction.emoji) {
        return;
    }

    let message = match reaction.message(&ctx.http).await {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Could not fetch reacted message {}: {}", reaction.message_id, e);
            return;
        }
    };
    if message.author.id != me {
        return;
    }

    if let Err(e) = message.delete(&ctx.http).await {
        tracing::warn!("Failed to delete message {} on request: {}", message.id, e);
    } else {
        tracing::debug!("Deleted message {} on wastebasket reaction", message.id);
    }
}
