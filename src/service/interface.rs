//! Reaction driven message interfaces.
//!
//! A toggle swaps a message between a brief and a detailed embed. It stops
//! listening after a minute without input and clears its reactions.

use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::{Context, CreateEmbed, EditMessage, Message, ReactionType, UserId};

use crate::error::AppError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const TOGGLE_EXPAND: &str = "❓";
pub const TOGGLE_COLLAPSE: &str = "❌";

/// Which side of a toggle to show after `emoji` was pressed.
///
/// # Returns
/// - `Some(true)` - Show the detailed state
/// - `Some(false)` - Show the brief state
/// - `None` - The emoji does not belong to the toggle
pub fn toggle_target(emoji: &str) -> Option<bool> {
    match emoji {
        TOGGLE_EXPAND => Some(true),
        TOGGLE_COLLAPSE => Some(false),
        _ => None,
    }
}

fn unicode(emoji: &str) -> ReactionType {
    ReactionType::Unicode(emoji.to_string())
}

fn reaction_name(reaction: &ReactionType) -> Option<&str> {
    match reaction {
        ReactionType::Unicode(name) => Some(name.as_str()),
        _ => None,
    }
}

/// Waits for a reaction on `message` from anyone but us, or only from `user`.
async fn next_reaction(
    ctx: &Context,
    message: &Message,
    user: Option<UserId>,
    emojis: &'static [&'static str],
) -> Option<String> {
    let me = ctx.cache.current_user().id;
    let reaction = message
        .await_reaction(&ctx.shard)
        .timeout(DEFAULT_TIMEOUT)
        .filter(move |reaction| {
            let by = reaction.user_id;
            by != Some(me)
                && user.is_none_or(|user| by == Some(user))
                && reaction_name(&reaction.emoji).is_some_and(|name| emojis.contains(&name))
        })
        .await?;
    reaction_name(&reaction.emoji).map(str::to_string)
}

/// Removes every reaction, ignoring failures in DMs where we may not.
async fn clear_reactions(ctx: &Context, message: &Message) {
    if let Err(e) = message.delete_reactions(&ctx.http).await {
        tracing::debug!("Could not clear reactions of {}: {}", message.id, e);
    }
}

/// Lets users switch `message` between `brief` and `detail`.
///
/// The message is expected to show `brief` when called.
pub async fn attach_toggle(
    ctx: &Context,
    message: &mut Message,
    brief: Vec<CreateEmbed>,
    detail: Vec<CreateEmbed>,
    user: Option<UserId>,
) -> Result<(), AppError> {
    message.react(&ctx.http, unicode(TOGGLE_EXPAND)).await?;
    while let Some(emoji) =
        next_reaction(ctx, message, user, &[TOGGLE_EXPAND, TOGGLE_COLLAPSE]).await
    {
        let Some(detailed) = toggle_target(&emoji) else {
            continue;
        };
        let (embeds, next) = if detailed {
            (detail.clone(), TOGGLE_COLLAPSE)
        } else {
            (brief.clone(), TOGGLE_EXPAND)
        };
        clear_reactions(ctx, message).await;
        message
            .edit(ctx, EditMessage::new().embeds(embeds))
            .await?;
        message.react(&ctx.http, unicode(next)).await?;
    }
    clear_reactions(ctx, message).await;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn toggle_maps_emojis_to_states() {
        assert_eq!(toggle_target(TOGGLE_EXPAND), Some(true));
        assert_eq!(toggle_target(TOGGLE_COLLAPSE), Some(false));
        assert_eq!(toggle_target("🗑️"), None);
    }
}
