//! Message event handler.
//!
//! A message is offered, in order, to the inter-bot protocol, the command router
//! and the chatter. The first one that takes it ends the chain.

use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::{Context, CurrentUser, Message};

use crate::command::router::{self, Dispatch};
use crate::service::{chatter, protocol};
use crate::state::BotState;

/// Handle message creation in a channel or DM
pub async fn handle_message(state: &Arc<BotState>, ctx: Context, message: Message) {
    let me = ctx.cache.current_user().id;
    if message.author.id == me {
        return;
    }

    match protocol::handle_message(&ctx, &message, state).await {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to handle protocol request {}: {}", message.id, e);
            return;
        }
    }
    if message.author.bot {
        return;
    }

    let prefix = &state.config.command_prefix;
    match router::dispatch(&ctx, &message, state, prefix).await {
        Dispatch::Handled => return,
        Dispatch::Unknown => {
            if message.guild_id.is_some() {
                if let Err(e) = protocol::broadcast_pass(&ctx, &message, prefix).await {
                    tracing::warn!("Failed to pass unknown command {}: {}", message.id, e);
                }
            }
            return;
        }
        Dispatch::NotCommand => {}
    }

    chat(state, &ctx, &message).await;
}

/// Answers a message that calls the bot by name.
async fn chat(state: &BotState, ctx: &Context, message: &Message) {
    let me = CurrentUser::clone(&ctx.cache.current_user());
    let bot_name = message
        .guild_id
        .and_then(|guild_id| {
            let guild = ctx.cache.guild(guild_id)?;
            guild.members.get(&me.id)?.nick.clone()
        })
        .unwrap_or_else(|| me.display_name().to_string());

    let count = chatter::called_count(&message.content, me.id, &bot_name);
    if count == 0 {
        return;
    }

    let author = message
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| message.author.display_name().to_string());
    let literals = state.literals();
    let reply = {
        let mut rng = rand::rng();
        chatter::reply(
            &message.content,
            count,
            &author,
            &literals.strings("greetings"),
            &literals.strings("reactions"),
            &mut rng,
        )
    };

    if let Some(reply) = reply {
        if let Err(e) = message.channel_id.say(&ctx.http, reply).await {
            tracing::warn!("Failed to answer call in {}: {}", message.channel_id, e);
        }
    }
}
