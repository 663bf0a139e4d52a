use std::sync::Arc;
use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::{Context, Message};

use crate::command::router::{self, Dispatch};
use crate::error::AppError;
use crate::model::protocol::{accept_request, PassTarget, Request, Sender, Signal};
use crate::state::BotState;

const PASS_LIFETIME: Duration = Duration::from_secs(1);

/// Parses and handles a protocol request carried by `message`.
///
/// # Returns
/// - `Ok(true)` - The message was a request addressed to us
/// - `Ok(false)` - Not a request for us; the caller keeps processing it
pub async fn handle_message(
    ctx: &Context,
    message: &Message,
    state: &Arc<BotState>,
) -> Result<bool, AppError> {
    let me = ctx.cache.current_user().id;
    let sender = Sender {
        id: message.author.id,
        bot: message.author.bot,
    };
    let Some(request) = accept_request(&message.content, sender, me, state.config.ignored_bot_id)
    else {
        return Ok(false);
    };

    tracing::info!(
        "Protocol request {} from {} in channel {}",
        request.signal,
        message.author.name,
        message.channel_id
    );

    match request.signal {
        Signal::Echo => {
            if !request.addition.is_empty() {
                message
                    .channel_id
                    .say(&ctx.http, request.addition.as_str())
                    .await?;
            }
        }
        Signal::Pass => on_pass(ctx, state, &request).await?,
        Signal::Send | Signal::Here | Signal::Done => {
            tracing::debug!("Acknowledged {} with '{}'", request.signal, request.addition);
        }
    }
    Ok(true)
}

/// Runs a message another bot could not handle, with that bot's prefix.
async fn on_pass(ctx: &Context, state: &Arc<BotState>, request: &Request) -> Result<(), AppError> {
    let Some(target) = PassTarget::parse(&request.addition) else {
        tracing::warn!("PASS request lacks components: '{}'", request.addition);
        return Ok(());
    };

    let passed = match target.channel_id.message(ctx, target.message_id).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(
                "Passed message {} in channel {} not found: {}",
                target.message_id,
                target.channel_id,
                e
            );
            return Ok(());
        }
    };

    if router::dispatch(ctx, &passed, state, &target.prefix).await == Dispatch::Handled {
        tracing::info!("Handled passed message {}", target.message_id);
    }
    Ok(())
}

/// Asks other bots to handle a message we have no command for.
///
/// The request is deleted shortly after being sent.
pub async fn broadcast_pass(ctx: &Context, message: &Message, prefix: &str) -> Result<(), AppError> {
    let request = PassTarget {
        prefix: prefix.to_string(),
        channel_id: message.channel_id,
        message_id: message.id,
    }
    .to_request();

    let sent = message.channel_id.say(&ctx.http, request.to_string()).await?;
    tracing::debug!("Broadcast {}", request);

    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(PASS_LIFETIME).await;
        if let Err(e) = sent.channel_id.delete_message(&http, sent.id).await {
            tracing::warn!("Failed to delete PASS request: {}", e);
        }
    });
    Ok(())
}
