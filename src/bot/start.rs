use std::sync::Arc;

use dioxus_logger::tracing;
use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::error::AppError;
use crate::state::BotState;

pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT
}

/// Builds the Discord client with the bot's event handler.
///
/// # Arguments
/// - `state` - Shared bot state handed to every event
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError)` - The client could not be built
pub async fn init_bot(state: Arc<BotState>) -> Result<Client, AppError> {
    let token = state.config.discord_bot_token.clone();
    let client = Client::builder(&token, intents())
        .event_handler(Handler::new(state))
        .await?;
    Ok(client)
}

/// Runs the client until the gateway connection shuts down.
///
/// Should be called from within a spawned task.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");
    client.start().await?;
    Ok(())
}
