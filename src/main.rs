mod bot;
mod command;
mod config;
mod data;
mod error;
mod literal;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use dioxus_logger::tracing::{self, Level};

use crate::{
    config::Config, error::AppError, scheduler::application_notifications, state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    dioxus_logger::init(Level::INFO)
        .map_err(|e| AppError::InternalError(format!("Failed to initialize logger: {}", e)))?;

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;

    let state = Arc::new(BotState::new(
        config,
        db,
        http_client,
        bot::cog::registry(),
    )?);

    tracing::info!("Starting Kenken");

    // Initialize Discord bot and extract HTTP client
    let bot_client = bot::start::init_bot(state.clone()).await?;
    let discord_http = bot_client.http.clone();

    // Start application notification scheduler
    let scheduler_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) =
            application_notifications::start_scheduler(scheduler_state, discord_http).await
        {
            tracing::error!("Application notification scheduler error: {}", e);
        }
    });

    bot::start::start_bot(bot_client).await
}
