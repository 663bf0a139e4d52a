//! Bot state shared across event handlers, commands and scheduled jobs.
//!
//! The state is built once during startup, wrapped in an `Arc` and handed to the
//! event handler, the scheduler and every command invocation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use sea_orm::DatabaseConnection;
use serenity::all::ChannelId;

use crate::command::cooldown::SharedCooldown;
use crate::command::CommandRegistry;
use crate::config::Config;
use crate::error::AppError;
use crate::literal::Literals;
use crate::model::game::GameRegistry;
use crate::service::deck::DeckStore;
use crate::service::google::GoogleClient;
use crate::util::fresh::Fresh;

/// One deck edit per category channel per minute.
pub const DECK_COOLDOWN: Duration = Duration::from_secs(60);

/// Shared resources of the running bot.
pub struct BotState {
    pub config: Config,

    /// Connection pool of the SQLite database.
    pub db: DatabaseConnection,

    pub http_client: reqwest::Client,

    /// Sheets and Docs client with a cached access token.
    pub google: GoogleClient,

    pub commands: CommandRegistry,

    /// Decks discovered from the community guild's channel topics.
    pub decks: DeckStore,

    pub deck_cooldown: SharedCooldown<ChannelId>,

    /// Regulation paragraphs, refreshed hourly.
    pub regulation: tokio::sync::Mutex<Option<Fresh<Vec<String>>>>,

    games: Mutex<GameRegistry>,

    literals: RwLock<Arc<Literals>>,
}

impl BotState {
    /// Builds the state and loads the literal store.
    ///
    /// # Arguments
    /// - `config` - Bot configuration
    /// - `db` - Migrated database connection
    /// - `http_client` - HTTP client for the Google APIs
    /// - `commands` - Every registered command
    ///
    /// # Returns
    /// - `Ok(BotState)` - Ready state
    /// - `Err(AppError)` - Literal store or Google client could not be set up
    pub fn new(
        config: Config,
        db: DatabaseConnection,
        http_client: reqwest::Client,
        commands: CommandRegistry,
    ) -> Result<Self, AppError> {
        let literals = Literals::load(config.literals_path.as_deref(), &config.command_prefix)?;
        let google = GoogleClient::new(&config.google, http_client.clone())?;

        Ok(Self {
            config,
            db,
            http_client,
            google,
            commands,
            decks: DeckStore::new(),
            deck_cooldown: SharedCooldown::new(DECK_COOLDOWN),
            regulation: tokio::sync::Mutex::new(None),
            games: Mutex::new(GameRegistry::new()),
            literals: RwLock::new(Arc::new(literals)),
        })
    }

    /// Snapshot of the current literal store.
    pub fn literals(&self) -> Arc<Literals> {
        self.literals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reloads the literal store from its source.
    pub fn reload_literals(&self) -> Result<(), AppError> {
        let literals = Literals::load(
            self.config.literals_path.as_deref(),
            &self.config.command_prefix,
        )?;
        *self
            .literals
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(literals);
        Ok(())
    }

    /// Running game sessions. Never hold the guard across an await.
    pub fn games(&self) -> MutexGuard<'_, GameRegistry> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
