use std::path::PathBuf;

use serenity::all::{ChannelId, GuildId, RoleId, UserId};

use crate::error::{config::ConfigError, AppError};

const DEFAULT_COMMAND_PREFIX: &str = "//";
const DEFAULT_APPLICATION_READ_RANGE: &str = "설문지 응답 시트1!A1:O";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google API credentials and the ids of the documents the bot reads.
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub token_url: String,

    pub application_sheet_id: String,
    pub application_read_range: String,
    /// Roster spreadsheet, `None` disables the roster lookup command.
    pub roster_sheet_id: Option<String>,
    pub roster_read_range: Option<String>,
    pub regulation_doc_id: String,
}

pub struct Config {
    pub discord_bot_token: String,
    pub database_url: String,
    pub command_prefix: String,

    pub shtelo_guild_id: GuildId,
    pub manager_role_id: RoleId,
    pub partner_role_id: RoleId,
    pub partner_channel_id: ChannelId,
    pub recycle_bin_category_id: ChannelId,
    pub owner_id: UserId,
    /// Another bot whose protocol requests are never answered.
    pub ignored_bot_id: Option<UserId>,

    pub google: GoogleConfig,

    /// Literal store override, the compiled-in store is used when unset.
    pub literals_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            command_prefix: optional("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            shtelo_guild_id: GuildId::new(required_id("SHTELO_GUILD_ID")?),
            manager_role_id: RoleId::new(required_id("MANAGER_ROLE_ID")?),
            partner_role_id: RoleId::new(required_id("PARTNER_ROLE_ID")?),
            partner_channel_id: ChannelId::new(required_id("PARTNER_CHANNEL_ID")?),
            recycle_bin_category_id: ChannelId::new(required_id("RECYCLE_BIN_CATEGORY_ID")?),
            owner_id: UserId::new(required_id("OWNER_ID")?),
            ignored_bot_id: optional_id("IGNORED_BOT_ID")?.map(UserId::new),
            google: GoogleConfig {
                client_id: required("GOOGLE_CLIENT_ID")?,
                client_secret: required("GOOGLE_CLIENT_SECRET")?,
                refresh_token: required("GOOGLE_REFRESH_TOKEN")?,
                token_url: GOOGLE_TOKEN_URL.to_string(),
                application_sheet_id: required("APPLICATION_SHEET_ID")?,
                application_read_range: optional("APPLICATION_READ_RANGE")
                    .unwrap_or_else(|| DEFAULT_APPLICATION_READ_RANGE.to_string()),
                roster_sheet_id: optional("ROSTER_SHEET_ID"),
                roster_read_range: optional("ROSTER_READ_RANGE"),
                regulation_doc_id: required("REGULATION_DOC_ID")?,
            },
            literals_path: optional("LITERALS_PATH").map(PathBuf::from),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn required_id(name: &str) -> Result<u64, ConfigError> {
    let value = required(name)?;
    parse_id(name, value)
}

fn optional_id(name: &str) -> Result<Option<u64>, ConfigError> {
    optional(name).map(|value| parse_id(name, value)).transpose()
}

/// Parses a Discord snowflake from an environment variable value.
///
/// Zero is rejected since serenity ids are non-zero.
fn parse_id(name: &str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
    }
}
