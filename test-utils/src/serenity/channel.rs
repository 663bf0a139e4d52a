//! Test factory for Serenity `GuildChannel` objects.

use serenity::all::GuildChannel;

/// Guild id every test channel belongs to.
pub const TEST_GUILD_ID: u64 = 500000000000000000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
}

impl ChannelKind {
    fn code(self) -> u8 {
        match self {
            ChannelKind::Text => 0,
            ChannelKind::Voice => 2,
            ChannelKind::Category => 4,
        }
    }
}

/// Creates a test guild channel.
///
/// # Arguments
/// - `channel_id` - Discord channel ID (snowflake)
/// - `name` - Channel name
/// - `kind` - Text, voice or category channel
/// - `parent_id` - Category the channel is placed in
/// - `topic` - Channel topic
///
/// # Panics
/// - If the JSON cannot be deserialized into a GuildChannel (indicates invalid test data)
pub fn create_test_channel(
    channel_id: u64,
    name: &str,
    kind: ChannelKind,
    parent_id: Option<u64>,
    topic: Option<&str>,
) -> GuildChannel {
    serde_json::from_value(serde_json::json!({
        "id": channel_id.to_string(),
        "type": kind.code(),
        "guild_id": TEST_GUILD_ID.to_string(),
        "name": name,
        "position": 0,
        "permission_overwrites": [],
        "nsfw": false,
        "topic": topic,
        "parent_id": parent_id.map(|id| id.to_string()),
        "last_message_id": null,
        "rate_limit_per_user": 0,
        "flags": 0,
        "available_tags": [],
        "applied_tags": [],
    }))
    .expect("Failed to create test channel - invalid JSON structure")
}
