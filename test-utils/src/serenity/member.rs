//! Test factory for Serenity `Member` objects.

use serenity::all::Member;

use crate::serenity::channel::TEST_GUILD_ID;

/// Creates a test guild member.
///
/// # Arguments
/// - `user_id` - Discord user ID (snowflake)
/// - `username` - Account name
/// - `nick` - Server nickname
/// - `roles` - Role IDs the member holds
///
/// # Panics
/// - If the JSON cannot be deserialized into a Member (indicates invalid test data)
pub fn create_test_member(user_id: u64, username: &str, nick: Option<&str>, roles: &[u64]) -> Member {
    let roles: Vec<String> = roles.iter().map(|role| role.to_string()).collect();
    serde_json::from_value(serde_json::json!({
        "guild_id": TEST_GUILD_ID.to_string(),
        "user": {
            "id": user_id.to_string(),
            "username": username,
            "global_name": null,
            "discriminator": "0",
            "avatar": null,
            "bot": false,
        },
        "nick": nick,
        "avatar": null,
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "communication_disabled_until": null,
    }))
    .expect("Failed to create test member - invalid JSON structure")
}
