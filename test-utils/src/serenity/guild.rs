//! Test factory for creating Serenity Guild objects.
//!
//! Used by the guild profile embed tests, which care about the member count,
//! the boost state and the icon.

use serenity::all::Guild;

/// Boost count needed for each premium tier above zero.
const TIER_THRESHOLDS: [u64; 3] = [2, 7, 14];

/// Premium tier Discord grants for `boosts`.
pub fn premium_tier(boosts: u64) -> u8 {
    TIER_THRESHOLDS
        .iter()
        .filter(|threshold| boosts >= **threshold)
        .count() as u8
}

/// Creates a test Serenity Guild with 42 members and no channels.
///
/// # Arguments
/// - `guild_id` - Discord guild ID (snowflake)
/// - `name` - Guild name
/// - `icon_hash` - Optional icon hash, zero-padded to Discord's 32 characters
/// - `boosts` - Premium subscription count; the tier follows from it
///
/// # Panics
/// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
pub fn create_test_guild(guild_id: u64, name: &str, icon_hash: Option<&str>, boosts: u64) -> Guild {
    let icon = icon_hash.map(|hash| format!("{:0<32}", hash));

    serde_json::from_value(serde_json::json!({
        "id": guild_id.to_string(),
        "name": name,
        "icon": icon,
        "owner_id": "100000000000000000",
        "afk_timeout": 300,
        "verification_level": 1,
        "default_message_notifications": 1,
        "explicit_content_filter": 2,
        "roles": [],
        "emojis": [],
        "stickers": [],
        "features": [],
        "mfa_level": 0,
        "system_channel_flags": 0,
        "premium_tier": premium_tier(boosts),
        "premium_subscription_count": boosts,
        "premium_progress_bar_enabled": false,
        "preferred_locale": "ko",
        "nsfw_level": 0,
        "joined_at": "2020-05-01T00:00:00.000000+00:00",
        "large": false,
        "member_count": 42,
        "voice_states": [],
        "channels": [],
        "threads": [],
        "presences": [],
        "members": [],
        "stage_instances": [],
        "guild_scheduled_events": [],
    }))
    .expect("Failed to create test guild - invalid JSON structure")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tier_follows_boosts() {
        assert_eq!(premium_tier(0), 0);
        assert_eq!(premium_tier(2), 1);
        assert_eq!(premium_tier(13), 2);
        assert_eq!(premium_tier(30), 3);
    }

    #[test]
    fn guild_carries_boost_state() {
        let guild = create_test_guild(500, "슈텔로", Some("abc"), 7);
        assert_eq!(u8::from(guild.premium_tier), 2);
        assert_eq!(guild.premium_subscription_count, Some(7));
        assert!(guild.icon_url().is_some());
    }
}
