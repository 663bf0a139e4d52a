//! Test factories for Serenity `Role` objects.
//!
//! Profiles list roles by position and colour; decks find their role by name.

use serenity::all::Role;

fn role_json(role_id: u64, name: &str, color: u32, position: i16, mentionable: bool) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": color,
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": mentionable,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}

/// Creates a plain role without permissions.
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name
/// - `color` - Colour as RGB, `0` for none
/// - `position` - Position in the hierarchy, higher is listed first
pub fn create_test_role(role_id: u64, name: &str, color: u32, position: i16) -> Role {
    role_json(role_id, name, color, position, false)
}

/// Creates the mentionable role a deck is opened with.
pub fn create_deck_role(role_id: u64, deck_name: &str) -> Role {
    role_json(role_id, deck_name, 0, 1, true)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deck_roles_are_mentionable() {
        let role = create_deck_role(30, "보드게임");
        assert!(role.mentionable);
        assert_eq!(role.name, "보드게임");
        assert!(!create_test_role(11, "멤버", 0, 1).mentionable);
    }
}
