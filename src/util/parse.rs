use serenity::all::{ChannelId, UserId};
use serenity::utils::{parse_channel_mention, parse_user_mention};

/// Parses a user from a `<@id>` / `<@!id>` mention or a bare id.
pub fn parse_user(value: &str) -> Option<UserId> {
    let value = value.trim();
    parse_user_mention(value).or_else(|| parse_id(value).map(UserId::new))
}

/// Parses a channel from a `<#id>` mention or a bare id.
pub fn parse_channel(value: &str) -> Option<ChannelId> {
    let value = value.trim();
    parse_channel_mention(value).or_else(|| parse_id(value).map(ChannelId::new))
}

/// Parses a non-zero snowflake.
pub fn parse_id(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Formats a user mention the way the bot writes it into channel topics.
pub fn user_mention(user: UserId) -> String {
    format!("<@{}>", user.get())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_user_mentions_and_ids() {
        assert_eq!(parse_user("<@123>"), Some(UserId::new(123)));
        assert_eq!(parse_user("<@!123>"), Some(UserId::new(123)));
        assert_eq!(parse_user("123"), Some(UserId::new(123)));
        assert_eq!(parse_user("<#123>"), None);
        assert_eq!(parse_user("kenken"), None);
    }

    #[test]
    fn parses_channel_mentions_and_ids() {
        assert_eq!(parse_channel("<#77>"), Some(ChannelId::new(77)));
        assert_eq!(parse_channel("77"), Some(ChannelId::new(77)));
        assert_eq!(parse_channel("<@77>"), None);
    }

    #[test]
    fn zero_is_not_an_id() {
        assert_eq!(parse_id("0"), None);
    }

    #[test]
    fn formats_user_mention() {
        assert_eq!(user_mention(UserId::new(5)), "<@5>");
    }
}
