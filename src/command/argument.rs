//! Converters from raw argument tokens to typed values.
//!
//! The pure matching functions are separated from the lookups that hit the
//! cache or the HTTP API so they can be tested with plain model objects.

use serenity::all::{ChannelId, Context, GuildId, Member};

use crate::error::command::CommandError;
use crate::model::deck::registry::DeckRegistry;
use crate::model::deck::Deck;
use crate::util::parse::{parse_channel, parse_user};

pub fn to_int(value: &str) -> Result<i64, CommandError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| CommandError::BadArgument(format!("'{}' is not an integer", value)))
}

/// Whether `query` names `member` by username, tag, global name or nickname.
pub fn member_matches(member: &Member, query: &str) -> bool {
    member.user.name == query
        || member.user.tag() == query
        || member.user.global_name.as_deref() == Some(query)
        || member.nick.as_deref() == Some(query)
}

pub fn find_member<'a>(
    members: impl IntoIterator<Item = &'a Member>,
    query: &str,
) -> Option<&'a Member> {
    let members: Vec<&Member> = members.into_iter().collect();
    let mentioned = parse_user(query);
    members
        .iter()
        .find(|member| Some(member.user.id) == mentioned)
        .or_else(|| members.iter().find(|member| member_matches(member, query)))
        .copied()
}

/// Resolves a deck by id, then name, then a mentioned channel or category.
///
/// # Arguments
/// - `registry` - Known decks
/// - `query` - Raw argument text
/// - `parent_of` - Category of a channel, used for channel mentions
pub fn find_deck<'a>(
    registry: &'a DeckRegistry,
    query: &str,
    parent_of: impl Fn(ChannelId) -> Option<ChannelId>,
) -> Option<&'a Deck> {
    registry
        .by_id(query)
        .or_else(|| registry.by_name(query))
        .or_else(|| {
            let channel = parse_channel(query)?;
            registry.by_channel(channel, parent_of(channel))
        })
}

/// Looks up a guild member by mention, id, or name.
pub async fn member(ctx: &Context, guild_id: GuildId, query: &str) -> Result<Member, CommandError> {
    if let Some(user_id) = parse_user(query) {
        if let Ok(member) = guild_id.member(ctx, user_id).await {
            return Ok(member);
        }
    }

    let cached = guild_id.to_guild_cached(&ctx.cache).and_then(|guild| {
        find_member(guild.members.values(), query).cloned()
    });
    if let Some(member) = cached {
        return Ok(member);
    }

    let found = guild_id.search_members(&ctx.http, query, Some(10)).await?;
    find_member(found.iter(), query)
        .cloned()
        .ok_or_else(|| CommandError::BadArgument(format!("member '{}' not found", query)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::deck::topic::DeckRecord;
    use crate::model::deck::DeckFlags;
    use serenity::all::UserId;
    use test_utils::serenity::create_test_member;

    #[test]
    fn parses_integers() {
        assert_eq!(to_int(" 42 ").unwrap(), 42);
        assert_eq!(to_int("-3").unwrap(), -3);
        assert!(matches!(to_int("다섯"), Err(CommandError::BadArgument(_))));
    }

    #[test]
    fn finds_member_by_mention_name_or_nick() {
        let members = [
            create_test_member(1, "zer0ken", Some("켄켄 주인"), &[]),
            create_test_member(2, "shtelo", None, &[]),
        ];

        assert_eq!(find_member(&members, "<@2>").unwrap().user.id, UserId::new(2));
        assert_eq!(find_member(&members, "2").unwrap().user.id, UserId::new(2));
        assert_eq!(find_member(&members, "zer0ken").unwrap().user.id, UserId::new(1));
        assert_eq!(find_member(&members, "켄켄 주인").unwrap().user.id, UserId::new(1));
        assert!(find_member(&members, "<@3>").is_none());
        assert!(find_member(&members, "nobody").is_none());
    }

    #[test]
    fn finds_deck_by_id_name_or_channel() {
        let deck = Deck::from_record(
            DeckRecord {
                id: "a1c2".to_string(),
                flags: DeckFlags::default(),
                manager: UserId::new(1),
                pending: Vec::new(),
                topic: String::new(),
            },
            "보드게임".to_string(),
            ChannelId::new(10),
            ChannelId::new(11),
            None,
        );
        let registry = DeckRegistry::from_decks([deck]);
        let parent_of = |channel: ChannelId| (channel == ChannelId::new(15)).then(|| ChannelId::new(10));

        assert!(find_deck(&registry, "a1c2", parent_of).is_some());
        assert!(find_deck(&registry, "보드게임", parent_of).is_some());
        assert!(find_deck(&registry, "<#15>", parent_of).is_some());
        assert!(find_deck(&registry, "<#10>", parent_of).is_some());
        assert!(find_deck(&registry, "<#16>", parent_of).is_none());
        assert!(find_deck(&registry, "독서", parent_of).is_none());
    }
}
