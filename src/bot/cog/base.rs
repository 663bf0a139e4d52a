//! Greetings, latency, profiles and other small everyday commands.

use dioxus_logger::tracing;
use serenity::all::{
    ChannelType, Context, CreateEmbed, CreateMessage, EditMember, EditMessage, Guild, Member, Role,
    User,
};

use crate::command::argument;
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture};
use crate::error::command::CommandError;
use crate::error::AppError;
use crate::literal::{format, Literals};
use crate::model::embed::{ChainedEmbed, KENKEN_CYAN};
use crate::service::chatter;
use crate::service::interface::attach_toggle;
use crate::util::time::format_kst;

pub const NICK_MAX_LENGTH: usize = 32;
const EM_SPACE: char = '\u{2003}';

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("안녕", greet).aliases(&["반가워", "ㅎㅇ", "greet", "hi", "hello"]),
        Command::new("핑", ping)
            .aliases(&["ping", "p"])
            .check(Check::TokensLen(1)),
        Command::new("프로필", profile)
            .aliases(&["profile", "사용자", "user"])
            .usage("[멤버]"),
        Command::new("거리두기", distance)
            .aliases(&["사회적거리두기", "안전거리"])
            .check(Check::GuildOnly),
        Command::new("서버", guild_profile)
            .aliases(&["길드"])
            .check(Check::GuildOnly),
    ]
}

/// Guild name and icon shown as the author of a member profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildBadge {
    pub name: String,
    pub icon: Option<String>,
}

/// Profile of `user`, enriched with guild details when `member` is given.
///
/// # Arguments
/// - `member` - The user as a guild member, if known
/// - `badge` - Guild the member belongs to
/// - `roles` - The member's roles, highest first
/// - `brief` - Leave out join date, roles and the large avatar
pub fn profile_embed(
    literals: &Literals,
    user: &User,
    member: Option<&Member>,
    badge: Option<&GuildBadge>,
    roles: &[Role],
    brief: bool,
) -> ChainedEmbed {
    let text = literals.section("profile");
    let name = member.map_or(user.display_name(), Member::display_name);
    let colour = roles
        .iter()
        .map(|role| role.colour.0)
        .find(|colour| *colour != 0)
        .unwrap_or(KENKEN_CYAN);

    let mut embed = ChainedEmbed::new(name)
        .colour(colour)
        .description(user.tag())
        .thumbnail(user.face());
    if let Some(badge) = badge {
        let top_role = roles.first().map(|role| role.name.as_str()).unwrap_or_default();
        let author = format!("{} {}", badge.name, top_role);
        embed = embed.author(author.trim_end(), badge.icon.clone());
    }
    if brief {
        return embed;
    }

    embed = embed.image(user.face()).footer(format!(
        "{} · {}",
        format_kst(user.id.created_at().to_utc()),
        user.id
    ));
    if let Some(member) = member {
        if let Some(joined_at) = member.joined_at {
            embed.add_field(text.get("join"), format_kst(joined_at.to_utc()), true);
        }
        if let Some(premium_since) = member.premium_since {
            embed.add_field(text.get("boost"), format_kst(premium_since.to_utc()), true);
        }
        if !roles.is_empty() {
            let names: Vec<&str> = roles.iter().map(|role| role.name.as_str()).collect();
            embed.add_field(text.get("roles"), names.join("\n"), false);
        }
    }
    embed
}

/// Profile of a guild; the detailed version adds boosters, channels and dates.
pub fn guild_embed(literals: &Literals, guild: &Guild, owner: Option<&User>, brief: bool) -> ChainedEmbed {
    let text = literals.section("guild_profile");
    let mut description = format(text.get("description"), &[&guild.member_count]);
    let tier = u8::from(guild.premium_tier);
    if tier > 0 {
        description.push('\n');
        description.push_str(&format(text.get("tier"), &[&tier]));
    }

    let mut embed = ChainedEmbed::new(guild.name.clone()).description(description);
    if let Some(owner) = owner {
        embed = embed.author(format(text.get("author"), &[&owner.name]), Some(owner.face()));
    }
    if let Some(icon) = guild.icon_url() {
        embed = embed.thumbnail(icon);
    }
    if brief {
        return embed;
    }

    if let Some(count) = guild.premium_subscription_count.filter(|count| *count > 0) {
        let boosters: Vec<&str> = guild
            .members
            .values()
            .filter(|member| member.premium_since.is_some())
            .map(Member::display_name)
            .collect();
        let value = if boosters.is_empty() {
            "-".to_string()
        } else {
            boosters.join("\n")
        };
        embed.add_field(format(text.get("boost"), &[&count]), value, false);
    }

    if !guild.channels.is_empty() {
        let count = |kind: ChannelType| {
            guild
                .channels
                .values()
                .filter(|channel| channel.kind == kind)
                .count()
        };
        let value = [
            format(text.get("category"), &[&count(ChannelType::Category)]),
            format(text.get("text_channel"), &[&count(ChannelType::Text)]),
            format(text.get("voice_channel"), &[&count(ChannelType::Voice)]),
        ]
        .join("\n");
        embed.add_field(
            format(text.get("channel"), &[&guild.channels.len()]),
            value,
            false,
        );
    }

    if let Some(banner) = guild.banner_url() {
        embed = embed.image(banner);
    }
    embed.footer(format!(
        "{} · {}",
        format_kst(guild.id.created_at().to_utc()),
        guild.id
    ))
}

/// Spreads a nickname out with em spaces, one step wider than it already is.
///
/// Plain spaces are dropped first. Returns the new nickname and its spacing level.
pub fn space_out(nick: &str) -> (String, usize) {
    let nick: Vec<char> = nick.chars().filter(|c| *c != ' ').collect();

    let mut shortest: Option<usize> = None;
    let mut run = 0;
    for c in nick.iter().chain(std::iter::once(&'\0')) {
        if *c == EM_SPACE {
            run += 1;
        } else if run > 0 {
            shortest = Some(shortest.map_or(run, |shortest| shortest.min(run)));
            run = 0;
        }
    }

    let Some(shortest) = shortest else {
        let spaced: Vec<String> = nick.iter().map(char::to_string).collect();
        return (spaced.join(&EM_SPACE.to_string()), 1);
    };

    let level = shortest + 1;
    let mut spaced = String::new();
    let mut in_run = false;
    for c in nick {
        if c == EM_SPACE {
            if !in_run {
                spaced.extend(std::iter::repeat_n(EM_SPACE, level));
                in_run = true;
            }
        } else {
            in_run = false;
            spaced.push(c);
        }
    }
    (spaced, level)
}

/// `text` with `level` em spaces between every character.
fn spaced_text(text: &str, level: usize) -> String {
    let gap: String = std::iter::repeat_n(EM_SPACE, level).collect();
    let chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
    chars.join(&gap)
}

/// Guild name, icon and the roles of `member`, highest first, from the cache.
fn member_context(ctx: &Context, member: &Member) -> (Option<GuildBadge>, Vec<Role>) {
    let Some(guild) = member.guild_id.to_guild_cached(&ctx.cache) else {
        return (None, Vec::new());
    };
    let mut roles: Vec<Role> = member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id).cloned())
        .collect();
    roles.sort_by(|a, b| b.position.cmp(&a.position));
    let badge = GuildBadge {
        name: guild.name.clone(),
        icon: guild.icon_url(),
    };
    (Some(badge), roles)
}

async fn send_toggled(
    inv: &Invocation,
    brief: Vec<CreateEmbed>,
    detail: Vec<CreateEmbed>,
) -> Result<(), CommandError> {
    let mut message = inv
        .channel_id()
        .send_message(&inv.ctx.http, CreateMessage::new().embeds(brief.clone()))
        .await?;
    attach_toggle(&inv.ctx, &mut message, brief, detail, None).await?;
    Ok(())
}

fn greet(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let name = inv
            .message
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .unwrap_or_else(|| inv.author().display_name().to_string());
        let greeting = {
            let mut rng = rand::rng();
            chatter::greeting(&literals.strings("greetings"), &name, &mut rng)
        };
        inv.send(greeting).await?;
        Ok(())
    })
}

fn ping(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let text = inv.literals();
        let text = text.section("ping");
        let mut message = inv.send(text.get("start")).await?;
        let latency = *message.timestamp - *inv.message.timestamp;
        message
            .edit(
                &inv.ctx,
                EditMessage::new().content(format(text.get("done"), &[&latency.num_milliseconds()])),
            )
            .await?;
        Ok(())
    })
}

fn profile(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let guild_id = inv
            .message
            .guild_id
            .unwrap_or(inv.state.config.shtelo_guild_id);
        let member = if inv.args.is_empty() {
            guild_id.member(&inv.ctx, inv.author().id).await.ok()
        } else {
            Some(argument::member(&inv.ctx, guild_id, inv.args.rest()).await?)
        };
        let user = member
            .as_ref()
            .map_or_else(|| inv.author().clone(), |member| member.user.clone());
        let (badge, roles) = match &member {
            Some(member) => member_context(&inv.ctx, member),
            None => (None, Vec::new()),
        };

        let brief = profile_embed(&literals, &user, member.as_ref(), badge.as_ref(), &roles, true);
        let detail = profile_embed(&literals, &user, member.as_ref(), badge.as_ref(), &roles, false);
        send_toggled(&inv, brief.to_embeds(), detail.to_embeds()).await
    })
}

fn distance(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let text = inv.literals();
        let text = text.section("distance");
        let guild_id = inv.guild_id()?;
        let member = guild_id.member(&inv.ctx, inv.author().id).await?;
        let nick = member.nick.clone().unwrap_or_else(|| member.user.name.clone());

        let (spaced, level) = space_out(&nick);
        if spaced.chars().count() > NICK_MAX_LENGTH {
            return Err(CommandError::Refused(text.get("too_long").to_string()));
        }
        if let Err(e) = guild_id
            .edit_member(&inv.ctx.http, member.user.id, EditMember::new().nickname(spaced))
            .await
        {
            tracing::warn!("Could not space out {}: {}", member.user.name, e);
            return Err(CommandError::Refused(text.get("failed").to_string()));
        }
        inv.send(spaced_text(&format(text.get("done"), &[&level]), level))
            .await?;
        Ok(())
    })
}

fn guild_profile(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let guild_id = inv.guild_id()?;
        let guild = guild_id
            .to_guild_cached(&inv.ctx.cache)
            .map(|guild| Guild::clone(&guild))
            .ok_or_else(|| AppError::NotFound(format!("Guild {} is not cached", guild_id)))?;
        let owner = match guild.members.get(&guild.owner_id) {
            Some(member) => Some(member.user.clone()),
            None => guild.owner_id.to_user(&inv.ctx).await.ok(),
        };

        let brief = guild_embed(&literals, &guild, owner.as_ref(), true);
        let detail = guild_embed(&literals, &guild, owner.as_ref(), false);
        send_toggled(&inv, brief.to_embeds(), detail.to_embeds()).await
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use test_utils::serenity::{create_test_guild, create_test_member, create_test_role};

    fn literals() -> Literals {
        Literals::parse(
            r#"{
                "profile": {"join": "가입", "boost": "부스트", "roles": "역할"},
                "guild_profile": {
                    "description": "멤버 %d명",
                    "tier": "부스트 %d티어",
                    "author": "서버 주인 %s",
                    "boost": "부스트 %d회",
                    "channel": "채널 %d개",
                    "category": "카테고리 %d개",
                    "text_channel": "텍스트 %d개",
                    "voice_channel": "음성 %d개"
                }
            }"#,
            "//",
        )
        .unwrap()
    }

    #[test]
    fn spaces_out_plain_nickname() {
        let (spaced, level) = space_out("켄 켄");
        assert_eq!(spaced, "켄\u{2003}켄");
        assert_eq!(level, 1);
    }

    #[test]
    fn widens_existing_spacing() {
        let (spaced, level) = space_out("켄\u{2003}\u{2003}켄\u{2003}주");
        assert_eq!(level, 2);
        assert_eq!(spaced, "켄\u{2003}\u{2003}켄\u{2003}\u{2003}주");
    }

    #[test]
    fn spaced_text_uses_level() {
        assert_eq!(spaced_text("거리", 2), "거\u{2003}\u{2003}리");
    }

    #[test]
    fn brief_profile_shows_guild_and_top_role() {
        let literals = literals();
        let member = create_test_member(7, "zer0ken", Some("켄켄 주인"), &[11, 12]);
        let roles = vec![
            create_test_role(12, "파트너", 0xFDDE59, 5),
            create_test_role(11, "멤버", 0, 1),
        ];
        let badge = GuildBadge {
            name: "슈텔로".to_string(),
            icon: None,
        };

        let embed = profile_embed(&literals, &member.user, Some(&member), Some(&badge), &roles, true);
        let page = &embed.pages()[0];
        assert_eq!(page.title.as_deref(), Some("켄켄 주인"));
        assert_eq!(page.author, Some(("슈텔로 파트너".to_string(), None)));
        assert!(page.fields.is_empty());
        assert!(page.image.is_none());
    }

    #[test]
    fn detailed_profile_lists_roles() {
        let literals = literals();
        let member = create_test_member(7, "zer0ken", None, &[11]);
        let roles = vec![create_test_role(11, "멤버", 0, 1)];

        let embed = profile_embed(&literals, &member.user, Some(&member), None, &roles, false);
        let fields = &embed.pages()[0].fields;
        assert_eq!(fields[0].name, "가입");
        assert_eq!(fields.last().unwrap().name, "역할");
        assert_eq!(fields.last().unwrap().value, "멤버");
        assert!(embed.pages()[0].image.is_some());
    }

    #[test]
    fn guild_profile_brief_and_detail() {
        let literals = literals();
        let guild = create_test_guild(500, "슈텔로", Some("abc"), 0);
        let owner = create_test_member(100000000000000000, "owner", None, &[]).user;

        let brief = guild_embed(&literals, &guild, Some(&owner), true);
        let page = &brief.pages()[0];
        assert_eq!(page.title.as_deref(), Some("슈텔로"));
        assert_eq!(page.description.as_deref(), Some("멤버 42명"));
        assert_eq!(page.author.as_ref().map(|(name, _)| name.as_str()), Some("서버 주인 owner"));
        assert!(page.thumbnail.is_some());

        // No channels or boosts in the fixture, so the detail adds no fields.
        let detail = guild_embed(&literals, &guild, None, false);
        assert!(detail.pages()[0].fields.is_empty());
        assert!(detail.pages()[0].author.is_none());
    }

    #[test]
    fn boosted_guild_lists_boosters() {
        let literals = literals();
        let guild = create_test_guild(500, "슈텔로", None, 3);

        let brief = guild_embed(&literals, &guild, None, true);
        assert_eq!(brief.pages()[0].description.as_deref(), Some("멤버 42명\n부스트 1티어"));

        let detail = guild_embed(&literals, &guild, None, false);
        let fields = &detail.pages()[0].fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "부스트 3회");
        assert_eq!(fields[0].value, "-");
    }
}
