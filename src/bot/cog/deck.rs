//! Deck management commands.
//!
//! Commands resolve the deck from the registry to check and answer, but every
//! change goes through [`DeckService::update_deck`], which applies it to the
//! current registered copy. Commands that rewrite a deck share a cooldown per
//! deck category, consumed only once the change is about to be made.

use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::{
    ChannelId, Context, CreateMessage, EditMessage, GuildId, Member, MessageCollector,
    ReactionType, UserId,
};

use crate::command::argument::{self, find_deck};
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture};
use crate::data::deck_topic_archive::DeckTopicArchiveRepository;
use crate::error::command::CommandError;
use crate::literal::{format, Literals};
use crate::model::deck::{
    is_valid_id, is_valid_name, Deck, DeckFlag, JoinMode, JoinPolicy, NAME_MAX_LENGTH,
    TOPIC_MAX_LENGTH,
};
use crate::model::embed::ChainedEmbed;
use crate::service::deck::DeckService;
use crate::service::shtelo;
use crate::util::codeblock::{check_length, wrap_codeblock, MESSAGE_MAX_LENGTH};
use crate::util::parse::user_mention;
use crate::util::time::format_kst;

const NSFW_TIMEOUT: Duration = Duration::from_secs(60);
const START_TIMEOUT: Duration = Duration::from_secs(60);
const HISTORY_LIMIT: u64 = 5;

const NSFW_EMOJI: &str = ":underage:";
const CANCEL_EMOJI: &str = ":negative_squared_cross_mark:";

pub fn commands() -> Vec<Command> {
    vec![Command::new("데크", deck)
        .aliases(&["deck"])
        .usage("[데크]")
        .check(Check::DeckReady)
        .subcommand(Command::new("갱신", refresh).aliases(&["동기화", "초기화", "새로고침"]))
        .subcommand(Command::new("정보", info).usage("[데크]"))
        .subcommand(
            Command::new("목록", list)
                .aliases(&["리스트", "전체"])
                .usage("[키워드]"),
        )
        .subcommand(
            Command::new("가입", join)
                .aliases(&["신청", "가입신청", "들어가기"])
                .usage("<데크>"),
        )
        .subcommand(
            Command::new("수락", accept)
                .aliases(&["가입승인", "가입수락", "승인"])
                .usage("<데크> <멤버> [멤버...]"),
        )
        .subcommand(
            Command::new("간편수락", quick_accept)
                .aliases(&["간편승인"])
                .usage("[멤버...]")
                .check(Check::GuildOnly),
        )
        .subcommand(
            Command::new("거절", reject)
                .aliases(&["거부", "기각"])
                .usage("<데크> <멤버> [멤버...]"),
        )
        .subcommand(Command::new("탈퇴", leave).aliases(&["나가기"]).usage("[데크]"))
        .subcommand(
            Command::new("주제", topic)
                .aliases(&["설명"])
                .usage("[주제]")
                .subcommand(Command::new("삭제", remove_topic).aliases(&["제거"])),
        )
        .subcommand(Command::new("아이디", change_id).aliases(&["id"]).usage("[아이디]"))
        .subcommand(Command::new("이름", rename).usage("[이름]"))
        .subcommand(Command::new("개설", start).aliases(&["추가"]).usage("<이름>"))
        .subcommand(
            Command::new("폐쇄", close)
                .aliases(&["닫기"])
                .check(Check::GuildOnly)
                .check(Check::PartnerOnly),
        )
        .subcommand(
            Command::new("설정", setting)
                .usage("<공개|성인|자동|잠금>")
                .check(Check::GuildOnly),
        )
        .subcommand(
            Command::new("기록", history)
                .usage("[데크]")
                .check(Check::OwnerOnly),
        )]
}

/// Flag named by a setting argument.
pub fn flag_by_name(name: &str) -> Option<DeckFlag> {
    match name {
        "공개" | "public" => Some(DeckFlag::Public),
        "성인" | "nsfw" => Some(DeckFlag::Nsfw),
        "자동" | "auto" => Some(DeckFlag::Auto),
        "잠금" | "lock" => Some(DeckFlag::Lock),
        _ => None,
    }
}

/// Info embed of a deck.
///
/// # Arguments
/// - `members` - Display names of the members holding the deck role
/// - `manager_face` - Avatar of the manager, shown as thumbnail
pub fn deck_embed(
    literals: &Literals,
    deck: &Deck,
    members: &[String],
    manager_face: Option<String>,
) -> ChainedEmbed {
    let text = literals.section("deck_embed");
    let mut embed = ChainedEmbed::new(format(text.get("title"), &[&deck.name]))
        .description(deck.topic())
        .footer(format(text.get("id"), &[&deck.id]));
    if let Some(face) = manager_face {
        embed = embed.thumbnail(face);
    }

    embed.add_field(text.get("manager"), user_mention(deck.manager), false);
    for flag in deck.flags.iter() {
        let key = flag.key();
        embed.add_field(
            text.get(&format!("{}_name", key)),
            text.get(&format!("{}_value", key)),
            false,
        );
    }
    if !deck.pending.is_empty() {
        let pending: Vec<String> = deck.pending.iter().map(|user| user_mention(*user)).collect();
        embed.add_field(
            format(text.get("pending"), &[&deck.pending.len()]),
            pending.join(" "),
            false,
        );
    }
    if !members.is_empty() {
        let names: Vec<String> = members.iter().map(|name| format!("@{}", name)).collect();
        embed.add_field(
            format(text.get("members"), &[&members.len()]),
            names.join("\n"),
            false,
        );
    }
    embed
}

/// Embed shown while a change is saved: the new state and what it replaced.
fn change_embed(literals: &Literals, deck: &Deck, before_key: &str, before: String) -> ChainedEmbed {
    let mut embed = deck_embed(literals, deck, &[], None);
    embed.clear_fields();
    embed.add_field(literals.section("deck").get(before_key), before, false);
    embed
}

fn wrapped(content: &str) -> String {
    wrap_codeblock(content, MESSAGE_MAX_LENGTH, false)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn parent_of(ctx: &Context, guild_id: GuildId) -> impl Fn(ChannelId) -> Option<ChannelId> + '_ {
    move |channel| ctx.cache.guild(guild_id)?.channels.get(&channel)?.parent_id
}

/// The deck the invoking channel belongs to.
async fn channel_deck(inv: &Invocation) -> Option<Deck> {
    let channel = inv.channel_id();
    let parent = parent_of(&inv.ctx, inv.state.config.shtelo_guild_id)(channel);
    inv.state
        .decks
        .read()
        .await
        .by_channel(channel, parent)
        .cloned()
}

async fn lookup_deck(inv: &Invocation, query: &str) -> Result<Deck, CommandError> {
    let registry = inv.state.decks.read().await;
    find_deck(
        &registry,
        query,
        parent_of(&inv.ctx, inv.state.config.shtelo_guild_id),
    )
    .cloned()
    .ok_or_else(|| CommandError::BadArgument(format(inv.text("deck", "not_found").as_str(), &[&query])))
}

/// Deck named by the rest of the arguments, or the channel's deck when none is named.
async fn deck_or_channel(inv: &Invocation) -> Result<Option<Deck>, CommandError> {
    match inv.args.rest() {
        "" => Ok(channel_deck(inv).await),
        query => lookup_deck(inv, query).await.map(Some),
    }
}

/// The channel's deck, when the author manages it.
async fn managed_deck(inv: &Invocation) -> Result<Deck, CommandError> {
    let Some(deck) = channel_deck(inv).await else {
        return Err(CommandError::Refused(inv.text("deck", "no_channel_deck")));
    };
    if !deck.is_manager(inv.author().id) {
        return Err(CommandError::Refused(inv.text("deck", "not_manager")));
    }
    Ok(deck)
}

/// Users named by the arguments from `from` on.
async fn users_from(inv: &Invocation, from: usize) -> Result<Vec<UserId>, CommandError> {
    let mut users = Vec::new();
    for query in inv.args.iter().skip(from) {
        let member = argument::member(&inv.ctx, inv.state.config.shtelo_guild_id, query).await?;
        users.push(member.user.id);
    }
    Ok(users)
}

async fn show_info(inv: &Invocation, deck: &Deck) -> Result<(), CommandError> {
    let service = DeckService::new(&inv.ctx, &inv.state);
    let members: Vec<String> = match service.members(deck).await {
        Ok(members) => members.iter().map(|member| member.display_name().to_string()).collect(),
        Err(e) => {
            tracing::warn!("Could not list members of deck {}: {}", deck.id, e);
            Vec::new()
        }
    };
    let face = deck.manager.to_user(&inv.ctx).await.ok().map(|user| user.face());
    inv.send_embed(&deck_embed(&inv.literals(), deck, &members, face))
        .await?;
    Ok(())
}

/// Lists every deck, or those whose topic mentions `keyword`.
async fn show_list(inv: &Invocation, keyword: Option<&str>) -> Result<(), CommandError> {
    let literals = inv.literals();
    let text = literals.section("deck_list");
    let briefs: Vec<String> = {
        let registry = inv.state.decks.read().await;
        let decks = match keyword {
            Some(keyword) => registry.find_by_topic(keyword),
            None => registry.sorted(),
        };
        decks
            .into_iter()
            .map(|deck| deck.brief(|code| literals.emoji(code)))
            .collect()
    };
    if briefs.is_empty() {
        if let Some(keyword) = keyword {
            return Err(CommandError::Refused(format(text.get("not_found"), &[&keyword])));
        }
    }

    let title = match keyword {
        Some(keyword) => format(text.get("search_title"), &[&keyword]),
        None => text.get("title").to_string(),
    };
    let face = inv.ctx.cache.current_user().face();
    let embed = ChainedEmbed::new(title)
        .description(briefs.join("\n"))
        .thumbnail(face);
    inv.send_embed(&embed).await?;
    Ok(())
}

/// Applies `change` under a saving notice, then shows the saved deck.
///
/// `change` returns the previous value, shown under `before_key`.
async fn save_with_notice(
    inv: &Invocation,
    deck: &Deck,
    before_key: &str,
    change: impl FnOnce(&mut Deck) -> Result<String, CommandError>,
) -> Result<(), CommandError> {
    let literals = inv.literals();
    let text = literals.section("deck_save");
    let mut message = inv.send(text.get("start")).await?;
    let (saved, before) = DeckService::new(&inv.ctx, &inv.state)
        .update_deck(deck, change)
        .await?;
    let embed = change_embed(&literals, &saved, before_key, before);
    message
        .edit(
            &inv.ctx,
            EditMessage::new()
                .content(format(text.get("done"), &[&saved.name]))
                .embeds(embed.to_embeds()),
        )
        .await?;
    Ok(())
}

/// Grants the deck role to the pending `users` the manager accepted.
///
/// Only users whose role was granted leave the pending list.
async fn accept_pending(inv: &Invocation, deck: Deck, users: &[UserId]) -> Result<(), CommandError> {
    let literals = inv.literals();
    let text = literals.section("deck_accept");
    if !deck.is_manager(inv.author().id) {
        return Err(CommandError::Refused(inv.text("deck", "not_manager")));
    }
    let accepted = deck.clone().take_pending(users);
    if accepted.is_empty() {
        return Err(CommandError::Refused(text.get("no_pending").to_string()));
    }

    let mut message = inv.send(format(text.get("start"), &[&accepted.len()])).await?;
    let service = DeckService::new(&inv.ctx, &inv.state);
    let mut granted = Vec::new();
    let mut failure = None;
    for user in &accepted {
        match service.add_member(&deck, *user).await {
            Ok(()) => granted.push(*user),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    if !granted.is_empty() {
        service
            .update_deck(&deck, |deck| Ok::<_, CommandError>(deck.take_pending(&granted)))
            .await?;
    }
    if let Some(e) = failure {
        return Err(e.into());
    }

    let mentions: Vec<String> = accepted.iter().map(|user| user_mention(*user)).collect();
    message
        .edit(
            &inv.ctx,
            EditMessage::new().content(format(
                text.get("done"),
                &[&mentions.join(" "), &deck.name],
            )),
        )
        .await?;
    tracing::info!("{} accepted into deck {}", mentions.join(" "), deck.id);
    Ok(())
}

fn deck(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        match deck_or_channel(&inv).await? {
            Some(deck) => show_info(&inv, &deck).await,
            None => show_list(&inv, None).await,
        }
    })
}

fn refresh(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_refresh");
        let mut message = inv.send(text.get("start")).await?;
        DeckService::new(&inv.ctx, &inv.state).fetch_decks().await?;
        message
            .edit(&inv.ctx, EditMessage::new().content(text.get("done")))
            .await?;
        Ok(())
    })
}

fn info(inv: Invocation) -> CommandFuture {
    deck(inv)
}

fn list(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let keyword = Some(inv.args.rest()).filter(|keyword| !keyword.is_empty());
        show_list(&inv, keyword).await
    })
}

fn join(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_join");
        inv.args.required(0, "데크")?;
        let deck = lookup_deck(&inv, inv.args.rest()).await?;
        let author = inv.author().clone();
        let service = DeckService::new(&inv.ctx, &inv.state);

        let is_member = service.is_member(&deck, author.id).await?;
        let mode = match deck.join_policy(author.id, is_member) {
            JoinPolicy::AlreadyMember => {
                inv.send(text.get("already_member")).await?;
                return Ok(());
            }
            JoinPolicy::Locked => {
                inv.send(format(text.get("locked"), &[&deck.name])).await?;
                return Ok(());
            }
            JoinPolicy::Join { confirm_nsfw, mode } => {
                if confirm_nsfw && !confirm_age(&inv, &deck).await? {
                    inv.react(literals.emoji(CANCEL_EMOJI)).await?;
                    return Ok(());
                }
                mode
            }
        };

        match mode {
            JoinMode::Immediate => {
                service.add_member(&deck, author.id).await?;
                inv.send(format(text.get("done"), &[&deck.name])).await?;
            }
            JoinMode::AlreadyApplied => {
                inv.send(text.get("already_applied")).await?;
            }
            JoinMode::Apply => {
                let already_applied = text.get("already_applied").to_string();
                let (deck, ()) = service
                    .update_deck(&deck, |deck| {
                        if deck.apply(author.id) {
                            Ok(())
                        } else {
                            Err(CommandError::Refused(already_applied))
                        }
                    })
                    .await?;
                inv.send(format(text.get("applied"), &[&deck.name])).await?;
                let notice = format(
                    text.get("pending"),
                    &[&user_mention(author.id), &deck.name, &deck.id, &author.name],
                );
                if let Err(e) = deck
                    .manager
                    .direct_message(&inv.ctx, CreateMessage::new().content(notice))
                    .await
                {
                    tracing::warn!("Could not notify manager of deck {}: {}", deck.id, e);
                }
            }
        }
        Ok(())
    })
}

/// Asks the author to confirm joining an adult deck with a reaction.
async fn confirm_age(inv: &Invocation, deck: &Deck) -> Result<bool, CommandError> {
    let literals = inv.literals();
    let emoji = literals.emoji(NSFW_EMOJI).to_string();
    let warning = inv
        .send(format(
            literals.section("deck_join").get("warn"),
            &[&deck.name, &user_mention(inv.author().id)],
        ))
        .await?;
    warning
        .react(&inv.ctx.http, ReactionType::Unicode(emoji.clone()))
        .await?;

    let author = inv.author().id;
    let confirmed = warning
        .await_reaction(&inv.ctx.shard)
        .author_id(author)
        .timeout(NSFW_TIMEOUT)
        .filter(move |reaction| reaction.emoji == ReactionType::Unicode(emoji.clone()))
        .await
        .is_some();

    if let Err(e) = warning.delete(&inv.ctx.http).await {
        tracing::debug!("Could not delete age warning: {}", e);
    }
    Ok(confirmed)
}

fn accept(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let query = inv.args.required(0, "데크")?;
        inv.args.required(1, "멤버")?;
        let deck = lookup_deck(&inv, query).await?;
        let users = users_from(&inv, 1).await?;
        accept_pending(&inv, deck, &users).await
    })
}

fn quick_accept(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let Some(deck) = channel_deck(&inv).await else {
            return Err(CommandError::Refused(inv.text("deck_quick_accept", "failed")));
        };
        let users = match users_from(&inv, 0).await? {
            users if users.is_empty() => deck.pending.clone(),
            users => users,
        };
        if !deck.is_manager(inv.author().id) {
            return Err(CommandError::Refused(inv.text("deck", "not_manager")));
        }
        inv.consume_deck_cooldown(deck.category_id)?;
        accept_pending(&inv, deck, &users).await
    })
}

fn reject(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let query = inv.args.required(0, "데크")?;
        inv.args.required(1, "멤버")?;
        let deck = lookup_deck(&inv, query).await?;
        if !deck.is_manager(inv.author().id) {
            return Err(CommandError::Refused(inv.text("deck", "not_manager")));
        }
        let users = users_from(&inv, 1).await?;
        let no_pending = inv.text("deck_accept", "no_pending");

        let (deck, rejected) = DeckService::new(&inv.ctx, &inv.state)
            .update_deck(&deck, |deck| match deck.take_pending(&users) {
                rejected if rejected.is_empty() => Err(CommandError::Refused(no_pending)),
                rejected => Ok(rejected),
            })
            .await?;
        let mentions: Vec<String> = rejected.iter().map(|user| user_mention(*user)).collect();
        inv.send(format(
            inv.text("deck_reject", "done").as_str(),
            &[&mentions.join(" "), &deck.name],
        ))
        .await?;
        Ok(())
    })
}

fn leave(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_leave");
        let Some(deck) = deck_or_channel(&inv).await? else {
            return Err(CommandError::Refused(text.get("failed").to_string()));
        };
        let author = inv.author().id;
        let service = DeckService::new(&inv.ctx, &inv.state);

        if !service.is_member(&deck, author).await? {
            let already = text.get("already").to_string();
            service
                .update_deck(&deck, |deck| {
                    if deck.withdraw(author) {
                        Ok(())
                    } else {
                        Err(CommandError::Refused(already))
                    }
                })
                .await?;
            inv.send(format(text.get("cancelled"), &[&deck.name])).await?;
            return Ok(());
        }
        if deck.is_manager(author) {
            return Err(CommandError::Refused(format(text.get("disabled"), &[&deck.name])));
        }

        service.remove_member(&deck, author).await?;
        inv.dm(inv.author(), format(text.get("done"), &[&deck.name]))
            .await?;
        Ok(())
    })
}

fn topic(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let new_topic = inv.args.rest().to_string();
        if new_topic.is_empty() {
            return match channel_deck(&inv).await {
                Some(deck) => show_info(&inv, &deck).await,
                None => show_list(&inv, None).await,
            };
        }
        let deck = managed_deck(&inv).await?;
        check_length(&new_topic, TOPIC_MAX_LENGTH)?;
        inv.consume_deck_cooldown(deck.category_id)?;

        save_with_notice(&inv, &deck, "before", |deck| {
            let before = wrapped(deck.topic());
            deck.set_topic(&new_topic);
            Ok(before)
        })
        .await
    })
}

fn remove_topic(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let deck = managed_deck(&inv).await?;
        inv.consume_deck_cooldown(deck.category_id)?;

        save_with_notice(&inv, &deck, "before", |deck| {
            let before = wrapped(deck.topic());
            deck.set_topic("");
            Ok(before)
        })
        .await
    })
}

fn change_id(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_id");
        let Some(new_id) = inv.args.get(0).map(str::to_string) else {
            return match channel_deck(&inv).await {
                Some(deck) => show_info(&inv, &deck).await,
                None => show_list(&inv, None).await,
            };
        };
        let deck = managed_deck(&inv).await?;

        let taken = inv
            .state
            .decks
            .read()
            .await
            .by_id(&new_id)
            .map(|other| other.name.clone());
        if let Some(other) = taken {
            return Err(CommandError::Refused(format(text.get("already"), &[&other])));
        }
        if !is_valid_id(&new_id) {
            return Err(CommandError::Refused(format(text.get("failed"), &[&new_id])));
        }
        inv.consume_deck_cooldown(deck.category_id)?;

        save_with_notice(&inv, &deck, "before", |deck| {
            let before = format!("`{}`", deck.id);
            deck.id = new_id;
            Ok(before)
        })
        .await
    })
}

fn rename(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_name");
        let new_name = inv.args.rest().to_string();
        if new_name.is_empty() {
            return match channel_deck(&inv).await {
                Some(deck) => show_info(&inv, &deck).await,
                None => show_list(&inv, None).await,
            };
        }
        let deck = managed_deck(&inv).await?;
        check_length(&new_name, NAME_MAX_LENGTH)?;
        if !is_valid_name(&new_name) {
            return Err(CommandError::BadArgument(new_name));
        }

        let taken = inv
            .state
            .decks
            .read()
            .await
            .by_name(&new_name)
            .map(|other| other.name.clone());
        if let Some(other) = taken {
            return Err(CommandError::Refused(format(text.get("already"), &[&other])));
        }
        inv.consume_deck_cooldown(deck.category_id)?;

        let before = wrapped(&deck.name);
        let mut message = inv.send(inv.text("deck_save", "start")).await?;
        let renamed = DeckService::new(&inv.ctx, &inv.state)
            .rename(&deck, &new_name)
            .await?;
        let embed = change_embed(&literals, &renamed, "before", before);
        message
            .edit(
                &inv.ctx,
                EditMessage::new()
                    .content(format(
                        literals.section("deck_save").get("done"),
                        &[&renamed.name],
                    ))
                    .embeds(embed.to_embeds()),
            )
            .await?;
        Ok(())
    })
}

fn start(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_start");
        inv.args.required(0, "이름")?;
        let name = inv.args.rest().to_string();
        let config = &inv.state.config;

        if !shtelo::is_partner(&inv.ctx, config, inv.author().id).await {
            check_length(&name, TOPIC_MAX_LENGTH)?;
            config
                .partner_channel_id
                .say(
                    &inv.ctx.http,
                    format(text.get("pending"), &[&user_mention(inv.author().id), &name]),
                )
                .await?;
            inv.send(format(text.get("applied"), &[&name])).await?;
            return Ok(());
        }

        check_length(&name, NAME_MAX_LENGTH)?;
        if !is_valid_name(&name) {
            return Err(CommandError::BadArgument(name));
        }
        inv.send(text.get("manager")).await?;
        let Some(manager) = wait_for_manager(&inv).await? else {
            inv.react(literals.emoji(CANCEL_EMOJI)).await?;
            return Ok(());
        };

        let mut message = inv.send(text.get("start")).await?;
        let deck = DeckService::new(&inv.ctx, &inv.state)
            .add_deck(&name, manager.user.id)
            .await?;
        inv.send_embed(&deck_embed(&literals, &deck, &[], Some(manager.face())))
            .await?;
        message
            .edit(
                &inv.ctx,
                EditMessage::new().content(format(text.get("done"), &[&deck.name])),
            )
            .await?;
        Ok(())
    })
}

/// Reads the manager of a new deck from the author's next messages.
///
/// Returns `None` when the author stops answering.
async fn wait_for_manager(inv: &Invocation) -> Result<Option<Member>, CommandError> {
    loop {
        let reply = MessageCollector::new(&inv.ctx.shard)
            .channel_id(inv.channel_id())
            .author_id(inv.author().id)
            .timeout(START_TIMEOUT)
            .next()
            .await;
        let Some(reply) = reply else {
            return Ok(None);
        };
        match argument::member(&inv.ctx, inv.state.config.shtelo_guild_id, reply.content.trim()).await {
            Ok(member) => return Ok(Some(member)),
            Err(CommandError::BadArgument(_)) => {
                inv.send(inv.text("deck_start", "manager_failed")).await?;
            }
            Err(e) => return Err(e),
        }
    }
}

fn close(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_close");
        let Some(deck) = channel_deck(&inv).await else {
            return Err(CommandError::Refused(inv.text("deck", "no_channel_deck")));
        };

        inv.send(format(text.get("start"), &[&deck.name])).await?;
        DeckService::new(&inv.ctx, &inv.state)
            .remove_deck(&deck)
            .await?;
        inv.send(format(text.get("done"), &[&deck.name])).await?;
        tracing::info!("Deck {} closed by {}", deck.id, inv.author().name);
        Ok(())
    })
}

fn setting(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_setting");
        let name = inv.args.required(0, "설정")?;
        let Some(flag) = flag_by_name(name) else {
            return Err(CommandError::BadArgument(format(text.get("unknown"), &[&name])));
        };
        let deck = managed_deck(&inv).await?;
        inv.consume_deck_cooldown(deck.category_id)?;

        save_with_notice(&inv, &deck, "setting", |deck| {
            let enabled = !deck.flags.contains(flag);
            deck.flags.set(flag, enabled);
            let state = if enabled { text.get("on") } else { text.get("off") };
            Ok(format!("{} {}", literals.emoji(flag.code()), state))
        })
        .await
    })
}

fn history(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("deck_history");
        let Some(deck) = deck_or_channel(&inv).await? else {
            return Err(CommandError::Refused(inv.text("deck", "no_channel_deck")));
        };

        let archives = DeckTopicArchiveRepository::new(&inv.state.db)
            .get_recent_by_channel(deck.default_channel_id.get(), HISTORY_LIMIT)
            .await?;
        if archives.is_empty() {
            inv.send(format(text.get("empty"), &[&deck.name])).await?;
            return Ok(());
        }

        let mut embed = ChainedEmbed::new(format(text.get("title"), &[&deck.name]));
        for archive in &archives {
            embed.add_field(format_kst(archive.archived_at), wrapped(&archive.topic), false);
        }
        inv.send_embed_dm(&embed).await?;
        inv.send(format(text.get("sent"), &[&archives.len()])).await?;
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::deck::topic::DeckRecord;
    use crate::model::deck::DeckFlags;
    use serenity::all::RoleId;

    fn literals() -> Literals {
        Literals::parse(
            r#"{
                "deck_embed": {
                    "title": "%s 데크",
                    "manager": "매니저",
                    "lock_name": "잠금",
                    "lock_value": "가입할 수 없습니다.",
                    "pending": "가입 신청 %d명",
                    "members": "멤버 %d명",
                    "id": "ID: %s"
                },
                "deck": {"before": "이전"}
            }"#,
            "//",
        )
        .unwrap()
    }

    fn deck() -> Deck {
        Deck::from_record(
            DeckRecord {
                id: "a1c2".to_string(),
                flags: DeckFlags {
                    lock: true,
                    ..Default::default()
                },
                manager: UserId::new(1),
                pending: vec![UserId::new(2), UserId::new(3)],
                topic: "주말 보드게임".to_string(),
            },
            "보드게임".to_string(),
            ChannelId::new(10),
            ChannelId::new(11),
            Some(RoleId::new(12)),
        )
    }

    #[test]
    fn setting_names_map_to_flags() {
        assert_eq!(flag_by_name("공개"), Some(DeckFlag::Public));
        assert_eq!(flag_by_name("성인"), Some(DeckFlag::Nsfw));
        assert_eq!(flag_by_name("auto"), Some(DeckFlag::Auto));
        assert_eq!(flag_by_name("잠금"), Some(DeckFlag::Lock));
        assert_eq!(flag_by_name("비밀"), None);
    }

    #[test]
    fn embed_shows_manager_flags_pending_and_members() {
        let embed = deck_embed(
            &literals(),
            &deck(),
            &["켄켄".to_string(), "슈텔로".to_string()],
            None,
        );
        let page = &embed.pages()[0];

        assert_eq!(page.title.as_deref(), Some("보드게임 데크"));
        assert_eq!(page.description.as_deref(), Some("주말 보드게임"));
        assert_eq!(embed, embed.clone().footer("ID: a1c2"));

        let names: Vec<&str> = page.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["매니저", "잠금", "가입 신청 2명", "멤버 2명"]);
        assert_eq!(page.fields[0].value, "<@1>");
        assert_eq!(page.fields[2].value, "<@2> <@3>");
        assert_eq!(page.fields[3].value, "@켄켄\n@슈텔로");
    }

    #[test]
    fn change_embed_only_shows_previous_value() {
        let embed = change_embed(&literals(), &deck(), "before", "`cccc`".to_string());
        let page = &embed.pages()[0];
        assert_eq!(page.fields.len(), 1);
        assert_eq!(page.fields[0].name, "이전");
        assert_eq!(page.fields[0].value, "`cccc`");
    }
}
