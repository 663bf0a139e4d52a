//! Discord side of the minigames.
//!
//! Each game runs in its own task registered with the session registry, so that
//! `게임 중단` can abort it. Indian Poker reads bets from chat, Yacht is played
//! in DMs with reactions, and the king game is a single draw.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dioxus_logger::tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serenity::all::{
    ChannelId, Context, CreateMessage, EditMessage, Event, Member, Message, MessageCollector,
    MessageId, ReactionType, User, UserId,
};
use serenity::futures::{Stream, StreamExt};

use crate::error::AppError;
use crate::literal::{format, Literals};
use crate::model::embed::ChainedEmbed;
use crate::model::game::indian_poker::{BetInput, BetOutcome, IndianPoker, DEFAULT_CHIPS};
use crate::model::game::king::{self, KingDraw};
use crate::model::game::yacht::{Category, Yacht, DICE_EMOJI, FACE_EMOJI, REROLLS};
use crate::state::BotState;
use crate::util::parse::user_mention;

pub const BET_TIMEOUT: Duration = Duration::from_secs(300);
pub const PICK_TIMEOUT: Duration = Duration::from_secs(300);
const NOTICE_LIFETIME: Duration = Duration::from_secs(10);

const REROLL_EMOJI: &str = ":arrows_counterclockwise:";
const CONFIRM_EMOJI: &str = ":white_check_mark:";

/// Runs `game` as the task of session `id`, freeing the players when it ends.
pub fn spawn_session<F>(state: &Arc<BotState>, id: u64, game: F)
where
    F: Future<Output = Result<(), AppError>> + Send + 'static,
{
    let finished = state.clone();
    let task = tokio::spawn(async move {
        if let Err(e) = game.await {
            tracing::error!("Game session {} failed: {}", id, e);
        }
        finished.games().finish(id);
        tracing::debug!("Game session {} finished", id);
    });
    state.games().attach(id, task.abort_handle());
}

/// Items picked with reactions, in the order they were picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    picked: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { picked: Vec::new() }
    }
}

impl<T: PartialEq> Selection<T> {
    /// Applies a reaction being added or removed.
    pub fn change(&mut self, item: T, added: bool) {
        if added {
            if !self.picked.contains(&item) {
                self.picked.push(item);
            }
        } else {
            self.picked.retain(|picked| *picked != item);
        }
    }

    pub fn items(&self) -> &[T] {
        &self.picked
    }

    pub fn last(&self) -> Option<&T> {
        self.picked.last()
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }
}

/// Chips drawn as emojis, or as a count when there are many.
pub fn chip_text(chip: u32, emoji: &str) -> String {
    match chip {
        0 => "-".to_string(),
        1..=5 => emoji.repeat(chip as usize),
        _ => format!("{}**× {}**", emoji, chip),
    }
}

fn card_embed(literals: &Literals, holder: &User, card: u8) -> ChainedEmbed {
    let text = literals.section("indian_poker");
    let faces = text.list("card_emoji");
    let face = faces
        .get(usize::from(card).saturating_sub(1))
        .copied()
        .unwrap_or_default();
    ChainedEmbed::new(format(text.get("card_title"), &[&holder.name])).description(face)
}

fn chip_embed(literals: &Literals, game: &IndianPoker, players: &[User; 2]) -> ChainedEmbed {
    let text = literals.section("indian_poker");
    let emoji = text.get("chip_emoji");
    let mut embed =
        ChainedEmbed::new(text.get("chip_title")).description(text.get("chip_description"));
    for (player, indian) in players.iter().zip(game.players.iter()) {
        embed.add_field(
            format(text.get("chip_name"), &[&player.name]),
            chip_text(indian.chip, emoji),
            true,
        );
        embed.add_field(
            format(text.get("betting_name"), &[&player.name]),
            chip_text(indian.betting, emoji),
            true,
        );
    }
    embed
}

/// Sends a message that removes itself after a few seconds.
async fn notice(ctx: &Context, channel: ChannelId, content: &str) -> Result<(), AppError> {
    let sent = channel.say(&ctx.http, content).await?;
    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(NOTICE_LIFETIME).await;
        if let Err(e) = sent.channel_id.delete_message(&http, sent.id).await {
            tracing::debug!("Could not delete notice {}: {}", sent.id, e);
        }
    });
    Ok(())
}

async fn delete_quietly(ctx: &Context, message: &Message) {
    if let Err(e) = message.delete(&ctx.http).await {
        tracing::debug!("Could not delete message {}: {}", message.id, e);
    }
}

/// Plays Indian Poker between `players` in `channel` until one runs out of chips.
pub async fn run_indian_poker(
    ctx: Context,
    state: Arc<BotState>,
    channel: ChannelId,
    players: [User; 2],
) -> Result<(), AppError> {
    let literals = state.literals();
    let text = literals.section("indian_poker");
    let mut rng = StdRng::from_os_rng();
    let mut game = IndianPoker::new(players[0].id, players[1].id, DEFAULT_CHIPS);

    loop {
        channel.say(&ctx.http, text.get("round_start")).await?;
        game.start_round(&mut rng);

        // Each player only gets to see the opponent's card.
        for (index, player) in players.iter().enumerate() {
            let other = 1 - index;
            let embed = card_embed(&literals, &players[other], game.players[other].card);
            player
                .direct_message(&ctx, CreateMessage::new().embeds(embed.to_embeds()))
                .await?;
        }

        let Some(folded_winner) = betting(&ctx, &literals, channel, &players, &mut game).await?
        else {
            channel.say(&ctx.http, text.get("timeout")).await?;
            return Ok(());
        };

        for (player, indian) in players.iter().zip(game.players.iter()) {
            let embed = card_embed(&literals, player, indian.card);
            channel
                .send_message(&ctx.http, CreateMessage::new().embeds(embed.to_embeds()))
                .await?;
        }

        match game.settle(folded_winner) {
            Some(winner) => {
                let mention = user_mention(players[winner].id);
                channel
                    .say(&ctx.http, format(text.get("round_winner"), &[&mention]))
                    .await?;
            }
            None => {
                channel.say(&ctx.http, text.get("draw")).await?;
            }
        }

        if let Some(winner) = game.winner() {
            let mention = user_mention(players[winner].id);
            channel
                .say(&ctx.http, format(text.get("winner"), &[&mention]))
                .await?;
            tracing::info!("Indian Poker in {} won by {}", channel, players[winner].name);
            return Ok(());
        }
    }
}

/// Collects bets until the round's betting closes.
///
/// # Returns
/// - `Ok(Some(folded_winner))` - Betting closed; set when a player folded
/// - `Ok(None)` - The player to act did not answer in time
async fn betting(
    ctx: &Context,
    literals: &Literals,
    channel: ChannelId,
    players: &[User; 2],
    game: &mut IndianPoker,
) -> Result<Option<Option<usize>>, AppError> {
    let text = literals.section("indian_poker");
    let mut dealer: Option<Message> = None;
    let mut announce = true;

    loop {
        let current = game.current();
        if announce {
            if let Some(previous) = dealer.take() {
                delete_quietly(ctx, &previous).await;
            }
            let mention = user_mention(players[current].id);
            let message = CreateMessage::new()
                .content(format(text.get("turn"), &[&mention]))
                .embeds(chip_embed(literals, game, players).to_embeds());
            dealer = Some(channel.send_message(&ctx.http, message).await?);
            announce = false;
        }

        let Some(message) = MessageCollector::new(&ctx.shard)
            .channel_id(channel)
            .author_id(players[current].id)
            .timeout(BET_TIMEOUT)
            .next()
            .await
        else {
            return Ok(None);
        };

        let bet = match BetInput::parse(&message.content) {
            BetInput::Ignored => continue,
            BetInput::RaiseWithoutAmount => {
                notice(ctx, channel, text.get("invalid_raise")).await?;
                continue;
            }
            BetInput::Bet(bet) => bet,
        };

        match game.bet(bet) {
            Ok(BetOutcome::Raised) => announce = true,
            Ok(BetOutcome::Closed { folded_winner }) => {
                if let Some(previous) = dealer.take() {
                    delete_quietly(ctx, &previous).await;
                }
                channel.say(&ctx.http, text.get("betting_done")).await?;
                return Ok(Some(folded_winner));
            }
            Err(rejection) => notice(ctx, channel, text.get(rejection.key())).await?,
        }
    }
}

/// Unicode reactions added to or removed from `message` by `user`.
fn reaction_changes(
    ctx: &Context,
    message: MessageId,
    user: UserId,
) -> impl Stream<Item = (String, bool)> {
    serenity::collector::collect(&ctx.shard, move |event| {
        let (reaction, added) = match event {
            Event::ReactionAdd(event) => (&event.reaction, true),
            Event::ReactionRemove(event) => (&event.reaction, false),
            _ => return None,
        };
        if reaction.message_id != message || reaction.user_id != Some(user) {
            return None;
        }
        match &reaction.emoji {
            ReactionType::Unicode(name) => Some((name.clone(), added)),
            _ => None,
        }
    })
}

async fn add_reactions(ctx: &Context, message: &Message, emojis: &[String]) -> Result<(), AppError> {
    for emoji in emojis {
        message
            .react(&ctx.http, ReactionType::Unicode(emoji.clone()))
            .await?;
    }
    Ok(())
}

fn dice_embed(literals: &Literals, yacht: &Yacht, rerolled: usize) -> ChainedEmbed {
    let text = literals.section("yacht");
    let labels = text.list("rerolled");
    let label = labels.get(rerolled).copied().unwrap_or_default();

    let dice = yacht.sorted_dice();
    let letters: Vec<&str> = dice
        .iter()
        .map(|(index, _)| literals.emoji(DICE_EMOJI[*index]))
        .collect();
    let faces: Vec<&str> = dice
        .iter()
        .map(|(_, face)| literals.emoji(FACE_EMOJI[usize::from(*face).saturating_sub(1)]))
        .collect();

    ChainedEmbed::new(format(text.get("dice_title"), &[&yacht.round, &label]))
        .description(format!("{}\n{}", letters.join(" "), faces.join(" ")))
}

fn score_embed(literals: &Literals, yacht: &Yacht) -> ChainedEmbed {
    let text = literals.section("yacht");
    let mut embed = ChainedEmbed::new(format(text.get("score_title"), &[&yacht.round]))
        .description(format(text.get("score_description"), &[&yacht.total()]));
    for category in Category::ALL {
        let emoji = literals.emoji(category.emoji());
        let (name, value) = match yacht.score_of(category) {
            Some(score) => (
                format(text.get("done_name"), &[&emoji, &category.name()]),
                format(text.get("done_value"), &[&score]),
            ),
            None => (
                format(text.get("open_name"), &[&emoji, &category.name()]),
                format(text.get("open_value"), &[&category.score(&yacht.dice)]),
            ),
        };
        embed.add_field(name, value, true);
    }
    embed
}

/// Plays a game of Yacht with `player` in DMs.
pub async fn run_yacht(ctx: Context, state: Arc<BotState>, player: User) -> Result<(), AppError> {
    let literals = state.literals();
    let text = literals.section("yacht");
    let dm = player.create_dm_channel(&ctx).await?.id;
    let mut rng = StdRng::from_os_rng();
    let mut yacht = Yacht::new();

    while !yacht.is_finished() {
        yacht.start_round(&mut rng);
        dm.say(&ctx.http, format(text.get("round_start"), &[&yacht.round]))
            .await?;

        for rerolled in 0..REROLLS {
            let embed = dice_embed(&literals, &yacht, rerolled);
            let message = dm
                .send_message(&ctx.http, CreateMessage::new().embeds(embed.to_embeds()))
                .await?;
            let picked = pick_dice(&ctx, &literals, &message, &yacht, player.id).await?;
            delete_quietly(&ctx, &message).await;

            let Some(picked) = picked else {
                dm.say(&ctx.http, text.get("timeout")).await?;
                return Ok(());
            };
            if picked.is_empty() {
                break;
            }
            yacht
                .reroll(&picked, &mut rng)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
        }

        let embed = dice_embed(&literals, &yacht, REROLLS);
        dm.send_message(&ctx.http, CreateMessage::new().embeds(embed.to_embeds()))
            .await?;
        let mut scores = dm
            .send_message(
                &ctx.http,
                CreateMessage::new().embeds(score_embed(&literals, &yacht).to_embeds()),
            )
            .await?;

        let Some(category) = pick_category(&ctx, &literals, &scores, &yacht, player.id).await?
        else {
            dm.say(&ctx.http, text.get("timeout")).await?;
            return Ok(());
        };
        yacht
            .select(category)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        scores
            .edit(
                &ctx,
                EditMessage::new().embeds(score_embed(&literals, &yacht).to_embeds()),
            )
            .await?;
    }

    let mention = user_mention(player.id);
    dm.say(&ctx.http, format(text.get("done"), &[&mention, &yacht.total()]))
        .await?;
    tracing::info!("Yacht of {} finished with {}", player.name, yacht.total());
    Ok(())
}

/// Dice the player wants rerolled.
///
/// # Returns
/// - `Ok(Some(indices))` - Dice to reroll; empty when the player keeps the roll
/// - `Ok(None)` - The player did not answer in time
async fn pick_dice(
    ctx: &Context,
    literals: &Literals,
    message: &Message,
    yacht: &Yacht,
    player: UserId,
) -> Result<Option<Vec<usize>>, AppError> {
    let reroll = literals.emoji(REROLL_EMOJI);
    let confirm = literals.emoji(CONFIRM_EMOJI);
    let letters: Vec<&str> = DICE_EMOJI.iter().map(|alias| literals.emoji(alias)).collect();

    let changes = reaction_changes(ctx, message.id, player);
    let mut changes = std::pin::pin!(changes);

    let mut emojis: Vec<String> = yacht
        .sorted_dice()
        .iter()
        .map(|(index, _)| letters[*index].to_string())
        .collect();
    emojis.push(reroll.to_string());
    emojis.push(confirm.to_string());
    add_reactions(ctx, message, &emojis).await?;

    let mut selection = Selection::default();
    loop {
        let Ok(Some((emoji, added))) = tokio::time::timeout(PICK_TIMEOUT, changes.next()).await
        else {
            return Ok(None);
        };
        if let Some(index) = letters.iter().position(|letter| *letter == emoji) {
            selection.change(index, added);
        } else if added && emoji == reroll && !selection.is_empty() {
            return Ok(Some(selection.items().to_vec()));
        } else if added && emoji == confirm {
            return Ok(Some(Vec::new()));
        }
    }
}

/// Category the player scores this round: the last one picked before confirming.
async fn pick_category(
    ctx: &Context,
    literals: &Literals,
    message: &Message,
    yacht: &Yacht,
    player: UserId,
) -> Result<Option<Category>, AppError> {
    let confirm = literals.emoji(CONFIRM_EMOJI);
    let open = yacht.open_categories();

    let changes = reaction_changes(ctx, message.id, player);
    let mut changes = std::pin::pin!(changes);

    let mut emojis: Vec<String> = open
        .iter()
        .map(|category| literals.emoji(category.emoji()).to_string())
        .collect();
    emojis.push(confirm.to_string());
    add_reactions(ctx, message, &emojis).await?;

    let mut selection = Selection::default();
    loop {
        let Ok(Some((emoji, added))) = tokio::time::timeout(PICK_TIMEOUT, changes.next()).await
        else {
            return Ok(None);
        };
        if emoji == confirm {
            if let (true, Some(category)) = (added, selection.last()) {
                return Ok(Some(*category));
            }
            continue;
        }
        if let Some(category) = open
            .iter()
            .find(|category| literals.emoji(category.emoji()) == emoji)
        {
            selection.change(*category, added);
        }
    }
}

/// Draws a king among `members`, announces them in `channel` and sends the
/// others their numbers by DM.
///
/// # Returns
/// - `Ok(true)` - The draw was held
/// - `Ok(false)` - Not enough players
pub async fn hold_king_game(
    ctx: &Context,
    literals: &Literals,
    channel: ChannelId,
    members: &[Member],
) -> Result<bool, AppError> {
    let text = literals.section("king");
    let ids: Vec<UserId> = members.iter().map(|member| member.user.id).collect();
    let draw = {
        let mut rng = rand::rng();
        king::draw(&ids, &mut rng).map_err(|e| AppError::InternalError(e.to_string()))?
    };
    let Some(KingDraw { king, numbers }) = draw else {
        return Ok(false);
    };

    let count = format(text.get("count"), &[&numbers.len()]);
    let footer = text.get("footer");

    for (player, number) in &numbers {
        let Some(member) = members.iter().find(|member| member.user.id == *player) else {
            continue;
        };
        let embed = ChainedEmbed::new(format(text.get("number"), &[number]))
            .description(count.clone())
            .footer(footer);
        member
            .user
            .direct_message(ctx, CreateMessage::new().embeds(embed.to_embeds()))
            .await?;
    }

    let Some(king) = members.iter().find(|member| member.user.id == king) else {
        return Err(AppError::NotFound(format!("King {} is not a participant", king)));
    };
    let mentions: Vec<String> = ids.iter().map(|id| user_mention(*id)).collect();
    let embed = ChainedEmbed::new(format(text.get("king"), &[&king.display_name()]))
        .description(count)
        .image(king.face())
        .footer(footer);
    channel
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .content(mentions.join(" "))
                .embeds(embed.to_embeds()),
        )
        .await?;
    tracing::info!("King game in {} with {} players", channel, members.len());
    Ok(true)
}
