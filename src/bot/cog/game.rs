//! Minigame commands.

use std::collections::HashSet;

use dioxus_logger::tracing;
use serenity::all::Member;

use crate::command::argument;
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture};
use crate::error::command::CommandError;
use crate::literal::format;
use crate::model::game::king::MIN_PLAYERS;
use crate::model::game::GameKind;
use crate::service::game::{hold_king_game, run_indian_poker, run_yacht, spawn_session};
use crate::util::parse::user_mention;

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("왕", king)
            .aliases(&["왕게임", "king"])
            .usage("<멤버> <멤버> <멤버> [멤버...]")
            .check(Check::GuildOnly),
        Command::new("인디언포커", indian_poker)
            .aliases(&["인디언"])
            .usage("<멤버> <멤버>")
            .check(Check::GuildOnly),
        Command::new("야추", yacht).aliases(&["yacht"]),
        Command::new("게임", game).subcommand(
            Command::new("중단", game_close).aliases(&["종료", "포기"]),
        ),
    ]
}

/// Members named by every argument, in the invoking guild.
async fn members_from_args(inv: &Invocation) -> Result<Vec<Member>, CommandError> {
    let guild_id = inv.guild_id()?;
    let mut members = Vec::with_capacity(inv.args.len());
    for query in inv.args.iter() {
        members.push(argument::member(&inv.ctx, guild_id, query).await?);
    }
    Ok(members)
}

fn king(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let mut members = members_from_args(&inv).await?;
        let mut seen = HashSet::new();
        members.retain(|member| seen.insert(member.user.id));
        if members.len() < MIN_PLAYERS {
            return Err(CommandError::MissingArgument("멤버"));
        }
        if !hold_king_game(&inv.ctx, &literals, inv.channel_id(), &members).await? {
            return Err(CommandError::MissingArgument("멤버"));
        }
        if let Err(e) = inv.message.delete(&inv.ctx.http).await {
            tracing::debug!("Could not delete king game request: {}", e);
        }
        Ok(())
    })
}

fn indian_poker(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let text = inv.literals();
        let text = text.section("indian_poker");
        inv.args.required(1, "멤버")?;
        let members = members_from_args(&inv).await?;
        let [first, second] = <[Member; 2]>::try_from(members)
            .map_err(|_| CommandError::BadArgument(text.get("two_players").to_string()))?;

        let id = inv
            .state
            .games()
            .open(GameKind::IndianPoker, &[first.user.id, second.user.id])?;
        inv.send(text.get("start")).await?;

        spawn_session(
            &inv.state,
            id,
            run_indian_poker(
                inv.ctx.clone(),
                inv.state.clone(),
                inv.channel_id(),
                [first.user, second.user],
            ),
        );
        Ok(())
    })
}

fn yacht(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let player = inv.author().clone();
        let id = inv.state.games().open(GameKind::Yacht, &[player.id])?;
        if inv.message.guild_id.is_some() {
            inv.send(inv.text("yacht", "start")).await?;
        }
        spawn_session(
            &inv.state,
            id,
            run_yacht(inv.ctx.clone(), inv.state.clone(), player),
        );
        Ok(())
    })
}

fn kind_key(kind: GameKind) -> &'static str {
    match kind {
        GameKind::IndianPoker => "indian_poker",
        GameKind::Yacht => "yacht",
    }
}

fn game(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let session = inv
            .state
            .games()
            .session_of(inv.author().id)
            .map(|session| session.kind);
        let content = match session {
            Some(kind) => format(
                inv.text("game", "playing").as_str(),
                &[&inv.text("game", kind_key(kind))],
            ),
            None => inv.text("game", "not_playing"),
        };
        inv.send(content).await?;
        Ok(())
    })
}

fn game_close(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let closed = inv.state.games().close_for(inv.author().id);
        let Some(session) = closed else {
            return Err(CommandError::Refused(inv.text("game", "not_found")));
        };
        tracing::info!("Game session {} closed by {}", session.id, inv.author().name);
        let mentions: Vec<String> = session.players.iter().map(|id| user_mention(*id)).collect();
        inv.send(format(
            inv.text("game", "closed").as_str(),
            &[&mentions.join(" ")],
        ))
        .await?;
        Ok(())
    })
}
