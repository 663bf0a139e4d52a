//! Owner commands for operating the bot.

use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::GetMessages;

use crate::command::argument::to_int;
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture};
use crate::error::command::CommandError;
use crate::literal::format;

pub const PURGE_MAX: u8 = 100;
const DONE_LIFETIME: Duration = Duration::from_secs(10);

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("테스트", test)
            .aliases(&["test"])
            .check(Check::OwnerOnly),
        Command::new("따라해", echo)
            .aliases(&["echo"])
            .usage("<내용>")
            .check(Check::OwnerOnly),
        Command::new("삭제", purge)
            .aliases(&["delete"])
            .usage("<개수>")
            .check(Check::OwnerOnly)
            .check(Check::GuildOnly),
        Command::new("리로드", reload)
            .check(Check::OwnerOnly)
            .subcommand(Command::new("리터럴", reload_literals).check(Check::OwnerOnly)),
    ]
}

/// Number of messages to purge, kept within what Discord allows at once.
pub fn purge_count(requested: i64) -> u8 {
    requested.clamp(1, i64::from(PURGE_MAX)) as u8
}

fn test(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let done = inv.text("control", "test");
        inv.send(done).await?;
        Ok(())
    })
}

fn echo(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        inv.args.required(0, "내용")?;
        inv.send(inv.args.rest().to_string()).await?;
        Ok(())
    })
}

fn purge(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let text = inv.literals();
        let text = text.section("control");
        let count = purge_count(to_int(inv.args.required(0, "개수")?)?);
        let channel = inv.channel_id();

        // The newest messages, the invocation included.
        let messages = channel
            .messages(&inv.ctx.http, GetMessages::new().limit(count))
            .await?;
        let ids: Vec<_> = messages.iter().map(|message| message.id).collect();

        let result = match ids.as_slice() {
            [] => Ok(()),
            [id] => channel.delete_message(&inv.ctx.http, *id).await,
            ids => channel.delete_messages(&inv.ctx.http, ids).await,
        };
        if let Err(e) = result {
            tracing::warn!("Purge of {} messages in {} failed: {}", ids.len(), channel, e);
            return Err(CommandError::Refused(text.get("purge_failed").to_string()));
        }

        let done = inv
            .send(format(text.get("purge_done"), &[&messages.len()]))
            .await?;
        let http = inv.ctx.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(DONE_LIFETIME).await;
            if let Err(e) = done.channel_id.delete_message(&http, done.id).await {
                tracing::debug!("Could not delete purge notice: {}", e);
            }
        });
        Ok(())
    })
}

fn reload(inv: Invocation) -> CommandFuture {
    reload_literals(inv)
}

fn reload_literals(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        inv.state.reload_literals()?;
        tracing::info!("Literals reloaded by {}", inv.author().name);
        let done = inv.text("control", "reload_done");
        inv.send(done).await?;
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn purge_count_is_clamped() {
        assert_eq!(purge_count(-5), 1);
        assert_eq!(purge_count(0), 1);
        assert_eq!(purge_count(30), 30);
        assert_eq!(purge_count(1000), 100);
    }
}
