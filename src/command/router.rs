use std::sync::Arc;
use std::time::Duration;

use dioxus_logger::tracing;
use serenity::all::{Context, CreateMessage, Message};

use crate::command::args::Args;
use crate::command::check::{Check, CheckFacts};
use crate::command::invocation::Invocation;
use crate::error::command::CommandError;
use crate::literal::format;
use crate::service::shtelo;
use crate::state::BotState;

/// Outcome of feeding a message to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The message does not start with the prefix.
    NotCommand,
    /// Prefixed, but no command matches the first token.
    Unknown,
    /// A command ran, successfully or not.
    Handled,
}

/// Content after `prefix`, or `None` when the message is not a command.
pub fn strip_prefix<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest)
}

/// Runs the command in `message`, if any, answering failures in its channel.
///
/// # Arguments
/// - `prefix` - Our own prefix, or a foreign one carried by a `PASS` request
pub async fn dispatch(
    ctx: &Context,
    message: &Message,
    state: &Arc<BotState>,
    prefix: &str,
) -> Dispatch {
    let Some(raw) = strip_prefix(&message.content, prefix) else {
        return Dispatch::NotCommand;
    };
    let mut args = Args::parse(raw);

    let (handler, qualified_name, checks, depth) = match state.commands.resolve(&args) {
        Some(resolved) => (
            resolved.command().handler,
            resolved.qualified_name(),
            resolved.checks().copied().collect::<Vec<Check>>(),
            resolved.path.len(),
        ),
        None => return Dispatch::Unknown,
    };

    tracing::info!(
        "{} invoked '{}' in channel {}",
        message.author.name,
        qualified_name,
        message.channel_id
    );

    let result = match run_checks(ctx, message, state, &checks, args.token_count()).await {
        Ok(()) => {
            args.advance(depth);
            handler(Invocation {
                ctx: ctx.clone(),
                message: message.clone(),
                state: state.clone(),
                args,
                qualified_name: qualified_name.clone(),
                prefix: prefix.to_string(),
            })
            .await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        report_error(ctx, message, state, &qualified_name, prefix, e).await;
    }
    Dispatch::Handled
}

async fn run_checks(
    ctx: &Context,
    message: &Message,
    state: &BotState,
    checks: &[Check],
    token_count: usize,
) -> Result<(), CommandError> {
    let is_partner = if checks.contains(&Check::PartnerOnly) {
        shtelo::is_partner(ctx, &state.config, message.author.id).await
    } else {
        false
    };
    let facts = CheckFacts {
        is_owner: message.author.id == state.config.owner_id,
        in_guild: message.guild_id.is_some(),
        is_partner,
        token_count,
    };

    if let Some(failed) = checks.iter().find(|check| !check.passes(&facts)) {
        return Err(CommandError::CheckFailure(failed.key()));
    }

    if checks.contains(&Check::DeckReady) && !state.decks.is_ready() {
        let wait = state.literals().section("deck_ready").get("wait").to_string();
        message.channel_id.say(&ctx.http, wait).await?;
        state.decks.wait_until_ready().await;
    }
    Ok(())
}

/// Rounds a remaining cooldown up to whole seconds.
pub fn cooldown_seconds(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

async fn report_error(
    ctx: &Context,
    message: &Message,
    state: &BotState,
    qualified_name: &str,
    prefix: &str,
    error: CommandError,
) {
    let literals = state.literals();
    let section = literals.section("command_error");

    let content = match &error {
        CommandError::MissingArgument(name) => {
            let signature = state
                .commands
                .find(qualified_name)
                .map(|resolved| resolved.signature(prefix))
                .unwrap_or_default();
            format(section.get("missing_argument"), &[name, &signature])
        }
        CommandError::BadArgument(detail) => format(section.get("bad_argument"), &[detail]),
        CommandError::CheckFailure(key) => {
            let name = literals
                .check(key)
                .map(|check| format!("{} {}", check.emoji, check.name))
                .unwrap_or_else(|| key.to_string());
            format(section.get("check_failure"), &[&name])
        }
        CommandError::Cooldown(remaining) => {
            format(section.get("cooldown"), &[&cooldown_seconds(*remaining)])
        }
        CommandError::Refused(reason) => reason.clone(),
        CommandError::App(e) => {
            tracing::error!("Command '{}' failed: {}", qualified_name, e);
            report_to_owner(
                ctx,
                state,
                &format!("`{}`: {}\n{}", qualified_name, e, message.link()),
            )
            .await;
            section.get("internal").to_string()
        }
    };

    tracing::debug!("Command '{}' answered with error: {}", qualified_name, error);
    if content.is_empty() {
        return;
    }
    if let Err(e) = message.channel_id.say(&ctx.http, content).await {
        tracing::warn!("Failed to answer command error: {}", e);
    }
}

/// Sends an internal failure to the bot owner by DM.
pub async fn report_to_owner(ctx: &Context, state: &BotState, text: &str) {
    let content: String = text.chars().take(1990).collect();
    if let Err(e) = state
        .config
        .owner_id
        .direct_message(ctx, CreateMessage::new().content(content))
        .await
    {
        tracing::warn!("Failed to report error to owner: {}", e);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_prefix_only_before_a_word() {
        assert_eq!(strip_prefix("//핑", "//"), Some("핑"));
        assert_eq!(strip_prefix("//데크 가입", "//"), Some("데크 가입"));
        assert_eq!(strip_prefix("// 핑", "//"), None);
        assert_eq!(strip_prefix("//", "//"), None);
        assert_eq!(strip_prefix("핑", "//"), None);
        assert_eq!(strip_prefix("!!핑", "!!"), Some("핑"));
    }

    #[test]
    fn cooldown_rounds_up() {
        assert_eq!(cooldown_seconds(Duration::from_secs(3)), 3);
        assert_eq!(cooldown_seconds(Duration::from_millis(3001)), 4);
        assert_eq!(cooldown_seconds(Duration::from_millis(10)), 1);
    }
}
