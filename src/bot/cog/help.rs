//! Command lists, command help and keyword search.

use crate::command::invocation::Invocation;
use crate::command::{Command, CommandFuture, CommandRegistry, Resolved};
use crate::error::command::CommandError;
use crate::literal::{format, Literals};
use crate::model::embed::ChainedEmbed;

pub fn commands() -> Vec<Command> {
    vec![
        Command::new("도움말", help)
            .aliases(&["help", "h"])
            .usage("[명령어|카테고리]"),
        Command::new("명령어", list_commands)
            .aliases(&["commands", "cmd", "cmds"])
            .usage("[카테고리]"),
        Command::new("검색", search)
            .aliases(&["찾기", "search", "s"])
            .usage("<키워드> [키워드...]"),
    ]
}

/// `` `qualified name`: brief `` of a command and, for groups, its subcommands.
pub fn brief_command(literals: &Literals, command: &Command, parent: &str) -> String {
    let name = if parent.is_empty() {
        command.name.to_string()
    } else {
        format!("{} {}", parent, command.name)
    };
    let mut brief = format!("`{}`", name);
    if let Some(text) = literals.brief(&name) {
        brief.push_str(": ");
        brief.push_str(text);
    }
    for sub in &command.subcommands {
        brief.push('\n');
        brief.push_str(&brief_command(literals, sub, &name));
    }
    brief
}

/// Cog description followed by the briefs of its commands in a code block.
pub fn brief_cog(literals: &Literals, registry: &CommandRegistry, cog: &str) -> String {
    let mut brief = literals
        .cog(cog)
        .map(|descriptor| descriptor.description.to_string())
        .unwrap_or_default();
    let lines: Vec<String> = registry
        .commands_of(cog)
        .map(|command| brief_command(literals, command, ""))
        .collect();
    if lines.is_empty() {
        if brief.is_empty() {
            brief = literals.section("help").get("no_description").to_string();
        }
        return brief;
    }
    if !brief.is_empty() {
        brief.push('\n');
    }
    brief.push_str("```\n");
    brief.push_str(&lines.join("\n"));
    brief.push_str("\n```");
    brief
}

fn cog_title(literals: &Literals, cog: &str) -> String {
    match literals.cog(cog) {
        Some(descriptor) => format!("{} {}", descriptor.emoji, descriptor.name),
        None => cog.to_string(),
    }
}

/// Cog key named by `query`, matching the key or the displayed name.
pub fn find_cog<'a>(literals: &Literals, registry: &'a CommandRegistry, query: &str) -> Option<&'a str> {
    registry.cogs().iter().copied().find(|cog| {
        *cog == query || literals.cog(cog).is_some_and(|descriptor| descriptor.name == query)
    })
}

/// Signature, brief and help of a command, as matched by search.
pub fn command_info(literals: &Literals, resolved: &Resolved<'_>, prefix: &str) -> String {
    let name = resolved.qualified_name();
    let mut info = format!("`{}`\n", resolved.signature(prefix));
    let brief = literals.brief(&name).unwrap_or_default();
    match literals.help(&name) {
        Some(help) => info.push_str(&format!("- {}\n- {}", brief, help)),
        None => info.push_str(brief),
    }
    info
}

/// Help embed of one command: description, signature, subcommands and checks.
pub fn command_help(literals: &Literals, resolved: &Resolved<'_>, prefix: &str) -> ChainedEmbed {
    let name = resolved.qualified_name();
    let command = resolved.command();
    let mut description = literals
        .help(&name)
        .or_else(|| literals.brief(&name))
        .map(|text| format!("{}\n", text))
        .unwrap_or_default();
    description.push_str(&format!("`{}`", resolved.signature(prefix)));

    let mut embed = ChainedEmbed::new(name.clone()).description(description);
    if command.is_group() {
        let parent = name.rsplit_once(' ').map_or("", |(parent, _)| parent);
        embed.add_field(
            literals.section("help").get("subcommand"),
            format!("```\n{}\n```", brief_command(literals, command, parent)),
            false,
        );
    }
    for check in &command.checks {
        if let Some(descriptor) = literals.check(check.key()) {
            embed.add_field(
                format!("{} {}", descriptor.emoji, descriptor.name),
                descriptor.description,
                false,
            );
        }
    }
    if !command.cog.is_empty() {
        embed.set_footer(cog_title(literals, command.cog));
    }
    embed
}

fn cog_info(literals: &Literals, registry: &CommandRegistry, cog: &str) -> ChainedEmbed {
    ChainedEmbed::new(cog_title(literals, cog)).description(brief_cog(literals, registry, cog))
}

fn cog_list(literals: &Literals, registry: &CommandRegistry) -> ChainedEmbed {
    let text = literals.section("help");
    let mut embed = ChainedEmbed::new(text.get("cog_list_title"))
        .description(text.get("cog_list_description"));
    for cog in registry.cogs() {
        embed.add_field(
            cog_title(literals, cog),
            brief_cog(literals, registry, cog),
            false,
        );
    }
    embed
}

/// Commands whose help mentions any of `keywords`.
pub fn search_commands(
    literals: &Literals,
    registry: &CommandRegistry,
    keywords: &[&str],
    prefix: &str,
) -> Vec<(String, String)> {
    registry
        .walk()
        .iter()
        .filter_map(|resolved| {
            let info = command_info(literals, resolved, prefix);
            keywords
                .iter()
                .any(|keyword| info.contains(keyword))
                .then(|| (resolved.qualified_name(), info))
        })
        .collect()
}

fn bot_avatar(inv: &Invocation) -> String {
    inv.ctx.cache.current_user().face()
}

fn help(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let registry = &inv.state.commands;
        let query = match inv.args.rest() {
            "" => "도움말",
            query => query,
        };

        let embed = if let Some(resolved) = registry.find(query) {
            command_help(&literals, &resolved, &inv.state.config.command_prefix)
        } else if let Some(cog) = find_cog(&literals, registry, query) {
            cog_info(&literals, registry, cog)
        } else {
            return Err(CommandError::BadArgument(format(
                literals.section("help").get("not_found"),
                &[&query],
            )));
        };
        inv.send_embed(&embed.thumbnail(bot_avatar(&inv))).await?;
        Ok(())
    })
}

fn list_commands(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let registry = &inv.state.commands;
        let embed = match find_cog(&literals, registry, inv.args.rest()) {
            Some(cog) => cog_info(&literals, registry, cog),
            None => cog_list(&literals, registry),
        };
        inv.send_embed(&embed.thumbnail(bot_avatar(&inv))).await?;
        Ok(())
    })
}

fn search(inv: Invocation) -> CommandFuture {
    Box::pin(async move {
        let literals = inv.literals();
        let text = literals.section("search");
        inv.args.required(0, "키워드")?;
        let keywords: Vec<&str> = inv.args.iter().collect();
        let found = search_commands(
            &literals,
            &inv.state.commands,
            &keywords,
            &inv.state.config.command_prefix,
        );

        let joined = keywords.join(", ");
        let description = if found.is_empty() {
            format(text.get("not_found"), &[&joined])
        } else {
            format(text.get("found"), &[&found.len(), &joined])
        };
        let mut embed = ChainedEmbed::new(text.get("title"))
            .description(description)
            .thumbnail(bot_avatar(&inv));
        for (name, info) in found {
            embed.add_field(name, info, false);
        }
        inv.send_embed(&embed).await?;
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::check::Check;

    fn noop(_inv: Invocation) -> CommandFuture {
        Box::pin(async { Ok(()) })
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::new()
            .cog(
                "DeckCog",
                vec![Command::new("데크", noop)
                    .aliases(&["deck"])
                    .subcommand(Command::new("가입", noop).usage("[데크]").check(Check::GuildOnly))],
            )
            .cog("ProtocolCog", Vec::new())
    }

    fn literals() -> Literals {
        Literals::parse(
            r#"{
                "_brief_": {"데크": "데크 정보", "데크 가입": "데크에 가입합니다."},
                "_help_": {"데크 가입": "잠긴 데크에는 가입할 수 없습니다."},
                "_cog_": {
                    "DeckCog": {"name": "데크", "emoji": "🃏", "description": "데크 관리"},
                    "ProtocolCog": {"name": "프로토콜", "emoji": "📡", "description": ""}
                },
                "_check_": {"guild_only": {"name": "서버 전용", "emoji": "🏠", "description": "서버에서만"}},
                "help": {"subcommand": "하위 명령어", "no_description": "설명 없음"}
            }"#,
            "//",
        )
        .unwrap()
    }

    #[test]
    fn briefs_groups_recursively() {
        let literals = literals();
        let registry = registry();
        let brief = brief_command(&literals, &registry.commands()[0], "");
        assert_eq!(brief, "`데크`: 데크 정보\n`데크 가입`: 데크에 가입합니다.");
    }

    #[test]
    fn cog_brief_wraps_commands() {
        let literals = literals();
        let registry = registry();
        let brief = brief_cog(&literals, &registry, "DeckCog");
        assert!(brief.starts_with("데크 관리\n```\n`데크`"));
        assert!(brief.ends_with("\n```"));
        assert_eq!(brief_cog(&literals, &registry, "ProtocolCog"), "설명 없음");
    }

    #[test]
    fn finds_cog_by_key_or_name() {
        let literals = literals();
        let registry = registry();
        assert_eq!(find_cog(&literals, &registry, "DeckCog"), Some("DeckCog"));
        assert_eq!(find_cog(&literals, &registry, "프로토콜"), Some("ProtocolCog"));
        assert_eq!(find_cog(&literals, &registry, "없음"), None);
    }

    #[test]
    fn command_help_lists_checks_and_cog() {
        let literals = literals();
        let registry = registry();
        let resolved = registry.find("데크 가입").unwrap();
        let embed = command_help(&literals, &resolved, "//");
        let page = &embed.pages()[0];

        assert_eq!(
            page.description.as_deref(),
            Some("잠긴 데크에는 가입할 수 없습니다.\n`//데크 가입 [데크]`")
        );
        assert_eq!(page.fields[0].name, "🏠 서버 전용");
        assert_eq!(embed, embed.clone().footer("🃏 데크"));
    }

    #[test]
    fn group_help_shows_subcommands() {
        let literals = literals();
        let registry = registry();
        let resolved = registry.find("데크").unwrap();
        let embed = command_help(&literals, &resolved, "//");
        assert_eq!(embed.pages()[0].fields[0].name, "하위 명령어");
        assert!(embed.pages()[0].fields[0].value.contains("`데크 가입`"));
    }

    #[test]
    fn search_matches_any_keyword() {
        let literals = literals();
        let registry = registry();
        let found = search_commands(&literals, &registry, &["잠긴", "없는말"], "//");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "데크 가입");
        assert!(search_commands(&literals, &registry, &["없는말"], "//").is_empty());
    }
}
