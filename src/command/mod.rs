//! Prefix command framework.
//!
//! Commands form a tree: a top-level command may carry subcommands which are
//! matched by the following tokens. Every command has its own handler, so a
//! group runs its handler when no subcommand matches. Checks of every command
//! on the resolved path are evaluated before the handler runs.

pub mod argument;
pub mod args;
pub mod check;
pub mod cooldown;
pub mod invocation;
pub mod router;

use serenity::futures::future::BoxFuture;

use crate::command::args::Args;
use crate::command::check::Check;
use crate::command::invocation::Invocation;
use crate::error::command::CommandError;

pub type CommandFuture = BoxFuture<'static, Result<(), CommandError>>;
pub type HandlerFn = fn(Invocation) -> CommandFuture;

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Argument part of the signature, e.g. `<멤버> [내용]`.
    pub usage: &'static str,
    /// Key of the cog descriptor in the literal store.
    pub cog: &'static str,
    pub checks: Vec<Check>,
    pub handler: HandlerFn,
    pub subcommands: Vec<Command>,
}

impl Command {
    pub fn new(name: &'static str, handler: HandlerFn) -> Self {
        Self {
            name,
            aliases: &[],
            usage: "",
            cog: "",
            checks: Vec::new(),
            handler,
            subcommands: Vec::new(),
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn is_called(&self, token: &str) -> bool {
        self.name == token || self.aliases.contains(&token)
    }

    pub fn is_group(&self) -> bool {
        !self.subcommands.is_empty()
    }

    fn set_cog(&mut self, cog: &'static str) {
        self.cog = cog;
        for subcommand in self.subcommands.iter_mut() {
            subcommand.set_cog(cog);
        }
    }
}

/// A command together with the groups it was reached through.
pub struct Resolved<'a> {
    pub path: Vec<&'a Command>,
}

impl<'a> Resolved<'a> {
    pub fn command(&self) -> &'a Command {
        self.path[self.path.len() - 1]
    }

    pub fn qualified_name(&self) -> String {
        self.path
            .iter()
            .map(|command| command.name)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn checks(&self) -> impl Iterator<Item = &'a Check> + '_ {
        self.path.iter().flat_map(|command| command.checks.iter())
    }

    /// `<prefix>[parent] [name|alias] <usage>` as shown in help.
    pub fn signature(&self, prefix: &str) -> String {
        let command = self.command();
        let name = if command.aliases.is_empty() {
            command.name.to_string()
        } else {
            format!("[{}|{}]", command.name, command.aliases.join("|"))
        };
        let parents: Vec<&str> = self.path[..self.path.len() - 1]
            .iter()
            .map(|parent| parent.name)
            .collect();
        let mut signature = prefix.to_string();
        if !parents.is_empty() {
            signature.push_str(&parents.join(" "));
            signature.push(' ');
        }
        signature.push_str(&name);
        signature.push(' ');
        signature.push_str(command.usage);
        signature.trim_end().to_string()
    }
}

/// Every command known to the bot, grouped by cog in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    cogs: Vec<&'static str>,
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the commands of a cog.
    pub fn cog(mut self, cog: &'static str, commands: Vec<Command>) -> Self {
        self.cogs.push(cog);
        for mut command in commands {
            command.set_cog(cog);
            self.commands.push(command);
        }
        self
    }

    pub fn cogs(&self) -> &[&'static str] {
        &self.cogs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn commands_of<'a>(&'a self, cog: &'a str) -> impl Iterator<Item = &'a Command> + 'a {
        self.commands.iter().filter(move |command| command.cog == cog)
    }

    /// Matches the leading tokens of `args` against the command tree.
    pub fn resolve(&self, args: &Args) -> Option<Resolved<'_>> {
        let first = args.token(0)?;
        let mut command = self.commands.iter().find(|command| command.is_called(first))?;
        let mut path = vec![command];
        while let Some(token) = args.token(path.len()) {
            match command.subcommands.iter().find(|sub| sub.is_called(token)) {
                Some(sub) => {
                    command = sub;
                    path.push(sub);
                }
                None => break,
            }
        }
        Some(Resolved { path })
    }

    /// Looks up a command by its full name, e.g. `데크 가입`.
    pub fn find(&self, qualified_name: &str) -> Option<Resolved<'_>> {
        let args = Args::parse(qualified_name);
        self.resolve(&args)
            .filter(|resolved| resolved.path.len() == args.token_count())
    }

    /// Every command in the tree with its path, depth first.
    pub fn walk(&self) -> Vec<Resolved<'_>> {
        fn visit<'a>(path: Vec<&'a Command>, out: &mut Vec<Resolved<'a>>) {
            let Some(command) = path.last().copied() else {
                return;
            };
            out.push(Resolved { path: path.clone() });
            for sub in &command.subcommands {
                let mut next = path.clone();
                next.push(sub);
                visit(next, out);
            }
        }

        let mut out = Vec::new();
        for command in &self.commands {
            visit(vec![command], &mut out);
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn noop(_invocation: Invocation) -> CommandFuture {
        Box::pin(async { Ok(()) })
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::new()
            .cog(
                "DeckCog",
                vec![Command::new("데크", noop)
                    .aliases(&["deck", "덱"])
                    .check(Check::DeckReady)
                    .subcommand(
                        Command::new("가입", noop)
                            .aliases(&["join"])
                            .usage("[데크]")
                            .check(Check::GuildOnly),
                    )
                    .subcommand(Command::new("주제", noop).subcommand(Command::new("삭제", noop)))],
            )
            .cog("BaseCog", vec![Command::new("핑", noop).check(Check::TokensLen(1))])
    }

    #[test]
    fn resolves_by_name_and_alias() {
        let registry = registry();
        let args = Args::parse("deck join 보드게임");
        let resolved = registry.resolve(&args).unwrap();

        assert_eq!(resolved.qualified_name(), "데크 가입");
        assert_eq!(resolved.command().cog, "DeckCog");
        assert_eq!(resolved.path.len(), 2);
    }

    #[test]
    fn group_handles_unmatched_subcommand() {
        let registry = registry();
        let resolved = registry.resolve(&Args::parse("데크 보드게임")).unwrap();
        assert_eq!(resolved.qualified_name(), "데크");

        let nested = registry.resolve(&Args::parse("데크 주제 삭제")).unwrap();
        assert_eq!(nested.qualified_name(), "데크 주제 삭제");
    }

    #[test]
    fn unknown_command_is_none() {
        let registry = registry();
        assert!(registry.resolve(&Args::parse("없는명령")).is_none());
        assert!(registry.resolve(&Args::parse("")).is_none());
    }

    #[test]
    fn checks_accumulate_along_path() {
        let registry = registry();
        let resolved = registry.resolve(&Args::parse("데크 가입")).unwrap();
        let checks: Vec<Check> = resolved.checks().copied().collect();
        assert_eq!(checks, vec![Check::DeckReady, Check::GuildOnly]);
    }

    #[test]
    fn signature_lists_aliases_and_usage() {
        let registry = registry();
        let join = registry.find("데크 가입").unwrap();
        assert_eq!(join.signature("//"), "//데크 [가입|join] [데크]");

        let ping = registry.find("핑").unwrap();
        assert_eq!(ping.signature("//"), "//핑");
    }

    #[test]
    fn find_requires_full_match() {
        let registry = registry();
        assert!(registry.find("데크 없는").is_none());
        assert!(registry.find("데크").is_some());
    }

    #[test]
    fn walk_visits_every_command() {
        let registry = registry();
        let names: Vec<String> = registry.walk().iter().map(Resolved::qualified_name).collect();
        assert_eq!(names, vec!["데크", "데크 가입", "데크 주제", "데크 주제 삭제", "핑"]);
        assert_eq!(registry.cogs(), &["DeckCog", "BaseCog"]);
        assert_eq!(registry.commands_of("BaseCog").count(), 1);
    }
}
