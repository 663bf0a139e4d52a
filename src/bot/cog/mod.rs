//! Command groups ("cogs") of the bot.
//!
//! Each cog module exposes `commands()`; the registry keeps them in the order
//! they are listed here, which is also the order shown by the help commands.

pub mod base;
pub mod control;
pub mod deck;
pub mod game;
pub mod help;
pub mod protocol;
pub mod shtelo;

use crate::command::CommandRegistry;

pub const BASE_COG: &str = "BaseCog";
pub const HELP_COG: &str = "HelpCog";
pub const DECK_COG: &str = "DeckCog";
pub const SHTELO_COG: &str = "ShteloCog";
pub const GAME_COG: &str = "GameCog";
pub const CONTROL_COG: &str = "ControlCog";
pub const PROTOCOL_COG: &str = "ProtocolCog";

/// Every command of the bot.
pub fn registry() -> CommandRegistry {
    CommandRegistry::new()
        .cog(BASE_COG, base::commands())
        .cog(HELP_COG, help::commands())
        .cog(DECK_COG, deck::commands())
        .cog(SHTELO_COG, shtelo::commands())
        .cog(GAME_COG, game::commands())
        .cog(CONTROL_COG, control::commands())
        .cog(PROTOCOL_COG, protocol::commands())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literals;

    #[test]
    fn every_command_is_documented() {
        let literals = Literals::load(None, "//").unwrap();
        let registry = registry();

        for cog in registry.cogs() {
            assert!(literals.cog(cog).is_some(), "cog {} has no descriptor", cog);
        }
        for resolved in registry.walk() {
            let name = resolved.qualified_name();
            assert!(literals.brief(&name).is_some(), "'{}' has no brief", name);
            for check in resolved.command().checks.iter() {
                assert!(literals.check(check.key()).is_some(), "check {} undocumented", check.key());
            }
        }
    }

    #[test]
    fn command_names_are_unique_per_level() {
        let registry = registry();
        let mut seen = std::collections::HashSet::new();
        for command in registry.commands() {
            for name in std::iter::once(command.name).chain(command.aliases.iter().copied()) {
                assert!(seen.insert(name), "'{}' is registered twice", name);
            }
        }
    }
}
