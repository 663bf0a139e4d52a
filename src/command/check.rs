//! Preconditions attached to commands.
//!
//! Every check has a descriptor under `_check_` in the literal store keyed by
//! [`Check::key`], shown by the help command and in failure messages.

/// A precondition a command needs before its handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    OwnerOnly,
    GuildOnly,
    /// The author holds the partner role in the community guild.
    PartnerOnly,
    /// The whole message has exactly this many tokens, command path included.
    TokensLen(usize),
    /// Waits for the deck registry to finish loading.
    DeckReady,
}

/// What the router knows about the invocation when evaluating checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckFacts {
    pub is_owner: bool,
    pub in_guild: bool,
    pub is_partner: bool,
    pub token_count: usize,
}

impl Check {
    pub fn key(&self) -> &'static str {
        match self {
            Check::OwnerOnly => "owner_only",
            Check::GuildOnly => "guild_only",
            Check::PartnerOnly => "partner_only",
            Check::TokensLen(_) => "tokens_len",
            Check::DeckReady => "deck_ready",
        }
    }

    /// Evaluates the check against known facts.
    ///
    /// `DeckReady` always passes here; the router awaits the registry instead.
    pub fn passes(&self, facts: &CheckFacts) -> bool {
        match self {
            Check::OwnerOnly => facts.is_owner,
            Check::GuildOnly => facts.in_guild,
            Check::PartnerOnly => facts.is_partner,
            Check::TokensLen(count) => facts.token_count == *count,
            Check::DeckReady => true,
        }
    }
}
