//! Decks: manager-led sub-communities of the Shtelo server.
//!
//! A deck is a category channel, a default text channel inside it and a role that
//! grants access. Everything else about the deck (id, manager, pending
//! applications, flags and free topic) is stored in the default channel's topic,
//! see [`topic`].

pub mod registry;
pub mod topic;

use serenity::all::{ChannelId, RoleId, UserId};

use crate::model::deck::topic::DeckRecord;
use crate::util::parse::user_mention;

pub const VALID_ID_CHARS: &str = "0123456789_acdefghijkmnprstvwxyzACEFGHJKLMNPRTVWXY";
pub const ID_LENGTH: usize = 4;
pub const TOPIC_MAX_LENGTH: usize = 512;
pub const NAME_MAX_LENGTH: usize = 64;
/// Discord's limit for a text channel topic.
pub const CHANNEL_TOPIC_MAX_LENGTH: usize = 1024;

pub const PENDING_EMOJI: &str = ":raised_hand:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckFlag {
    /// Listed publicly.
    Public,
    /// Joining requires confirming an age warning.
    Nsfw,
    /// Join requests are accepted without the manager.
    Auto,
    /// Join requests are refused.
    Lock,
}

impl DeckFlag {
    pub const ALL: [DeckFlag; 4] = [
        DeckFlag::Public,
        DeckFlag::Nsfw,
        DeckFlag::Auto,
        DeckFlag::Lock,
    ];

    /// Emoji shortcode the flag is written as in the topic.
    pub fn code(self) -> &'static str {
        match self {
            DeckFlag::Public => ":white_check_mark:",
            DeckFlag::Nsfw => ":underage:",
            DeckFlag::Auto => ":robot:",
            DeckFlag::Lock => ":lock:",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.code() == code)
    }

    /// Key used for the flag's literal strings.
    pub fn key(self) -> &'static str {
        match self {
            DeckFlag::Public => "public",
            DeckFlag::Nsfw => "nsfw",
            DeckFlag::Auto => "auto",
            DeckFlag::Lock => "lock",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckFlags {
    pub public: bool,
    pub nsfw: bool,
    pub auto: bool,
    pub lock: bool,
}

impl DeckFlags {
    pub fn contains(&self, flag: DeckFlag) -> bool {
        match flag {
            DeckFlag::Public => self.public,
            DeckFlag::Nsfw => self.nsfw,
            DeckFlag::Auto => self.auto,
            DeckFlag::Lock => self.lock,
        }
    }

    pub fn set(&mut self, flag: DeckFlag, value: bool) {
        match flag {
            DeckFlag::Public => self.public = value,
            DeckFlag::Nsfw => self.nsfw = value,
            DeckFlag::Auto => self.auto = value,
            DeckFlag::Lock => self.lock = value,
        }
    }

    /// Flags that are set, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = DeckFlag> + '_ {
        DeckFlag::ALL.into_iter().filter(|flag| self.contains(*flag))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// What happens when a member asks to join a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    AlreadyMember,
    Locked,
    Join {
        /// The member must confirm an age warning first.
        confirm_nsfw: bool,
        mode: JoinMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Role is granted right away.
    Immediate,
    /// The member already has a pending application.
    AlreadyApplied,
    /// A pending application is filed and the manager notified.
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub manager: UserId,
    pub pending: Vec<UserId>,
    pub flags: DeckFlags,
    topic: String,
    pub category_id: ChannelId,
    pub default_channel_id: ChannelId,
    pub role_id: Option<RoleId>,
}

impl Deck {
    /// Builds a deck from its decoded topic record and the guild objects it lives in.
    pub fn from_record(
        record: DeckRecord,
        name: String,
        category_id: ChannelId,
        default_channel_id: ChannelId,
        role_id: Option<RoleId>,
    ) -> Self {
        let mut deck = Self {
            id: record.id,
            name,
            manager: record.manager,
            pending: record.pending,
            flags: record.flags,
            topic: String::new(),
            category_id,
            default_channel_id,
            role_id,
        };
        deck.set_topic(&record.topic);
        deck
    }

    /// The part of the deck that is stored in the channel topic.
    pub fn record(&self) -> DeckRecord {
        DeckRecord {
            id: self.id.clone(),
            flags: self.flags,
            manager: self.manager,
            pending: self.pending.clone(),
            topic: self.topic.clone(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Replaces the free topic, truncated to [`TOPIC_MAX_LENGTH`] characters.
    pub fn set_topic(&mut self, topic: &str) {
        self.topic = topic.chars().take(TOPIC_MAX_LENGTH).collect();
    }

    pub fn is_manager(&self, user: UserId) -> bool {
        self.manager == user
    }

    pub fn is_pending(&self, user: UserId) -> bool {
        self.pending.contains(&user)
    }

    /// Files a pending application. Returns `false` when one already exists.
    pub fn apply(&mut self, user: UserId) -> bool {
        if self.is_pending(user) {
            return false;
        }
        self.pending.push(user);
        true
    }

    /// Withdraws a pending application. Returns `false` when there was none.
    pub fn withdraw(&mut self, user: UserId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != user);
        before != self.pending.len()
    }

    /// Removes the given users from the pending list, returning those that were pending.
    pub fn take_pending(&mut self, users: &[UserId]) -> Vec<UserId> {
        let mut taken = Vec::new();
        for user in users {
            if !taken.contains(user) && self.withdraw(*user) {
                taken.push(*user);
            }
        }
        taken
    }

    /// Decides how a join request is handled.
    ///
    /// # Arguments
    /// - `user` - Member asking to join
    /// - `is_member` - Whether the member already holds the deck role
    pub fn join_policy(&self, user: UserId, is_member: bool) -> JoinPolicy {
        if is_member {
            return JoinPolicy::AlreadyMember;
        }
        if self.flags.lock {
            return JoinPolicy::Locked;
        }
        let mode = if self.flags.auto {
            JoinMode::Immediate
        } else if self.is_pending(user) {
            JoinMode::AlreadyApplied
        } else {
            JoinMode::Apply
        };
        JoinPolicy::Join {
            confirm_nsfw: self.flags.nsfw,
            mode,
        }
    }

    /// One-line summary used in the deck list.
    ///
    /// `emoji` resolves flag shortcodes to displayable emoji.
    pub fn brief<'a>(&self, emoji: impl Fn(&'static str) -> &'a str) -> String {
        let mut brief = format!(
            "***`{}`*** **__{}__** {}",
            self.id,
            self.name,
            user_mention(self.manager)
        );
        for flag in self.flags.iter() {
            brief.push(' ');
            brief.push_str(emoji(flag.code()));
        }
        if !self.pending.is_empty() {
            brief.push(' ');
            brief.push_str(emoji(PENDING_EMOJI));
        }
        brief
    }
}

/// Whether `id` is a well-formed deck id.
pub fn is_valid_id(id: &str) -> bool {
    id.chars().count() == ID_LENGTH && id.chars().all(|c| VALID_ID_CHARS.contains(c))
}

/// Whether `name` can be used as a deck name.
pub fn is_valid_name(name: &str) -> bool {
    let length = name.trim().chars().count();
    length > 0 && name.chars().count() <= NAME_MAX_LENGTH
}

#[cfg(test)]
mod test {
    use super::*;

    fn deck(flags: DeckFlags) -> Deck {
        Deck::from_record(
            DeckRecord {
                id: "a1c2".to_string(),
                flags,
                manager: UserId::new(1),
                pending: vec![UserId::new(2)],
                topic: "주제".to_string(),
            },
            "보드게임".to_string(),
            ChannelId::new(10),
            ChannelId::new(11),
            Some(RoleId::new(12)),
        )
    }

    #[test]
    fn validates_ids() {
        assert!(is_valid_id("a1c2"));
        assert!(is_valid_id("__XY"));
        assert!(!is_valid_id("abc"));
        assert!(!is_valid_id("abcde"));
        // 'b', 'l', 'o', 'q', 'u' and lookalike capitals are excluded
        assert!(!is_valid_id("bbbb"));
        assert!(!is_valid_id("OOOO"));
    }

    #[test]
    fn validates_names() {
        assert!(is_valid_name("보드게임"));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name(&"가".repeat(NAME_MAX_LENGTH + 1)));
    }

    #[test]
    fn topic_is_truncated() {
        let mut deck = deck(DeckFlags::default());
        deck.set_topic(&"가".repeat(TOPIC_MAX_LENGTH + 10));
        assert_eq!(deck.topic().chars().count(), TOPIC_MAX_LENGTH);
    }

    #[test]
    fn apply_and_withdraw() {
        let mut deck = deck(DeckFlags::default());
        assert!(!deck.apply(UserId::new(2)));
        assert!(deck.apply(UserId::new(3)));
        assert_eq!(deck.pending, vec![UserId::new(2), UserId::new(3)]);
        assert!(deck.withdraw(UserId::new(2)));
        assert!(!deck.withdraw(UserId::new(2)));
    }

    #[test]
    fn take_pending_returns_only_pending_users() {
        let mut deck = deck(DeckFlags::default());
        deck.apply(UserId::new(3));

        let taken = deck.take_pending(&[UserId::new(3), UserId::new(9), UserId::new(3)]);
        assert_eq!(taken, vec![UserId::new(3)]);
        assert_eq!(deck.pending, vec![UserId::new(2)]);
    }

    #[test]
    fn join_policy_order() {
        let locked = deck(DeckFlags {
            lock: true,
            nsfw: true,
            ..Default::default()
        });
        assert_eq!(locked.join_policy(UserId::new(5), true), JoinPolicy::AlreadyMember);
        assert_eq!(locked.join_policy(UserId::new(5), false), JoinPolicy::Locked);

        let auto = deck(DeckFlags {
            auto: true,
            nsfw: true,
            ..Default::default()
        });
        assert_eq!(
            auto.join_policy(UserId::new(2), false),
            JoinPolicy::Join {
                confirm_nsfw: true,
                mode: JoinMode::Immediate
            }
        );

        let plain = deck(DeckFlags::default());
        assert_eq!(
            plain.join_policy(UserId::new(2), false),
            JoinPolicy::Join {
                confirm_nsfw: false,
                mode: JoinMode::AlreadyApplied
            }
        );
        assert_eq!(
            plain.join_policy(UserId::new(5), false),
            JoinPolicy::Join {
                confirm_nsfw: false,
                mode: JoinMode::Apply
            }
        );
    }

    #[test]
    fn brief_lists_flags_and_pending_marker() {
        let deck = deck(DeckFlags {
            public: true,
            lock: true,
            ..Default::default()
        });
        let brief = deck.brief(|code| code);
        assert_eq!(
            brief,
            "***`a1c2`*** **__보드게임__** <@1> :white_check_mark: :lock: :raised_hand:"
        );
    }

    #[test]
    fn flags_round_trip_through_codes() {
        for flag in DeckFlag::ALL {
            assert_eq!(DeckFlag::from_code(flag.code()), Some(flag));
        }
        assert_eq!(DeckFlag::from_code(":smile:"), None);
    }
}
