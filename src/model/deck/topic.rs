//! Channel topic codec for deck records.
//!
//! The current format, one item per line:
//!
//! ```text
//! *id: a1c2
//! :white_check_mark: :robot:        (optional flags line)
//! 매니저: <@manager>
//! 가입신청자: <@a> <@b>             (optional, only with pending applications)
//!
//! free topic, any number of lines
//! ```
//!
//! Older decks were written in a legacy layout: a zero-width space first, the
//! flags line before the id, `id: ` without the asterisk and pending members under
//! `보류된 가입:` separated by spaces or newlines. Legacy topics are decoded and
//! rewritten in the current layout the next time the deck is saved.

use serenity::all::UserId;

use crate::error::deck::DeckError;
use crate::model::deck::{DeckFlag, DeckFlags, CHANNEL_TOPIC_MAX_LENGTH};
use crate::util::parse::{parse_user, user_mention};

const ID_PREFIX: &str = "*id:";
const MANAGER_PREFIX: &str = "매니저:";
const PENDING_PREFIX: &str = "가입신청자:";

const LEGACY_MARKER: char = '\u{200b}';
const LEGACY_ID_PREFIX: &str = "id:";
const LEGACY_PENDING_PREFIX: &str = "보류된 가입:";

/// Layout a topic was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicFormat {
    Current,
    Legacy,
}

impl TopicFormat {
    /// Detects the layout from the first characters of a topic.
    pub fn detect(raw: &str) -> Option<Self> {
        if raw.starts_with(ID_PREFIX) {
            Some(TopicFormat::Current)
        } else if raw.starts_with(LEGACY_MARKER) {
            Some(TopicFormat::Legacy)
        } else {
            None
        }
    }
}

/// The deck state stored in a channel topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckRecord {
    pub id: String,
    pub flags: DeckFlags,
    pub manager: UserId,
    pub pending: Vec<UserId>,
    pub topic: String,
}

impl DeckRecord {
    /// Encodes the record in the current layout.
    ///
    /// # Returns
    /// - `Ok(String)` - Channel topic text
    /// - `Err(DeckError::TopicTooLong)` - The text exceeds the channel topic limit
    pub fn encode(&self) -> Result<String, DeckError> {
        let mut lines = vec![format!("{} {}", ID_PREFIX, self.id)];
        if !self.flags.is_empty() {
            let codes: Vec<&str> = self.flags.iter().map(DeckFlag::code).collect();
            lines.push(codes.join(" "));
        }
        lines.push(format!("{} {}", MANAGER_PREFIX, user_mention(self.manager)));
        if !self.pending.is_empty() {
            let mentions: Vec<String> = self.pending.iter().copied().map(user_mention).collect();
            lines.push(format!("{} {}", PENDING_PREFIX, mentions.join(" ")));
        }

        let mut encoded = lines.join("\n");
        if !self.topic.is_empty() {
            encoded.push_str("\n\n");
            encoded.push_str(&self.topic);
        }

        let length = encoded.chars().count();
        if length > CHANNEL_TOPIC_MAX_LENGTH {
            return Err(DeckError::TopicTooLong(length));
        }
        Ok(encoded)
    }

    /// Decodes a topic in either layout.
    ///
    /// # Returns
    /// - `Ok((DeckRecord, TopicFormat))` - The record and the layout it was read from
    /// - `Err(DeckError::NotDeckTopic)` - The topic is not a deck topic
    /// - `Err(DeckError)` - The topic is a deck topic but malformed
    pub fn decode(raw: &str) -> Result<(Self, TopicFormat), DeckError> {
        match TopicFormat::detect(raw) {
            Some(TopicFormat::Current) => Ok((decode_current(raw)?, TopicFormat::Current)),
            Some(TopicFormat::Legacy) => Ok((decode_legacy(raw)?, TopicFormat::Legacy)),
            None => Err(DeckError::NotDeckTopic),
        }
    }
}

/// Cursor over the lines of a topic.
struct Lines<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.split('\n').collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek();
        if line.is_some() {
            self.position += 1;
        }
        line
    }

    /// Everything after the header: one optional blank separator, then the topic.
    fn remaining_topic(mut self) -> String {
        if self.peek().is_some_and(|line| line.trim().is_empty()) {
            self.position += 1;
        }
        self.lines
            .get(self.position..)
            .map(|rest| rest.join("\n"))
            .unwrap_or_default()
    }
}

fn decode_current(raw: &str) -> Result<DeckRecord, DeckError> {
    let mut lines = Lines::new(raw);

    let id = lines
        .advance()
        .and_then(|line| line.strip_prefix(ID_PREFIX))
        .ok_or(DeckError::NotDeckTopic)?;
    let id = parse_id(id)?;

    let flags = match lines.peek().and_then(parse_flags) {
        Some(flags) => {
            lines.advance();
            flags
        }
        None => DeckFlags::default(),
    };

    let manager = parse_manager(lines.advance())?;

    let mut pending = Vec::new();
    if let Some(rest) = lines.peek().and_then(|line| line.strip_prefix(PENDING_PREFIX)) {
        pending = parse_mentions(rest)?;
        lines.advance();
    }

    Ok(DeckRecord {
        id,
        flags,
        manager,
        pending,
        topic: lines.remaining_topic(),
    })
}

fn decode_legacy(raw: &str) -> Result<DeckRecord, DeckError> {
    let raw = raw.trim_start_matches(LEGACY_MARKER);
    let mut lines = Lines::new(raw);

    let flags = match lines.peek().and_then(parse_flags) {
        Some(flags) => {
            lines.advance();
            flags
        }
        None => DeckFlags::default(),
    };

    let id = lines
        .advance()
        .and_then(|line| line.strip_prefix(LEGACY_ID_PREFIX))
        .ok_or(DeckError::MissingLine("id"))?;
    let id = parse_id(id)?;

    let manager = parse_manager(lines.advance())?;

    let mut pending = Vec::new();
    if let Some(rest) = lines
        .peek()
        .and_then(|line| line.strip_prefix(LEGACY_PENDING_PREFIX))
    {
        pending = parse_mentions(rest)?;
        lines.advance();
        // Older writers put every pending mention on its own line
        while let Some(user) = lines.peek().and_then(parse_user_line) {
            pending.push(user);
            lines.advance();
        }
    }

    Ok(DeckRecord {
        id,
        flags,
        manager,
        pending,
        topic: lines.remaining_topic(),
    })
}

fn parse_id(value: &str) -> Result<String, DeckError> {
    let id = value.trim();
    let valid = id.chars().count() >= 4 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(DeckError::InvalidId(id.to_string()));
    }
    Ok(id.to_string())
}

/// Parses a line made only of flag shortcodes separated by spaces.
fn parse_flags(line: &str) -> Option<DeckFlags> {
    let mut flags = DeckFlags::default();
    let mut any = false;
    for code in line.split_whitespace() {
        flags.set(DeckFlag::from_code(code)?, true);
        any = true;
    }
    any.then_some(flags)
}

fn parse_manager(line: Option<&str>) -> Result<UserId, DeckError> {
    let mention = line
        .and_then(|line| line.strip_prefix(MANAGER_PREFIX))
        .ok_or(DeckError::MissingLine("매니저"))?;
    parse_user_line(mention).ok_or_else(|| DeckError::InvalidMention(mention.trim().to_string()))
}

fn parse_user_line(line: &str) -> Option<UserId> {
    let line = line.trim();
    if line.starts_with("<@") {
        parse_user(line)
    } else {
        None
    }
}

fn parse_mentions(value: &str) -> Result<Vec<UserId>, DeckError> {
    value
        .split_whitespace()
        .map(|mention| {
            parse_user_line(mention).ok_or_else(|| DeckError::InvalidMention(mention.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn record() -> DeckRecord {
        DeckRecord {
            id: "a1c2".to_string(),
            flags: DeckFlags {
                public: true,
                auto: true,
                ..Default::default()
            },
            manager: UserId::new(100),
            pending: vec![UserId::new(200), UserId::new(300)],
            topic: "보드게임을 합니다.\n매주 토요일".to_string(),
        }
    }

    #[test]
    fn encodes_current_layout() {
        let encoded = record().encode().unwrap();
        assert_eq!(
            encoded,
            "*id: a1c2\n:white_check_mark: :robot:\n매니저: <@100>\n가입신청자: <@200> <@300>\n\n보드게임을 합니다.\n매주 토요일"
        );
    }

    #[test]
    fn decodes_what_it_encodes() {
        let original = record();
        let (decoded, format) = DeckRecord::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(format, TopicFormat::Current);
    }

    #[test]
    fn minimal_record_has_no_optional_lines() {
        let record = DeckRecord {
            id: "XYZ9".to_string(),
            flags: DeckFlags::default(),
            manager: UserId::new(7),
            pending: Vec::new(),
            topic: String::new(),
        };
        let encoded = record.encode().unwrap();
        assert_eq!(encoded, "*id: XYZ9\n매니저: <@7>");
        assert_eq!(DeckRecord::decode(&encoded).unwrap().0, record);
    }

    #[test]
    fn accepts_nickname_mentions_and_trailing_whitespace_loss() {
        let raw = "*id: abcd\n매니저: <@!55>\n가입신청자: <@!66>";
        let (decoded, _) = DeckRecord::decode(raw).unwrap();
        assert_eq!(decoded.manager, UserId::new(55));
        assert_eq!(decoded.pending, vec![UserId::new(66)]);
        assert_eq!(decoded.topic, "");
    }

    #[test]
    fn keeps_topic_starting_with_blank_line() {
        let mut original = record();
        original.topic = "\n두 번째 줄".to_string();
        let (decoded, _) = DeckRecord::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded.topic, "\n두 번째 줄");
    }

    #[test]
    fn decodes_legacy_layout() {
        let raw = "\u{200b}:underage: :lock:\nid: Wx12\n매니저: <@10>\n보류된 가입: <@20>\n<@30>\n\n옛날 주제";
        let (decoded, format) = DeckRecord::decode(raw).unwrap();

        assert_eq!(format, TopicFormat::Legacy);
        assert_eq!(decoded.id, "Wx12");
        assert!(decoded.flags.nsfw && decoded.flags.lock);
        assert!(!decoded.flags.public && !decoded.flags.auto);
        assert_eq!(decoded.manager, UserId::new(10));
        assert_eq!(decoded.pending, vec![UserId::new(20), UserId::new(30)]);
        assert_eq!(decoded.topic, "옛날 주제");
    }

    #[test]
    fn legacy_record_is_rewritten_in_current_layout() {
        let raw = "\u{200b}id: Wx12\n매니저: <@10>\n\n옛날 주제";
        let (decoded, _) = DeckRecord::decode(raw).unwrap();
        assert_eq!(decoded.encode().unwrap(), "*id: Wx12\n매니저: <@10>\n\n옛날 주제");
    }

    #[test]
    fn rejects_foreign_topics() {
        assert_eq!(
            DeckRecord::decode("그냥 채널 주제"),
            Err(DeckError::NotDeckTopic)
        );
    }

    #[test]
    fn rejects_missing_manager() {
        assert_eq!(
            DeckRecord::decode("*id: abcd\n\n주제"),
            Err(DeckError::MissingLine("매니저"))
        );
        assert!(matches!(
            DeckRecord::decode("*id: abcd\n매니저: 켄켄"),
            Err(DeckError::InvalidMention(_))
        ));
    }

    #[test]
    fn rejects_short_id() {
        assert!(matches!(
            DeckRecord::decode("*id: ab\n매니저: <@1>"),
            Err(DeckError::InvalidId(_))
        ));
    }

    #[test]
    fn unknown_flag_line_is_not_a_flags_line() {
        let raw = "*id: abcd\n:smile:\n매니저: <@1>";
        assert_eq!(
            DeckRecord::decode(raw),
            Err(DeckError::MissingLine("매니저"))
        );
    }

    #[test]
    fn refuses_to_encode_over_channel_limit() {
        let mut record = record();
        record.pending = (1..=60).map(|i| UserId::new(100_000_000_000_000_000 + i)).collect();
        assert!(matches!(record.encode(), Err(DeckError::TopicTooLong(_))));
    }
}
