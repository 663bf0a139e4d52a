//! Plain-text protocol spoken between bots sharing a channel.
//!
//! A request is a single message `"<receiver> <SIGNAL>[ <addition>]"` where the
//! receiver is `ALL` or a bot mention.

use std::fmt;
use std::str::FromStr;

use serenity::all::{ChannelId, MessageId, UserId};

use crate::util::parse::{parse_channel, parse_id};

pub const BROADCAST: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Repeat the addition back into the channel.
    Echo,
    /// Run a message that the sender could not handle as a command.
    Pass,
    Send,
    Here,
    Done,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Echo => "ECHO",
            Signal::Pass => "PASS",
            Signal::Send => "SEND",
            Signal::Here => "HERE",
            Signal::Done => "DONE",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECHO" => Ok(Signal::Echo),
            "PASS" => Ok(Signal::Pass),
            "SEND" => Ok(Signal::Send),
            "HERE" => Ok(Signal::Here),
            "DONE" => Ok(Signal::Done),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub receiver: String,
    pub signal: Signal,
    pub addition: String,
}

impl Request {
    pub fn new(receiver: impl Into<String>, signal: Signal, addition: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            signal,
            addition: addition.into(),
        }
    }

    /// Splits message content on the first two spaces.
    ///
    /// Returns `None` when there is no signal token or it is not a known signal.
    pub fn parse(content: &str) -> Option<Self> {
        let mut tokens = content.splitn(3, ' ');
        let receiver = tokens.next()?;
        let signal = tokens.next()?.parse().ok()?;
        let addition = tokens.next().unwrap_or("");
        Some(Self::new(receiver, signal, addition))
    }

    /// Whether the request is addressed to `bot`, directly or by broadcast.
    pub fn is_addressed_to(&self, bot: UserId) -> bool {
        self.receiver == BROADCAST
            || self.receiver == format!("<@{}>", bot.get())
            || self.receiver == format!("<@!{}>", bot.get())
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.receiver, self.signal)?;
        if !self.addition.is_empty() {
            write!(f, " {}", self.addition)?;
        }
        Ok(())
    }
}

/// Who sent a message, as far as request acceptance is concerned.
#[derive(Debug, Clone, Copy)]
pub struct Sender {
    pub id: UserId,
    pub bot: bool,
}

/// Parses a request from a message and decides whether to act on it.
///
/// Only requests from other bots, addressed to `me` or broadcast, are accepted.
/// Messages from `ignored` are never accepted.
pub fn accept_request(
    content: &str,
    sender: Sender,
    me: UserId,
    ignored: Option<UserId>,
) -> Option<Request> {
    if sender.id == me || !sender.bot || Some(sender.id) == ignored {
        return None;
    }
    Request::parse(content).filter(|request| request.is_addressed_to(me))
}

/// Payload of a `PASS` request: `<prefix> <channel> <message id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassTarget {
    pub prefix: String,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl PassTarget {
    pub fn parse(addition: &str) -> Option<Self> {
        let mut tokens = addition.splitn(3, ' ');
        let prefix = tokens.next().filter(|prefix| !prefix.is_empty())?;
        let channel_id = parse_channel(tokens.next()?)?;
        let message_id = parse_id(tokens.next()?.trim())?;
        Some(Self {
            prefix: prefix.to_string(),
            channel_id,
            message_id: MessageId::new(message_id),
        })
    }

    /// Broadcast request asking other bots to run a message we could not handle.
    pub fn to_request(&self) -> Request {
        Request::new(
            BROADCAST,
            Signal::Pass,
            format!(
                "{} <#{}> {}",
                self.prefix,
                self.channel_id.get(),
                self.message_id.get()
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ME: UserId = UserId::new(1000);
    const OTHER_BOT: Sender = Sender {
        id: UserId::new(2000),
        bot: true,
    };

    #[test]
    fn parses_and_formats_requests() {
        let request = Request::parse("ALL ECHO hello world").unwrap();
        assert_eq!(request.receiver, "ALL");
        assert_eq!(request.signal, Signal::Echo);
        assert_eq!(request.addition, "hello world");
        assert_eq!(request.to_string(), "ALL ECHO hello world");

        let bare = Request::parse("<@1000> DONE").unwrap();
        assert_eq!(bare.addition, "");
        assert_eq!(bare.to_string(), "<@1000> DONE");
    }

    #[test]
    fn rejects_unknown_signal_or_missing_signal() {
        assert!(Request::parse("ALL PING").is_none());
        assert!(Request::parse("ALL").is_none());
        assert!(Request::parse("ALL echo").is_none());
    }

    #[test]
    fn accepts_only_other_bots_addressing_us() {
        assert!(accept_request("ALL ECHO hi", OTHER_BOT, ME, None).is_some());
        assert!(accept_request("<@1000> HERE", OTHER_BOT, ME, None).is_some());
        assert!(accept_request("<@!1000> HERE", OTHER_BOT, ME, None).is_some());
        assert!(accept_request("<@3000> HERE", OTHER_BOT, ME, None).is_none());

        let human = Sender {
            id: UserId::new(2000),
            bot: false,
        };
        assert!(accept_request("ALL ECHO hi", human, ME, None).is_none());

        let myself = Sender { id: ME, bot: true };
        assert!(accept_request("ALL ECHO hi", myself, ME, None).is_none());

        assert!(accept_request("ALL ECHO hi", OTHER_BOT, ME, Some(UserId::new(2000))).is_none());
    }

    #[test]
    fn pass_target_round_trip() {
        let target = PassTarget::parse("// <#55> 66").unwrap();
        assert_eq!(target.prefix, "//");
        assert_eq!(target.channel_id, ChannelId::new(55));
        assert_eq!(target.message_id, MessageId::new(66));
        assert_eq!(target.to_request().to_string(), "ALL PASS // <#55> 66");
    }

    #[test]
    fn pass_target_needs_three_components() {
        assert!(PassTarget::parse("// <#55>").is_none());
        assert!(PassTarget::parse("").is_none());
        assert!(PassTarget::parse("// general 66").is_none());
    }
}
