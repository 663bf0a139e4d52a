use std::ops::Range;

use crate::error::command::CommandError;

/// Whitespace separated tokens of a command message, prefix already stripped.
///
/// The tokens naming the command itself are consumed with [`Args::advance`]
/// once the command is resolved, so indices seen by a handler start at its
/// first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    raw: String,
    spans: Vec<Range<usize>>,
    offset: usize,
}

impl Args {
    pub fn parse(raw: &str) -> Self {
        let mut spans = Vec::new();
        let mut start = None;
        for (index, c) in raw.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(begin)) => {
                    spans.push(begin..index);
                    start = None;
                }
                (false, None) => start = Some(index),
                _ => {}
            }
        }
        if let Some(begin) = start {
            spans.push(begin..raw.len());
        }
        Self {
            raw: raw.to_string(),
            spans,
            offset: 0,
        }
    }

    /// Number of tokens in the whole message, command path included.
    pub fn token_count(&self) -> usize {
        self.spans.len()
    }

    /// Token at `index` counted from the start of the message.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|span| &self.raw[span.clone()])
    }

    pub fn advance(&mut self, count: usize) {
        self.offset = (self.offset + count).min(self.spans.len());
    }

    pub fn len(&self) -> usize {
        self.spans.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.token(self.offset + index)
    }

    pub fn required(&self, index: usize, name: &'static str) -> Result<&str, CommandError> {
        self.get(index).ok_or(CommandError::MissingArgument(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.spans[self.offset..]
            .iter()
            .map(|span| &self.raw[span.clone()])
    }

    /// Raw text from argument `index` to the end of the message.
    ///
    /// Inner whitespace and line breaks are kept as typed.
    pub fn rest_from(&self, index: usize) -> &str {
        match self.spans.get(self.offset + index) {
            Some(span) => self.raw[span.start..].trim_end(),
            None => "",
        }
    }

    pub fn rest(&self) -> &str {
        self.rest_from(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let args = Args::parse("데크  가입\n보드게임\t");
        assert_eq!(args.token_count(), 3);
        assert_eq!(args.token(1), Some("가입"));
        assert_eq!(args.token(2), Some("보드게임"));
    }

    #[test]
    fn advance_hides_command_path() {
        let mut args = Args::parse("데크 주제 주말에  보드게임\n합니다");
        args.advance(2);

        assert_eq!(args.len(), 3);
        assert_eq!(args.get(0), Some("주말에"));
        assert_eq!(args.rest(), "주말에  보드게임\n합니다");
        assert_eq!(args.rest_from(1), "보드게임\n합니다");
        assert_eq!(args.token_count(), 5);
    }

    #[test]
    fn rest_of_exhausted_args_is_empty() {
        let mut args = Args::parse("핑");
        args.advance(1);
        assert!(args.is_empty());
        assert_eq!(args.rest(), "");
        assert!(matches!(
            args.required(0, "member"),
            Err(CommandError::MissingArgument("member"))
        ));
    }

    #[test]
    fn advance_is_clamped() {
        let mut args = Args::parse("a b");
        args.advance(5);
        assert_eq!(args.len(), 0);
        assert_eq!(args.iter().count(), 0);
    }
}
