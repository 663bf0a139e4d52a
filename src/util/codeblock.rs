//! Helpers for fitting long text into Discord's 2000 character message limit.

use crate::error::command::CommandError;

/// Discord message content limit in characters.
pub const MESSAGE_MAX_LENGTH: usize = 2000;

const CODEBLOCK_PREFIX: &str = "```md";
const CODEBLOCK_POSTFIX: &str = "\n```";
const ZERO_WIDTH_SPACE: &str = "\u{200b}";

/// Wraps text into markdown code blocks that each fit in one message.
///
/// Lines are accumulated until the next line would overflow `max_length`, at
/// which point the block is closed. With `split_paragraph` every blank line also
/// closes the current block, so each paragraph lands in its own message. Blocks
/// containing only whitespace are dropped. A single line longer than the limit is
/// cut into pieces. Empty input yields one block holding a zero-width space so the
/// result can always be sent.
///
/// # Arguments
/// - `content` - Text to wrap
/// - `max_length` - Maximum characters per block including the fences
/// - `split_paragraph` - Whether blank lines start a new block
///
/// # Returns
/// - `Vec<String>` - Code blocks in order
pub fn wrap_codeblock(content: &str, max_length: usize, split_paragraph: bool) -> Vec<String> {
    let fence_length = CODEBLOCK_PREFIX.chars().count() + CODEBLOCK_POSTFIX.chars().count();
    if content.is_empty() {
        return vec![format!(
            "{}{}{}",
            CODEBLOCK_PREFIX, ZERO_WIDTH_SPACE, CODEBLOCK_POSTFIX
        )];
    }

    let line_budget = max_length.saturating_sub(fence_length + 1).max(1);
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut current_length = 0;

    let mut close = |current: &mut String, current_length: &mut usize| {
        if !current.trim().is_empty() {
            blocks.push(format!("{}{}{}", CODEBLOCK_PREFIX, current, CODEBLOCK_POSTFIX));
        }
        current.clear();
        *current_length = 0;
    };

    for line in content.split('\n') {
        for piece in split_by_length(line, line_budget) {
            let piece_length = piece.chars().count();
            let overflows = fence_length + current_length + 1 + piece_length > max_length;
            if overflows || (split_paragraph && piece.trim().is_empty()) {
                close(&mut current, &mut current_length);
            }
            current.push('\n');
            current.push_str(&piece);
            current_length += 1 + piece_length;
        }
    }
    close(&mut current, &mut current_length);

    blocks
}

/// Splits text into chunks of at most `max_length` characters.
///
/// Splits on character boundaries, never inside a multi-byte character. An empty
/// string yields a single empty chunk.
pub fn split_by_length(content: &str, max_length: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(max_length.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Rejects an argument longer than `limit` characters.
pub fn check_length(argument: &str, limit: usize) -> Result<(), CommandError> {
    let length = argument.chars().count();
    if length > limit {
        return Err(CommandError::BadArgument(format!(
            "argument length {} is over {}",
            length, limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_content_yields_zero_width_block() {
        let blocks = wrap_codeblock("", MESSAGE_MAX_LENGTH, false);
        assert_eq!(blocks, vec!["```md\u{200b}\n```".to_string()]);
    }

    #[test]
    fn short_content_is_one_block() {
        let blocks = wrap_codeblock("# title\nbody", MESSAGE_MAX_LENGTH, false);
        assert_eq!(blocks, vec!["```md\n# title\nbody\n```".to_string()]);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let blocks = wrap_codeblock("first\n\nsecond\nmore", MESSAGE_MAX_LENGTH, true);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "```md\nfirst\n```");
        assert_eq!(blocks[1], "```md\n\nsecond\nmore\n```");
    }

    #[test]
    fn every_block_fits_the_limit() {
        let content = (0..500)
            .map(|i| format!("line number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = wrap_codeblock(&content, MESSAGE_MAX_LENGTH, false);

        assert!(blocks.len() > 1);
        for block in &blocks {
            assert!(block.chars().count() <= MESSAGE_MAX_LENGTH);
        }
    }

    #[test]
    fn overlong_line_is_cut() {
        let line = "가".repeat(5000);
        let blocks = wrap_codeblock(&line, MESSAGE_MAX_LENGTH, false);

        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            assert!(block.chars().count() <= MESSAGE_MAX_LENGTH);
        }
    }

    #[test]
    fn split_by_length_respects_characters() {
        let chunks = split_by_length("가나다라마", 2);
        assert_eq!(chunks, vec!["가나", "다라", "마"]);
    }

    #[test]
    fn check_length_counts_characters() {
        assert!(check_length("가나다", 3).is_ok());
        assert!(matches!(
            check_length("가나다라", 3),
            Err(CommandError::BadArgument(_))
        ));
    }
}
