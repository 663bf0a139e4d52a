//! Replies when someone calls the bot by name in passing.

use rand::seq::IndexedRandom;
use rand::Rng;
use serenity::all::UserId;

use crate::util::hangul::babble_syllables;

/// Syllables that read as the bot's name when repeated.
pub const KEN_FAMILY: [char; 8] = ['켄', '캔', '켼', '컌', '꺤', '꼔', '껜', '깬'];

const CALL_WORDS: [&str; 2] = ["KENKEN", "켄켄"];
const BABBLE_MAX_LENGTH: usize = 1997;
const BABBLE_ENDINGS: [char; 3] = ['!', '?', '.'];

/// How loudly the bot was called in `content`.
///
/// Counts name syllables; fewer than two count as zero. Naming the bot by word,
/// id or display name without the syllables counts as two.
pub fn called_count(content: &str, bot_id: UserId, bot_name: &str) -> usize {
    let count = content.chars().filter(|c| KEN_FAMILY.contains(c)).count();
    if count >= 2 {
        return count;
    }

    let upper = content.to_uppercase();
    let id = bot_id.get().to_string();
    let name = bot_name.to_uppercase();
    let named = CALL_WORDS.iter().any(|word| upper.contains(word))
        || upper.contains(&id)
        || (!name.is_empty() && upper.contains(&name));
    if named {
        2
    } else {
        0
    }
}

/// A greeting, addressed by name half of the time.
pub fn greeting<R: Rng + ?Sized>(greetings: &[&str], name: &str, rng: &mut R) -> String {
    let word = greetings.choose(rng).copied().unwrap_or_default();
    if rng.random_bool(0.5) {
        format!("{} **{}**!", word, name)
    } else {
        format!("{}!", word)
    }
}

/// `count` random syllables followed by three punctuation marks.
pub fn babble<R: Rng + ?Sized>(count: usize, rng: &mut R) -> String {
    let syllables = babble_syllables();
    let mut babble: String = (0..count.min(BABBLE_MAX_LENGTH))
        .filter_map(|_| syllables.choose(rng))
        .collect();
    for _ in 0..BABBLE_ENDINGS.len() {
        if let Some(ending) = BABBLE_ENDINGS.choose(rng) {
            babble.push(*ending);
        }
    }
    babble
}

/// Reply to a message that called the bot `count` times.
///
/// # Arguments
/// - `content` - Message text, checked for greeting words
/// - `count` - Result of [`called_count`]
/// - `author` - Display name of the author
/// - `greetings` - Greeting words
/// - `reactions` - Short reaction lines
///
/// # Returns
/// - `Some(String)` - What to send
/// - `None` - The bot was not called
pub fn reply<R: Rng + ?Sized>(
    content: &str,
    count: usize,
    author: &str,
    greetings: &[&str],
    reactions: &[&str],
    rng: &mut R,
) -> Option<String> {
    if count == 0 {
        return None;
    }
    let upper = content.to_uppercase();
    if greetings.iter().any(|word| !word.is_empty() && upper.contains(word)) {
        return Some(greeting(greetings, author, rng));
    }
    if count <= 2 {
        return reactions.choose(rng).map(|line| line.to_string());
    }
    Some(babble(count, rng))
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOT: UserId = UserId::new(777);

    #[test]
    fn single_syllable_is_not_a_call() {
        assert_eq!(called_count("켄 하나", BOT, "켄켄주니어"), 0);
        assert_eq!(called_count("켄캔껜", BOT, "켄켄주니어"), 3);
    }

    #[test]
    fn naming_counts_as_two() {
        assert_eq!(called_count("hey kenken", BOT, "Kenken Jr"), 2);
        assert_eq!(called_count("<@777> 뭐해", BOT, "Kenken Jr"), 2);
        assert_eq!(called_count("kenken jr?", BOT, "Kenken Jr"), 2);
        assert_eq!(called_count("아무 말", BOT, "Kenken Jr"), 0);
    }

    #[test]
    fn greeting_wins_over_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = reply("켄켄켄켄 안녕", 4, "슈텔로", &["안녕"], &["네?"], &mut rng).unwrap();
        assert!(reply.starts_with("안녕"));
        assert!(reply.ends_with('!'));
    }

    #[test]
    fn low_count_reacts() {
        let mut rng = StdRng::seed_from_u64(2);
        let reply = reply("켄켄", 2, "슈텔로", &["안녕"], &["네?", "왜요"], &mut rng).unwrap();
        assert!(reply == "네?" || reply == "왜요");
    }

    #[test]
    fn high_count_babbles() {
        let mut rng = StdRng::seed_from_u64(3);
        let reply = reply("켄켄켄켄켄", 5, "슈텔로", &["안녕"], &["네?"], &mut rng).unwrap();
        assert_eq!(reply.chars().count(), 5 + 3);
        assert!(reply.chars().rev().take(3).all(|c| "!?.".contains(c)));
    }

    #[test]
    fn babble_is_capped() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(babble(5000, &mut rng).chars().count(), BABBLE_MAX_LENGTH + 3);
    }

    #[test]
    fn not_called_is_silent() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(reply("안녕", 0, "슈텔로", &["안녕"], &["네?"], &mut rng).is_none());
    }

    #[test]
    fn greeting_names_author_sometimes() {
        let mut rng = StdRng::seed_from_u64(6);
        let replies: Vec<String> = (0..32).map(|_| greeting(&["안녕"], "슈텔로", &mut rng)).collect();
        assert!(replies.iter().any(|reply| reply == "안녕 **슈텔로**!"));
        assert!(replies.iter().any(|reply| reply == "안녕!"));
    }
}
