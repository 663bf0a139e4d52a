//! Hangul syllable composition.
//!
//! A precomposed syllable is `0xAC00 + (initial * 21 + medial) * 28 + final`,
//! with 19 initial consonants, 21 medial vowels and 28 finals (0 = none).

const SYLLABLE_BASE: u32 = 0xAC00;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;
const INITIAL_COUNT: u32 = 19;

pub const INITIAL_NIEUN: u32 = 2;
pub const INITIAL_RIEUL: u32 = 5;
pub const INITIAL_MIEUM: u32 = 6;
pub const INITIAL_IEUNG: u32 = 11;

pub const FINAL_NONE: u32 = 0;
pub const FINAL_NIEUN: u32 = 4;
pub const FINAL_MIEUM: u32 = 16;
pub const FINAL_IEUNG: u32 = 21;

/// Composes a syllable from jamo indices, `None` when an index is out of range.
pub fn compose(initial: u32, medial: u32, last: u32) -> Option<char> {
    if initial >= INITIAL_COUNT || medial >= MEDIAL_COUNT || last >= FINAL_COUNT {
        return None;
    }
    char::from_u32(SYLLABLE_BASE + (initial * MEDIAL_COUNT + medial) * FINAL_COUNT + last)
}

/// Syllables the bot babbles with: soft initials, every vowel, soft or no final.
pub fn babble_syllables() -> Vec<char> {
    let initials = [INITIAL_MIEUM, INITIAL_IEUNG, INITIAL_RIEUL, INITIAL_NIEUN];
    let finals = [FINAL_MIEUM, FINAL_IEUNG, FINAL_NIEUN, FINAL_NONE];

    let mut syllables = Vec::new();
    for initial in initials {
        for medial in 0..MEDIAL_COUNT {
            for last in finals {
                if let Some(syllable) = compose(initial, medial, last) {
                    syllables.push(syllable);
                }
            }
        }
    }
    syllables
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn composes_known_syllables() {
        assert_eq!(compose(0, 0, 0), Some('가'));
        assert_eq!(compose(INITIAL_MIEUM, 0, FINAL_NONE), Some('마'));
        assert_eq!(compose(INITIAL_IEUNG, 0, FINAL_IEUNG), Some('앙'));
        assert_eq!(compose(INITIAL_NIEUN, 8, FINAL_MIEUM), Some('놈'));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(compose(19, 0, 0), None);
        assert_eq!(compose(0, 21, 0), None);
        assert_eq!(compose(0, 0, 28), None);
    }

    #[test]
    fn babble_alphabet_size() {
        let syllables = babble_syllables();
        assert_eq!(syllables.len(), 4 * 21 * 4);
        assert!(syllables.contains(&'멍'));
        assert!(syllables.contains(&'라'));
    }
}
