//! Single-player Yacht dice.

use rand::Rng;

use crate::error::game::GameError;

pub const DICE_COUNT: usize = 5;
/// Rerolls allowed per round.
pub const REROLLS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    FullHouse,
    FourOfAKind,
    LittleStraight,
    BigStraight,
    Choice,
    Yacht,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::LittleStraight,
        Category::BigStraight,
        Category::Choice,
        Category::Yacht,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Ones => "Ones",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::FullHouse => "Full house",
            Category::FourOfAKind => "4 of a kind",
            Category::LittleStraight => "Little straight",
            Category::BigStraight => "Big straight",
            Category::Choice => "Choice",
            Category::Yacht => "Yacht",
        }
    }

    /// Emoji alias of the reaction selecting this category.
    pub fn emoji(self) -> &'static str {
        match self {
            Category::Ones => ":one:",
            Category::Twos => ":two:",
            Category::Threes => ":three:",
            Category::Fours => ":four:",
            Category::Fives => ":five:",
            Category::Sixes => ":six:",
            Category::FullHouse => ":eject:",
            Category::FourOfAKind => ":capital_abcd:",
            Category::LittleStraight => ":track_previous:",
            Category::BigStraight => ":track_next:",
            Category::Choice => ":asterisk:",
            Category::Yacht => ":cruise_ship:",
        }
    }

    fn index(self) -> usize {
        Category::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or_default()
    }

    /// Score of `dice` in this category.
    pub fn score(self, dice: &[u8; DICE_COUNT]) -> u32 {
        let mut counts = [0u32; 7];
        for face in dice {
            counts[usize::from(*face).min(6)] += 1;
        }
        let sum: u32 = dice.iter().map(|face| u32::from(*face)).sum();
        let faces = |face: usize| counts[face] * face as u32;

        match self {
            Category::Ones => faces(1),
            Category::Twos => faces(2),
            Category::Threes => faces(3),
            Category::Fours => faces(4),
            Category::Fives => faces(5),
            Category::Sixes => faces(6),
            Category::FullHouse => {
                if counts.contains(&3) && counts.contains(&2) {
                    sum
                } else {
                    0
                }
            }
            Category::FourOfAKind => counts
                .iter()
                .position(|count| *count >= 4)
                .map_or(0, |face| face as u32 * 4),
            Category::LittleStraight => {
                if (1..=5).all(|face| counts[face] == 1) {
                    30
                } else {
                    0
                }
            }
            Category::BigStraight => {
                if (2..=6).all(|face| counts[face] == 1) {
                    30
                } else {
                    0
                }
            }
            Category::Choice => sum,
            Category::Yacht => {
                if counts.contains(&5) {
                    50
                } else {
                    0
                }
            }
        }
    }
}

/// Emoji aliases of the dice selectors A-E.
pub const DICE_EMOJI: [&str; DICE_COUNT] = [
    ":regional_indicator_a:",
    ":regional_indicator_b:",
    ":regional_indicator_c:",
    ":regional_indicator_d:",
    ":regional_indicator_e:",
];

/// Emoji aliases of the die faces 1-6.
pub const FACE_EMOJI: [&str; 6] = [":one:", ":two:", ":three:", ":four:", ":five:", ":six:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yacht {
    pub dice: [u8; DICE_COUNT],
    scores: [Option<u32>; 12],
    pub round: usize,
}

impl Default for Yacht {
    fn default() -> Self {
        Self {
            dice: [1; DICE_COUNT],
            scores: [None; 12],
            round: 0,
        }
    }
}

impl Yacht {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the next round with a fresh roll of all dice.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.round += 1;
        for face in self.dice.iter_mut() {
            *face = rng.random_range(1..=6);
        }
    }

    /// Rerolls the dice at `indices` (0 = A .. 4 = E).
    pub fn reroll<R: Rng + ?Sized>(&mut self, indices: &[usize], rng: &mut R) -> Result<(), GameError> {
        if let Some(index) = indices.iter().find(|index| **index >= DICE_COUNT) {
            return Err(GameError::InvalidDice(*index));
        }
        for index in indices {
            self.dice[*index] = rng.random_range(1..=6);
        }
        Ok(())
    }

    /// Dice indices ordered by face value, as they are displayed.
    pub fn sorted_dice(&self) -> Vec<(usize, u8)> {
        let mut dice: Vec<(usize, u8)> = self.dice.iter().copied().enumerate().collect();
        dice.sort_by_key(|(_, face)| *face);
        dice
    }

    pub fn score_of(&self, category: Category) -> Option<u32> {
        self.scores[category.index()]
    }

    /// Categories not scored yet.
    pub fn open_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.score_of(*category).is_none())
            .collect()
    }

    /// Scores the current dice in `category`.
    pub fn select(&mut self, category: Category) -> Result<u32, GameError> {
        let slot = &mut self.scores[category.index()];
        if slot.is_some() {
            return Err(GameError::CategoryUsed(category.name()));
        }
        let score = category.score(&self.dice);
        *slot = Some(score);
        Ok(score)
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().flatten().sum()
    }

    pub fn is_finished(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn upper_section_counts_faces() {
        let dice = [3, 3, 5, 3, 1];
        assert_eq!(Category::Ones.score(&dice), 1);
        assert_eq!(Category::Threes.score(&dice), 9);
        assert_eq!(Category::Sixes.score(&dice), 0);
        assert_eq!(Category::Choice.score(&dice), 15);
    }

    #[test]
    fn full_house_needs_three_and_two() {
        assert_eq!(Category::FullHouse.score(&[2, 2, 5, 5, 5]), 19);
        assert_eq!(Category::FullHouse.score(&[2, 5, 5, 5, 5]), 0);
        assert_eq!(Category::FullHouse.score(&[5, 5, 5, 5, 5]), 0);
    }

    #[test]
    fn four_of_a_kind_scores_four_faces() {
        assert_eq!(Category::FourOfAKind.score(&[4, 4, 4, 4, 1]), 16);
        assert_eq!(Category::FourOfAKind.score(&[6, 6, 6, 6, 6]), 24);
        assert_eq!(Category::FourOfAKind.score(&[6, 6, 6, 1, 1]), 0);
    }

    #[test]
    fn straights_and_yacht() {
        assert_eq!(Category::LittleStraight.score(&[5, 4, 3, 2, 1]), 30);
        assert_eq!(Category::LittleStraight.score(&[2, 3, 4, 5, 6]), 0);
        assert_eq!(Category::BigStraight.score(&[6, 2, 4, 3, 5]), 30);
        assert_eq!(Category::Yacht.score(&[2, 2, 2, 2, 2]), 50);
        assert_eq!(Category::Yacht.score(&[2, 2, 2, 2, 3]), 0);
    }

    #[test]
    fn category_can_only_be_used_once() {
        let mut yacht = Yacht::new();
        yacht.dice = [6, 6, 6, 6, 6];
        assert_eq!(yacht.select(Category::Yacht), Ok(50));
        assert_eq!(
            yacht.select(Category::Yacht),
            Err(GameError::CategoryUsed("Yacht"))
        );
        assert_eq!(yacht.select(Category::Sixes), Ok(30));
        assert_eq!(yacht.total(), 80);
        assert_eq!(yacht.open_categories().len(), 10);
    }

    #[test]
    fn full_game_finishes_after_twelve_rounds() {
        let mut yacht = Yacht::new();
        let mut rng = StdRng::seed_from_u64(11);
        for category in Category::ALL {
            assert!(!yacht.is_finished());
            yacht.start_round(&mut rng);
            yacht.select(category).unwrap();
        }
        assert!(yacht.is_finished());
        assert_eq!(yacht.round, 12);
    }

    #[test]
    fn reroll_rejects_unknown_dice() {
        let mut yacht = Yacht::new();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            yacht.reroll(&[0, 5], &mut rng),
            Err(GameError::InvalidDice(5))
        );
        assert_eq!(yacht.dice, [1; DICE_COUNT]);

        yacht.reroll(&[1, 3], &mut rng).unwrap();
        assert!(yacht.dice.iter().all(|face| (1..=6).contains(face)));
    }

    #[test]
    fn sorted_dice_keeps_indices() {
        let mut yacht = Yacht::new();
        yacht.dice = [5, 1, 4, 2, 3];
        let order: Vec<usize> = yacht.sorted_dice().into_iter().map(|(index, _)| index).collect();
        assert_eq!(order, vec![1, 3, 4, 2, 0]);
    }
}
