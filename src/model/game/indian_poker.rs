//! Two-player Indian Poker.
//!
//! Each player sees only the other player's card and bets on holding the higher
//! one. A round is opened with [`IndianPoker::start_round`], driven with
//! [`IndianPoker::bet`] until the betting closes, then resolved with
//! [`IndianPoker::settle`].

use rand::Rng;
use serenity::all::UserId;

pub const DEFAULT_CHIPS: u32 = 10;
pub const HIGHEST_CARD: u8 = 10;

const CALL: &[&str] = &["콜", "call"];
const ALL_IN: &[&str] = &["올인", "올 인", "all in", "allin"];
const RAISE: &[&str] = &["레이즈", "raise"];
const FOLD: &[&str] = &["폴드", "폴", "fold"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indian {
    pub user: UserId,
    pub chip: u32,
    pub betting: u32,
    /// Card of the current round, `0` before the first deal.
    pub card: u8,
}

impl Indian {
    fn new(user: UserId, chip: u32) -> Self {
        Self {
            user,
            chip,
            betting: 0,
            card: 0,
        }
    }

    /// Moves `count` chips into the pot. Returns `false` when there are not enough.
    pub fn bet(&mut self, count: u32) -> bool {
        if self.chip < count {
            return false;
        }
        self.chip -= count;
        self.betting += count;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bet {
    /// A chip count to add to the player's betting.
    Chips(u32),
    Call,
    AllIn,
    Fold,
}

/// Result of reading a chat message as a betting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetInput {
    Bet(Bet),
    /// The raise keyword was used without an amount.
    RaiseWithoutAmount,
    /// Not a betting message.
    Ignored,
}

impl BetInput {
    pub fn parse(content: &str) -> Self {
        let content = content.trim().to_lowercase();
        if ALL_IN.contains(&content.as_str()) {
            return BetInput::Bet(Bet::AllIn);
        }
        if FOLD.contains(&content.as_str()) {
            return BetInput::Bet(Bet::Fold);
        }
        if CALL.contains(&content.as_str()) {
            return BetInput::Bet(Bet::Call);
        }
        match content.parse::<u32>() {
            Ok(count) => BetInput::Bet(Bet::Chips(count)),
            Err(_) if RAISE.iter().any(|keyword| content.contains(keyword)) => {
                BetInput::RaiseWithoutAmount
            }
            Err(_) => BetInput::Ignored,
        }
    }
}

/// Why a betting action was refused. The same player acts again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetRejection {
    /// Below the opponent's betting while the player could still match it.
    InvalidBetting,
    ChipNotEnough,
    /// Folding on the opening action with more than one chip.
    InvalidFold,
    /// All-in while able to match, unless opening with no chips.
    InvalidAllIn,
    /// Calling on the opening action.
    InvalidCall,
}

impl BetRejection {
    /// Key of the literal explaining the rejection.
    pub fn key(self) -> &'static str {
        match self {
            BetRejection::InvalidBetting => "invalid_betting",
            BetRejection::ChipNotEnough => "chip_not_enough",
            BetRejection::InvalidFold => "invalid_fold",
            BetRejection::InvalidAllIn => "invalid_all_in",
            BetRejection::InvalidCall => "invalid_call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetOutcome {
    /// The player raised; the turn passes to the opponent.
    Raised,
    /// Betting is over. `folded_winner` is set when a player folded.
    Closed { folded_winner: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndianPoker {
    pub players: [Indian; 2],
    deck: Vec<u8>,
    /// Player opening the current round.
    turn: Option<usize>,
    /// Player to act in the current betting.
    current: usize,
    first: bool,
}

impl IndianPoker {
    pub fn new(player1: UserId, player2: UserId, chip: u32) -> Self {
        Self {
            players: [Indian::new(player1, chip), Indian::new(player2, chip)],
            deck: full_deck(),
            turn: None,
            current: 0,
            first: true,
        }
    }

    pub fn pot(&self) -> u32 {
        self.players[0]
            .betting
            .saturating_add(self.players[1].betting)
    }

    /// Index of the player to act.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Antes when the pot is empty, picks the opener and deals both cards.
    ///
    /// The first round's opener is random; afterwards the opener alternates.
    /// Returns the opener's index.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.pot() == 0 {
            self.players[0].bet(1);
            self.players[1].bet(1);
        }

        let turn = match self.turn {
            Some(turn) => 1 - turn,
            None => rng.random_range(0..2),
        };
        self.turn = Some(turn);
        self.current = turn;
        self.first = true;

        // The player who does not open is dealt first.
        let other = 1 - turn;
        self.players[other].card = self.pop_card(rng);
        self.players[turn].card = self.pop_card(rng);
        turn
    }

    /// Applies a betting action of the current player.
    pub fn bet(&mut self, bet: Bet) -> Result<BetOutcome, BetRejection> {
        let current = self.current;
        let next = 1 - current;
        let cur = &self.players[current];
        let next_betting = self.players[next].betting;

        let (bet, count) = match bet {
            Bet::Chips(count) => {
                let Some(expected) = cur.betting.checked_add(count) else {
                    return Err(BetRejection::ChipNotEnough);
                };
                if expected == next_betting {
                    (Bet::Call, 0)
                } else if expected > next_betting {
                    (Bet::Chips(count), count)
                } else if cur.chip + cur.betting < next_betting {
                    (Bet::AllIn, 0)
                } else {
                    return Err(BetRejection::InvalidBetting);
                }
            }
            other => (other, 0),
        };

        match bet {
            Bet::Chips(_) => {
                if !self.players[current].bet(count) {
                    return Err(BetRejection::ChipNotEnough);
                }
                self.current = next;
                self.first = false;
                Ok(BetOutcome::Raised)
            }
            Bet::Fold => {
                if !self.first || self.players[current].chip == 1 {
                    Ok(BetOutcome::Closed {
                        folded_winner: Some(next),
                    })
                } else {
                    Err(BetRejection::InvalidFold)
                }
            }
            Bet::AllIn => {
                let cur = &self.players[current];
                if cur.chip + cur.betting < next_betting || (self.first && cur.chip == 0) {
                    let chip = cur.chip;
                    self.players[current].bet(chip);
                    Ok(BetOutcome::Closed {
                        folded_winner: None,
                    })
                } else {
                    Err(BetRejection::InvalidAllIn)
                }
            }
            Bet::Call => {
                if self.first {
                    return Err(BetRejection::InvalidCall);
                }
                let difference = next_betting.saturating_sub(self.players[current].betting);
                if self.players[current].bet(difference) {
                    Ok(BetOutcome::Closed {
                        folded_winner: None,
                    })
                } else {
                    Err(BetRejection::ChipNotEnough)
                }
            }
        }
    }

    /// Resolves the round and hands the pot to the winner.
    ///
    /// Without a folded winner the higher card wins; equal cards carry the pot
    /// over to the next round. Returns the round winner's index.
    pub fn settle(&mut self, folded_winner: Option<usize>) -> Option<usize> {
        let winner = folded_winner.or_else(|| {
            let (first, second) = (self.players[0].card, self.players[1].card);
            match first.cmp(&second) {
                std::cmp::Ordering::Greater => Some(0),
                std::cmp::Ordering::Less => Some(1),
                std::cmp::Ordering::Equal => None,
            }
        });

        if let Some(winner) = winner {
            let pot = self.pot();
            self.players[winner].chip += pot;
            self.players[0].betting = 0;
            self.players[1].betting = 0;
        }
        winner
    }

    /// Index of the game winner, once a player ran out of chips.
    pub fn winner(&self) -> Option<usize> {
        if self.players[0].chip == 0 {
            Some(1)
        } else if self.players[1].chip == 0 {
            Some(0)
        } else {
            None
        }
    }

    fn pop_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u8 {
        if self.deck.is_empty() {
            self.deck = full_deck();
        }
        let index = rng.random_range(0..self.deck.len());
        self.deck.swap_remove(index)
    }
}

fn full_deck() -> Vec<u8> {
    (1..=HIGHEST_CARD).chain(1..=HIGHEST_CARD).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> IndianPoker {
        IndianPoker::new(UserId::new(1), UserId::new(2), DEFAULT_CHIPS)
    }

    /// Starts a round and returns the game with the opener as player 0.
    fn opened() -> IndianPoker {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(1);
        game.start_round(&mut rng);
        game.current = 0;
        game
    }

    #[test]
    fn parses_betting_messages() {
        assert_eq!(BetInput::parse(" 3 "), BetInput::Bet(Bet::Chips(3)));
        assert_eq!(BetInput::parse("콜"), BetInput::Bet(Bet::Call));
        assert_eq!(BetInput::parse("ALL IN"), BetInput::Bet(Bet::AllIn));
        assert_eq!(BetInput::parse("폴드"), BetInput::Bet(Bet::Fold));
        assert_eq!(BetInput::parse("레이즈 할게"), BetInput::RaiseWithoutAmount);
        assert_eq!(BetInput::parse("ㅋㅋㅋ"), BetInput::Ignored);
    }

    #[test]
    fn round_start_antes_and_deals() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(42);
        let opener = game.start_round(&mut rng);

        assert_eq!(game.pot(), 2);
        assert_eq!(game.players[0].chip, DEFAULT_CHIPS - 1);
        assert!((1..=HIGHEST_CARD).contains(&game.players[0].card));
        assert!((1..=HIGHEST_CARD).contains(&game.players[1].card));
        assert_eq!(game.current(), opener);
        assert_eq!(game.deck.len(), 18);

        game.settle(Some(0));
        let next = game.start_round(&mut rng);
        assert_eq!(next, 1 - opener);
    }

    #[test]
    fn deck_is_refilled_when_empty() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..25 {
            game.start_round(&mut rng);
            game.players[0].card = 1;
            game.players[1].card = 2;
            game.settle(None);
            game.players[0].chip = DEFAULT_CHIPS;
        }
        assert!(game.deck.len() <= 20);
    }

    #[test]
    fn opening_call_and_fold_are_refused() {
        let mut game = opened();
        assert_eq!(game.bet(Bet::Call), Err(BetRejection::InvalidCall));
        assert_eq!(game.bet(Bet::Chips(0)), Err(BetRejection::InvalidCall));
        assert_eq!(game.bet(Bet::Fold), Err(BetRejection::InvalidFold));
        assert_eq!(game.bet(Bet::AllIn), Err(BetRejection::InvalidAllIn));
        assert_eq!(game.current(), 0);
    }

    #[test]
    fn raise_then_call_closes_betting() {
        let mut game = opened();
        assert_eq!(game.bet(Bet::Chips(2)), Ok(BetOutcome::Raised));
        assert_eq!(game.current(), 1);
        assert_eq!(game.players[0].betting, 3);

        // Matching the opponent's betting with a number is a call.
        assert_eq!(
            game.bet(Bet::Chips(2)),
            Ok(BetOutcome::Closed {
                folded_winner: None
            })
        );
        assert_eq!(game.pot(), 6);
    }

    #[test]
    fn betting_below_opponent_is_refused_when_affordable() {
        let mut game = opened();
        game.bet(Bet::Chips(4)).unwrap();
        assert_eq!(game.bet(Bet::Chips(1)), Err(BetRejection::InvalidBetting));
        assert_eq!(game.bet(Bet::Chips(20)), Err(BetRejection::ChipNotEnough));
    }

    #[test]
    fn huge_bets_are_refused_without_overflow() {
        assert_eq!(
            BetInput::parse("4294967295"),
            BetInput::Bet(Bet::Chips(u32::MAX))
        );

        let mut game = opened();
        assert_eq!(game.bet(Bet::Chips(u32::MAX)), Err(BetRejection::ChipNotEnough));
        assert_eq!(game.bet(Bet::Chips(u32::MAX - 1)), Err(BetRejection::ChipNotEnough));
        assert_eq!(game.current(), 0);
        assert_eq!(game.players[0].chip, DEFAULT_CHIPS - 1);
        assert_eq!(game.pot(), 2);
    }

    #[test]
    fn fold_after_opening_gives_pot_to_opponent() {
        let mut game = opened();
        game.bet(Bet::Chips(3)).unwrap();
        let outcome = game.bet(Bet::Fold).unwrap();
        assert_eq!(
            outcome,
            BetOutcome::Closed {
                folded_winner: Some(0)
            }
        );

        assert_eq!(game.settle(Some(0)), Some(0));
        assert_eq!(game.players[0].chip, DEFAULT_CHIPS + 1);
        assert_eq!(game.players[1].chip, DEFAULT_CHIPS - 1);
        assert_eq!(game.pot(), 0);
    }

    #[test]
    fn short_player_goes_all_in() {
        let mut game = opened();
        game.players[1].chip = 2;
        game.bet(Bet::Chips(5)).unwrap();

        // Any number below what is needed turns into an all-in.
        assert_eq!(
            game.bet(Bet::Chips(1)),
            Ok(BetOutcome::Closed {
                folded_winner: None
            })
        );
        assert_eq!(game.players[1].chip, 0);
        assert_eq!(game.players[1].betting, 3);
    }

    #[test]
    fn equal_cards_carry_the_pot() {
        let mut game = opened();
        game.players[0].card = 7;
        game.players[1].card = 7;
        assert_eq!(game.settle(None), None);
        assert_eq!(game.pot(), 2);

        let mut rng = StdRng::seed_from_u64(9);
        game.start_round(&mut rng);
        assert_eq!(game.pot(), 2);
    }

    #[test]
    fn game_ends_when_a_player_is_broke() {
        let mut game = opened();
        assert_eq!(game.winner(), None);
        game.players[1].chip = 0;
        assert_eq!(game.winner(), Some(0));
    }
}
