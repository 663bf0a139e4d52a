use rand::seq::SliceRandom;
use rand::Rng;
use serenity::all::UserId;

use crate::error::game::GameError;

pub const MIN_PLAYERS: usize = 3;

/// Outcome of a king game draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingDraw {
    pub king: UserId,
    /// Everyone else with their secret number, numbered from 1.
    pub numbers: Vec<(UserId, usize)>,
}

/// Shuffles the players, making the first one king and numbering the rest.
///
/// Returns `Ok(None)` when fewer than [`MIN_PLAYERS`] players are given.
pub fn draw<R: Rng + ?Sized>(players: &[UserId], rng: &mut R) -> Result<Option<KingDraw>, GameError> {
    for (index, player) in players.iter().enumerate() {
        if players[..index].contains(player) {
            return Err(GameError::DuplicatePlayer(*player));
        }
    }
    if players.len() < MIN_PLAYERS {
        return Ok(None);
    }

    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    let king = shuffled[0];
    let numbers = shuffled
        .into_iter()
        .skip(1)
        .enumerate()
        .map(|(index, player)| (player, index + 1))
        .collect();
    Ok(Some(KingDraw { king, numbers }))
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn players(count: u64) -> Vec<UserId> {
        (1..=count).map(UserId::new).collect()
    }

    #[test]
    fn everyone_gets_a_role() {
        let mut rng = StdRng::seed_from_u64(2);
        let draw = draw(&players(5), &mut rng).unwrap().unwrap();

        assert_eq!(draw.numbers.len(), 4);
        let numbers: Vec<usize> = draw.numbers.iter().map(|(_, number)| *number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(draw.numbers.iter().all(|(player, _)| *player != draw.king));
    }

    #[test]
    fn needs_three_distinct_players() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(draw(&players(2), &mut rng), Ok(None));
        assert_eq!(
            draw(&[UserId::new(1), UserId::new(2), UserId::new(1)], &mut rng),
            Err(GameError::DuplicatePlayer(UserId::new(1)))
        );
    }
}
