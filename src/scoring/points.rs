//! Card points.
//!
//! Sun values every suit the same way. Hokm raises the jack and nine of the
//! trump suit; other suits count as in Sun. The last trick earns a bonus.

use crate::core::{Card, CompletedTrick, Mode, Rank, Team};

/// Points per team, indexed by `Team::index()`.
pub type TeamPoints = [u16; 2];

/// Bonus for winning the last trick.
pub const LAST_TRICK_BONUS: u16 = 10;

/// Card points in a complete Sun round, including the last-trick bonus.
pub const SUN_ROUND_POINTS: u16 = 130;

/// Card points in a complete Hokm round, including the last-trick bonus.
pub const HOKM_ROUND_POINTS: u16 = 162;

/// Points a card is worth under `mode`.
///
/// ```
/// use baloot_engine::core::{Card, Mode, Rank, Suit};
/// use baloot_engine::scoring::card_points;
///
/// let jack = Card::new(Rank::Jack, Suit::Hearts);
/// assert_eq!(card_points(jack, Mode::Sun), 2);
/// assert_eq!(card_points(jack, Mode::Hokm(Suit::Hearts)), 20);
/// assert_eq!(card_points(jack, Mode::Hokm(Suit::Spades)), 2);
/// ```
#[must_use]
pub fn card_points(card: Card, mode: Mode) -> u16 {
    if mode.trump() == Some(card.suit()) {
        match card.rank() {
            Rank::Jack => 20,
            Rank::Nine => 14,
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Seven | Rank::Eight => 0,
        }
    } else {
        match card.rank() {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
        }
    }
}

/// Points in one trick, without the last-trick bonus.
#[must_use]
pub fn trick_points(trick: &CompletedTrick, mode: Mode) -> u16 {
    trick.cards().map(|c| card_points(c, mode)).sum()
}

/// Raw card points per team over a sequence of completed tricks.
///
/// The winner of the final trick in the sequence gets the last-trick bonus.
#[must_use]
pub fn team_points<'a>(
    tricks: impl IntoIterator<Item = &'a CompletedTrick>,
    mode: Mode,
) -> TeamPoints {
    let mut points = [0u16; 2];
    let mut last_winner = None;

    for trick in tricks {
        points[trick.winner.team().index()] += trick_points(trick, mode);
        last_winner = Some(trick.winner);
    }
    if let Some(winner) = last_winner {
        points[winner.team().index()] += LAST_TRICK_BONUS;
    }

    points
}

/// Tricks taken per team.
#[must_use]
pub fn team_tricks<'a>(tricks: impl IntoIterator<Item = &'a CompletedTrick>) -> [u8; 2] {
    let mut counts = [0u8; 2];
    for trick in tricks {
        counts[trick.winner.team().index()] += 1;
    }
    counts
}

/// The team a total belongs to, for readability at call sites.
#[must_use]
pub fn points_of(points: &TeamPoints, team: Team) -> u16 {
    points[team.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Play, Seat, Suit};

    #[test]
    fn test_deck_totals() {
        let sun: u16 = Card::deck().into_iter().map(|c| card_points(c, Mode::Sun)).sum();
        assert_eq!(sun + LAST_TRICK_BONUS, SUN_ROUND_POINTS);

        for trump in Suit::ALL {
            let hokm: u16 = Card::deck()
                .into_iter()
                .map(|c| card_points(c, Mode::Hokm(trump)))
                .sum();
            assert_eq!(hokm + LAST_TRICK_BONUS, HOKM_ROUND_POINTS);
        }
    }

    #[test]
    fn test_team_points_last_trick_bonus() {
        let trick = |codes: [&str; 4], winner: u8| CompletedTrick {
            plays: [0u8, 1, 2, 3].map(|i| Play::new(Seat::new(i), codes[i as usize].parse().unwrap())),
            winner: Seat::new(winner),
        };
        let tricks = [
            trick(["AS", "TS", "7S", "8S"], 0),
            trick(["KD", "QD", "7D", "JD"], 3),
        ];

        let points = team_points(&tricks, Mode::Sun);
        assert_eq!(points, [21, 9 + LAST_TRICK_BONUS]);
        assert_eq!(points_of(&points, Team::ODD), 19);
        assert_eq!(team_tricks(&tricks), [1, 1]);
    }
}
