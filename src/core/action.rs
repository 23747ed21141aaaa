//! Action representation.
//!
//! An action is one discrete step of a round: a bid or pass during the
//! auction, the declarer's contract choice, or a card play. Every variant
//! carries the acting seat so a log entry is self-describing.
//!
//! Actions are plain values (`Eq + Hash`), so legal-action sets can be
//! compared and a solver can key tables by them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::{Card, Suit};
use super::seat::Seat;

/// A bid made during the auction.
///
/// `Sun` and `Ashkal` are both Sun-level bids. Ashkal hands the floor card
/// to the bidder's partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bid {
    /// Trump in the floor card's suit (first bidding round).
    Hokm,
    /// Trump in any other suit (second bidding round).
    HokmThani,
    /// No trump.
    Sun,
    /// No trump, partner takes the floor card.
    Ashkal,
}

impl Bid {
    /// Whether this bid is at Sun level (closes the auction).
    #[must_use]
    pub const fn is_sun_level(self) -> bool {
        matches!(self, Bid::Sun | Bid::Ashkal)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bid::Hokm => "Hokm",
            Bid::HokmThani => "Hokm Thani",
            Bid::Sun => "Sun",
            Bid::Ashkal => "Ashkal",
        };
        f.write_str(name)
    }
}

/// Contract mode: trump suit or no trump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Sun,
    Hokm(Suit),
}

impl Mode {
    /// The trump suit, if any.
    #[must_use]
    pub const fn trump(self) -> Option<Suit> {
        match self {
            Mode::Sun => None,
            Mode::Hokm(suit) => Some(suit),
        }
    }

    #[must_use]
    pub const fn is_sun(self) -> bool {
        matches!(self, Mode::Sun)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sun => f.write_str("Sun"),
            Mode::Hokm(suit) => write!(f, "Hokm({suit})"),
        }
    }
}

/// The declarer's choice when finalizing the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractChoice {
    pub mode: Mode,
    /// Who takes the floor card into their hand.
    pub floor_taker: Seat,
}

impl ContractChoice {
    #[must_use]
    pub const fn new(mode: Mode, floor_taker: Seat) -> Self {
        Self { mode, floor_taker }
    }
}

/// A complete game action.
///
/// ## Example
///
/// ```
/// use baloot_engine::core::{Action, Bid, Card, Rank, Seat, Suit};
///
/// let bid = Action::Bid { player: Seat::new(1), bid: Bid::Sun };
/// let play = Action::PlayCard {
///     player: Seat::new(0),
///     card: Card::new(Rank::Ace, Suit::Spades),
/// };
///
/// assert_eq!(bid.player(), Seat::new(1));
/// assert_eq!(play.card(), Some(Card::new(Rank::Ace, Suit::Spades)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Pass { player: Seat },
    Bid { player: Seat, bid: Bid },
    FinalizeContract { player: Seat, contract: ContractChoice },
    PlayCard { player: Seat, card: Card },
}

impl Action {
    /// The acting seat.
    #[must_use]
    pub const fn player(&self) -> Seat {
        match *self {
            Action::Pass { player }
            | Action::Bid { player, .. }
            | Action::FinalizeContract { player, .. }
            | Action::PlayCard { player, .. } => player,
        }
    }

    /// The played card, for `PlayCard`.
    #[must_use]
    pub const fn card(&self) -> Option<Card> {
        match *self {
            Action::PlayCard { card, .. } => Some(card),
            _ => None,
        }
    }

    /// Whether this action belongs to the auction (bid, pass, finalize).
    #[must_use]
    pub const fn is_auction(&self) -> bool {
        !matches!(self, Action::PlayCard { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Pass { player } => write!(f, "{player}: pass"),
            Action::Bid { player, bid } => write!(f, "{player}: bid {bid}"),
            Action::FinalizeContract { player, contract } => write!(
                f,
                "{player}: finalize {} (floor to {})",
                contract.mode, contract.floor_taker
            ),
            Action::PlayCard { player, card } => write!(f, "{player}: play {card}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Rank;

    #[test]
    fn test_action_player() {
        let actions = [
            Action::Pass { player: Seat::new(0) },
            Action::Bid { player: Seat::new(1), bid: Bid::Hokm },
            Action::FinalizeContract {
                player: Seat::new(2),
                contract: ContractChoice::new(Mode::Sun, Seat::new(2)),
            },
            Action::PlayCard {
                player: Seat::new(3),
                card: Card::new(Rank::Seven, Suit::Clubs),
            },
        ];

        for (i, action) in actions.iter().enumerate() {
            assert_eq!(action.player(), Seat::new(i as u8));
        }
        assert!(actions[0].is_auction());
        assert!(!actions[3].is_auction());
    }

    #[test]
    fn test_mode_trump() {
        assert_eq!(Mode::Sun.trump(), None);
        assert_eq!(Mode::Hokm(Suit::Hearts).trump(), Some(Suit::Hearts));
        assert!(Mode::Sun.is_sun());
    }

    #[test]
    fn test_bid_levels() {
        assert!(Bid::Sun.is_sun_level());
        assert!(Bid::Ashkal.is_sun_level());
        assert!(!Bid::Hokm.is_sun_level());
        assert!(!Bid::HokmThani.is_sun_level());
    }

    #[test]
    fn test_action_display() {
        let play = Action::PlayCard {
            player: Seat::new(2),
            card: Card::new(Rank::Ten, Suit::Spades),
        };
        assert_eq!(play.to_string(), "Seat 2: play 10S");
    }

    #[test]
    fn test_action_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |a: &Action| {
            let mut h = DefaultHasher::new();
            a.hash(&mut h);
            h.finish()
        };

        let a1 = Action::Bid { player: Seat::new(1), bid: Bid::Sun };
        let a2 = Action::Bid { player: Seat::new(1), bid: Bid::Sun };
        let a3 = Action::Bid { player: Seat::new(1), bid: Bid::Ashkal };

        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&a3));
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::FinalizeContract {
            player: Seat::new(1),
            contract: ContractChoice::new(Mode::Hokm(Suit::Diamonds), Seat::new(1)),
        };
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();

        assert_eq!(action, deserialized);
    }
}
