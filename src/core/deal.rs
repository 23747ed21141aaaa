//! Initial deals.
//!
//! A round starts from one of two deal shapes:
//! - `Deal`: five cards per seat, an exposed floor card, and the stock dealt
//!   out after the auction. The round opens with bidding.
//! - `PlayingDeal`: full hands and a known contract. The round opens with the
//!   first trick.

use serde::{Deserialize, Serialize};

use super::action::Mode;
use super::card::Card;
use super::rng::GameRng;
use super::seat::{Seat, SeatMap, SEATS};

/// Cards dealt to each seat before the auction.
pub const CARDS_BEFORE_AUCTION: usize = 5;

/// A deal that opens with bidding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub dealer: Seat,
    pub hands: SeatMap<Vec<Card>>,
    pub floor_card: Card,
    /// Dealt front-first when the contract is finalized.
    pub stock: Vec<Card>,
}

impl Deal {
    /// Shuffle the 32-card deck and deal it.
    ///
    /// Five cards go to each seat starting right of the dealer, then the floor
    /// card is exposed and the remaining eleven form the stock.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng, dealer: Seat) -> Self {
        let mut deck = Card::deck();
        rng.shuffle(&mut deck);

        let mut hands: SeatMap<Vec<Card>> = SeatMap::default();
        let mut cards = deck.into_iter();
        for seat in dealer.next().from_here() {
            hands[seat].extend(cards.by_ref().take(CARDS_BEFORE_AUCTION));
        }

        let rest: Vec<Card> = cards.collect();
        let (floor, stock) = rest.split_at(1);

        Self {
            dealer,
            hands,
            floor_card: floor[0],
            stock: stock.to_vec(),
        }
    }

    /// Total cards in the deal.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hands.values().map(Vec::len).sum::<usize>() + 1 + self.stock.len()
    }
}

/// A deal that opens directly in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingDeal {
    pub dealer: Seat,
    /// Seat leading the first trick.
    pub leader: Seat,
    /// Seat holding the contract.
    pub declarer: Seat,
    pub mode: Mode,
    pub hands: SeatMap<Vec<Card>>,
}

impl PlayingDeal {
    /// Shuffle the deck and deal eight cards to each seat.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng, dealer: Seat, declarer: Seat, mode: Mode) -> Self {
        let mut deck = Card::deck();
        rng.shuffle(&mut deck);

        let per_hand = deck.len() / SEATS;
        let mut hands: SeatMap<Vec<Card>> = SeatMap::default();
        for (i, seat) in Seat::all().enumerate() {
            hands[seat] = deck[i * per_hand..(i + 1) * per_hand].to_vec();
        }

        Self {
            dealer,
            leader: dealer.next(),
            declarer,
            mode,
            hands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Suit;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_shuffled_deal_shape() {
        let deal = Deal::shuffled(&mut GameRng::new(42), Seat::new(0));

        for (_, hand) in deal.hands.iter() {
            assert_eq!(hand.len(), CARDS_BEFORE_AUCTION);
        }
        assert_eq!(deal.stock.len(), 11);
        assert_eq!(deal.card_count(), 32);

        let unique: FxHashSet<Card> = deal
            .hands
            .values()
            .flatten()
            .copied()
            .chain(std::iter::once(deal.floor_card))
            .chain(deal.stock.iter().copied())
            .collect();
        assert_eq!(unique.len(), 32);
    }

    #[test]
    fn test_shuffled_deal_is_deterministic() {
        let a = Deal::shuffled(&mut GameRng::new(9), Seat::new(1));
        let b = Deal::shuffled(&mut GameRng::new(9), Seat::new(1));
        let c = Deal::shuffled(&mut GameRng::new(10), Seat::new(1));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_playing_deal_shape() {
        let deal = PlayingDeal::shuffled(
            &mut GameRng::new(3),
            Seat::new(3),
            Seat::new(0),
            Mode::Hokm(Suit::Clubs),
        );

        assert_eq!(deal.leader, Seat::new(0));
        for (_, hand) in deal.hands.iter() {
            assert_eq!(hand.len(), 8);
        }
    }
}
