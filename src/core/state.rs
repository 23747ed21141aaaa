//! Game state snapshot.
//!
//! `GameState` captures an entire round at one instant: phase, auction,
//! hands, the trick in progress, completed tricks, and the contract.
//!
//! Snapshots are immutable from the outside. The transition function builds
//! each successor from its predecessor; every field is either `Copy` or an
//! `im` persistent structure, so producing a successor shares all unchanged
//! data with its predecessor and cloning a snapshot is O(1).
//!
//! ## Card conservation
//!
//! At every step each card of the deal is in exactly one place:
//! - a hand,
//! - the floor card or the stock (bidding only),
//! - the live trick (a trick with fewer than four cards),
//! - a completed trick.
//!
//! A completed trick stays visible in `trick()` until the next card is
//! played, but it is already archived in `completed_tricks()`. The live trick
//! is empty while `trick_complete()` is true.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

use super::action::{Bid, Mode};
use super::card::{Card, Suit};
use super::deal::{Deal, PlayingDeal};
use super::error::MalformedInput;
use super::seat::{Seat, SeatMap, Team, SEATS};

/// Round phase. Strictly forward: `Bidding -> Playing -> Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Bidding,
    Playing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Bidding => "bidding",
            Phase::Playing => "playing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Bidding round. The second round only happens if everyone passed the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiddingRound {
    First,
    Second,
}

/// Sub-phase of the auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionStage {
    /// Seats are bidding in the given round.
    Open(BiddingRound),
    /// A bid won; the declarer must finalize the contract.
    AwaitingContract,
    /// Everyone passed twice. The deal is thrown in.
    AllPassed,
}

/// The highest bid made so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandingBid {
    pub bidder: Seat,
    pub bid: Bid,
}

/// Auction state, present while the phase is `Bidding`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Auction {
    pub stage: AuctionStage,
    /// Turns taken in the current round (0..=4).
    pub turns_taken: u8,
    pub standing: Option<StandingBid>,
}

impl Auction {
    pub(crate) fn new() -> Self {
        Self {
            stage: AuctionStage::Open(BiddingRound::First),
            turns_taken: 0,
            standing: None,
        }
    }
}

/// One card played into a trick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

impl Play {
    #[must_use]
    pub const fn new(seat: Seat, card: Card) -> Self {
        Self { seat, card }
    }
}

/// Cards of the current trick in play order.
pub type Trick = SmallVec<[Play; SEATS]>;

/// A resolved trick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub plays: [Play; SEATS],
    pub winner: Seat,
}

impl CompletedTrick {
    /// Seat that led the trick.
    #[must_use]
    pub fn leader(&self) -> Seat {
        self.plays[0].seat
    }

    /// Cards in play order.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|p| p.card)
    }
}

/// The finalized contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    pub mode: Mode,
    /// Seat whose bid won the auction.
    pub declarer: Seat,
    pub floor_taker: Seat,
}

/// A broken snapshot invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("{found} cards accounted for, deal had {expected}")]
    CardCount { expected: usize, found: usize },
    #[error("trick holds {0} cards")]
    TrickLength(usize),
    #[error("trick_complete flag disagrees with trick length")]
    TrickCompleteFlag,
    #[error("contract present during bidding")]
    ContractDuringBidding,
    #[error("contract missing after bidding")]
    MissingContract,
    #[error("floor card or stock present outside bidding")]
    FloorOutsideBidding,
    #[error("auction state disagrees with phase")]
    AuctionPhase,
    #[error("{0} holds the wrong number of cards")]
    HandSize(Seat),
    #[error("tricks won disagree with completed tricks")]
    TrickTally,
    #[error("{0} is to act but has no legal action")]
    NoLegalAction(Seat),
    #[error("{0} is to act out of turn")]
    TurnOrder(Seat),
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
}

/// Complete snapshot of a round.
///
/// ## Example
///
/// ```
/// use baloot_engine::core::{Deal, GameRng, GameState, Phase, Seat};
///
/// let deal = Deal::shuffled(&mut GameRng::new(42), Seat::new(0));
/// let state = GameState::from_deal(&deal).unwrap();
///
/// assert_eq!(state.phase(), Phase::Bidding);
/// assert_eq!(state.current_player(), Seat::new(1)); // right of dealer bids first
/// assert!(state.mode().is_none());
/// assert!(state.check_invariants().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) auction: Option<Auction>,
    pub(crate) dealer: Seat,
    pub(crate) current_player: Seat,
    pub(crate) floor_card: Option<Card>,
    pub(crate) stock: Vector<Card>,
    pub(crate) hands: SeatMap<Vector<Card>>,
    pub(crate) trick: Trick,
    pub(crate) trick_complete: bool,
    pub(crate) tricks_won: SeatMap<u8>,
    pub(crate) completed_tricks: Vector<CompletedTrick>,
    pub(crate) contract: Option<Contract>,
    /// Total cards in the deal, for conservation checks.
    pub(crate) deck_size: u8,
}

impl GameState {
    /// Build the opening snapshot of a round that starts with bidding.
    ///
    /// Hands must be of equal size, cards unique, and the total (hands, floor
    /// card, stock) must split evenly into four hands larger than the dealt
    /// ones, so the floor taker can receive the floor card.
    pub fn from_deal(deal: &Deal) -> Result<Self, MalformedInput> {
        check_seat(deal.dealer)?;
        let held = equal_hand_size(&deal.hands)?;

        let total = held * SEATS + 1 + deal.stock.len();
        if total % SEATS != 0 || total / SEATS <= held || total > u8::MAX as usize {
            return Err(MalformedInput::BadCardTotal(total));
        }

        let all = deal
            .hands
            .values()
            .flatten()
            .chain(std::iter::once(&deal.floor_card))
            .chain(deal.stock.iter());
        check_unique(all)?;

        Ok(Self {
            phase: Phase::Bidding,
            auction: Some(Auction::new()),
            dealer: deal.dealer,
            current_player: deal.dealer.next(),
            floor_card: Some(deal.floor_card),
            stock: deal.stock.iter().copied().collect(),
            hands: deal.hands.map(|_, h| h.iter().copied().collect()),
            trick: Trick::new(),
            trick_complete: false,
            tricks_won: SeatMap::with_value(0),
            completed_tricks: Vector::new(),
            contract: None,
            deck_size: total as u8,
        })
    }

    /// Build the opening snapshot of a round that starts directly in play,
    /// with the contract already known.
    pub fn from_playing_deal(deal: &PlayingDeal) -> Result<Self, MalformedInput> {
        for seat in [deal.dealer, deal.leader, deal.declarer] {
            check_seat(seat)?;
        }
        let held = equal_hand_size(&deal.hands)?;
        let total = held * SEATS;
        if held == 0 || total > u8::MAX as usize {
            return Err(MalformedInput::BadCardTotal(total));
        }
        check_unique(deal.hands.values().flatten())?;

        Ok(Self {
            phase: Phase::Playing,
            auction: None,
            dealer: deal.dealer,
            current_player: deal.leader,
            floor_card: None,
            stock: Vector::new(),
            hands: deal.hands.map(|_, h| h.iter().copied().collect()),
            trick: Trick::new(),
            trick_complete: false,
            tricks_won: SeatMap::with_value(0),
            completed_tricks: Vector::new(),
            contract: Some(Contract {
                mode: deal.mode,
                declarer: deal.declarer,
                floor_taker: deal.declarer,
            }),
            deck_size: total as u8,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Auction state; `None` once the contract is finalized.
    #[must_use]
    pub fn auction(&self) -> Option<&Auction> {
        self.auction.as_ref()
    }

    #[must_use]
    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    /// Seat whose action is expected next.
    #[must_use]
    pub fn current_player(&self) -> Seat {
        self.current_player
    }

    /// The exposed card bid on; `None` once the contract is finalized.
    #[must_use]
    pub fn floor_card(&self) -> Option<Card> {
        self.floor_card
    }

    /// Undealt cards, handed out when the contract is finalized.
    #[must_use]
    pub fn stock(&self) -> &Vector<Card> {
        &self.stock
    }

    #[must_use]
    pub fn hands(&self) -> &SeatMap<Vector<Card>> {
        &self.hands
    }

    #[must_use]
    pub fn hand(&self, seat: Seat) -> &Vector<Card> {
        &self.hands[seat]
    }

    /// The visible trick, including a completed trick awaiting clearing.
    #[must_use]
    pub fn trick(&self) -> &[Play] {
        &self.trick
    }

    /// Whether the visible trick is complete and will clear on the next play.
    #[must_use]
    pub fn trick_complete(&self) -> bool {
        self.trick_complete
    }

    /// The trick that the next card joins: empty when the visible trick is
    /// complete.
    #[must_use]
    pub fn live_trick(&self) -> &[Play] {
        if self.trick_complete {
            &[]
        } else {
            &self.trick
        }
    }

    /// Suit led in the live trick.
    #[must_use]
    pub fn led_suit(&self) -> Option<Suit> {
        self.live_trick().first().map(|p| p.card.suit())
    }

    #[must_use]
    pub fn tricks_won(&self) -> &SeatMap<u8> {
        &self.tricks_won
    }

    /// Tricks taken by a partnership.
    #[must_use]
    pub fn team_tricks(&self, team: Team) -> u8 {
        team.members().iter().map(|&s| self.tricks_won[s]).sum()
    }

    #[must_use]
    pub fn completed_tricks(&self) -> &Vector<CompletedTrick> {
        &self.completed_tricks
    }

    #[must_use]
    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    /// Contract mode; absent while bidding.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.contract.map(|c| c.mode)
    }

    /// Trump suit; absent while bidding and in Sun.
    #[must_use]
    pub fn trump(&self) -> Option<Suit> {
        self.mode().and_then(Mode::trump)
    }

    /// Total cards in the deal.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck_size as usize
    }

    /// Cards each hand holds once the deal is complete.
    #[must_use]
    pub fn full_hand_size(&self) -> usize {
        self.deck_size() / SEATS
    }

    /// Cards still held across all hands.
    #[must_use]
    pub fn cards_in_hands(&self) -> usize {
        self.hands.values().map(Vector::len).sum()
    }

    /// Every card's current location, flattened. Used by conservation checks.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.hands
            .values()
            .flat_map(|h| h.iter().copied())
            .chain(self.floor_card)
            .chain(self.stock.iter().copied())
            .chain(self.live_trick().iter().map(|p| p.card))
            .chain(self.completed_tricks.iter().flat_map(|t| t.cards()))
    }

    // === Invariants ===

    /// Check that every seat the snapshot names is in range.
    ///
    /// Snapshots built by the constructors and the transition function always
    /// pass. A deserialized snapshot must pass before anything indexes a hand
    /// with its seats.
    pub fn validate_seats(&self) -> Result<(), MalformedInput> {
        let contract = self
            .contract
            .iter()
            .flat_map(|c| [c.declarer, c.floor_taker]);
        let bidder = self.auction.and_then(|a| a.standing).map(|s| s.bidder);
        let archived = self
            .completed_tricks
            .iter()
            .flat_map(|t| t.plays.iter().map(|p| p.seat).chain(std::iter::once(t.winner)));

        [self.dealer, self.current_player]
            .into_iter()
            .chain(contract)
            .chain(bidder)
            .chain(self.trick.iter().map(|p| p.seat))
            .chain(archived)
            .try_for_each(check_seat)
    }

    /// Verify the snapshot invariants.
    ///
    /// Reachable snapshots always pass; tests call this after every step.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.validate_seats()?;

        let mut seen = FxHashSet::default();
        let mut found = 0usize;
        for card in self.all_cards() {
            if !seen.insert(card) {
                return Err(InvariantViolation::DuplicateCard(card));
            }
            found += 1;
        }
        if found != self.deck_size() {
            return Err(InvariantViolation::CardCount {
                expected: self.deck_size(),
                found,
            });
        }

        if self.trick.len() > SEATS {
            return Err(InvariantViolation::TrickLength(self.trick.len()));
        }
        if self.trick_complete != (self.trick.len() == SEATS) {
            return Err(InvariantViolation::TrickCompleteFlag);
        }

        let bidding = self.phase == Phase::Bidding;
        if bidding && self.contract.is_some() {
            return Err(InvariantViolation::ContractDuringBidding);
        }
        if !bidding && self.contract.is_none() {
            return Err(InvariantViolation::MissingContract);
        }
        if bidding != self.auction.is_some() {
            return Err(InvariantViolation::AuctionPhase);
        }
        if !bidding && (self.floor_card.is_some() || !self.stock.is_empty()) {
            return Err(InvariantViolation::FloorOutsideBidding);
        }

        let tallied: usize = self.tricks_won.values().map(|&n| n as usize).sum();
        if tallied != self.completed_tricks.len() {
            return Err(InvariantViolation::TrickTally);
        }

        if !bidding {
            for seat in Seat::all() {
                let played = self
                    .completed_tricks
                    .iter()
                    .flat_map(|t| t.plays.iter())
                    .chain(self.live_trick().iter())
                    .filter(|p| p.seat == seat)
                    .count();
                if self.hands[seat].len() + played != self.full_hand_size() {
                    return Err(InvariantViolation::HandSize(seat));
                }
            }
        }

        self.check_turn()
    }

    /// The current player must have something to do while the round is live.
    fn check_turn(&self) -> Result<(), InvariantViolation> {
        let seat = self.current_player;
        let stuck = match (self.phase, self.auction) {
            (Phase::Playing, _) => {
                let expected = match self.live_trick().last() {
                    Some(last) => last.seat.next(),
                    None => self.completed_tricks.last().map_or(seat, |t| t.winner),
                };
                if seat != expected {
                    return Err(InvariantViolation::TurnOrder(seat));
                }
                self.hands[seat].is_empty()
            }
            (Phase::Bidding, Some(auction)) => match auction.stage {
                AuctionStage::AwaitingContract => auction.standing.map(|s| s.bidder) != Some(seat),
                AuctionStage::Open(_) | AuctionStage::AllPassed => false,
            },
            _ => false,
        };
        if stuck {
            Err(InvariantViolation::NoLegalAction(seat))
        } else {
            Ok(())
        }
    }
}

fn check_seat(seat: Seat) -> Result<(), MalformedInput> {
    if seat.is_valid() {
        Ok(())
    } else {
        Err(MalformedInput::BadSeat(seat.0))
    }
}

fn equal_hand_size(hands: &SeatMap<Vec<Card>>) -> Result<usize, MalformedInput> {
    let sizes = [
        hands[Seat(0)].len(),
        hands[Seat(1)].len(),
        hands[Seat(2)].len(),
        hands[Seat(3)].len(),
    ];
    if sizes.iter().all(|&n| n == sizes[0]) {
        Ok(sizes[0])
    } else {
        Err(MalformedInput::UnevenHands(sizes))
    }
}

fn check_unique<'a>(cards: impl Iterator<Item = &'a Card>) -> Result<(), MalformedInput> {
    let mut seen = FxHashSet::default();
    for card in cards {
        if !seen.insert(*card) {
            return Err(MalformedInput::DuplicateCard(*card));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Rank;
    use crate::core::rng::GameRng;

    fn c(code: &str) -> Card {
        code.parse().unwrap()
    }

    fn small_deal() -> Deal {
        // 4 x 1 card + floor + 3 stock = 8 cards, 2 per hand after completion
        Deal {
            dealer: Seat::new(3),
            hands: SeatMap::from_array([vec![c("AH")], vec![c("KH")], vec![c("QH")], vec![c("JH")]]),
            floor_card: c("TH"),
            stock: vec![c("9H"), c("8H"), c("7H")],
        }
    }

    #[test]
    fn test_from_deal() {
        let state = GameState::from_deal(&small_deal()).unwrap();

        assert_eq!(state.phase(), Phase::Bidding);
        assert_eq!(state.dealer(), Seat::new(3));
        assert_eq!(state.current_player(), Seat::new(0));
        assert_eq!(state.floor_card(), Some(c("TH")));
        assert_eq!(state.deck_size(), 8);
        assert_eq!(state.full_hand_size(), 2);
        assert_eq!(state.auction().unwrap().stage, AuctionStage::Open(BiddingRound::First));
        assert!(state.mode().is_none());
        assert!(state.trump().is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_from_deal_rejects_duplicates() {
        let mut deal = small_deal();
        deal.stock[0] = c("AH");
        assert_eq!(GameState::from_deal(&deal), Err(MalformedInput::DuplicateCard(c("AH"))));
    }

    #[test]
    fn test_from_deal_rejects_uneven_hands() {
        let mut deal = small_deal();
        deal.hands[Seat::new(2)].push(c("7S"));
        assert_eq!(
            GameState::from_deal(&deal),
            Err(MalformedInput::UnevenHands([1, 1, 2, 1]))
        );
    }

    #[test]
    fn test_from_deal_rejects_bad_total() {
        let mut deal = small_deal();
        deal.stock.pop();
        assert_eq!(GameState::from_deal(&deal), Err(MalformedInput::BadCardTotal(7)));

        // Stock too small for the floor taker to end with a larger hand.
        let tight = Deal {
            dealer: Seat::new(0),
            hands: SeatMap::from_array([vec![c("AH")], vec![c("KH")], vec![c("QH")], vec![c("JH")]]),
            floor_card: c("TH"),
            stock: vec![],
        };
        assert!(matches!(
            GameState::from_deal(&tight),
            Err(MalformedInput::BadCardTotal(5))
        ));
    }

    #[test]
    fn test_from_deal_rejects_bad_dealer() {
        let mut deal = small_deal();
        deal.dealer = Seat(4);
        assert_eq!(GameState::from_deal(&deal), Err(MalformedInput::BadSeat(4)));
    }

    #[test]
    fn test_from_playing_deal() {
        let deal = PlayingDeal {
            dealer: Seat::new(0),
            leader: Seat::new(1),
            declarer: Seat::new(1),
            mode: Mode::Hokm(Suit::Spades),
            hands: SeatMap::from_array([
                vec![c("AH"), c("7S")],
                vec![c("KH"), c("8S")],
                vec![c("QH"), c("9S")],
                vec![c("JH"), c("TS")],
            ]),
        };
        let state = GameState::from_playing_deal(&deal).unwrap();

        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.current_player(), Seat::new(1));
        assert_eq!(state.trump(), Some(Suit::Spades));
        assert!(state.auction().is_none());
        assert!(state.floor_card().is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_shuffled_deal_state_is_consistent() {
        let deal = Deal::shuffled(&mut GameRng::new(7), Seat::new(2));
        let state = GameState::from_deal(&deal).unwrap();

        assert_eq!(state.deck_size(), 32);
        assert_eq!(state.cards_in_hands(), 20);
        assert_eq!(state.stock().len(), 11);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_detects_tampering() {
        let mut state = GameState::from_deal(&small_deal()).unwrap();
        state.hands[Seat::new(0)].push_back(Card::new(Rank::King, Suit::Hearts));
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DuplicateCard(c("KH")))
        );
    }

    #[test]
    fn test_clone_shares_and_compares() {
        let state = GameState::from_deal(&small_deal()).unwrap();
        let copy = state.clone();
        assert_eq!(state, copy);
    }

    #[test]
    fn test_serialization() {
        let state = GameState::from_deal(&small_deal()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn test_seats_out_of_range() {
        let mut state = GameState::from_deal(&small_deal()).unwrap();
        state.current_player = Seat(6);
        assert_eq!(state.validate_seats(), Err(MalformedInput::BadSeat(6)));
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::Malformed(MalformedInput::BadSeat(6)))
        );

        let mut state = GameState::from_deal(&small_deal()).unwrap();
        if let Some(auction) = state.auction.as_mut() {
            auction.standing = Some(StandingBid {
                bidder: Seat(5),
                bid: Bid::Sun,
            });
        }
        assert_eq!(state.validate_seats(), Err(MalformedInput::BadSeat(5)));
    }

    #[test]
    fn test_awaiting_contract_needs_the_bidder() {
        let mut state = GameState::from_deal(&small_deal()).unwrap();
        state.auction = Some(Auction {
            stage: AuctionStage::AwaitingContract,
            turns_taken: 1,
            standing: Some(StandingBid {
                bidder: Seat::new(0),
                bid: Bid::Sun,
            }),
        });
        assert!(state.check_invariants().is_ok());

        state.current_player = Seat::new(1);
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::NoLegalAction(Seat::new(1)))
        );
    }
}
