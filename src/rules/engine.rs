//! Rules engine trait and the Baloot implementation.
//!
//! A rules engine defines:
//! - What actions are legal in a snapshot
//! - How an action produces the successor snapshot
//! - When the round is over
//!
//! Transitions are pure: `apply` never mutates its input, and the same
//! snapshot and action always produce the same result.

use tracing::{debug, trace};

use super::auction::{apply_call, apply_finalize, legal_calls, legal_finalizations};
use super::play::{legal_cards, obligation, Obligation};
use super::trick::{current_winner, resolve_trick};
use crate::core::{
    Action, ApplyError, AuctionStage, Card, CompletedTrick, GameState, IllegalReason,
    MalformedInput, Mode, Phase, Play, RulesConfig, Seat, SEATS,
};

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    /// All tricks were played.
    Played,
    /// Everyone passed twice; the deal is thrown in.
    Redeal,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty once the round is over
/// - `apply`: must be deterministic; a rejected action leaves no trace
/// - `is_terminal`: `None` while the round continues
pub trait RulesEngine {
    /// Get the rules configuration.
    fn config(&self) -> &RulesConfig;

    /// All actions the current player may take.
    fn legal_actions(&self, state: &GameState) -> Vec<Action>;

    /// Produce the successor snapshot, or explain why the action is rejected.
    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, ApplyError>;

    /// Check if the round is over.
    fn is_terminal(&self, state: &GameState) -> Option<RoundOutcome>;

    // === Convenience Methods ===

    /// Whether `action` is legal in `state`.
    fn is_legal(&self, state: &GameState, action: &Action) -> bool {
        self.legal_actions(state).contains(action)
    }
}

/// Baloot rules, parameterized by a `RulesConfig`.
///
/// ## Example
///
/// ```
/// use baloot_engine::core::{Action, Deal, GameRng, GameState, Seat};
/// use baloot_engine::rules::{BalootRules, RulesEngine};
///
/// let rules = BalootRules::default();
/// let deal = Deal::shuffled(&mut GameRng::new(1), Seat::new(0));
/// let state = GameState::from_deal(&deal).unwrap();
///
/// let pass = Action::Pass { player: Seat::new(1) };
/// let next = rules.apply(&state, &pass).unwrap();
///
/// assert_eq!(next.current_player(), Seat::new(2));
/// assert_eq!(state.current_player(), Seat::new(1)); // input untouched
///
/// let out_of_turn = Action::Pass { player: Seat::new(1) };
/// assert!(rules.apply(&next, &out_of_turn).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalootRules {
    config: RulesConfig,
}

impl BalootRules {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Winner of a completed trick under `mode`.
    #[must_use]
    pub fn resolve_trick(&self, plays: &[Play; SEATS], mode: Mode) -> Seat {
        resolve_trick(plays, mode, &self.config)
    }

    /// The play winning the live trick, if any card has been played.
    #[must_use]
    pub fn current_winner(&self, state: &GameState) -> Option<Play> {
        current_winner(state.live_trick(), state.mode()?, &self.config)
    }

    /// What the current player must play; `None` outside the play phase.
    #[must_use]
    pub fn obligation(&self, state: &GameState) -> Option<Obligation> {
        if state.phase() != Phase::Playing || state.validate_seats().is_err() {
            return None;
        }
        let seat = state.current_player();
        Some(obligation(
            state.hand(seat),
            state.live_trick(),
            seat,
            state.mode()?,
            &self.config,
        ))
    }

    /// Cards the current player may play; empty outside the play phase.
    #[must_use]
    pub fn legal_cards(&self, state: &GameState) -> Vec<Card> {
        match self.obligation(state) {
            Some(ob) => legal_cards(state.hand(state.current_player()), ob, &self.config),
            None => Vec::new(),
        }
    }

    /// Explain why an action that is not legal was rejected.
    fn diagnose(&self, state: &GameState, action: &Action) -> IllegalReason {
        if self.is_terminal(state).is_some() {
            return IllegalReason::RoundOver;
        }

        let expected_phase = if action.is_auction() {
            Phase::Bidding
        } else {
            Phase::Playing
        };
        if state.phase() != expected_phase {
            return IllegalReason::WrongPhase {
                phase: state.phase(),
            };
        }

        if action.player() != state.current_player() {
            return IllegalReason::OutOfTurn {
                expected: state.current_player(),
                actual: action.player(),
            };
        }

        let stage = state.auction().map(|a| a.stage);
        match *action {
            Action::PlayCard { player, card } => {
                if !state.hand(player).contains(&card) {
                    return IllegalReason::CardNotInHand(card);
                }
                self.obligation(state)
                    .and_then(Obligation::violation)
                    .unwrap_or(IllegalReason::CardNotInHand(card))
            }
            Action::Pass { .. } => IllegalReason::AuctionClosed,
            Action::Bid { bid, .. } => match stage {
                Some(AuctionStage::AwaitingContract) => IllegalReason::AuctionClosed,
                _ => IllegalReason::BidNotAllowed(bid),
            },
            Action::FinalizeContract { .. } => match stage {
                Some(AuctionStage::Open(_)) => IllegalReason::AuctionOpen,
                _ => IllegalReason::ContractMismatch,
            },
        }
    }

    fn play_card(&self, state: &GameState, seat: Seat, card: Card, mode: Mode) -> GameState {
        let mut next = state.clone();

        if next.trick_complete {
            next.trick.clear();
            next.trick_complete = false;
        }

        let hand = &mut next.hands[seat];
        if let Some(index) = hand.index_of(&card) {
            hand.remove(index);
        }
        next.trick.push(Play::new(seat, card));

        if next.trick.len() < SEATS {
            next.current_player = seat.next();
            return next;
        }

        let plays = [next.trick[0], next.trick[1], next.trick[2], next.trick[3]];
        let winner = self.resolve_trick(&plays, mode);
        next.tricks_won[winner] += 1;
        next.completed_tricks.push_back(CompletedTrick { plays, winner });
        next.trick_complete = true;
        next.current_player = winner;

        debug!(
            trick = next.completed_tricks.len(),
            leader = %plays[0].seat,
            winner = %winner,
            "trick resolved"
        );

        if next.cards_in_hands() == 0 {
            next.phase = Phase::Done;
            debug!(
                tricks = next.completed_tricks.len(),
                last_trick = %winner,
                "round complete"
            );
        }

        next
    }
}

/// Reject out-of-range seats before anything indexes with them.
fn check_seats(action: &Action) -> Result<(), MalformedInput> {
    let player = action.player();
    if !player.is_valid() {
        return Err(MalformedInput::BadSeat(player.0));
    }
    if let Action::FinalizeContract { contract, .. } = action {
        if !contract.floor_taker.is_valid() {
            return Err(MalformedInput::BadSeat(contract.floor_taker.0));
        }
    }
    Ok(())
}

impl RulesEngine for BalootRules {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.validate_seats().is_err() {
            return Vec::new();
        }
        match state.phase() {
            Phase::Bidding => {
                let Some(auction) = state.auction() else {
                    return Vec::new();
                };
                match auction.stage {
                    AuctionStage::Open(round) => legal_calls(state, auction, round, &self.config),
                    AuctionStage::AwaitingContract => legal_finalizations(state, auction),
                    AuctionStage::AllPassed => Vec::new(),
                }
            }
            Phase::Playing => {
                let player = state.current_player();
                self.legal_cards(state)
                    .into_iter()
                    .map(|card| Action::PlayCard { player, card })
                    .collect()
            }
            Phase::Done => Vec::new(),
        }
    }

    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, ApplyError> {
        if let Err(err) = state.validate_seats() {
            debug!(action = %action, error = %err, "malformed snapshot");
            return Err(err.into());
        }
        check_seats(action)?;

        let illegal = |reason: IllegalReason| {
            debug!(action = %action, reason = %reason, "action rejected");
            ApplyError::Illegal {
                action: *action,
                reason,
            }
        };

        if !self.is_legal(state, action) {
            return Err(illegal(self.diagnose(state, action)));
        }

        let next = match *action {
            Action::Pass { player } | Action::Bid { player, .. } => {
                let bid = match *action {
                    Action::Bid { bid, .. } => Some(bid),
                    _ => None,
                };
                let auction = state
                    .auction()
                    .ok_or_else(|| illegal(IllegalReason::WrongPhase { phase: state.phase() }))?;
                apply_call(state, auction, player, bid)
            }
            Action::FinalizeContract { player, contract } => {
                apply_finalize(state, player, contract, &self.config)
            }
            Action::PlayCard { player, card } => {
                let mode = state
                    .mode()
                    .ok_or_else(|| illegal(IllegalReason::WrongPhase { phase: state.phase() }))?;
                self.play_card(state, player, card, mode)
            }
        };

        trace!(action = %action, next = %next.current_player(), phase = %next.phase(), "applied");
        Ok(next)
    }

    fn is_terminal(&self, state: &GameState) -> Option<RoundOutcome> {
        match state.phase() {
            Phase::Done => Some(RoundOutcome::Played),
            Phase::Bidding => match state.auction().map(|a| a.stage) {
                Some(AuctionStage::AllPassed) => Some(RoundOutcome::Redeal),
                _ => None,
            },
            Phase::Playing => None,
        }
    }
}
