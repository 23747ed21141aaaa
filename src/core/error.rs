//! Error types for the transition function and input validation.
//!
//! Two kinds of failure reach callers of `apply`:
//! - `IllegalReason`: a well-formed action that the rules do not allow now.
//! - `MalformedInput`: structurally invalid input (bad seat index, unknown
//!   card code, missing payload field, inconsistent deal).
//!
//! Neither ever touches an existing snapshot.

use thiserror::Error;

use super::action::{Action, Bid};
use super::card::{Card, Suit};
use super::seat::Seat;
use super::state::Phase;

/// Why a well-formed action was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalReason {
    #[error("the round is over")]
    RoundOver,
    #[error("action not allowed during {phase}")]
    WrongPhase { phase: Phase },
    #[error("{expected} is to act, not {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("must follow {0}")]
    MustFollowSuit(Suit),
    #[error("must play trump")]
    MustTrump,
    #[error("must overtrump")]
    MustOvertrump,
    #[error("{0} bid not allowed here")]
    BidNotAllowed(Bid),
    #[error("bidding is closed; the contract must be finalized")]
    AuctionClosed,
    #[error("bidding is still open")]
    AuctionOpen,
    #[error("contract does not match the standing bid")]
    ContractMismatch,
}

/// Structurally invalid input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedInput {
    #[error("seat index {0} out of range")]
    BadSeat(u8),
    #[error("unknown card code {0:?}")]
    UnknownCard(String),
    #[error("unknown suit code {0:?}")]
    UnknownSuit(String),
    #[error("unknown action type {0:?}")]
    UnknownActionKind(String),
    #[error("{kind} is missing field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("unknown contract mode {0:?}")]
    UnknownMode(String),
    #[error("Sun contract cannot carry a trump suit")]
    SunWithTrump,
    #[error("card {0} dealt more than once")]
    DuplicateCard(Card),
    #[error("hands must hold equal card counts, got {0:?}")]
    UnevenHands([usize; 4]),
    #[error("deal holds {0} cards, which cannot be split between four hands")]
    BadCardTotal(usize),
    #[error("record version {0} is not supported")]
    UnsupportedVersion(u32),
}

/// Failure of the transition function.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("illegal action `{action}`: {reason}")]
    Illegal { action: Action, reason: IllegalReason },
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),
}

impl ApplyError {
    /// The rejection reason, for illegal actions.
    #[must_use]
    pub fn reason(&self) -> Option<&IllegalReason> {
        match self {
            ApplyError::Illegal { reason, .. } => Some(reason),
            ApplyError::Malformed(_) => None,
        }
    }
}
