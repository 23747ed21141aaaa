//! # baloot-engine
//!
//! A pure, replayable state machine for one round of four-player Baloot.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `apply(state, action)` returns a new snapshot or a
//!    typed error. Nothing is mutated, nothing is random, nothing is I/O.
//!
//! 2. **Rules As Configuration**: rank ladders, trump obligations, the opening
//!    leader and the Ashkal bid are named settings in `RulesConfig`, not
//!    hardcoded choices.
//!
//! 3. **Cheap Snapshots**: hands and trick history are `im` persistent
//!    structures, so every step of a round can be kept for replay, undo, or
//!    solver branching.
//!
//! ## Modules
//!
//! - `core`: cards, seats, actions, deals, snapshots, configuration, errors
//! - `rules`: `RulesEngine` trait and `BalootRules` (auction, play, tricks)
//! - `replay`: pure fold, memoized `Timeline`, saved-game wire records
//! - `scoring`: card points, settlement, projects

pub mod core;
pub mod replay;
pub mod rules;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Action, ApplyError, Bid, Card, ContractChoice, Deal, GameRng, GameState, IllegalReason,
    MalformedInput, Mode, Phase, PlayingDeal, Rank, RulesConfig, Seat, Suit, Team,
};

pub use crate::replay::{state_at, GameRecord, ReplayError, Timeline};

pub use crate::rules::{BalootRules, RoundOutcome, RulesEngine};

pub use crate::scoring::{RoundScore, ScoringError};
