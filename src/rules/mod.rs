//! Baloot rules.
//!
//! `BalootRules` implements `RulesEngine`:
//! - `auction`: bids, passes, and contract finalization
//! - `play`: what the player to act must play
//! - `trick`: trick strength and winners
//!
//! Everything configurable comes from `RulesConfig`; the engine carries no
//! other state.

pub mod auction;
pub mod engine;
pub mod play;
pub mod trick;

pub use auction::contract_choices;
pub use engine::{BalootRules, RoundOutcome, RulesEngine};
pub use play::Obligation;
pub use trick::{card_strength, current_winner, resolve_trick};
