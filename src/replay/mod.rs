//! Replay: reconstructing any step of a round from its initial snapshot and
//! action log.
//!
//! `state_at` is the pure fold. `Timeline` memoizes every intermediate
//! snapshot for random access; structural sharing keeps that cheap. The
//! `record` module holds the serde wire format for saved games.

pub mod record;
pub mod timeline;

use thiserror::Error;

use crate::core::{Action, ApplyError, GameState, MalformedInput};
use crate::rules::RulesEngine;

pub use record::{ActionPayload, ActionRecord, GameRecord, InitialRecord, RECORD_VERSION};
pub use timeline::Timeline;

/// Replay failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("step {step} is past the end of a {len}-action log")]
    StepOutOfRange { step: usize, len: usize },
    #[error("action {step} (`{action}`) was rejected: {source}")]
    Rejected {
        step: usize,
        action: Action,
        source: ApplyError,
    },
    #[error("invalid record: {0}")]
    Record(#[from] MalformedInput),
}

/// The snapshot after the first `step` actions of `log`.
///
/// `step == 0` yields `initial` itself; `step == log.len()` the final
/// snapshot.
///
/// ```
/// use baloot_engine::core::{Action, Deal, GameRng, GameState, Seat};
/// use baloot_engine::replay::state_at;
/// use baloot_engine::rules::BalootRules;
///
/// let rules = BalootRules::default();
/// let initial = GameState::from_deal(&Deal::shuffled(&mut GameRng::new(5), Seat::new(0))).unwrap();
/// let log = [Action::Pass { player: Seat::new(1) }, Action::Pass { player: Seat::new(2) }];
///
/// assert_eq!(state_at(&rules, &initial, &log, 0).unwrap(), initial);
/// assert_eq!(state_at(&rules, &initial, &log, 2).unwrap().current_player(), Seat::new(3));
/// assert!(state_at(&rules, &initial, &log, 3).is_err());
/// ```
pub fn state_at<R: RulesEngine + ?Sized>(
    rules: &R,
    initial: &GameState,
    log: &[Action],
    step: usize,
) -> Result<GameState, ReplayError> {
    if step > log.len() {
        return Err(ReplayError::StepOutOfRange {
            step,
            len: log.len(),
        });
    }

    log[..step]
        .iter()
        .enumerate()
        .try_fold(initial.clone(), |state, (i, action)| {
            rules
                .apply(&state, action)
                .map_err(|source| ReplayError::Rejected {
                    step: i,
                    action: *action,
                    source,
                })
        })
}
