//! Memoized replay.

use tracing::debug;

use super::{state_at, ReplayError};
use crate::core::{Action, ApplyError, GameState};
use crate::rules::RulesEngine;

/// Every snapshot of a round, indexed by step.
///
/// `states[0]` is the initial snapshot and `states[i + 1]` the snapshot after
/// `actions[i]`. Snapshots share structure, so holding all of them costs
/// little more than holding the last one.
#[derive(Clone, Debug)]
pub struct Timeline {
    states: Vec<GameState>,
    actions: Vec<Action>,
}

impl Timeline {
    /// An empty timeline starting at `initial`.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            states: vec![initial],
            actions: Vec::new(),
        }
    }

    /// Apply every action of `log` to `initial`, keeping each snapshot.
    pub fn build<R: RulesEngine + ?Sized>(
        rules: &R,
        initial: GameState,
        log: &[Action],
    ) -> Result<Self, ReplayError> {
        let mut timeline = Self::new(initial);
        timeline.states.reserve(log.len());
        timeline.actions.reserve(log.len());

        for (step, action) in log.iter().enumerate() {
            timeline
                .push(rules, *action)
                .map_err(|source| ReplayError::Rejected {
                    step,
                    action: *action,
                    source,
                })?;
        }

        debug!(
            actions = timeline.len(),
            phase = %timeline.final_state().phase(),
            "timeline built"
        );
        Ok(timeline)
    }

    /// Apply one more action. On rejection the timeline is unchanged.
    pub fn push<R: RulesEngine + ?Sized>(
        &mut self,
        rules: &R,
        action: Action,
    ) -> Result<&GameState, ApplyError> {
        let next = rules.apply(self.final_state(), &action)?;
        self.states.push(next);
        self.actions.push(action);
        Ok(self.final_state())
    }

    /// Snapshot after `step` actions.
    pub fn state_at(&self, step: usize) -> Result<&GameState, ReplayError> {
        self.states.get(step).ok_or(ReplayError::StepOutOfRange {
            step,
            len: self.len(),
        })
    }

    /// Recompute a step from scratch with the pure fold.
    pub fn recompute<R: RulesEngine + ?Sized>(
        &self,
        rules: &R,
        step: usize,
    ) -> Result<GameState, ReplayError> {
        state_at(rules, self.initial(), &self.actions, step)
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn initial(&self) -> &GameState {
        &self.states[0]
    }

    #[must_use]
    pub fn final_state(&self) -> &GameState {
        // Never empty: `new` seeds the initial snapshot.
        &self.states[self.states.len() - 1]
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Snapshots in step order, starting with the initial one.
    pub fn iter(&self) -> impl Iterator<Item = &GameState> {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bid, ContractChoice, Deal, GameRng, Mode, Phase, Seat};
    use crate::rules::{BalootRules, RulesEngine};

    fn initial() -> GameState {
        GameState::from_deal(&Deal::shuffled(&mut GameRng::new(21), Seat::new(0))).unwrap()
    }

    fn log() -> Vec<Action> {
        vec![
            Action::Pass { player: Seat::new(1) },
            Action::Bid {
                player: Seat::new(2),
                bid: Bid::Sun,
            },
            Action::FinalizeContract {
                player: Seat::new(2),
                contract: ContractChoice::new(Mode::Sun, Seat::new(2)),
            },
        ]
    }

    #[test]
    fn test_build_matches_fold() {
        let rules = BalootRules::default();
        let timeline = Timeline::build(&rules, initial(), &log()).unwrap();

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.iter().count(), 4);
        for step in 0..=timeline.len() {
            let folded = state_at(&rules, &initial(), &log(), step).unwrap();
            assert_eq!(timeline.state_at(step).unwrap(), &folded);
            assert_eq!(timeline.recompute(&rules, step).unwrap(), folded);
        }
        assert_eq!(timeline.final_state().phase(), Phase::Playing);
        assert!(timeline.state_at(4).is_err());
    }

    #[test]
    fn test_push_rejection_keeps_timeline() {
        let rules = BalootRules::default();
        let mut timeline = Timeline::new(initial());

        let bad = Action::Pass { player: Seat::new(3) };
        assert!(timeline.push(&rules, bad).is_err());
        assert!(timeline.is_empty());

        let good = rules.legal_actions(timeline.final_state())[0];
        timeline.push(&rules, good).unwrap();
        assert_eq!(timeline.actions(), &[good]);
    }

    #[test]
    fn test_build_reports_step() {
        let rules = BalootRules::default();
        let mut actions = log();
        actions.insert(1, Action::Pass { player: Seat::new(1) });

        let err = Timeline::build(&rules, initial(), &actions).unwrap_err();
        assert!(matches!(err, ReplayError::Rejected { step: 1, .. }));
    }
}
