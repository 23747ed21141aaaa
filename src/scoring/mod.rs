//! Round scoring.
//!
//! Scoring reads a finished snapshot and never changes it:
//! - `points`: card points per team, with the last-trick bonus
//! - `settlement`: card points to score units, plus the project rules
//! - `projects`: melds declared from the dealt hands

pub mod points;
pub mod projects;
pub mod settlement;

use thiserror::Error;
use tracing::debug;

use crate::core::{Card, GameState, MalformedInput, Mode, Phase, Seat, SeatMap, Team};

pub use points::{card_points, team_points, team_tricks, TeamPoints, LAST_TRICK_BONUS};
pub use projects::{best_melds, Meld, MeldKind, ProjectAward, TeamProjects};
pub use settlement::{finalize_with_projects, settle_cards, ProjectBonus};

/// Scoring errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("round is still in the {0} phase")]
    RoundNotOver(Phase),
    #[error("authority seat {0} out of range")]
    BadSeat(u8),
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
}

/// The hands as dealt: cards still held plus cards already played.
///
/// After the contract is finalized this is each seat's full hand.
#[must_use]
pub fn dealt_hands(state: &GameState) -> SeatMap<Vec<Card>> {
    let mut hands = state.hands().map(|_, h| h.iter().copied().collect::<Vec<_>>());
    let played = state
        .completed_tricks()
        .iter()
        .flat_map(|t| t.plays.iter())
        .chain(state.live_trick().iter());
    for play in played {
        hands[play.seat].push(play.card);
    }
    hands
}

/// Complete settlement of one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundScore {
    pub mode: Mode,
    pub declarers: Team,
    /// Card points including the last-trick bonus.
    pub card_points: TeamPoints,
    pub tricks: [u8; 2],
    /// Score from card points alone.
    pub base: TeamPoints,
    /// Winning projects, whether or not they counted.
    pub projects: Option<ProjectAward>,
    pub total: TeamPoints,
}

impl RoundScore {
    /// Settle a finished round.
    ///
    /// `authority` breaks exact ties between the teams' best projects.
    pub fn settle(state: &GameState, authority: Seat) -> Result<Self, ScoringError> {
        if !authority.is_valid() {
            return Err(ScoringError::BadSeat(authority.0));
        }
        state.validate_seats()?;
        let contract = match (state.phase(), state.contract()) {
            (Phase::Done, Some(contract)) => *contract,
            _ => return Err(ScoringError::RoundNotOver(state.phase())),
        };

        let mode = contract.mode;
        let declarers = contract.declarer.team();
        let card_points = team_points(state.completed_tricks(), mode);
        let tricks = team_tricks(state.completed_tricks());
        let base = settle_cards(card_points, declarers, mode);

        let projects = ProjectAward::settle(&dealt_hands(state), mode, authority);
        let total = finalize_with_projects(
            base,
            mode,
            declarers,
            projects.as_ref().map(ProjectAward::bonus),
            tricks,
        );

        debug!(
            mode = %mode,
            declarers = %declarers,
            points = ?card_points,
            total = ?total,
            "round settled"
        );

        Ok(Self {
            mode,
            declarers,
            card_points,
            tricks,
            base,
            projects,
            total,
        })
    }
}
