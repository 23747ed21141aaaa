//! Converting card points and projects into round score units.
//!
//! The declaring team (the team that won the auction) is compared against the
//! defenders. The defenders' raw points are rounded to tens and scaled; the
//! declarers get the remainder of the round total. Defenders who out-point
//! the declarers take everything.

use super::points::TeamPoints;
use crate::core::{Mode, Team};

/// Round total in score units for Sun.
pub const SUN_TOTAL: u16 = 26;
/// Round total in score units for Hokm.
pub const HOKM_TOTAL: u16 = 16;
/// Declarers' score when the defenders took no card points in Sun.
pub const SUN_SWEEP: u16 = 44;
/// Declarers' score when the defenders took no card points in Hokm.
pub const HOKM_SWEEP: u16 = 25;

/// Round total in score units.
#[must_use]
pub const fn round_total(mode: Mode) -> u16 {
    match mode {
        Mode::Sun => SUN_TOTAL,
        Mode::Hokm(_) => HOKM_TOTAL,
    }
}

/// Round to tens: a last digit of 5 or more rounds up.
#[must_use]
pub const fn round_to_tens(raw: u16) -> u16 {
    let remainder = raw % 10;
    if remainder >= 5 {
        raw + (10 - remainder)
    } else {
        raw - remainder
    }
}

fn award(team: Team, score: u16) -> TeamPoints {
    let mut out = [0; 2];
    out[team.index()] = score;
    out
}

/// Settle a round on card points alone.
///
/// ```
/// use baloot_engine::core::{Mode, Suit, Team};
/// use baloot_engine::scoring::settle_cards;
///
/// // Defenders' 44 rounds down to 40: 4 units, the declarers keep 12.
/// assert_eq!(settle_cards([118, 44], Team::EVEN, Mode::Hokm(Suit::Spades)), [12, 4]);
///
/// // In Sun the defenders' tens are doubled: 35 -> 40 -> 8 units.
/// assert_eq!(settle_cards([95, 35], Team::EVEN, Mode::Sun), [18, 8]);
/// ```
#[must_use]
pub fn settle_cards(points: TeamPoints, declarers: Team, mode: Mode) -> TeamPoints {
    let defenders = declarers.opponent();
    let declarer_raw = points[declarers.index()];
    let defender_raw = points[defenders.index()];

    if defender_raw == 0 {
        let sweep = match mode {
            Mode::Sun => SUN_SWEEP,
            Mode::Hokm(_) => HOKM_SWEEP,
        };
        return award(declarers, sweep);
    }

    let total = round_total(mode);
    let tens = round_to_tens(defender_raw) / 10;
    let defender_base = match mode {
        Mode::Sun => tens * 2,
        Mode::Hokm(_) => tens,
    }
    .min(total);
    let declarer_base = total - defender_base;

    if defender_raw > declarer_raw {
        return award(defenders, total);
    }

    // An 8|8 split in Hokm goes to whoever has more raw points.
    if mode.trump().is_some() && defender_base == 8 && declarer_base == 8 && declarer_raw > defender_raw {
        return award(declarers, total);
    }

    let mut out = [0; 2];
    out[defenders.index()] = defender_base;
    out[declarers.index()] = declarer_base;
    out
}

/// Projects awarded to a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectBonus {
    pub team: Team,
    pub units: u16,
}

/// Add projects to a card settlement.
///
/// Projects count only if the winning team took at least one trick. If the
/// defenders then out-score the declarers, they take the round total plus
/// every project awarded.
#[must_use]
pub fn finalize_with_projects(
    base: TeamPoints,
    mode: Mode,
    declarers: Team,
    projects: Option<ProjectBonus>,
    tricks: [u8; 2],
) -> TeamPoints {
    let mut scores = base;

    if let Some(bonus) = projects {
        if bonus.units > 0 && tricks[bonus.team.index()] > 0 {
            scores[bonus.team.index()] += bonus.units;
        }
    }

    let defenders = declarers.opponent();
    if scores[defenders.index()] > scores[declarers.index()] {
        let projects_awarded = (scores[0] + scores[1]).saturating_sub(round_total(mode));
        return award(defenders, round_total(mode) + projects_awarded);
    }

    scores
}
