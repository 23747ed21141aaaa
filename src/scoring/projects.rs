//! Projects (melds) held in the dealt hands.
//!
//! Two kinds count:
//! - sequences of 3, 4, or 5 consecutive cards of one suit, in natural
//!   order 7 8 9 10 J Q K A;
//! - four of a kind in tens, jacks, queens, kings, or aces.
//!
//! Each hand declares its best non-overlapping set; melds never combine
//! cards across hands. The team holding the single best meld wins the
//! projects and scores all of its members' melds.

use smallvec::SmallVec;

use super::settlement::ProjectBonus;
use crate::core::{Card, Mode, Rank, Seat, SeatMap, Suit, Team};

/// Kind of meld.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeldKind {
    /// Consecutive cards of one suit ending at `top`.
    Sequence { suit: Suit, len: u8, top: Rank },
    /// All four cards of one rank.
    Four(Rank),
}

/// A meld held in a single hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meld {
    pub kind: MeldKind,
    pub owner: Seat,
    /// Score units under the contract mode.
    pub units: u16,
    pub cards: SmallVec<[Card; 5]>,
}

impl Meld {
    /// Tie-break among melds worth the same units. Sequences compare by top
    /// card then length, fours by rank.
    #[must_use]
    pub fn strength(&self) -> (u8, u8) {
        match self.kind {
            MeldKind::Sequence { len, top, .. } => (top.natural_index(), len),
            MeldKind::Four(rank) => (rank.natural_index() - Rank::Ten.natural_index(), 0),
        }
    }

    /// Ordering key between melds: units, then strength.
    #[must_use]
    pub fn key(&self) -> (u16, (u8, u8)) {
        (self.units, self.strength())
    }

    fn mask(&self) -> u32 {
        self.cards.iter().fold(0, |m, &c| m | card_bit(c))
    }
}

fn card_bit(card: Card) -> u32 {
    1 << (card.suit() as u32 * 8 + u32::from(card.rank().natural_index()))
}

/// Units for a sequence of `len` cards.
#[must_use]
pub fn sequence_units(mode: Mode, len: u8) -> u16 {
    match (mode, len) {
        (Mode::Sun, 3) => 4,
        (Mode::Sun, 4) => 10,
        (Mode::Sun, 5) => 20,
        (Mode::Hokm(_), 3) => 2,
        (Mode::Hokm(_), 4) => 5,
        (Mode::Hokm(_), 5) => 10,
        _ => 0,
    }
}

/// Units for four of a kind; zero for ranks below ten.
#[must_use]
pub fn four_units(mode: Mode, rank: Rank) -> u16 {
    match (mode, rank) {
        (_, Rank::Seven | Rank::Eight | Rank::Nine) => 0,
        (Mode::Sun, Rank::Ace) => 40,
        (Mode::Sun, _) => 20,
        (Mode::Hokm(_), _) => 10,
    }
}

/// Every meld that fits inside `hand`, overlapping ones included.
#[must_use]
pub fn meld_candidates(hand: &[Card], owner: Seat, mode: Mode) -> Vec<Meld> {
    let mut melds = Vec::new();

    for suit in Suit::ALL {
        let mut ranks: SmallVec<[Rank; 8]> = hand
            .iter()
            .filter(|c| c.suit() == suit)
            .map(|c| c.rank())
            .collect();
        ranks.sort_unstable();

        // Split into runs of consecutive ranks, then take every window.
        let mut start = 0;
        while start < ranks.len() {
            let mut end = start;
            while end + 1 < ranks.len()
                && ranks[end + 1].natural_index() == ranks[end].natural_index() + 1
            {
                end += 1;
            }
            let run = &ranks[start..=end];

            for len in [5usize, 4, 3] {
                if run.len() < len {
                    continue;
                }
                for window in run.windows(len) {
                    let top = window[len - 1];
                    melds.push(Meld {
                        kind: MeldKind::Sequence {
                            suit,
                            len: len as u8,
                            top,
                        },
                        owner,
                        units: sequence_units(mode, len as u8),
                        cards: window.iter().map(|&r| Card::new(r, suit)).collect(),
                    });
                }
            }

            start = end + 1;
        }
    }

    for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace] {
        let cards: SmallVec<[Card; 5]> = hand.iter().copied().filter(|c| c.rank() == rank).collect();
        let units = four_units(mode, rank);
        if cards.len() == 4 && units > 0 {
            melds.push(Meld {
                kind: MeldKind::Four(rank),
                owner,
                units,
                cards,
            });
        }
    }

    melds
}

/// Ranking of a meld selection: total units, then meld values, then meld
/// strengths, the latter two listed best first.
type SelectionKey = (u16, Vec<u16>, Vec<(u8, u8)>);

fn selection_key(melds: &[&Meld]) -> SelectionKey {
    (
        melds.iter().map(|m| m.units).sum(),
        melds.iter().map(|m| m.units).collect(),
        melds.iter().map(|m| m.strength()).collect(),
    )
}

/// The best non-overlapping set of melds in one hand, strongest first.
#[must_use]
pub fn best_melds(hand: &[Card], owner: Seat, mode: Mode) -> Vec<Meld> {
    let mut candidates = meld_candidates(hand, owner, mode);
    // Sorting up front keeps every selection ordered best first.
    candidates.sort_by(|a, b| b.key().cmp(&a.key()));

    let mut best: Option<(SelectionKey, Vec<usize>)> = None;
    let mut chosen = Vec::new();
    search(&candidates, 0, 0, &mut chosen, &mut best);

    best.map(|(_, picks)| picks.into_iter().map(|i| candidates[i].clone()).collect())
        .unwrap_or_default()
}

fn search(
    candidates: &[Meld],
    next: usize,
    used: u32,
    chosen: &mut Vec<usize>,
    best: &mut Option<(SelectionKey, Vec<usize>)>,
) {
    if next == candidates.len() {
        let melds: Vec<&Meld> = chosen.iter().map(|&i| &candidates[i]).collect();
        let key = selection_key(&melds);
        if best.as_ref().map_or(true, |(k, _)| key > *k) {
            *best = Some((key, chosen.clone()));
        }
        return;
    }

    let mask = candidates[next].mask();
    if used & mask == 0 {
        chosen.push(next);
        search(candidates, next + 1, used | mask, chosen, best);
        chosen.pop();
    }
    search(candidates, next + 1, used, chosen, best);
}

/// A team's declared projects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamProjects {
    pub units: u16,
    pub melds: Vec<Meld>,
}

impl TeamProjects {
    /// Best melds of both members, each hand on its own.
    #[must_use]
    pub fn declare(hands: &SeatMap<Vec<Card>>, team: Team, mode: Mode) -> Self {
        let melds: Vec<Meld> = team
            .members()
            .iter()
            .flat_map(|&seat| best_melds(&hands[seat], seat, mode))
            .collect();
        Self {
            units: melds.iter().map(|m| m.units).sum(),
            melds,
        }
    }

    /// The single strongest meld.
    #[must_use]
    pub fn top(&self) -> Option<&Meld> {
        self.melds.iter().max_by_key(|m| m.key())
    }
}

/// Which team wins the projects, if either has any.
///
/// The team with the better top meld wins; an exact tie goes to the team of
/// the `authority` seat.
#[must_use]
pub fn projects_winner(even: &TeamProjects, odd: &TeamProjects, authority: Seat) -> Option<Team> {
    match (even.top(), odd.top()) {
        (None, None) => None,
        (Some(_), None) => Some(Team::EVEN),
        (None, Some(_)) => Some(Team::ODD),
        (Some(a), Some(b)) => Some(match a.key().cmp(&b.key()) {
            std::cmp::Ordering::Greater => Team::EVEN,
            std::cmp::Ordering::Less => Team::ODD,
            std::cmp::Ordering::Equal => authority.team(),
        }),
    }
}

/// Projects of the winning team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectAward {
    pub team: Team,
    pub projects: TeamProjects,
}

impl ProjectAward {
    /// Declare both teams' projects and pick the winner.
    #[must_use]
    pub fn settle(hands: &SeatMap<Vec<Card>>, mode: Mode, authority: Seat) -> Option<Self> {
        let even = TeamProjects::declare(hands, Team::EVEN, mode);
        let odd = TeamProjects::declare(hands, Team::ODD, mode);

        let team = projects_winner(&even, &odd, authority)?;
        let projects = if team == Team::EVEN { even } else { odd };
        Some(Self { team, projects })
    }

    #[must_use]
    pub fn bonus(&self) -> ProjectBonus {
        ProjectBonus {
            team: self.team,
            units: self.projects.units,
        }
    }
}
