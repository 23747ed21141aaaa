//! Rules configuration.
//!
//! The trick-taking rules that vary between Baloot tables are explicit,
//! named settings rather than hardcoded choices:
//! - `RankLadder`: card strength order, one for plain suits and one for trump
//! - `TrumpRules`: when a player void in the led suit must trump or overtrump
//! - `OpeningLeader`: who leads the first trick after the contract is set
//! - `allow_ashkal`: whether the Ashkal bid exists
//!
//! `RulesConfig::default()` is the Saudi rule set. Configs load from TOML,
//! with any missing key taking its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::Rank;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rank ladder must list each of the 8 ranks exactly once, got {0:?}")]
    InvalidLadder(Vec<Rank>),
    #[error("failed to parse rules config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A strength order over the 8 ranks, weakest first.
///
/// ```
/// use baloot_engine::core::{Rank, RankLadder};
///
/// let trump = RankLadder::trump();
/// assert!(trump.strength(Rank::Jack) > trump.strength(Rank::Nine));
/// assert!(trump.strength(Rank::Nine) > trump.strength(Rank::Ace));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rank>", into = "Vec<Rank>")]
pub struct RankLadder {
    order: [Rank; 8],
    /// Strength by natural rank index.
    strength: [u8; 8],
}

impl RankLadder {
    /// Build a ladder from ranks listed weakest to strongest.
    pub fn new(order: &[Rank]) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidLadder(order.to_vec());

        let order: [Rank; 8] = order.try_into().map_err(|_| invalid())?;
        let mut strength = [u8::MAX; 8];
        for (position, rank) in order.iter().enumerate() {
            let slot = &mut strength[rank.natural_index() as usize];
            if *slot != u8::MAX {
                return Err(invalid());
            }
            *slot = position as u8;
        }

        Ok(Self { order, strength })
    }

    /// Plain-suit order: 7 8 9 J Q K 10 A.
    #[must_use]
    pub fn plain() -> Self {
        Self::from_known([
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
            Rank::Ten,
            Rank::Ace,
        ])
    }

    /// Trump order: 7 8 Q K 10 A 9 J.
    #[must_use]
    pub fn trump() -> Self {
        Self::from_known([
            Rank::Seven,
            Rank::Eight,
            Rank::Queen,
            Rank::King,
            Rank::Ten,
            Rank::Ace,
            Rank::Nine,
            Rank::Jack,
        ])
    }

    fn from_known(order: [Rank; 8]) -> Self {
        let mut strength = [0u8; 8];
        for (position, rank) in order.iter().enumerate() {
            strength[rank.natural_index() as usize] = position as u8;
        }
        Self { order, strength }
    }

    /// Strength of a rank on this ladder (0 weakest, 7 strongest).
    #[must_use]
    pub fn strength(&self, rank: Rank) -> u8 {
        self.strength[rank.natural_index() as usize]
    }

    /// Ranks weakest to strongest.
    #[must_use]
    pub fn order(&self) -> &[Rank; 8] {
        &self.order
    }
}

impl TryFrom<Vec<Rank>> for RankLadder {
    type Error = ConfigError;

    fn try_from(value: Vec<Rank>) -> Result<Self, Self::Error> {
        RankLadder::new(&value)
    }
}

impl From<RankLadder> for Vec<Rank> {
    fn from(ladder: RankLadder) -> Self {
        ladder.order.to_vec()
    }
}

/// Obligations of a player who cannot simply follow suit in a Hokm contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TrumpRules {
    /// Void in the led suit and no trump winning yet: must play a trump if held.
    pub must_trump_when_void: bool,
    /// A trump is winning: must play a higher trump if held. Applies both when
    /// following a trump lead and when void in the led suit.
    pub must_overtrump: bool,
    /// Void in the led suit while the partner is winning: free to play anything.
    pub partner_winning_exempts: bool,
}

impl Default for TrumpRules {
    fn default() -> Self {
        Self {
            must_trump_when_void: true,
            must_overtrump: true,
            partner_winning_exempts: true,
        }
    }
}

/// Who leads the first trick once the contract is finalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningLeader {
    /// The seat that took the floor card.
    #[default]
    FloorTaker,
    /// The seat to the right of the dealer (first bidder).
    RightOfDealer,
}

/// Complete rules configuration.
///
/// ## Example
///
/// ```
/// use baloot_engine::core::{OpeningLeader, RulesConfig};
///
/// let config = RulesConfig::from_toml_str(r#"
///     opening_leader = "right_of_dealer"
///
///     [trump]
///     must_overtrump = false
/// "#).unwrap();
///
/// assert_eq!(config.opening_leader, OpeningLeader::RightOfDealer);
/// assert!(!config.trump.must_overtrump);
/// assert!(config.trump.must_trump_when_void); // defaulted
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Strength order for non-trump suits (and every suit in Sun).
    pub plain_ladder: RankLadder,
    /// Strength order for the trump suit.
    pub trump_ladder: RankLadder,
    pub trump: TrumpRules,
    pub opening_leader: OpeningLeader,
    pub allow_ashkal: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            plain_ladder: RankLadder::plain(),
            trump_ladder: RankLadder::trump(),
            trump: TrumpRules::default(),
            opening_leader: OpeningLeader::default(),
            allow_ashkal: true,
        }
    }
}

impl RulesConfig {
    /// Parse a (possibly partial) TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Set the trump obligations.
    #[must_use]
    pub fn with_trump_rules(mut self, rules: TrumpRules) -> Self {
        self.trump = rules;
        self
    }

    /// Set the opening leader.
    #[must_use]
    pub fn with_opening_leader(mut self, leader: OpeningLeader) -> Self {
        self.opening_leader = leader;
        self
    }

    /// Enable or disable the Ashkal bid.
    #[must_use]
    pub fn with_ashkal(mut self, allowed: bool) -> Self {
        self.allow_ashkal = allowed;
        self
    }

    /// Replace the trump ladder.
    #[must_use]
    pub fn with_trump_ladder(mut self, ladder: RankLadder) -> Self {
        self.trump_ladder = ladder;
        self
    }
}
