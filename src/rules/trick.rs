//! Trick resolution.
//!
//! A card's strength within a trick depends on the led suit and the contract:
//! - any trump beats any non-trump, trumps ranked by the trump ladder;
//! - otherwise only cards of the led suit can win, ranked by the plain ladder;
//! - off-suit, non-trump cards never win.
//!
//! `current_winner` works on partial tricks, which the play obligations need
//! (partner winning, trump winning). `resolve_trick` is the completed-trick
//! entry point and the single source of truth for trick winners.

use crate::core::{Card, Mode, Play, RulesConfig, Seat, Suit, SEATS};

/// Strength of `card` in a trick led with `led`, or `None` if it cannot win.
///
/// Trumps score above every plain card.
#[must_use]
pub fn card_strength(card: Card, led: Suit, mode: Mode, config: &RulesConfig) -> Option<u8> {
    if mode.trump() == Some(card.suit()) {
        return Some(16 + config.trump_ladder.strength(card.rank()));
    }
    if card.suit() == led {
        return Some(config.plain_ladder.strength(card.rank()));
    }
    None
}

/// Whether `a` beats `b` as trumps on the trump ladder.
#[must_use]
pub fn trump_beats(a: Card, b: Card, config: &RulesConfig) -> bool {
    config.trump_ladder.strength(a.rank()) > config.trump_ladder.strength(b.rank())
}

/// The play currently winning a (possibly partial) trick.
///
/// Returns `None` for an empty trick.
#[must_use]
pub fn current_winner(plays: &[Play], mode: Mode, config: &RulesConfig) -> Option<Play> {
    let first = plays.first()?;
    let led = first.card.suit();

    let mut best = *first;
    // The led card always has a strength.
    let mut best_strength = card_strength(first.card, led, mode, config).unwrap_or(0);

    for play in &plays[1..] {
        if let Some(strength) = card_strength(play.card, led, mode, config) {
            if strength > best_strength {
                best = *play;
                best_strength = strength;
            }
        }
    }

    Some(best)
}

/// Winner of a completed trick.
#[must_use]
pub fn resolve_trick(plays: &[Play; SEATS], mode: Mode, config: &RulesConfig) -> Seat {
    // A non-empty trick always has a winner.
    current_winner(plays, mode, config).map_or(plays[0].seat, |p| p.seat)
}
