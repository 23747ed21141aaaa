//! Card-play obligations.
//!
//! Every play is governed by exactly one `Obligation`, computed from the hand,
//! the live trick, the contract mode, and the configured `TrumpRules`. The
//! obligation yields both the legal cards and, for a rejected card, the
//! reason it was rejected.

use im::Vector;

use super::trick::{current_winner, trump_beats};
use crate::core::{Card, IllegalReason, Mode, Play, RulesConfig, Seat, Suit};

/// What the player to act is required to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Obligation {
    /// Any card in hand.
    Free,
    /// A card of the led suit.
    Follow(Suit),
    /// A trump stronger than the winning trump.
    Overtrump { trump: Suit, over: Card },
    /// Any trump.
    Trump(Suit),
}

impl Obligation {
    /// Whether `card` satisfies this obligation.
    #[must_use]
    pub fn allows(self, card: Card, config: &RulesConfig) -> bool {
        match self {
            Obligation::Free => true,
            Obligation::Follow(suit) | Obligation::Trump(suit) => card.suit() == suit,
            Obligation::Overtrump { trump, over } => {
                card.suit() == trump && trump_beats(card, over, config)
            }
        }
    }

    /// Why a card that does not satisfy this obligation was rejected.
    #[must_use]
    pub fn violation(self) -> Option<IllegalReason> {
        match self {
            Obligation::Free => None,
            Obligation::Follow(suit) => Some(IllegalReason::MustFollowSuit(suit)),
            Obligation::Overtrump { .. } => Some(IllegalReason::MustOvertrump),
            Obligation::Trump(_) => Some(IllegalReason::MustTrump),
        }
    }
}

/// Compute the obligation of `seat` holding `hand` facing the live `trick`.
#[must_use]
pub fn obligation(
    hand: &Vector<Card>,
    trick: &[Play],
    seat: Seat,
    mode: Mode,
    config: &RulesConfig,
) -> Obligation {
    let Some(lead) = trick.first() else {
        return Obligation::Free;
    };
    let led = lead.card.suit();
    let trump = mode.trump();
    let rules = config.trump;

    let holds_higher_trump = |trump: Suit, over: Card| {
        hand.iter()
            .any(|&c| c.suit() == trump && trump_beats(c, over, config))
    };

    if hand.iter().any(|c| c.suit() == led) {
        // On a trump lead, following suit means overtrumping when possible.
        if trump == Some(led) && rules.must_overtrump {
            if let Some(winner) = current_winner(trick, mode, config) {
                if holds_higher_trump(led, winner.card) {
                    return Obligation::Overtrump {
                        trump: led,
                        over: winner.card,
                    };
                }
            }
        }
        return Obligation::Follow(led);
    }

    let Some(trump) = trump else {
        return Obligation::Free;
    };
    if !hand.iter().any(|c| c.suit() == trump) {
        return Obligation::Free;
    }

    let Some(winner) = current_winner(trick, mode, config) else {
        return Obligation::Free;
    };
    if rules.partner_winning_exempts && winner.seat == seat.partner() {
        return Obligation::Free;
    }

    if winner.card.suit() == trump {
        if rules.must_overtrump && holds_higher_trump(trump, winner.card) {
            return Obligation::Overtrump {
                trump,
                over: winner.card,
            };
        }
        return Obligation::Free;
    }

    if rules.must_trump_when_void {
        Obligation::Trump(trump)
    } else {
        Obligation::Free
    }
}

/// Cards in `hand` that satisfy `obligation`, in hand order.
#[must_use]
pub fn legal_cards(hand: &Vector<Card>, obligation: Obligation, config: &RulesConfig) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|&c| obligation.allows(c, config))
        .collect()
}
