//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use baloot_engine::core::{Action, Card, GameState, PlayingDeal, Seat, SeatMap};
use baloot_engine::rules::{BalootRules, RulesEngine};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then `warn`.
pub fn init_tracing() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn card(code: &str) -> Card {
    code.parse().unwrap()
}

pub fn cards(codes: &[&str]) -> Vec<Card> {
    codes.iter().map(|c| card(c)).collect()
}

pub fn hands(codes: [&[&str]; 4]) -> SeatMap<Vec<Card>> {
    SeatMap::from_array(codes.map(cards))
}

pub fn play(seat: u8, code: &str) -> Action {
    Action::PlayCard {
        player: Seat::new(seat),
        card: card(code),
    }
}

pub fn playing_state(deal: PlayingDeal) -> GameState {
    GameState::from_playing_deal(&deal).unwrap()
}

/// Apply every action, checking invariants after each step.
pub fn apply_all(rules: &BalootRules, start: &GameState, actions: &[Action]) -> GameState {
    let mut state = start.clone();
    for action in actions {
        state = rules
            .apply(&state, action)
            .unwrap_or_else(|e| panic!("{action} rejected: {e}"));
        state.check_invariants().unwrap();
    }
    state
}

/// Play out a round, always taking the legal action at `pick(len)`.
/// Returns the log and the final snapshot.
pub fn play_out(
    rules: &BalootRules,
    start: &GameState,
    mut pick: impl FnMut(usize) -> usize,
) -> (Vec<Action>, GameState) {
    let mut state = start.clone();
    let mut log = Vec::new();

    while rules.is_terminal(&state).is_none() {
        let legal = rules.legal_actions(&state);
        assert!(!legal.is_empty(), "no legal actions in a live round");
        let action = legal[pick(legal.len()) % legal.len()];
        state = rules.apply(&state, &action).unwrap();
        log.push(action);
    }

    (log, state)
}
