//! Transition function tests: turn order, trick lifecycle, rejection.

mod common;

use baloot_engine::core::{
    Action, ApplyError, GameState, IllegalReason, InvariantViolation, MalformedInput, Mode, Phase,
    Play, PlayingDeal, Seat, Suit, Team,
};
use baloot_engine::rules::{BalootRules, Obligation, RoundOutcome, RulesEngine};

use common::{apply_all, card, hands, init_tracing, play, playing_state};

/// Sun round: seat 0 leads spades, everyone follows, seat 2 holds the ace.
fn sun_deal() -> PlayingDeal {
    PlayingDeal {
        dealer: Seat::new(3),
        leader: Seat::new(0),
        declarer: Seat::new(0),
        mode: Mode::Sun,
        hands: hands([
            &["KS", "7H", "8D"],
            &["7S", "9H", "TD"],
            &["AS", "JH", "QD"],
            &["QS", "AH", "9D"],
        ]),
    }
}

#[test]
fn test_end_to_end_trick() {
    init_tracing();
    let rules = BalootRules::default();
    let start = playing_state(sun_deal());

    let trick = [play(0, "KS"), play(1, "7S"), play(2, "AS"), play(3, "QS")];
    let state = apply_all(&rules, &start, &trick);

    assert_eq!(state.tricks_won()[Seat::new(2)], 1);
    assert_eq!(state.team_tricks(Team::EVEN), 1);
    assert_eq!(state.current_player(), Seat::new(2));
    assert!(state.trick_complete());
    for code in ["KS", "7S", "AS", "QS"] {
        assert!(Seat::all().all(|s| !state.hand(s).contains(&card(code))));
    }

    let next = rules.apply(&state, &play(2, "JH")).unwrap();
    assert_eq!(next.trick(), &[Play::new(Seat::new(2), card("JH"))]);
    assert!(!next.trick_complete());
}

#[test]
fn test_turn_order_within_trick() {
    let rules = BalootRules::default();
    let mut state = playing_state(sun_deal());

    for (seat, code) in [(0, "KS"), (1, "7S"), (2, "AS")] {
        state = rules.apply(&state, &play(seat, code)).unwrap();
        assert_eq!(state.current_player(), Seat::new(seat).next());
        assert!(!state.trick_complete());
    }
}

#[test]
fn test_follow_suit_rejection_leaves_snapshot() {
    let rules = BalootRules::default();
    let state = rules.apply(&playing_state(sun_deal()), &play(0, "KS")).unwrap();
    let before = state.clone();

    let err = rules.apply(&state, &play(1, "9H")).unwrap_err();
    assert_eq!(err.reason(), Some(&IllegalReason::MustFollowSuit(Suit::Spades)));
    assert_eq!(state, before);
    assert_eq!(rules.obligation(&state), Some(Obligation::Follow(Suit::Spades)));
}

#[test]
fn test_card_not_in_hand() {
    let rules = BalootRules::default();
    let state = playing_state(sun_deal());
    let err = rules.apply(&state, &play(0, "AS")).unwrap_err();
    assert_eq!(err.reason(), Some(&IllegalReason::CardNotInHand(card("AS"))));
}

#[test]
fn test_full_round_reaches_done() {
    let rules = BalootRules::default();
    let log = [
        play(0, "KS"),
        play(1, "7S"),
        play(2, "AS"),
        play(3, "QS"),
        // Seat 2 leads hearts; ace wins.
        play(2, "JH"),
        play(3, "AH"),
        play(0, "7H"),
        play(1, "9H"),
        // Seat 3 leads diamonds; ten wins.
        play(3, "9D"),
        play(0, "8D"),
        play(1, "TD"),
        play(2, "QD"),
    ];
    let state = apply_all(&rules, &playing_state(sun_deal()), &log);

    assert_eq!(state.phase(), Phase::Done);
    assert_eq!(rules.is_terminal(&state), Some(RoundOutcome::Played));
    assert_eq!(state.cards_in_hands(), 0);
    assert_eq!(state.completed_tricks().len(), 3);
    let winners: Vec<Seat> = state.completed_tricks().iter().map(|t| t.winner).collect();
    assert_eq!(winners, [Seat::new(2), Seat::new(3), Seat::new(1)]);
    assert!(rules.legal_actions(&state).is_empty());
}

#[test]
fn test_hokm_trump_wins_and_obligations() {
    let rules = BalootRules::default();
    let deal = PlayingDeal {
        dealer: Seat::new(0),
        leader: Seat::new(1),
        declarer: Seat::new(1),
        mode: Mode::Hokm(Suit::Clubs),
        hands: hands([
            &["7C", "JC", "8H"],
            &["AS", "KH", "7D"],
            &["9S", "QH", "8D"],
            &["TS", "9C", "AD"],
        ]),
    };
    let start = playing_state(deal);
    let state = apply_all(&rules, &start, &[play(1, "AS"), play(2, "9S"), play(3, "TS")]);

    // Seat 0 is void in spades with an opponent winning: must trump.
    assert_eq!(rules.obligation(&state), Some(Obligation::Trump(Suit::Clubs)));
    let err = rules.apply(&state, &play(0, "8H")).unwrap_err();
    assert_eq!(err.reason(), Some(&IllegalReason::MustTrump));

    let state = rules.apply(&state, &play(0, "7C")).unwrap();
    assert_eq!(state.completed_tricks()[0].winner, Seat::new(0));
    assert_eq!(state.current_player(), Seat::new(0));
}

#[test]
fn test_legal_actions_are_all_accepted() {
    let rules = BalootRules::default();
    let state = rules.apply(&playing_state(sun_deal()), &play(0, "8D")).unwrap();

    let legal = rules.legal_actions(&state);
    assert_eq!(legal, [play(1, "TD")]);
    for action in &legal {
        assert!(rules.apply(&state, action).is_ok());
    }
}

#[test]
fn test_snapshot_json_round_trip_mid_round() {
    let rules = BalootRules::default();
    let state = apply_all(&rules, &playing_state(sun_deal()), &[play(0, "KS"), play(1, "7S")]);

    let json = serde_json::to_string(&state).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);

    // The restored snapshot continues identically.
    let action = Action::PlayCard {
        player: Seat::new(2),
        card: card("AS"),
    };
    assert_eq!(rules.apply(&back, &action), rules.apply(&state, &action));
}

#[test]
fn test_snapshots_share_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GameState>();
    assert_send_sync::<Action>();
    assert_send_sync::<BalootRules>();
    assert_send_sync::<baloot_engine::Timeline>();

    let rules = BalootRules::default();
    let state = playing_state(sun_deal());
    let handle = {
        let state = state.clone();
        std::thread::spawn(move || BalootRules::default().legal_actions(&state))
    };
    assert_eq!(handle.join().unwrap(), rules.legal_actions(&state));
}

/// A snapshot loaded from JSON with one field overwritten.
fn tampered(state: &GameState, field: &str, value: serde_json::Value) -> GameState {
    let mut json = serde_json::to_value(state).unwrap();
    json[field] = value;
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_loaded_snapshot_with_bad_seat_is_malformed() {
    let rules = BalootRules::default();
    let state = playing_state(sun_deal());
    let broken = tampered(&state, "current_player", serde_json::json!(9));

    assert_eq!(
        broken.check_invariants(),
        Err(InvariantViolation::Malformed(MalformedInput::BadSeat(9)))
    );
    assert!(rules.legal_actions(&broken).is_empty());
    assert!(rules.obligation(&broken).is_none());
    assert_eq!(
        rules.apply(&broken, &play(0, "KS")),
        Err(ApplyError::Malformed(MalformedInput::BadSeat(9)))
    );

    let bad_dealer = tampered(&state, "dealer", serde_json::json!(4));
    assert_eq!(
        rules.apply(&bad_dealer, &play(0, "KS")),
        Err(ApplyError::Malformed(MalformedInput::BadSeat(4)))
    );
}

#[test]
fn test_loaded_snapshot_out_of_turn_breaks_invariants() {
    let rules = BalootRules::default();
    let state = apply_all(&rules, &playing_state(sun_deal()), &[play(0, "KS")]);
    let broken = tampered(&state, "current_player", serde_json::json!(3));

    assert_eq!(
        broken.check_invariants(),
        Err(InvariantViolation::TurnOrder(Seat::new(3)))
    );
}
