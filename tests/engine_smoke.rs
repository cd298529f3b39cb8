//! End-to-end smoke tests through the crate's public surface only.

use cutlass::{
    Action, ActionKind, CardId, CardRef, GameState, PlayerId, PlaySource, TurnPhase, apply_action,
    create_initial_state_seeded, get_visible_state, is_round_ended,
};

fn step(st: &GameState, seat: u8, kind: ActionKind) -> GameState {
    apply_action(st, &Action::new(PlayerId(seat), kind)).state
}

#[test]
fn scripted_opening_turns() {
    let mut st = create_initial_state_seeded(3, 77);
    st.venues.clear();
    assert_eq!(st.phase, TurnPhase::Draw);
    assert!(!is_round_ended(&st));

    let mut st = step(&st, 0, ActionKind::Draw);
    assert_eq!(st.phase, TurnPhase::Choose);

    // Pin the hand so the play is deterministic: protect, pass the turn.
    st.players[0].hand = Some(CardId(4));
    st.players[0].drawn = Some(CardId(16));
    let st = step(&st, 0, ActionKind::PlayCard {
        which: PlaySource::Hand,
    });
    assert!(st.players[0].protected);
    assert_eq!(st.turn_index, 1);
    assert_eq!(st.discard.last(), Some(&CardRef::Plain(CardId(4))));

    let st = step(&st, 1, ActionKind::Draw);
    assert_eq!(st.phase, TurnPhase::Choose);
    assert_eq!(st.stats[1].survival_turns, 1);
}

#[test]
fn redaction_hides_exactly_the_other_hands() {
    let st = create_initial_state_seeded(4, 78);
    for viewer in 0..4u8 {
        let vs = get_visible_state(&st, PlayerId(viewer));
        for (i, p) in vs.players.iter().enumerate() {
            if i == viewer as usize {
                assert_eq!(p.hand, st.players[i].hand);
            } else {
                assert!(p.hand.is_none());
            }
        }
    }
}

#[cfg(feature = "serialization")]
#[test]
fn state_survives_a_json_round_trip() {
    let st = create_initial_state_seeded(3, 79);
    let json = serde_json::to_string(&st).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.deck, st.deck);
    assert_eq!(back.players, st.players);
    assert_eq!(back.venues, st.venues);
    assert_eq!(back.chest_left, st.chest_left);
    assert_eq!(back.log, st.log);
}

#[cfg(feature = "serialization")]
#[test]
fn actions_deserialize_from_client_json() {
    let json = r#"{"player":0,"kind":{"PlayCard":{"which":"Drawn"}}}"#;
    let action: Action = serde_json::from_str(json).unwrap();
    assert_eq!(action.player, PlayerId(0));
    assert_eq!(
        action.kind,
        ActionKind::PlayCard {
            which: PlaySource::Drawn
        }
    );
}
