//! The action dispatcher: one pure transition per client intent.
//!
//! [`apply_action`] clones the input state, applies the action to the
//! clone, and returns it with the notifications the session layer should
//! fan out. Illegal or out-of-turn actions return the clone unchanged;
//! the engine never panics on bad input.

use crate::action::{Action, ActionKind, PlaySource};
use crate::card::{is_high_tail, label, tail};
use crate::decision;
use crate::effect::{COMPANION_CARD, FORCED_CARD, FORCING_CARDS};
use crate::executor;
use crate::game_state::{CardRef, GameState, TurnPhase};
use crate::ids::{CardId, PlayerId};
use crate::notification::{Event, Notification};
use crate::round;
use crate::score;
use crate::turn::{check_hot, end_or_next, next_alive_idx};

/// The outcome of one transition.
#[derive(Debug, Clone)]
pub struct ApplyResult {
    pub state: GameState,
    pub notifications: Vec<Notification>,
}

/// Apply one action to a state and return the successor state plus the
/// notifications it produced. The input state is never touched.
pub fn apply_action(state: &GameState, action: &Action) -> ApplyResult {
    let mut st = state.clone();
    let mut emits = Vec::new();

    if st.player(action.player).is_none() {
        return ApplyResult {
            state: st,
            notifications: emits,
        };
    }

    match &action.kind {
        ActionKind::StartRound => {
            if st.phase == TurnPhase::Ended && st.season_final.is_none() {
                round::deal_next_round(&mut st, &mut emits);
            }
        }
        ActionKind::Draw => handle_draw(&mut st, action.player, &mut emits),
        ActionKind::PlayCard { which } => handle_play(&mut st, action.player, *which, &mut emits),
        _ => decision::resolve(&mut st, action, &mut emits),
    }

    ApplyResult {
        state: st,
        notifications: emits,
    }
}

/// Hand the draw-phase turn to the next living seat without drawing.
fn pass_without_draw(st: &mut GameState, emits: &mut Vec<Notification>) {
    let next = next_alive_idx(st, st.turn_index);
    st.turn_index = next;
    st.phase = TurnPhase::Draw;
    st.log_line(
        format!("{}'s turn.", st.seat_name(PlayerId::from_index(next))),
        emits,
    );
}

fn handle_draw(st: &mut GameState, actor: PlayerId, emits: &mut Vec<Notification>) {
    if st.phase != TurnPhase::Draw || actor.index() != st.turn_index {
        return;
    }

    st.turn_silence = false;
    st.current_turn_owner = st.turn_index;
    for k in st.turn_kills.iter_mut() {
        *k = 0;
    }
    if let Some(p) = st.player_mut(actor) {
        p.protected = false;
    }

    let alive = st.player(actor).is_some_and(|p| p.alive);
    if !alive {
        st.log_line(
            format!("{} is out; the turn passes.", st.seat_name(actor)),
            emits,
        );
        pass_without_draw(st, emits);
        return;
    }

    if st.silence_window == Some(actor) {
        st.silence_window = None;
        st.log_line("The silence lifts.", emits);
    }
    if st.infection_window == Some(actor) {
        st.infection_window = None;
        st.log_line("The plague burns itself out.", emits);
    }

    let skip = st.player(actor).is_some_and(|p| p.skip_next);
    if skip {
        if let Some(p) = st.player_mut(actor) {
            p.skip_next = false;
        }
        st.log_line(format!("{} sits this turn out.", st.seat_name(actor)), emits);
        pass_without_draw(st, emits);
        return;
    }

    if let Some(p) = st.player_mut(actor)
        && p.infected
    {
        p.infected = false;
        p.infection_armed = true;
    }

    score::survival_turn(st, actor);
    let Some(card) = st.draw_top() else {
        crate::showdown::run_showdown(st);
        return;
    };
    if let Some(p) = st.player_mut(actor) {
        p.drawn = Some(card);
    }
    check_hot(st, emits);
    st.phase = TurnPhase::Choose;
    st.log_line(format!("{} draws a card.", st.seat_name(actor)), emits);
}

fn handle_play(
    st: &mut GameState,
    actor: PlayerId,
    which: PlaySource,
    emits: &mut Vec<Notification>,
) {
    if st.phase != TurnPhase::Choose
        || actor.index() != st.turn_index
        || st.pending.is_some()
    {
        return;
    }
    let Some(p) = st.player(actor) else {
        return;
    };
    let (hand, drawn, frozen) = (p.hand, p.drawn, p.frozen);
    let chosen = match which {
        PlaySource::Hand => hand,
        PlaySource::Drawn => drawn,
    };
    let Some(played) = chosen else {
        return;
    };

    if frozen && which == PlaySource::Hand {
        st.log_line(
            format!(
                "{} is frozen and must play the drawn card.",
                st.seat_name(actor)
            ),
            emits,
        );
        return;
    }
    if let Some(p) = st.player_mut(actor) {
        p.frozen = false;
    }

    // Holding the Stormcaller alongside a Smuggler or Captain forces the
    // Stormcaller out first. A frozen play is exempt; the freeze already
    // dictated the card.
    if !frozen
        && played != FORCED_CARD
        && let (Some(a), Some(b)) = (hand, drawn)
    {
        let pair = [a, b];
        if pair.contains(&FORCED_CARD) && FORCING_CARDS.iter().any(|f| pair.contains(f)) {
            st.log_line(
                format!(
                    "{} must play {} first.",
                    st.seat_name(actor),
                    label(Some(FORCED_CARD))
                ),
                emits,
            );
            return;
        }
    }

    emits.push(Notification::all(Event::CardCue { card: played }));
    if let Some(p) = st.player_mut(actor) {
        match which {
            PlaySource::Hand => {
                p.hand = p.drawn.take();
            }
            PlaySource::Drawn => {
                p.drawn = None;
            }
        }
    }
    st.discard.push(CardRef::Plain(played));
    st.log_line(
        format!("{} plays {}.", st.seat_name(actor), label(Some(played))),
        emits,
    );

    let enhanced = st.card_enhanced(played);
    let kept = st.player(actor).and_then(|p| p.hand);
    let cue_fires = enhanced && (played != CardId(10) || kept == Some(COMPANION_CARD));
    if cue_fires {
        emits.push(Notification::all(Event::EnhancedCue { card: played }));
    }

    // Playing an odd card inside someone else's plague window is a quiet
    // infection.
    if let Some(owner) = st.infection_window
        && owner != actor
        && tail(played) % 2 == 1
        && let Some(p) = st.player_mut(actor)
    {
        p.infected = true;
    }

    if st.silence_window.is_some() && is_high_tail(played) {
        st.log_line("The silence swallows the card.", emits);
        end_or_next(st, emits);
        return;
    }
    if st.turn_silence && played.0 >= 7 {
        st.log_line("The card fizzles in the hush.", emits);
        end_or_next(st, emits);
        return;
    }

    let armed = st.player(actor).is_some_and(|p| p.infection_armed);
    if armed {
        if tail(played) % 2 == 1 {
            st.log_line(
                format!("The plague claims {}.", st.seat_name(actor)),
                emits,
            );
            st.eliminate(actor, "succumbed to the plague", actor, emits);
            end_or_next(st, emits);
            return;
        }
        if let Some(p) = st.player_mut(actor) {
            p.infection_armed = false;
        }
    }

    executor::execute_play(st, actor, played, enhanced, emits);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::create_initial_state_seeded;

    fn drawn_state(seed: u64) -> GameState {
        let st = create_initial_state_seeded(3, seed);
        apply_action(&st, &Action::new(PlayerId(0), ActionKind::Draw)).state
    }

    #[test]
    fn test_apply_action_leaves_input_untouched() {
        let st = create_initial_state_seeded(3, 2);
        let before = st.clone();
        let _ = apply_action(&st, &Action::new(PlayerId(0), ActionKind::Draw));
        assert_eq!(st.players, before.players);
        assert_eq!(st.deck, before.deck);
        assert_eq!(st.phase, before.phase);
    }

    #[test]
    fn test_draw_out_of_turn_is_a_no_op() {
        let st = create_initial_state_seeded(3, 2);
        let res = apply_action(&st, &Action::new(PlayerId(1), ActionKind::Draw));
        assert_eq!(res.state.phase, TurnPhase::Draw);
        assert!(res.state.players[1].drawn.is_none());
        assert!(res.notifications.is_empty());
    }

    #[test]
    fn test_draw_fills_the_second_slot() {
        let st = drawn_state(2);
        assert!(st.players[0].drawn.is_some());
        assert_eq!(st.phase, TurnPhase::Choose);
        assert_eq!(st.stats[0].survival_turns, 1);
    }

    #[test]
    fn test_draw_clears_own_protection_but_not_others() {
        let mut st = create_initial_state_seeded(3, 2);
        st.players[0].protected = true;
        st.players[1].protected = true;
        let res = apply_action(&st, &Action::new(PlayerId(0), ActionKind::Draw));
        assert!(!res.state.players[0].protected);
        assert!(res.state.players[1].protected);
    }

    #[test]
    fn test_skip_consumes_the_turn_without_a_draw() {
        let mut st = create_initial_state_seeded(3, 2);
        st.players[0].skip_next = true;
        let res = apply_action(&st, &Action::new(PlayerId(0), ActionKind::Draw));
        assert!(!res.state.players[0].skip_next);
        assert!(res.state.players[0].drawn.is_none());
        assert_eq!(res.state.turn_index, 1);
        assert_eq!(res.state.phase, TurnPhase::Draw);
    }

    #[test]
    fn test_play_moves_card_to_discard_and_keeps_one() {
        let mut st = drawn_state(2);
        st.players[0].hand = Some(CardId(2));
        st.players[0].drawn = Some(CardId(4));
        let discard_before = st.discard.len();
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Drawn,
                },
            ),
        );
        assert_eq!(res.state.discard.len(), discard_before + 1);
        assert_eq!(res.state.players[0].hand, Some(CardId(2)));
        assert!(res.state.players[0].drawn.is_none());
    }

    #[test]
    fn test_frozen_seat_must_play_the_drawn_card() {
        let mut st = drawn_state(2);
        st.players[0].frozen = true;
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Hand,
                },
            ),
        );
        assert_eq!(res.state.discard.len(), st.discard.len());
        assert!(res.state.players[0].frozen);
    }

    #[test]
    fn test_smuggler_is_forced_out_first() {
        let mut st = drawn_state(2);
        st.players[0].hand = Some(FORCED_CARD);
        st.players[0].drawn = Some(CardId(8));
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Drawn,
                },
            ),
        );
        assert_eq!(res.state.players[0].drawn, Some(CardId(8)));

        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Hand,
                },
            ),
        );
        assert!(res.state.players[0].hand.is_some());
        assert!(res.state.players[0].drawn.is_none());
    }

    #[test]
    fn test_silence_window_swallows_high_tails() {
        let mut st = drawn_state(2);
        st.silence_window = Some(PlayerId(2));
        st.players[0].hand = Some(CardId(9));
        st.players[0].drawn = Some(CardId(2));
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Hand,
                },
            ),
        );
        // The card is discarded but its effect never fires.
        assert!(res.state.players[0].alive);
        assert_eq!(res.state.turn_index, 1);
    }

    #[test]
    fn test_armed_infection_kills_on_an_odd_play() {
        let mut st = drawn_state(2);
        st.players[0].infection_armed = true;
        st.players[0].hand = Some(CardId(13));
        st.players[0].drawn = Some(CardId(2));
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Hand,
                },
            ),
        );
        assert!(!res.state.players[0].alive);
    }

    #[test]
    fn test_armed_infection_disarms_on_an_even_play() {
        let mut st = drawn_state(2);
        st.players[0].infection_armed = true;
        st.players[0].hand = Some(CardId(2));
        st.players[0].drawn = Some(CardId(12));
        let res = apply_action(
            &st,
            &Action::new(
                PlayerId(0),
                ActionKind::PlayCard {
                    which: PlaySource::Hand,
                },
            ),
        );
        assert!(res.state.players[0].alive);
        assert!(!res.state.players[0].infection_armed);
    }

    #[test]
    fn test_start_round_requires_an_ended_round() {
        let st = create_initial_state_seeded(3, 2);
        let res = apply_action(&st, &Action::new(PlayerId(0), ActionKind::StartRound));
        assert_eq!(res.state.round_no, 1);
    }
}
