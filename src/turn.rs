//! Turn advancement and end-of-turn bookkeeping.

use crate::game_state::{GameState, TurnPhase};
use crate::ids::PlayerId;
use crate::notification::Notification;
use crate::score;
use crate::showdown;

/// Index of the next living seat strictly after `from`, wrapping around.
/// Falls back to `from` when nobody else is alive.
pub(crate) fn next_alive_idx(st: &GameState, from: usize) -> usize {
    let n = st.players.len();
    for step in 1..=n {
        let idx = (from + step) % n;
        if st.players[idx].alive {
            return idx;
        }
    }
    from
}

/// Latch the low-deck warning once the draw pile reaches the threshold.
pub(crate) fn check_hot(st: &mut GameState, emits: &mut Vec<Notification>) {
    if !st.hot_notified && st.deck.len() <= st.hot_threshold {
        st.hot_notified = true;
        st.log_line(
            format!("The deck is running hot: {} cards left.", st.deck.len()),
            emits,
        );
    }
}

/// Close out the current turn: declare a last-player-standing winner, run
/// the showdown on an empty deck, or hand the turn to the next living seat.
pub(crate) fn end_or_next(st: &mut GameState, emits: &mut Vec<Notification>) {
    st.pending = None;
    check_hot(st, emits);

    if st.alive_count() <= 1 {
        let winner = st.players.iter().find(|p| p.alive).map(|p| p.id);
        if let Some(winner) = winner {
            st.log_line(
                format!("{} is the last one standing.", st.seat_name(winner)),
                emits,
            );
            score::award_round(st, winner, 0);
        }
        if st.phase != TurnPhase::Ended {
            st.phase = TurnPhase::Ended;
        }
        return;
    }

    if st.deck.is_empty() {
        showdown::run_showdown(st);
        return;
    }

    let next = next_alive_idx(st, st.turn_index);
    st.turn_index = next;
    st.phase = TurnPhase::Draw;
    st.log_line(
        format!("{}'s turn.", st.seat_name(PlayerId::from_index(next))),
        emits,
    );
}
