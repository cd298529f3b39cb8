//! Per-viewer state redaction.
//!
//! The canonical state holds every hand face up; a client may only see its
//! own. [`get_visible_state`] produces the copy a given seat is allowed to
//! inspect: other hands nulled and covered discard entries anonymized for
//! everyone but their owner.

use crate::game_state::{CardRef, GameState, fresh_rng};
use crate::ids::PlayerId;

/// The state as one seat is allowed to see it.
pub fn get_visible_state(st: &GameState, viewer: PlayerId) -> GameState {
    let mut vs = st.clone();
    // The generator must not travel to clients; a redacted copy gets a
    // throwaway one.
    vs.rng = fresh_rng();

    for p in &mut vs.players {
        if p.id != viewer {
            p.hand = None;
            p.drawn = None;
        }
    }
    for entry in &mut vs.discard {
        if let CardRef::Covered { card, owner } = *entry {
            *entry = if owner == viewer {
                CardRef::Plain(card)
            } else {
                CardRef::FaceDown
            };
        }
    }
    vs
}
