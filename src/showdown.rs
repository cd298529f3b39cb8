//! The empty-deck showdown.
//!
//! When the draw pile runs out, every living player reveals their hand and
//! the highest shown value wins the round. Ties trigger a full reshuffle
//! and redraw, worth one bonus coin each to the eventual winner.

use crate::card::{in_priority_band, show_value};
use crate::game_state::{GameState, TurnPhase};
use crate::ids::{CardId, PlayerId};
use crate::score;
use rand::seq::SliceRandom;

/// Reshuffle ceiling. The pool is finite, so repeated ties are possible
/// but a runaway loop is not worth riding out.
const MAX_RESHUFFLES: u32 = 50;

fn shown(st: &GameState, seat: PlayerId) -> (u8, bool) {
    let card = st
        .player(seat)
        .and_then(|p| p.hand)
        .unwrap_or(CardId(0));
    let mut value = show_value(card);
    if st.showdown_bonus == Some(seat) {
        value += 1;
    }
    (value, in_priority_band(card))
}

/// Resolve the showdown. Writes to the state log only; the caller's
/// returned state carries the outcome.
pub(crate) fn run_showdown(st: &mut GameState) {
    let living: Vec<PlayerId> = st.living().map(|p| p.id).collect();
    for &seat in &living {
        score::mark_reached_final(st, seat);
    }
    st.log.push("The deck is spent: final showdown.".to_string());

    let mut tie_bonus = 0u32;
    loop {
        if tie_bonus > MAX_RESHUFFLES {
            st.log
                .push("The showdown will not settle; comparison abandoned.".to_string());
            return;
        }

        for &seat in &living {
            let (value, _) = shown(st, seat);
            st.log.push(format!(
                "{} shows {} ({value})",
                st.seat_name(seat),
                crate::card::label(st.player(seat).and_then(|p| p.hand)),
            ));
        }

        // Highest shown value wins; a single-digit card beats a composite
        // on equal value.
        let best = living
            .iter()
            .map(|&s| shown(st, s))
            .max_by_key(|&(v, prio)| (v, prio))
            .unwrap_or((0, false));
        let winners: Vec<PlayerId> = living
            .iter()
            .copied()
            .filter(|&s| shown(st, s) == best)
            .collect();

        if let [winner] = winners[..] {
            score::mark_won_final(st, winner);
            st.log
                .push(format!("{} wins the showdown.", st.seat_name(winner)));
            score::award_round(st, winner, tie_bonus);
            st.phase = TurnPhase::Ended;
            st.showdown_bonus = None;
            return;
        }

        tie_bonus += 1;
        st.log.push(format!(
            "Showdown tie between {} seats; reshuffling (+{tie_bonus} bonus).",
            winners.len()
        ));

        // Everything comes back: draw pile, discards, and every card still
        // held anywhere, then the living redraw one each.
        let mut pool: Vec<CardId> = std::mem::take(&mut st.deck);
        pool.extend(st.discard.drain(..).filter_map(|r| r.card()));
        for p in &mut st.players {
            pool.extend(p.hand.take());
            pool.extend(p.drawn.take());
        }
        pool.shuffle(&mut st.rng);
        st.deck = pool;
        for &seat in &living {
            let card = st.draw_top();
            if let Some(p) = st.player_mut(seat) {
                p.hand = card;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::create_initial_state_seeded;

    #[test]
    fn test_unique_high_card_wins_and_scores() {
        let mut st = create_initial_state_seeded(3, 11);
        st.players[0].hand = Some(CardId(19));
        st.players[1].hand = Some(CardId(3));
        st.players[2].hand = Some(CardId(5));
        st.deck.clear();
        run_showdown(&mut st);
        assert_eq!(st.phase, TurnPhase::Ended);
        assert_eq!(st.players[0].gold, 1);
        assert!(st.stats[0].won_final);
        assert!(st.stats[1].reached_final && !st.stats[1].won_final);
    }

    #[test]
    fn test_priority_band_breaks_equal_show_values() {
        // id 9 shows 9; id 18 shows 1 + 8 = 9. The single digit wins.
        let mut st = create_initial_state_seeded(2, 11);
        st.players[0].hand = Some(CardId(18));
        st.players[1].hand = Some(CardId(9));
        st.deck.clear();
        run_showdown(&mut st);
        assert!(st.stats[1].won_final);
        assert_eq!(st.players[1].gold, 1);
    }

    #[test]
    fn test_bonus_holder_gets_plus_one() {
        let mut st = create_initial_state_seeded(2, 11);
        st.players[0].hand = Some(CardId(8));
        st.players[1].hand = Some(CardId(9));
        st.showdown_bonus = Some(PlayerId(0));
        st.deck.clear();
        run_showdown(&mut st);
        // 8 + 1 ties 9 on value but 9 keeps priority; no unique winner on
        // the first reveal, so the round reshuffles and still terminates.
        assert_eq!(st.phase, TurnPhase::Ended);
        assert!(st.showdown_bonus.is_none());
    }

    #[test]
    fn test_unsettled_showdown_leaves_the_phase_alone() {
        // Every card in play is the same copy, so no reshuffle can break
        // the tie and the loop guard gives up.
        let mut st = create_initial_state_seeded(2, 11);
        st.players[0].hand = Some(CardId(1));
        st.players[1].hand = Some(CardId(1));
        st.deck.clear();
        st.discard.clear();
        run_showdown(&mut st);
        assert_ne!(st.phase, TurnPhase::Ended);
        assert!(st.log.iter().any(|l| l.contains("will not settle")));
    }

    #[test]
    fn test_empty_hand_counts_as_zero() {
        let mut st = create_initial_state_seeded(2, 11);
        st.players[0].hand = None;
        st.players[1].hand = Some(CardId(2));
        st.deck.clear();
        run_showdown(&mut st);
        assert!(st.stats[1].won_final);
    }
}
