//! Round and season setup.

use crate::card::{DECK_SIZE, full_deck, venue_pool};
use crate::game_state::{GameState, TurnPhase, fresh_rng, fresh_rng_seeded};
use crate::notification::Notification;
use crate::player::Player;
use crate::score::StatLine;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Gold placed in the chest per seat at season start.
const CHEST_PER_SEAT: u32 = 5;

fn shuffled_deck(rng: &mut StdRng) -> Vec<crate::ids::CardId> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deck
}

/// Draw this round's active venues: half the seats, rounded up.
fn draw_venues(rng: &mut StdRng, seats: usize) -> Vec<String> {
    let mut pool = venue_pool();
    pool.shuffle(rng);
    pool.truncate(seats.div_ceil(2).max(1));
    pool.into_iter().map(str::to_string).collect()
}

fn opening_log(st: &mut GameState) {
    st.log.push(format!(
        "Season {}, round {} begins with {} seats.",
        st.season_no,
        st.round_no,
        st.players.len()
    ));
    st.log
        .push(format!("Active venues: {}.", st.venues.join(", ")));
    st.log.push(format!(
        "{} gold in the chest.",
        st.chest_left
    ));
    if st.deck.len() <= st.hot_threshold {
        st.hot_notified = true;
        st.log.push(format!(
            "The deck opens hot: {} cards left.",
            st.deck.len()
        ));
    }
}

/// Build a fresh game for `seats` players (clamped to 1..=8) with an
/// OS-seeded generator.
pub fn create_initial_state(seats: usize) -> GameState {
    build_initial(seats, fresh_rng())
}

/// Deterministic variant of [`create_initial_state`] for tests and replay.
pub fn create_initial_state_seeded(seats: usize, seed: u64) -> GameState {
    build_initial(seats, fresh_rng_seeded(seed))
}

fn build_initial(seats: usize, mut rng: StdRng) -> GameState {
    let seats = seats.clamp(1, 8);
    let mut deck = shuffled_deck(&mut rng);
    let mut players: Vec<Player> = (0..seats).map(Player::new).collect();
    for p in &mut players {
        p.hand = deck.pop();
    }
    let venues = draw_venues(&mut rng, seats);
    debug_assert_eq!(deck.len() + seats, DECK_SIZE);

    let chest = seats as u32 * CHEST_PER_SEAT;
    let mut st = GameState {
        players,
        deck,
        discard: Vec::new(),
        venues,
        round_no: 1,
        season_no: 1,
        start_seat: 0,
        turn_index: 0,
        phase: TurnPhase::Draw,
        current_turn_owner: 0,
        pending: None,
        next_round_start: None,
        prediction: None,
        showdown_bonus: None,
        silence_window: None,
        turn_silence: false,
        infection_window: None,
        hot_threshold: crate::game_state::HOT_THRESHOLD,
        hot_notified: false,
        chest_total: chest,
        chest_left: chest,
        round_kills: vec![0; seats],
        turn_kills: vec![0; seats],
        last_elim_by: None,
        stats: vec![StatLine::default(); seats],
        season_final: None,
        log: Vec::new(),
        rng,
    };
    opening_log(&mut st);
    st
}

/// Deal the next round: gold, stats, and the chest carry over; cards,
/// venues, and per-round flags reset. The opening seat rotates unless an
/// abdication booked it.
pub(crate) fn deal_next_round(st: &mut GameState, emits: &mut Vec<Notification>) {
    let seats = st.players.len();
    let mut deck = shuffled_deck(&mut st.rng);
    for p in &mut st.players {
        p.alive = true;
        p.protected = false;
        p.dodging = false;
        p.frozen = false;
        p.skip_next = false;
        p.infected = false;
        p.infection_armed = false;
        p.hand = deck.pop();
        p.drawn = None;
    }
    st.deck = deck;
    st.discard.clear();
    st.venues = draw_venues(&mut st.rng, seats);

    st.round_no += 1;
    let start = st
        .next_round_start
        .take()
        .unwrap_or((st.start_seat + 1) % seats);
    st.start_seat = start;
    st.turn_index = start;
    st.phase = TurnPhase::Draw;
    st.current_turn_owner = start;
    st.pending = None;
    st.prediction = None;
    st.silence_window = None;
    st.turn_silence = false;
    st.infection_window = None;
    st.hot_notified = false;
    st.round_kills.iter_mut().for_each(|k| *k = 0);
    st.turn_kills.iter_mut().for_each(|k| *k = 0);
    st.last_elim_by = None;

    opening_log(st);
    emits.push(Notification::log(format!(
        "Round {} begins.",
        st.round_no
    )));
}

/// Pure form of the round rollover: leaves the input untouched and hands
/// back the freshly dealt state.
pub fn next_round(st: &GameState) -> GameState {
    let mut next = st.clone();
    let mut emits = Vec::new();
    deal_next_round(&mut next, &mut emits);
    next
}

/// Whether the round has concluded (by award, showdown, or attrition).
pub fn is_round_ended(st: &GameState) -> bool {
    st.phase == TurnPhase::Ended || st.alive_count() <= 1
}
