//! The canonical game state and its core mutation helpers.
//!
//! `GameState` is one room's complete round-plus-season state. It is only
//! ever advanced through [`crate::game_loop::apply_action`], which clones
//! the input and returns the mutated clone, so callers may retain every
//! snapshot for history or replay.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::card;
use crate::decision::Pending;
use crate::ids::{CardId, PlayerId};
use crate::notification::{Event, Notification};
use crate::player::Player;
use crate::score::{SeasonFinal, StatLine};

/// Deck size at or below which the round is "hot" and the threshold card
/// can trigger the showdown.
pub const HOT_THRESHOLD: usize = 14;

/// Turn phase of the seat currently acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    Draw,
    Choose,
    Ended,
}

/// One discard pile entry.
///
/// `Covered` entries were concealed by a card effect and reveal their
/// identity only to their owner; `FaceDown` appears exclusively in redacted
/// views produced by the visibility filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum CardRef {
    Plain(CardId),
    Covered { card: CardId, owner: PlayerId },
    FaceDown,
}

impl CardRef {
    /// The underlying card id, if visible in this state.
    pub fn card(&self) -> Option<CardId> {
        match *self {
            CardRef::Plain(id) => Some(id),
            CardRef::Covered { card, .. } => Some(card),
            CardRef::FaceDown => None,
        }
    }
}

/// A committed winner prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    pub by: PlayerId,
    pub pick: PlayerId,
}

/// Outcome of checking a hostile effect against its target's guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Clear,
    Dead,
    Protected,
    Dodged,
}

impl GuardOutcome {
    pub fn blocked(self) -> bool {
        self != GuardOutcome::Clear
    }
}

pub(crate) fn fresh_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

pub(crate) fn fresh_rng_seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// The complete state of one room.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub players: Vec<Player>,
    /// Draw pile; the top card is the last element.
    pub deck: Vec<CardId>,
    pub discard: Vec<CardRef>,
    /// This round's active venue names.
    pub venues: Vec<String>,

    pub round_no: u32,
    pub season_no: u32,
    /// Seat that opened this round.
    pub start_seat: usize,
    pub turn_index: usize,
    pub phase: TurnPhase,
    /// Seat whose turn is currently resolving; kills credited to this seat
    /// count toward the round reward.
    pub current_turn_owner: usize,

    /// Suspended card effect awaiting one more action. `None` whenever the
    /// phase is `Draw`.
    pub pending: Option<Pending>,

    /// Explicit starting-seat override for the next round.
    pub next_round_start: Option<usize>,
    pub prediction: Option<Prediction>,
    /// Holder of the one-time +1 showdown bonus.
    pub showdown_bonus: Option<PlayerId>,

    /// Windowed silence: until the owner's turn comes back around, played
    /// or thrown high-tail cards do not resolve.
    pub silence_window: Option<PlayerId>,
    /// Per-turn silence: ids >= 7 do not resolve this turn.
    pub turn_silence: bool,
    /// Infection window: non-owners playing an odd id become infected.
    pub infection_window: Option<PlayerId>,

    pub hot_threshold: usize,
    pub hot_notified: bool,

    pub chest_total: u32,
    pub chest_left: u32,

    /// Kills per seat this round and within the current turn.
    pub round_kills: Vec<u32>,
    pub turn_kills: Vec<u32>,
    pub last_elim_by: Option<PlayerId>,

    /// Season stats ledger, indexed by seat.
    pub stats: Vec<StatLine>,
    /// Present only once the chest has been emptied.
    pub season_final: Option<SeasonFinal>,

    /// Append-only human-readable log.
    pub log: Vec<String>,

    #[cfg_attr(feature = "serialization", serde(skip, default = "fresh_rng"))]
    pub(crate) rng: StdRng,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    /// Whether a venue name is active this round.
    pub fn venue_active(&self, venue: &str) -> bool {
        self.venues.iter().any(|v| v == venue)
    }

    /// Whether a card resolves its enhanced variant this round.
    pub fn card_enhanced(&self, id: CardId) -> bool {
        card::venue_of(id).is_some_and(|v| self.venue_active(v))
    }

    /// Seat label for log lines.
    pub fn seat_name(&self, seat: PlayerId) -> String {
        let default = format!("P{}", seat.index() + 1);
        match self.player(seat) {
            Some(p) if p.name != default => format!("{} ({})", default, p.name),
            _ => default,
        }
    }

    /// Append a line to the state log and mirror it as a broadcast.
    pub(crate) fn log_line(&mut self, text: impl Into<String>, emits: &mut Vec<Notification>) {
        let text = text.into();
        self.log.push(text.clone());
        emits.push(Notification::all(Event::Log { text }));
    }

    /// Pop the top card of the deck.
    pub(crate) fn draw_top(&mut self) -> Option<CardId> {
        self.deck.pop()
    }

    /// Check a hostile effect against a target's guards. A dodge that
    /// blocks is consumed here; protection is not.
    pub(crate) fn guard(
        &mut self,
        target: PlayerId,
        ignore_protect: bool,
        ignore_dodge: bool,
    ) -> GuardOutcome {
        let Some(t) = self.player_mut(target) else {
            return GuardOutcome::Dead;
        };
        if !t.alive {
            return GuardOutcome::Dead;
        }
        if !ignore_protect && t.protected {
            return GuardOutcome::Protected;
        }
        if !ignore_dodge && t.dodging {
            t.dodging = false;
            return GuardOutcome::Dodged;
        }
        GuardOutcome::Clear
    }

    /// Remove a player from the round: both cards go to the discard pile
    /// with a silent notice, all transient flags clear, and the kill is
    /// credited to `by` when it was not a self-elimination.
    pub(crate) fn eliminate(
        &mut self,
        victim: PlayerId,
        reason: &str,
        by: PlayerId,
        emits: &mut Vec<Notification>,
    ) {
        let Some(p) = self.player_mut(victim) else {
            return;
        };
        if !p.alive {
            return;
        }

        let mut dropped = Vec::new();
        if let Some(c) = p.drawn.take() {
            dropped.push(c);
        }
        if let Some(c) = p.hand.take() {
            dropped.push(c);
        }
        p.alive = false;
        p.protected = false;
        p.dodging = false;
        p.frozen = false;
        p.infected = false;
        p.infection_armed = false;

        for &c in &dropped {
            self.discard.push(CardRef::Plain(c));
        }
        if !dropped.is_empty() {
            emits.push(Notification::all(Event::SilentDiscard {
                by: victim,
                cards: dropped,
            }));
        }

        if self.infection_window == Some(victim) {
            self.infection_window = None;
        }
        if by != victim {
            self.round_kills[by.index()] += 1;
            if by.index() == self.current_turn_owner {
                self.turn_kills[by.index()] += 1;
            }
        }
        self.last_elim_by = Some(by);
        self.log
            .push(format!("P{} is out ({reason})", victim.index() + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::create_initial_state_seeded;

    #[test]
    fn test_guard_consumes_dodge_not_protection() {
        let mut st = create_initial_state_seeded(3, 7);
        st.players[1].protected = true;
        assert_eq!(st.guard(PlayerId(1), false, false), GuardOutcome::Protected);
        assert!(st.players[1].protected);

        st.players[1].protected = false;
        st.players[1].dodging = true;
        assert_eq!(st.guard(PlayerId(1), false, false), GuardOutcome::Dodged);
        assert!(!st.players[1].dodging);
        assert_eq!(st.guard(PlayerId(1), false, false), GuardOutcome::Clear);
    }

    #[test]
    fn test_eliminate_moves_cards_to_discard_and_credits_kill() {
        let mut st = create_initial_state_seeded(3, 7);
        st.current_turn_owner = 0;
        let before = st.discard.len();
        let mut emits = Vec::new();
        st.eliminate(PlayerId(1), "test", PlayerId(0), &mut emits);

        assert!(!st.players[1].alive);
        assert!(st.players[1].hand.is_none());
        assert_eq!(st.discard.len(), before + 1);
        assert_eq!(st.round_kills[0], 1);
        assert_eq!(st.turn_kills[0], 1);
        assert_eq!(st.last_elim_by, Some(PlayerId(0)));
        assert!(emits.iter().any(|n| matches!(
            n.event,
            Event::SilentDiscard { by: PlayerId(1), .. }
        )));
    }

    #[test]
    fn test_eliminate_self_not_credited() {
        let mut st = create_initial_state_seeded(3, 7);
        let mut emits = Vec::new();
        st.eliminate(PlayerId(2), "test", PlayerId(2), &mut emits);
        assert_eq!(st.round_kills[2], 0);
    }

    #[test]
    fn test_card_enhanced_tracks_active_venues() {
        let mut st = create_initial_state_seeded(4, 7);
        st.venues = vec!["Fencing Hall".to_string()];
        assert!(st.card_enhanced(CardId(3)));
        assert!(!st.card_enhanced(CardId(4)));
    }
}
