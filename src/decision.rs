//! Suspended card interactions and their resolution.
//!
//! A card that needs more input parks a [`Pending`] value on the state and
//! returns; the follow-up action finishes the effect. Every variant knows
//! which seat owes the answer, so a stray action from anyone else never
//! advances the game. Resolution that completes an effect always runs
//! through [`crate::turn::end_or_next`].

use crate::action::{Action, ActionKind};
use crate::card::{is_high_tail, label, tail, tail_opt};
use crate::executor::{DuelEnd, run_duel};
use crate::game_state::{CardRef, GameState, Prediction};
use crate::ids::{CardId, PlayerId};
use crate::notification::{Event, Notification};
use crate::score;
use crate::turn::{end_or_next, next_alive_idx};
use rand::Rng;

/// A card effect waiting on one more action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Pending {
    /// Nominate a seat to guess against.
    GuessTarget { chain: bool, streak: u32 },
    /// Guess the nominated seat's hand tail.
    GuessDigit {
        target: PlayerId,
        chain: bool,
        streak: u32,
    },
    /// Nominate a seat to peek at.
    PeekTarget,
    /// Nominate a duel opponent; `first_done` marks the optional second
    /// attempt stage.
    Duel {
        card: CardId,
        keep: Option<CardId>,
        live_hand: bool,
        boost: bool,
        respect_guard: bool,
        second_allowed: bool,
        first_done: bool,
    },
    /// Nominate a seat that must throw down their hand.
    ForcedDiscard { execute_parity: bool },
    /// Nominate a seat to swap hands with.
    SwapTarget { peek_first: bool },
    /// Confirm or decline the swap after the peek.
    SwapConfirm { target: PlayerId },
    /// Nominate a seat that loses their next turn.
    SkipTarget,
    /// Nominate a seat to strip of protection and dodge.
    StripTarget {
        keep: Option<CardId>,
        duel_offer: bool,
    },
    /// Confirm or decline the follow-up duel against the stripped seat.
    StripDuelConfirm {
        target: PlayerId,
        keep: Option<CardId>,
    },
    /// The actor owes themselves a coin flip.
    CoinSelf,
    /// A propagating coin flip currently owed by `flipper`.
    CoinChain { start: PlayerId, flipper: PlayerId },
    /// Nominate a seat to extort.
    ExtortTarget,
    /// The extorted seat chooses: pay one gold or fall.
    ExtortChoice { caster: PlayerId, target: PlayerId },
    /// Commit a new order for the top cards of the deck.
    ReorderTop { count: usize, cards: Vec<CardId> },
    /// Choose which of the top cards to bury covered into the discard.
    CoverPick { count: usize, cards: Vec<CardId> },
    /// Nominate the seat expected to win the round.
    Predict { caster: PlayerId },
    /// Nominate a seat to freeze.
    FreezeTarget,
}

impl Pending {
    /// The seat that owes the next action. Most interactions belong to the
    /// turn owner; coin chains, extortion answers, and off-turn
    /// predictions name their own responder.
    pub fn responder(&self, st: &GameState) -> PlayerId {
        match self {
            Pending::CoinChain { flipper, .. } => *flipper,
            Pending::ExtortChoice { target, .. } => *target,
            Pending::Predict { caster } => *caster,
            _ => PlayerId::from_index(st.turn_index),
        }
    }

    /// Whether a misdirected action earns a "waiting on" prompt instead of
    /// silence. Flips and binary choices do; target picks do not.
    fn prompts_on_misdirect(&self) -> bool {
        matches!(
            self,
            Pending::CoinSelf
                | Pending::CoinChain { .. }
                | Pending::ExtortChoice { .. }
                | Pending::SwapConfirm { .. }
                | Pending::StripDuelConfirm { .. }
        )
    }
}

fn alive_other(st: &GameState, target: PlayerId, caster: PlayerId) -> bool {
    target != caster && st.player(target).is_some_and(|p| p.alive)
}

fn redraw(st: &mut GameState, seat: PlayerId) {
    let card = st.draw_top();
    if let Some(p) = st.player_mut(seat) {
        p.hand = card;
    }
}

fn blocked_notice(
    st: &mut GameState,
    target: PlayerId,
    played: CardId,
    emits: &mut Vec<Notification>,
) {
    score::defense_block(st, target, played);
    let name = st.seat_name(target);
    st.log_line(format!("{name} shrugs the effect off."), emits);
}

/// Resolve a follow-up action against the pending interaction, if any.
pub(crate) fn resolve(st: &mut GameState, action: &Action, emits: &mut Vec<Notification>) {
    let Some(pending) = st.pending.clone() else {
        return;
    };
    let responder = pending.responder(st);
    if action.player != responder {
        if pending.prompts_on_misdirect() {
            emits.push(Notification::prompt(
                action.player,
                format!("Waiting on {}.", st.seat_name(responder)),
            ));
        }
        return;
    }
    let caster = PlayerId::from_index(st.turn_index);

    match (pending, &action.kind) {
        (Pending::GuessTarget { chain, streak }, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(1), emits);
                end_or_next(st, emits);
                return;
            }
            st.pending = Some(Pending::GuessDigit {
                target,
                chain,
                streak,
            });
        }
        (
            Pending::GuessDigit {
                target,
                chain,
                streak,
            },
            ActionKind::PickDigit { digit },
        ) => {
            let digit = *digit;
            if digit > 9 {
                return;
            }
            if digit == 1 {
                st.log_line("A guess of 1 is not allowed.", emits);
                end_or_next(st, emits);
                return;
            }
            let held = st.player(target).and_then(|p| p.hand);
            if tail_opt(held) == digit {
                if let Some(card) = held {
                    score::guess_hit(st, caster, card, streak);
                }
                st.log_line(
                    format!(
                        "{} guessed right: {} falls.",
                        st.seat_name(caster),
                        st.seat_name(target)
                    ),
                    emits,
                );
                st.eliminate(target, "hand guessed", caster, emits);
                let another = st.living().any(|p| p.id != caster);
                if chain && another {
                    st.pending = Some(Pending::GuessTarget {
                        chain,
                        streak: streak + 1,
                    });
                    emits.push(Notification::prompt(caster, "Guess again."));
                    return;
                }
            } else {
                st.log_line(
                    format!(
                        "{} guesses {digit} against {}: wrong.",
                        st.seat_name(caster),
                        st.seat_name(target)
                    ),
                    emits,
                );
                emits.push(Notification::all(Event::GuessMissed {
                    caster,
                    target,
                    digit,
                }));
            }
            end_or_next(st, emits);
        }
        (Pending::PeekTarget, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(2), emits);
                end_or_next(st, emits);
                return;
            }
            let card = st.player(target).and_then(|p| p.hand);
            if let Some(c) = card {
                score::peek_intel(st, caster, c);
            }
            emits.push(Notification::to(caster, Event::HandPeek {
                caster,
                target,
                card,
            }));
            st.log_line(
                format!(
                    "{} peeks at {}'s hand.",
                    st.seat_name(caster),
                    st.seat_name(target)
                ),
                emits,
            );
            end_or_next(st, emits);
        }
        (
            Pending::Duel {
                card,
                keep,
                live_hand,
                boost,
                respect_guard,
                second_allowed,
                first_done: false,
            },
            ActionKind::PickTarget { target },
        ) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            let my_card = if live_hand {
                st.player(caster).and_then(|p| p.hand)
            } else {
                keep
            };
            let end = run_duel(st, emits, caster, target, card, my_card, boost, respect_guard);
            let still_up = st.player(caster).is_some_and(|p| p.alive);
            if second_allowed && still_up && end != DuelEnd::AttackerFell {
                st.pending = Some(Pending::Duel {
                    card,
                    keep,
                    live_hand,
                    boost,
                    respect_guard,
                    second_allowed,
                    first_done: true,
                });
                emits.push(Notification::prompt(caster, "You may duel once more."));
                return;
            }
            end_or_next(st, emits);
        }
        (
            Pending::Duel {
                card,
                keep,
                live_hand,
                boost,
                respect_guard,
                first_done: true,
                ..
            },
            ActionKind::SecondDuel { target },
        ) => {
            if let Some(target) = *target {
                if !alive_other(st, target, caster) {
                    return;
                }
                let my_card = if live_hand {
                    st.player(caster).and_then(|p| p.hand)
                } else {
                    keep
                };
                run_duel(st, emits, caster, target, card, my_card, boost, respect_guard);
            } else {
                st.log_line(
                    format!("{} sheathes the blade.", st.seat_name(caster)),
                    emits,
                );
            }
            end_or_next(st, emits);
        }
        (Pending::Duel { first_done: true, .. }, ActionKind::Cancel) => {
            st.log_line(
                format!("{} sheathes the blade.", st.seat_name(caster)),
                emits,
            );
            end_or_next(st, emits);
        }
        (Pending::ForcedDiscard { execute_parity }, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !st.player(target).is_some_and(|p| p.alive) {
                return;
            }
            if target != caster && st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(5), emits);
                end_or_next(st, emits);
                return;
            }
            resolve_forced_discard(st, caster, target, execute_parity, emits);
        }
        (Pending::SwapTarget { peek_first }, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(6), emits);
                end_or_next(st, emits);
                return;
            }
            if peek_first {
                let card = st.player(target).and_then(|p| p.hand);
                if let Some(c) = card {
                    score::peek_intel(st, caster, c);
                }
                emits.push(Notification::to(caster, Event::HandPeek {
                    caster,
                    target,
                    card,
                }));
                st.pending = Some(Pending::SwapConfirm { target });
                emits.push(Notification::prompt(caster, "Swap hands?"));
                return;
            }
            swap_hands(st, caster, target, emits);
            end_or_next(st, emits);
        }
        (Pending::SwapConfirm { target }, ActionKind::Choose { choice }) => {
            if *choice {
                if st.guard(target, false, false).blocked() {
                    blocked_notice(st, target, CardId(6), emits);
                } else {
                    swap_hands(st, caster, target, emits);
                }
            } else {
                st.log_line(
                    format!("{} keeps their hand.", st.seat_name(caster)),
                    emits,
                );
            }
            end_or_next(st, emits);
        }
        (Pending::SwapTarget { peek_first: true }, ActionKind::Cancel)
        | (Pending::SwapConfirm { .. }, ActionKind::Cancel) => {
            st.log_line(
                format!("{} keeps their hand.", st.seat_name(caster)),
                emits,
            );
            end_or_next(st, emits);
        }
        (Pending::SkipTarget, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(7), emits);
            } else {
                if let Some(p) = st.player_mut(target) {
                    p.skip_next = true;
                }
                st.log_line(
                    format!("{} will sit the next turn out.", st.seat_name(target)),
                    emits,
                );
            }
            end_or_next(st, emits);
        }
        (Pending::StripTarget { keep, duel_offer }, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if let Some(p) = st.player_mut(target) {
                p.protected = false;
                p.dodging = false;
            }
            st.log_line(
                format!("{}'s guard is torn away.", st.seat_name(target)),
                emits,
            );
            if duel_offer {
                st.pending = Some(Pending::StripDuelConfirm { target, keep });
                emits.push(Notification::prompt(caster, "Press the attack?"));
                return;
            }
            end_or_next(st, emits);
        }
        (Pending::StripDuelConfirm { target, keep }, ActionKind::Choose { choice }) => {
            if *choice && st.player(target).is_some_and(|p| p.alive) {
                run_duel(st, emits, caster, target, CardId(13), keep, false, false);
            } else {
                st.log_line(
                    format!("{} relents.", st.seat_name(caster)),
                    emits,
                );
            }
            end_or_next(st, emits);
        }
        (Pending::StripTarget { duel_offer: true, .. }, ActionKind::Cancel)
        | (Pending::StripDuelConfirm { .. }, ActionKind::Cancel) => {
            st.log_line(format!("{} relents.", st.seat_name(caster)), emits);
            end_or_next(st, emits);
        }
        (Pending::CoinSelf, ActionKind::FlipCoin) => {
            if st.guard(caster, false, false).blocked() {
                blocked_notice(st, caster, CardId(14), emits);
                end_or_next(st, emits);
                return;
            }
            emits.push(Notification::to(caster, Event::CoinCue));
            let heads = st.rng.random_bool(0.5);
            if heads {
                if let Some(p) = st.player_mut(caster) {
                    p.protected = true;
                }
                st.log_line(
                    format!("Heads: {} is protected.", st.seat_name(caster)),
                    emits,
                );
            } else {
                if let Some(p) = st.player_mut(caster) {
                    p.dodging = true;
                }
                st.log_line(
                    format!("Tails: {} readies a dodge.", st.seat_name(caster)),
                    emits,
                );
            }
            end_or_next(st, emits);
        }
        (Pending::CoinChain { start, flipper }, ActionKind::ChainCoinFlip) => {
            if st.guard(flipper, false, false).blocked() {
                blocked_notice(st, flipper, CardId(12), emits);
                end_or_next(st, emits);
                return;
            }
            emits.push(Notification::to(flipper, Event::CoinCue));
            let heads = st.rng.random_bool(0.5);
            if heads {
                st.log_line(
                    format!("Heads: the storm passes {}.", st.seat_name(flipper)),
                    emits,
                );
                end_or_next(st, emits);
                return;
            }
            if let Some(p) = st.player_mut(flipper) {
                p.skip_next = true;
            }
            st.log_line(
                format!(
                    "Tails: {} is swept off the next turn.",
                    st.seat_name(flipper)
                ),
                emits,
            );
            let next = next_alive_idx(st, flipper.index());
            if next == start.index() || next == flipper.index() {
                end_or_next(st, emits);
                return;
            }
            let next = PlayerId::from_index(next);
            st.pending = Some(Pending::CoinChain {
                start,
                flipper: next,
            });
            emits.push(Notification::prompt(next, "The storm reaches you: flip."));
        }
        (Pending::ExtortTarget, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                emits.push(Notification::prompt(caster, "Pick another seat."));
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(14), emits);
                end_or_next(st, emits);
                return;
            }
            st.pending = Some(Pending::ExtortChoice { caster, target });
            emits.push(Notification::prompt(target, "Pay 1 gold or fall."));
        }
        (Pending::ExtortChoice { caster, target }, ActionKind::Choose { choice }) => {
            let has_gold = st.player(target).is_some_and(|p| p.gold > 0);
            if *choice && has_gold {
                if let Some(p) = st.player_mut(target) {
                    p.gold -= 1;
                }
                if let Some(p) = st.player_mut(caster) {
                    p.gold += 1;
                }
                st.log_line(
                    format!(
                        "{} pays the toll to {}.",
                        st.seat_name(target),
                        st.seat_name(caster)
                    ),
                    emits,
                );
            } else {
                st.log_line(
                    format!("{} refuses the toll.", st.seat_name(target)),
                    emits,
                );
                st.eliminate(target, "refused the toll", caster, emits);
            }
            end_or_next(st, emits);
        }
        (Pending::ReorderTop { count, cards }, ActionKind::CommitOrder { order }) => {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            if sorted != (0..count).collect::<Vec<_>>() {
                return;
            }
            let keep = st.deck.len() - count;
            st.deck.truncate(keep);
            // `order` and `cards` are both top first; the deck stores its
            // top last.
            st.deck.extend(order.iter().rev().map(|&i| cards[i]));
            emits.push(Notification::to(caster, Event::OrderCommitted {
                order: order.clone(),
            }));
            st.log_line(
                format!("{} rearranges the top of the deck.", st.seat_name(caster)),
                emits,
            );
            end_or_next(st, emits);
        }
        (Pending::CoverPick { count, cards }, ActionKind::CommitPicks { picked }) => {
            let mut seen = picked.clone();
            seen.sort_unstable();
            seen.dedup();
            if seen.len() != picked.len() || seen.iter().any(|&i| i >= count) {
                return;
            }
            let keep = st.deck.len() - count;
            st.deck.truncate(keep);
            let mut covered = Vec::new();
            let mut back = Vec::new();
            for (i, &card) in cards.iter().enumerate() {
                if picked.contains(&i) {
                    covered.push(card);
                    st.discard.push(CardRef::Covered {
                        card,
                        owner: caster,
                    });
                } else {
                    back.push(card);
                }
            }
            st.deck.extend(back.iter().rev());
            if !covered.is_empty() {
                emits.push(Notification::all(Event::SilentDiscard {
                    by: caster,
                    cards: covered.clone(),
                }));
                emits.push(Notification::to(caster, Event::CoveredCards {
                    cards: covered.clone(),
                }));
            }
            st.log_line(
                format!(
                    "{} buries {} card(s) face down.",
                    st.seat_name(caster),
                    covered.len()
                ),
                emits,
            );
            end_or_next(st, emits);
        }
        (Pending::Predict { caster: by }, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !st.player(target).is_some_and(|p| p.alive) {
                return;
            }
            st.prediction = Some(Prediction { by, pick: target });
            st.log_line(format!("{} seals a prediction.", st.seat_name(by)), emits);
            end_or_next(st, emits);
        }
        (Pending::FreezeTarget, ActionKind::PickTarget { target }) => {
            let target = *target;
            if !alive_other(st, target, caster) {
                return;
            }
            if st.guard(target, false, false).blocked() {
                blocked_notice(st, target, CardId(16), emits);
            } else {
                if let Some(p) = st.player_mut(target) {
                    p.frozen = true;
                }
                st.log_line(format!("{} is frozen.", st.seat_name(target)), emits);
            }
            end_or_next(st, emits);
        }
        _ => {}
    }
}

/// Swap the hand cards of two seats.
fn swap_hands(st: &mut GameState, a: PlayerId, b: PlayerId, emits: &mut Vec<Notification>) {
    let mine = st.player_mut(a).and_then(|p| p.hand.take());
    let theirs = st.player_mut(b).and_then(|p| p.hand.take());
    if let Some(p) = st.player_mut(a) {
        p.hand = theirs;
    }
    if let Some(p) = st.player_mut(b) {
        p.hand = mine;
    }
    st.log_line(
        format!("{} and {} swap hands.", st.seat_name(a), st.seat_name(b)),
        emits,
    );
}

/// The guarded part of a forced discard: the target's hand hits the
/// discard pile and the thrown card decides what happens next.
fn resolve_forced_discard(
    st: &mut GameState,
    caster: PlayerId,
    target: PlayerId,
    execute_parity: bool,
    emits: &mut Vec<Notification>,
) {
    let Some(thrown) = st.player_mut(target).and_then(|p| p.hand.take()) else {
        redraw(st, target);
        st.log_line(
            format!("{} had nothing to throw.", st.seat_name(target)),
            emits,
        );
        end_or_next(st, emits);
        return;
    };
    st.discard.push(CardRef::Plain(thrown));
    emits.push(Notification::all(Event::SilentDiscard {
        by: target,
        cards: vec![thrown],
    }));
    st.log_line(
        format!(
            "{} is forced to throw {}.",
            st.seat_name(target),
            label(Some(thrown))
        ),
        emits,
    );

    if thrown == CardId(9) || thrown == CardId(19) {
        if st.silence_window.is_some() && is_high_tail(thrown) {
            st.log_line("The silence swallows the thrown card.", emits);
        } else if st.card_enhanced(thrown) {
            if thrown == CardId(9) {
                if let Some(p) = st.player_mut(target) {
                    p.protected = true;
                }
                redraw(st, target);
                st.log_line(
                    format!("{} rallies behind the mast.", st.seat_name(target)),
                    emits,
                );
            } else {
                redraw(st, target);
                st.pending = Some(Pending::Predict { caster: target });
                emits.push(Notification::prompt(target, "Name the round's winner."));
                return;
            }
        } else {
            score::discard_kill(st, caster, thrown);
            if thrown == CardId(19) {
                st.next_round_start = Some(target.index());
            }
            st.eliminate(target, "threw their flagship", caster, emits);
        }
        end_or_next(st, emits);
        return;
    }

    if execute_parity && tail(thrown) % 2 == 0 {
        score::discard_kill(st, caster, thrown);
        st.eliminate(target, "threw an even card", caster, emits);
    } else {
        redraw(st, target);
    }
    end_or_next(st, emits);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::create_initial_state_seeded;
    use crate::game_state::TurnPhase;

    fn ready(mut st: GameState) -> GameState {
        st.phase = TurnPhase::Choose;
        st.turn_index = 0;
        st.current_turn_owner = 0;
        st
    }

    #[test]
    fn test_guess_hit_eliminates_and_scores() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].hand = Some(CardId(13));
        st.pending = Some(Pending::GuessDigit {
            target: PlayerId(1),
            chain: false,
            streak: 1,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickDigit { digit: 3 }),
            &mut emits,
        );
        assert!(!st.players[1].alive);
        assert_eq!(st.stats[0].hit, 3);
        assert!(st.pending.is_none());
    }

    #[test]
    fn test_guess_of_one_ends_the_effect() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.pending = Some(Pending::GuessDigit {
            target: PlayerId(1),
            chain: false,
            streak: 1,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickDigit { digit: 1 }),
            &mut emits,
        );
        assert!(st.pending.is_none());
        assert!(st.players[1].alive);
        assert_eq!(st.turn_index, 1);
    }

    #[test]
    fn test_chain_guess_continues_on_hit() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].hand = Some(CardId(4));
        st.pending = Some(Pending::GuessDigit {
            target: PlayerId(1),
            chain: true,
            streak: 1,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickDigit { digit: 4 }),
            &mut emits,
        );
        assert!(matches!(
            st.pending,
            Some(Pending::GuessTarget { streak: 2, .. })
        ));
    }

    #[test]
    fn test_protected_target_blocks_and_scores_defense() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].protected = true;
        st.pending = Some(Pending::SkipTarget);
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert!(!st.players[1].skip_next);
        assert_eq!(st.stats[1].defense, 7);
    }

    #[test]
    fn test_wrong_responder_is_ignored() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.pending = Some(Pending::SkipTarget);
        let snapshot = st.pending.clone();
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(2), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert_eq!(st.pending, snapshot);
        assert!(emits.is_empty());
    }

    #[test]
    fn test_extortion_pay_transfers_gold() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].gold = 3;
        st.pending = Some(Pending::ExtortChoice {
            caster: PlayerId(0),
            target: PlayerId(1),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(1), ActionKind::Choose { choice: true }),
            &mut emits,
        );
        assert_eq!(st.players[1].gold, 2);
        assert_eq!(st.players[0].gold, 1);
        assert!(st.players[1].alive);
    }

    #[test]
    fn test_extortion_refusal_is_fatal() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].gold = 3;
        st.pending = Some(Pending::ExtortChoice {
            caster: PlayerId(0),
            target: PlayerId(1),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(1), ActionKind::Choose { choice: false }),
            &mut emits,
        );
        assert!(!st.players[1].alive);
    }

    #[test]
    fn test_broke_target_cannot_pay() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.pending = Some(Pending::ExtortChoice {
            caster: PlayerId(0),
            target: PlayerId(1),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(1), ActionKind::Choose { choice: true }),
            &mut emits,
        );
        assert!(!st.players[1].alive);
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let mut st = ready(create_initial_state_seeded(4, 5));
        let cards: Vec<CardId> = st.deck.iter().rev().take(2).copied().collect();
        st.pending = Some(Pending::ReorderTop {
            count: 2,
            cards: cards.clone(),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::CommitOrder { order: vec![0, 0] }),
            &mut emits,
        );
        assert!(st.pending.is_some());
    }

    #[test]
    fn test_reorder_applies_committed_order() {
        let mut st = ready(create_initial_state_seeded(4, 5));
        let cards: Vec<CardId> = st.deck.iter().rev().take(2).copied().collect();
        st.pending = Some(Pending::ReorderTop {
            count: 2,
            cards: cards.clone(),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::CommitOrder { order: vec![1, 0] }),
            &mut emits,
        );
        // The old second card is now on top.
        assert_eq!(st.deck.last(), Some(&cards[1]));
    }

    #[test]
    fn test_cover_pick_moves_cards_to_covered_discard() {
        let mut st = ready(create_initial_state_seeded(4, 5));
        let deck_before = st.deck.len();
        let cards: Vec<CardId> = st.deck.iter().rev().take(2).copied().collect();
        st.pending = Some(Pending::CoverPick {
            count: 2,
            cards: cards.clone(),
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::CommitPicks { picked: vec![0] }),
            &mut emits,
        );
        assert_eq!(st.deck.len(), deck_before - 1);
        assert!(st.discard.iter().any(|r| matches!(
            r,
            CardRef::Covered { owner: PlayerId(0), .. }
        )));
    }

    #[test]
    fn test_forced_discard_of_flagship_eliminates() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.venues.clear();
        st.players[1].hand = Some(CardId(9));
        st.pending = Some(Pending::ForcedDiscard {
            execute_parity: false,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert!(!st.players[1].alive);
        assert_eq!(st.stats[0].hit, 18);
    }

    #[test]
    fn test_silenced_flagship_throw_leaves_the_target_handless() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.venues.clear();
        st.silence_window = Some(PlayerId(2));
        st.players[1].hand = Some(CardId(9));
        st.pending = Some(Pending::ForcedDiscard {
            execute_parity: false,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert!(st.players[1].alive);
        assert!(st.players[1].hand.is_none());
    }

    #[test]
    fn test_forced_discard_parity_spares_odd_tails() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.players[1].hand = Some(CardId(13));
        st.pending = Some(Pending::ForcedDiscard {
            execute_parity: true,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert!(st.players[1].alive);
        assert!(st.players[1].hand.is_some());
    }

    #[test]
    fn test_enhanced_flagship_throw_asks_for_prediction() {
        let mut st = ready(create_initial_state_seeded(3, 5));
        st.venues = vec!["Phantom Galleon".to_string()];
        st.players[1].hand = Some(CardId(19));
        st.pending = Some(Pending::ForcedDiscard {
            execute_parity: false,
        });
        let mut emits = Vec::new();
        resolve(
            &mut st,
            &Action::new(PlayerId(0), ActionKind::PickTarget { target: PlayerId(1) }),
            &mut emits,
        );
        assert!(st.players[1].alive);
        assert!(matches!(
            st.pending,
            Some(Pending::Predict { caster: PlayerId(1) })
        ));
        // The prediction is owed by the thrown seat, off turn.
        resolve(
            &mut st,
            &Action::new(PlayerId(1), ActionKind::PickTarget { target: PlayerId(2) }),
            &mut emits,
        );
        assert_eq!(
            st.prediction,
            Some(Prediction {
                by: PlayerId(1),
                pick: PlayerId(2),
            })
        );
    }
}
