//! The effect interpreter.
//!
//! [`execute_play`] takes the descriptor a played card maps to and either
//! resolves it on the spot or parks a [`Pending`] for the follow-up
//! action. All twenty cards, base and enhanced, flow through this one
//! dispatch.

use crate::card::label;
use crate::card::tail_opt;
use crate::decision::Pending;
use crate::effect::{Buff, COMPANION_CARD, DuelValue, EffectSpec, GuardMode, effect_spec};
use crate::game_state::{CardRef, GameState};
use crate::ids::{CardId, PlayerId};
use crate::notification::{Event, Notification};
use crate::score::{self, DuelBonuses};
use crate::showdown;
use crate::turn::{check_hot, end_or_next, next_alive_idx};
use rand::Rng;
use rand::seq::SliceRandom;

/// How a duel came out, from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DuelEnd {
    /// The target's guard absorbed the challenge.
    Blocked,
    AttackerFell,
    TargetFell,
    Standoff,
}

/// Fight a tail duel between `caster` and `target`. `played` is the card
/// that started it, used for block scoring; `my_card` is the attacker's
/// value source. Skipping the guard check doubles the winner's score.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_duel(
    st: &mut GameState,
    emits: &mut Vec<Notification>,
    caster: PlayerId,
    target: PlayerId,
    played: CardId,
    my_card: Option<CardId>,
    boost: bool,
    respect_guard: bool,
) -> DuelEnd {
    if respect_guard && st.guard(target, false, false).blocked() {
        score::defense_block(st, target, played);
        let name = st.seat_name(target);
        st.log_line(format!("{name} turns the duel aside."), emits);
        return DuelEnd::Blocked;
    }

    let my = tail_opt(my_card) + boost as u8;
    let their_card = st.player(target).and_then(|p| p.hand);
    let opp = tail_opt(their_card);
    let bonuses = DuelBonuses {
        boost,
        ignore_defense: !respect_guard,
        multi_kill: 0,
    };
    st.log_line(
        format!(
            "{} challenges {} to a duel.",
            st.seat_name(caster),
            st.seat_name(target)
        ),
        emits,
    );

    if my > opp {
        score::duel_attack(st, caster, my_card, their_card, bonuses);
        st.log_line(format!("{} falls.", st.seat_name(target)), emits);
        st.eliminate(target, "lost a duel", caster, emits);
        emits.push(Notification::all(Event::DuelOutcome {
            loser: target,
            card: their_card,
        }));
        DuelEnd::TargetFell
    } else if opp > my {
        score::duel_reversal(st, target, their_card, my_card, bonuses);
        st.log_line(format!("{} falls.", st.seat_name(caster)), emits);
        st.eliminate(caster, "lost a duel", target, emits);
        emits.push(Notification::all(Event::DuelOutcome {
            loser: caster,
            card: my_card,
        }));
        DuelEnd::AttackerFell
    } else {
        st.log_line("The duel is a standoff.", emits);
        DuelEnd::Standoff
    }
}

/// Resolve a just-played card. The caller has already moved the card to
/// the discard pile and settled the kept hand.
pub(crate) fn execute_play(
    st: &mut GameState,
    actor: PlayerId,
    played: CardId,
    enhanced: bool,
    emits: &mut Vec<Notification>,
) {
    match effect_spec(played, enhanced) {
        EffectSpec::SelfBuff(buff) => {
            match buff {
                Buff::Protection => {
                    if let Some(p) = st.player_mut(actor) {
                        p.protected = true;
                    }
                    st.log_line(
                        format!("{} is protected until their next turn.", st.seat_name(actor)),
                        emits,
                    );
                }
                Buff::Dodge => {
                    if let Some(p) = st.player_mut(actor) {
                        p.dodging = true;
                    }
                    st.log_line(
                        format!("{} readies a dodge.", st.seat_name(actor)),
                        emits,
                    );
                }
            }
            end_or_next(st, emits);
        }
        EffectSpec::MassRedraw { silence } => {
            let seats: Vec<PlayerId> = st.living().map(|p| p.id).collect();
            let mut affected = Vec::new();
            for seat in seats {
                if !st.guard(seat, false, false).blocked() {
                    affected.push(seat);
                }
            }
            for &seat in &affected {
                if let Some(card) = st.player_mut(seat).and_then(|p| p.hand.take()) {
                    st.deck.push(card);
                }
            }
            st.deck.shuffle(&mut st.rng);
            for &seat in &affected {
                let card = st.draw_top();
                if let Some(p) = st.player_mut(seat) {
                    p.hand = card;
                }
            }
            st.log_line(
                format!("{} seats shuffle back and redraw.", affected.len()),
                emits,
            );
            if silence {
                st.silence_window = Some(actor);
                st.log_line("A powder silence falls over the table.", emits);
            }
            end_or_next(st, emits);
        }
        EffectSpec::GuessChain { chain } => {
            st.pending = Some(Pending::GuessTarget { chain, streak: 1 });
        }
        EffectSpec::PeekOne => {
            st.pending = Some(Pending::PeekTarget);
        }
        EffectSpec::PeekAll => {
            let seats: Vec<PlayerId> = st
                .living()
                .filter(|p| p.id != actor)
                .map(|p| p.id)
                .collect();
            let mut lines = Vec::new();
            for seat in seats {
                if st.guard(seat, false, false).blocked() {
                    lines.push(format!("{} is guarded.", st.seat_name(seat)));
                    continue;
                }
                let card = st.player(seat).and_then(|p| p.hand);
                lines.push(format!("{} holds {}.", st.seat_name(seat), label(card)));
                if let Some(c) = card {
                    score::peek_intel(st, actor, c);
                }
                emits.push(Notification::to(actor, Event::HandPeek {
                    caster: actor,
                    target: seat,
                    card,
                }));
            }
            emits.push(Notification::to(actor, Event::Reveal { lines }));
            st.log_line(format!("{} reads the table.", st.seat_name(actor)), emits);
            end_or_next(st, emits);
        }
        EffectSpec::Duel {
            value,
            boost,
            guard,
            second_attempt,
        } => {
            let keep = st.player(actor).and_then(|p| p.hand);
            st.pending = Some(Pending::Duel {
                card: played,
                keep,
                live_hand: value == DuelValue::CurrentHand,
                boost,
                respect_guard: guard == GuardMode::Respect,
                second_allowed: second_attempt,
                first_done: false,
            });
        }
        EffectSpec::ForcedDiscard { execute_parity } => {
            st.pending = Some(Pending::ForcedDiscard { execute_parity });
        }
        EffectSpec::SwapHands { peek_first } => {
            st.pending = Some(Pending::SwapTarget { peek_first });
        }
        EffectSpec::SkipTarget => {
            st.pending = Some(Pending::SkipTarget);
        }
        EffectSpec::NoOp => {
            st.log_line("Nothing happens.", emits);
            end_or_next(st, emits);
        }
        EffectSpec::SelfEliminate => {
            st.log_line(
                format!("{} goes down with the ship.", st.seat_name(actor)),
                emits,
            );
            st.eliminate(actor, "abandoned the round", actor, emits);
            end_or_next(st, emits);
        }
        EffectSpec::CompanionPurge => {
            if st.player(actor).and_then(|p| p.hand) != Some(COMPANION_CARD) {
                st.log_line("The call goes unanswered.", emits);
                end_or_next(st, emits);
                return;
            }
            let victims: Vec<PlayerId> = st
                .living()
                .filter(|p| p.id != actor)
                .map(|p| p.id)
                .collect();
            let total: u32 = victims
                .iter()
                .map(|&v| tail_opt(st.player(v).and_then(|p| p.hand)) as u32)
                .sum();
            let gained = total * 2 * victims.len() as u32;
            if let Some(s) = st.stats.get_mut(actor.index()) {
                s.attack += gained;
            }
            st.log_line(
                format!(
                    "{} and their companion sweep the table.",
                    st.seat_name(actor)
                ),
                emits,
            );
            for v in victims {
                st.eliminate(v, "swept away", actor, emits);
            }
            end_or_next(st, emits);
        }
        EffectSpec::ScavengeDiscard => {
            let candidates: Vec<usize> = st
                .discard
                .iter()
                .enumerate()
                .filter(|(_, r)| r.card().is_some_and(|c| c != CardId(11)))
                .map(|(i, _)| i)
                .collect();
            if candidates.is_empty() {
                st.log_line("The discard pile offers nothing.", emits);
                end_or_next(st, emits);
                return;
            }
            let idx = candidates[st.rng.random_range(0..candidates.len())];
            let Some(card) = st.discard.remove(idx).card() else {
                end_or_next(st, emits);
                return;
            };
            if let Some(p) = st.player_mut(actor) {
                p.drawn = Some(card);
            }
            emits.push(Notification::to(actor, Event::Reveal {
                lines: vec![format!("You recover {}.", label(Some(card)))],
            }));
            st.log_line(
                format!(
                    "{} scavenges the discard pile and plays again.",
                    st.seat_name(actor)
                ),
                emits,
            );
            // The turn does not end; the actor holds two cards again.
        }
        EffectSpec::RotateHands => {
            let seats: Vec<PlayerId> = st.living().map(|p| p.id).collect();
            let mut ring = Vec::new();
            for seat in seats {
                if !st.guard(seat, false, false).blocked() {
                    ring.push(seat);
                }
            }
            if ring.len() < 2 {
                st.log_line("No hands to pass around.", emits);
                end_or_next(st, emits);
                return;
            }
            let hands: Vec<Option<CardId>> = ring
                .iter()
                .map(|&s| st.player(s).and_then(|p| p.hand))
                .collect();
            for (j, &seat) in ring.iter().enumerate() {
                let incoming = hands[(j + 1) % hands.len()];
                if let Some(p) = st.player_mut(seat) {
                    p.hand = incoming;
                }
            }
            st.log_line("Hands pass around the table.", emits);
            end_or_next(st, emits);
        }
        EffectSpec::CoinChain => {
            let first = PlayerId::from_index(next_alive_idx(st, actor.index()));
            st.pending = Some(Pending::CoinChain {
                start: actor,
                flipper: first,
            });
            emits.push(Notification::prompt(first, "The storm reaches you: flip."));
        }
        EffectSpec::InfectionWindow => {
            st.infection_window = Some(actor);
            st.log_line("A plague stirs over the table.", emits);
            end_or_next(st, emits);
        }
        EffectSpec::StripGuard { duel_offer } => {
            let keep = st.player(actor).and_then(|p| p.hand);
            st.pending = Some(Pending::StripTarget { keep, duel_offer });
        }
        EffectSpec::CoinSelf => {
            st.pending = Some(Pending::CoinSelf);
            emits.push(Notification::prompt(actor, "Flip for your fate."));
        }
        EffectSpec::Extort => {
            st.pending = Some(Pending::ExtortTarget);
        }
        EffectSpec::PeekTop { n } => {
            let cards: Vec<CardId> = st.deck.iter().rev().take(n).copied().collect();
            if cards.is_empty() {
                st.log_line("The deck has nothing to show.", emits);
                end_or_next(st, emits);
                return;
            }
            for &c in &cards {
                score::peek_intel(st, actor, c);
            }
            emits.push(Notification::to(actor, Event::TopCards {
                cards: cards.clone(),
            }));
            st.log_line(format!("{} studies the deck.", st.seat_name(actor)), emits);
            end_or_next(st, emits);
        }
        EffectSpec::ReorderTop => {
            let count = top_window(st);
            if count == 0 {
                st.log_line("The deck has nothing to rearrange.", emits);
                end_or_next(st, emits);
                return;
            }
            let cards: Vec<CardId> = st.deck.iter().rev().take(count).copied().collect();
            emits.push(Notification::to(actor, Event::TopCards {
                cards: cards.clone(),
            }));
            st.pending = Some(Pending::ReorderTop { count, cards });
            emits.push(Notification::prompt(actor, "Commit an order."));
        }
        EffectSpec::CoverTop => {
            let Some(card) = st.draw_top() else {
                st.log_line("The deck is already bare.", emits);
                end_or_next(st, emits);
                return;
            };
            st.discard.push(CardRef::Covered { card, owner: actor });
            score::peek_intel(st, actor, card);
            emits.push(Notification::all(Event::SilentDiscard {
                by: actor,
                cards: vec![card],
            }));
            emits.push(Notification::to(actor, Event::CoveredCards {
                cards: vec![card],
            }));
            st.log_line(
                format!("{} buries the top card face down.", st.seat_name(actor)),
                emits,
            );
            check_hot(st, emits);
            end_or_next(st, emits);
        }
        EffectSpec::CoverPick => {
            let count = top_window(st);
            if count == 0 {
                st.log_line("The deck is already bare.", emits);
                end_or_next(st, emits);
                return;
            }
            let cards: Vec<CardId> = st.deck.iter().rev().take(count).copied().collect();
            emits.push(Notification::to(actor, Event::TopCards {
                cards: cards.clone(),
            }));
            st.pending = Some(Pending::CoverPick { count, cards });
            emits.push(Notification::prompt(actor, "Choose what to bury."));
        }
        EffectSpec::ThresholdShowdown { bonus } => {
            if st.deck.len() <= st.hot_threshold {
                if bonus {
                    st.showdown_bonus = Some(actor);
                    st.log_line(
                        format!("{} claims the herald's favor.", st.seat_name(actor)),
                        emits,
                    );
                }
                st.log_line(
                    format!("{} forces the showdown.", st.seat_name(actor)),
                    emits,
                );
                showdown::run_showdown(st);
            } else {
                st.log_line("The threat rings hollow.", emits);
                end_or_next(st, emits);
            }
        }
        EffectSpec::Predict => {
            st.pending = Some(Pending::Predict { caster: actor });
        }
        EffectSpec::Abdicate => {
            st.next_round_start = Some(actor.index());
            st.log_line(
                format!(
                    "{} abdicates and claims the next opening seat.",
                    st.seat_name(actor)
                ),
                emits,
            );
            st.eliminate(actor, "abdicated", actor, emits);
            end_or_next(st, emits);
        }
        EffectSpec::FreezeTarget => {
            st.pending = Some(Pending::FreezeTarget);
        }
        EffectSpec::FreezeAll => {
            let seats: Vec<PlayerId> = st
                .living()
                .filter(|p| p.id != actor)
                .map(|p| p.id)
                .collect();
            let mut frozen = 0;
            for seat in seats {
                if st.guard(seat, false, false).blocked() {
                    continue;
                }
                if let Some(p) = st.player_mut(seat) {
                    p.frozen = true;
                    frozen += 1;
                }
            }
            st.log_line(
                format!("{} freezes {frozen} seat(s).", st.seat_name(actor)),
                emits,
            );
            end_or_next(st, emits);
        }
    }
}

/// How many top cards the deck-manipulation effects handle: half the
/// living seats, rounded up, at least one and never more than the deck.
fn top_window(st: &GameState) -> usize {
    let alive = st.alive_count();
    (alive.div_ceil(2)).max(1).min(st.deck.len())
}
