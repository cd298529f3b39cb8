//! Effect vocabulary: data-only descriptors for what each card does.
//!
//! Every card id maps, through [`effect_spec`], to one descriptor per
//! variant (base or enhanced). The descriptors carry only data; the
//! interpreter in [`crate::executor`] gives them meaning. This keeps the
//! twenty-way dispatch in one table instead of embedding venue conditionals
//! at every call site.

use crate::ids::CardId;

/// What a self-buff grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buff {
    /// Immune to hostile effects until the owner's next draw.
    Protection,
    /// Absorbs the next hostile effect, then is consumed.
    Dodge,
}

/// Which value a duel reads for the attacker's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelValue {
    /// The card kept in hand at play time, captured into the pending state.
    Kept,
    /// The attacker's live hand field at follow-up time.
    CurrentHand,
}

/// Whether a targeted effect respects protection and dodge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    Respect,
    Ignore,
}

/// One card effect, as data. The interpreter gives each descriptor its
/// runtime meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSpec {
    /// Grant the actor a buff.
    SelfBuff(Buff),
    /// Every living player discards their hand into the deck and redraws
    /// (protection immune, dodge consumed). Optionally opens the high-tail
    /// silence window owned by the actor.
    MassRedraw { silence: bool },
    /// Nominate a target, then guess the target's hand tail. `chain` allows
    /// a follow-up guess after each kill.
    GuessChain { chain: bool },
    /// Peek a single chosen player's hand.
    PeekOne,
    /// Peek every living player's hand at once.
    PeekAll,
    /// Single-target duel on hand tails; loser is eliminated.
    Duel {
        value: DuelValue,
        boost: bool,
        guard: GuardMode,
        second_attempt: bool,
    },
    /// Force a chosen player to discard their hand; `execute_parity` is the
    /// enhanced variant that eliminates on an even throw.
    ForcedDiscard { execute_parity: bool },
    /// Swap hands with a chosen player; `peek_first` shows the target's
    /// hand and asks for confirmation before the swap.
    SwapHands { peek_first: bool },
    /// Chosen player skips their next turn.
    SkipTarget,
    /// Discard with no further effect.
    NoOp,
    /// The actor leaves the round.
    SelfEliminate,
    /// With the companion card in hand, eliminate every other living player
    /// regardless of protection or dodge; without it, nothing happens.
    CompanionPurge,
    /// Pull a random non-Scavenger card out of the discard pile into the
    /// drawn slot and play again.
    ScavengeDiscard,
    /// Rotate hands one seat counterclockwise among unguarded players.
    RotateHands,
    /// Coin-flip obligation that propagates around the table on tails.
    CoinChain,
    /// Open the odd-play infection window owned by the actor.
    InfectionWindow,
    /// Strip a chosen player's protection and dodge; optionally offer a
    /// follow-up duel against the stripped target.
    StripGuard { duel_offer: bool },
    /// The actor flips: heads grants protection, tails grants dodge.
    CoinSelf,
    /// Chosen player pays the actor one gold or is eliminated (their call).
    Extort,
    /// Privately view the top cards of the deck.
    PeekTop { n: usize },
    /// Reorder the top cards of the deck.
    ReorderTop,
    /// Cover the top deck card into the discard, recoverable only by eye of
    /// the actor.
    CoverTop,
    /// Choose which of the top cards to cover into the discard.
    CoverPick,
    /// If the deck is at or below the hot threshold, go straight to the
    /// showdown; `bonus` also grants the actor the one-time +1.
    ThresholdShowdown { bonus: bool },
    /// Nominate the player expected to win the round.
    Predict,
    /// Leave the round and claim next round's starting seat.
    Abdicate,
    /// Freeze a chosen player (next play restricted to the drawn card).
    FreezeTarget,
    /// Freeze every other living player.
    FreezeAll,
}

/// The companion card id 10 must hold for its purge to fire.
pub const COMPANION_CARD: CardId = CardId(14);

/// The card forced by the same-hand rule, and the two ids that force it.
pub const FORCED_CARD: CardId = CardId(7);
pub const FORCING_CARDS: [CardId; 2] = [CardId(6), CardId(8)];

/// Effect descriptor for a card id in base or enhanced form.
///
/// Unknown ids fall back to a bare discard; the deck never contains any.
pub fn effect_spec(id: CardId, enhanced: bool) -> EffectSpec {
    match (id.0, enhanced) {
        (0, e) => EffectSpec::MassRedraw { silence: e },
        (1, e) => EffectSpec::GuessChain { chain: e },
        (2, false) => EffectSpec::PeekOne,
        (2, true) => EffectSpec::PeekAll,
        (3, e) => EffectSpec::Duel {
            value: DuelValue::Kept,
            boost: e,
            guard: GuardMode::Respect,
            second_attempt: false,
        },
        (4, false) => EffectSpec::SelfBuff(Buff::Protection),
        (4, true) => EffectSpec::SelfBuff(Buff::Dodge),
        (5, e) => EffectSpec::ForcedDiscard { execute_parity: e },
        (6, e) => EffectSpec::SwapHands { peek_first: e },
        (7, false) => EffectSpec::NoOp,
        (7, true) => EffectSpec::SkipTarget,
        (8, e) => EffectSpec::Duel {
            value: DuelValue::Kept,
            boost: e,
            guard: GuardMode::Respect,
            second_attempt: true,
        },
        (9, false) => EffectSpec::SelfEliminate,
        (9, true) => EffectSpec::SelfBuff(Buff::Protection),
        (10, false) => EffectSpec::Duel {
            value: DuelValue::CurrentHand,
            boost: false,
            guard: GuardMode::Ignore,
            second_attempt: false,
        },
        (10, true) => EffectSpec::CompanionPurge,
        (11, false) => EffectSpec::ScavengeDiscard,
        (11, true) => EffectSpec::RotateHands,
        (12, false) => EffectSpec::CoinChain,
        (12, true) => EffectSpec::InfectionWindow,
        (13, e) => EffectSpec::StripGuard { duel_offer: e },
        (14, false) => EffectSpec::CoinSelf,
        (14, true) => EffectSpec::Extort,
        (15, false) => EffectSpec::PeekTop { n: 3 },
        (15, true) => EffectSpec::ReorderTop,
        (16, false) => EffectSpec::FreezeTarget,
        (16, true) => EffectSpec::FreezeAll,
        (17, false) => EffectSpec::CoverTop,
        (17, true) => EffectSpec::CoverPick,
        (18, e) => EffectSpec::ThresholdShowdown { bonus: e },
        (19, false) => EffectSpec::Abdicate,
        (19, true) => EffectSpec::Predict,
        _ => EffectSpec::NoOp,
    }
}
