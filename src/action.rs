//! Inbound actions: the complete client-intent vocabulary.

use crate::ids::PlayerId;

/// Which of the two held cards a play refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaySource {
    Hand,
    Drawn,
}

/// The action kinds the dispatcher recognizes. Anything else a client sends
/// is the session layer's problem; an unrecognized kind for the current
/// phase or pending interaction is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Begin the next round once the current one has ended.
    StartRound,
    /// Draw the turn card.
    Draw,
    /// Play one of the two held cards.
    PlayCard { which: PlaySource },
    /// Complete a pending interaction by nominating a seat.
    PickTarget { target: PlayerId },
    /// Complete a pending guess with a digit 0..=9.
    PickDigit { digit: u8 },
    /// Take or decline the second duel attempt.
    SecondDuel { target: Option<PlayerId> },
    /// Self coin-flip trigger.
    FlipCoin,
    /// Propagated coin-flip trigger (the designated flipper acts).
    ChainCoinFlip,
    /// Commit a deck reorder: a permutation of indices, 0 = top.
    CommitOrder { order: Vec<usize> },
    /// Commit a multi-pick: indices into the shown top cards, 0 = top.
    CommitPicks { picked: Vec<usize> },
    /// Binary choice (confirm a swap or duel, pay or refuse).
    Choose { choice: bool },
    /// Abandon a cancellable pending interaction and end the turn.
    Cancel,
}

/// One client intent. Room scoping lives in the session layer; the engine
/// receives exactly one state per call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub player: PlayerId,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(player: PlayerId, kind: ActionKind) -> Self {
        Self { player, kind }
    }
}
