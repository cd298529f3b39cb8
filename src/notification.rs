//! Outgoing notifications handed back to the session layer.
//!
//! `apply_action` never performs I/O; every observable side effect is
//! returned as a [`Notification`] for the caller to fan out, either to the
//! whole room or to a single seat.

use crate::ids::{CardId, PlayerId};

/// Who should receive a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Audience {
    All,
    Player(PlayerId),
}

/// The event payload of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A textual log line, mirrored into the state log.
    Log { text: String },
    /// Private multi-line reveal (peeks and scans).
    Reveal { lines: Vec<String> },
    /// The actor played this card; the client may animate it.
    CardCue { card: CardId },
    /// Broadcast duel outcome.
    DuelOutcome { loser: PlayerId, card: Option<CardId> },
    /// The played card resolved its enhanced variant.
    EnhancedCue { card: CardId },
    /// Cards left a hand or the deck without a public identity reveal.
    SilentDiscard { by: PlayerId, cards: Vec<CardId> },
    /// Full-screen coin animation for one seat.
    CoinCue,
    /// Private single-hand peek result.
    HandPeek {
        caster: PlayerId,
        target: PlayerId,
        card: Option<CardId>,
    },
    /// Broadcast that a digit guess missed.
    GuessMissed {
        caster: PlayerId,
        target: PlayerId,
        digit: u8,
    },
    /// Private view of the top of the deck, top card first.
    TopCards { cards: Vec<CardId> },
    /// Echo of a committed deck reorder.
    OrderCommitted { order: Vec<usize> },
    /// Private notice of which cards the actor covered.
    CoveredCards { cards: Vec<CardId> },
    /// Targeted text prompt (e.g. "your flip").
    Prompt { text: String },
}

/// One outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    pub to: Audience,
    pub event: Event,
}

impl Notification {
    pub fn all(event: Event) -> Self {
        Self { to: Audience::All, event }
    }

    pub fn to(player: PlayerId, event: Event) -> Self {
        Self { to: Audience::Player(player), event }
    }

    pub fn log(text: impl Into<String>) -> Self {
        Self::all(Event::Log { text: text.into() })
    }

    pub fn prompt(player: PlayerId, text: impl Into<String>) -> Self {
        Self::to(player, Event::Prompt { text: text.into() })
    }
}
