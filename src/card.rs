//! Static card catalog and the numeric rules derived from card ids.
//!
//! The deck is a fixed 28-card multiset over 20 distinct cards. Each card
//! carries a venue name; when that venue is among the round's active venues
//! the card resolves its enhanced effect variant instead of the base one.

use crate::ids::CardId;

/// An immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub name: &'static str,
    pub venue: &'static str,
}

/// The full catalog, indexed by card id.
///
/// Ids 10/12, 11/13, 14/15, 16/17 and 18/19 share a venue; the rest are
/// unique, for 15 distinct venues total.
pub const CATALOG: [Card; 20] = [
    Card { id: CardId(0), name: "Saboteur", venue: "Powder Magazine" },
    Card { id: CardId(1), name: "Lookout", venue: "Crow's Nest" },
    Card { id: CardId(2), name: "Informant", venue: "Hidden Archive" },
    Card { id: CardId(3), name: "Duelist", venue: "Fencing Hall" },
    Card { id: CardId(4), name: "Quartermaster", venue: "Safe Harbor" },
    Card { id: CardId(5), name: "Cutthroat", venue: "Shark Alley" },
    Card { id: CardId(6), name: "Smuggler", venue: "Fog Bank" },
    Card { id: CardId(7), name: "Stormcaller", venue: "Thunder Strait" },
    Card { id: CardId(8), name: "Captain", venue: "Boarding Deck" },
    Card { id: CardId(9), name: "Empress", venue: "Serpent Isle" },
    Card { id: CardId(10), name: "Leviathan", venue: "Demon Atoll" },
    Card { id: CardId(11), name: "Scavenger", venue: "Wreckers' Shoals" },
    Card { id: CardId(12), name: "Plaguebearer", venue: "Demon Atoll" },
    Card { id: CardId(13), name: "Reaver", venue: "Wreckers' Shoals" },
    Card { id: CardId(14), name: "Matriarch", venue: "Gilded Court" },
    Card { id: CardId(15), name: "Oracle", venue: "Gilded Court" },
    Card { id: CardId(16), name: "Frostbinder", venue: "Glacier Gate" },
    Card { id: CardId(17), name: "Shadowbroker", venue: "Glacier Gate" },
    Card { id: CardId(18), name: "Harbinger", venue: "Phantom Galleon" },
    Card { id: CardId(19), name: "Admiral", venue: "Phantom Galleon" },
];

/// Copies of each card id in the deck. Sums to [`DECK_SIZE`].
pub const COPIES: [u8; 20] = [1, 5, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];

/// Total deck size, the conserved card multiset cardinality.
pub const DECK_SIZE: usize = 28;

/// Look up a catalog entry by id.
pub fn lookup(id: CardId) -> Option<&'static Card> {
    CATALOG.get(id.index())
}

/// Venue name associated with a card id, if the id is valid.
pub fn venue_of(id: CardId) -> Option<&'static str> {
    lookup(id).map(|c| c.venue)
}

/// Human-readable label, tolerant of empty slots.
pub fn label(card: Option<CardId>) -> String {
    match card.and_then(lookup) {
        Some(c) => format!("{} | {}", c.id.0, c.name),
        None => "(no card)".to_string(),
    }
}

/// The unshuffled full deck.
pub fn full_deck() -> Vec<CardId> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for (id, &count) in COPIES.iter().enumerate() {
        for _ in 0..count {
            deck.push(CardId(id as u8));
        }
    }
    deck
}

/// Distinct venue names in catalog order.
pub fn venue_pool() -> Vec<&'static str> {
    let mut pool = Vec::new();
    for card in &CATALOG {
        if !pool.contains(&card.venue) {
            pool.push(card.venue);
        }
    }
    pool
}

/// Ones digit of a card id; the basis for duel values and most scoring.
pub fn tail(id: CardId) -> u8 {
    id.0 % 10
}

/// Ones digit treating an empty slot as zero.
pub fn tail_opt(id: Option<CardId>) -> u8 {
    id.map(tail).unwrap_or(0)
}

/// High-tail cards (tail >= 7) are the ones a silence window suppresses.
pub fn is_high_tail(id: CardId) -> bool {
    tail(id) >= 7
}

/// Showdown comparison value: ids below 10 count at face value, the rest
/// as the sum of their digits.
pub fn show_value(id: CardId) -> u8 {
    if id.0 < 10 { id.0 } else { id.0 / 10 + id.0 % 10 }
}

/// Ids 0..=9 win showdown ties against equal values from the upper band.
pub fn in_priority_band(id: CardId) -> bool {
    id.0 <= 9
}
