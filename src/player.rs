//! Per-seat player state.

use crate::ids::{CardId, PlayerId};

/// One seat's state. Identity metadata (`name`, `avatar`) and `gold`
/// survive round transitions; everything else is rebuilt each round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: u8,

    pub alive: bool,
    /// Immune to hostile effects; cleared at the owner's next draw.
    pub protected: bool,
    /// Absorbs the next hostile effect, then is consumed.
    pub dodging: bool,
    /// Next play restricted to the freshly drawn card.
    pub frozen: bool,
    /// Next draw-phase turn is skipped.
    pub skip_next: bool,
    /// Marked by the infection window; converts to `infection_armed` at the
    /// owner's next draw.
    pub infected: bool,
    /// Armed infection: an odd play this turn eliminates, an even one clears.
    pub infection_armed: bool,

    /// Concealed held card.
    pub hand: Option<CardId>,
    /// Transient drawn card, present only during the owner's choose phase.
    pub drawn: Option<CardId>,

    pub gold: u32,
}

impl Player {
    /// Fresh seat with default identity metadata.
    pub fn new(index: usize) -> Self {
        Self {
            id: PlayerId::from_index(index),
            name: format!("P{}", index + 1),
            avatar: (index % 8) as u8 + 1,
            alive: true,
            protected: false,
            dodging: false,
            frozen: false,
            skip_next: false,
            infected: false,
            infection_armed: false,
            hand: None,
            drawn: None,
            gold: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let p = Player::new(2);
        assert_eq!(p.id, PlayerId(2));
        assert_eq!(p.name, "P3");
        assert_eq!(p.avatar, 3);
        assert!(p.alive);
        assert!(p.hand.is_none());
        assert_eq!(p.gold, 0);
    }
}
