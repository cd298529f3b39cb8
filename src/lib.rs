//! Cutlass - an elimination card game rules engine.
//!
//! A pure state-transition core for a turn-based, hidden-hand elimination
//! game: every client intent goes through [`apply_action`], which returns
//! a successor state plus the notifications to fan out. There is no I/O,
//! no clock, and no session handling in this crate; a server wraps it and
//! a bot or test script drives it the same way a client would.

pub mod action;
pub mod card;
pub mod decision;
pub mod effect;
pub mod executor;
pub mod game_loop;
pub mod game_state;
pub mod ids;
pub mod notification;
pub mod player;
pub mod round;
pub mod score;
pub mod showdown;
pub mod turn;
pub mod visibility;


pub use action::{Action, ActionKind, PlaySource};
pub use card::{CATALOG, Card, DECK_SIZE, show_value, tail};
pub use decision::Pending;
pub use effect::{Buff, DuelValue, EffectSpec, GuardMode, effect_spec};
pub use game_loop::{ApplyResult, apply_action};
pub use game_state::{CardRef, GameState, Prediction, TurnPhase};
pub use ids::{CardId, PlayerId};
pub use notification::{Audience, Event, Notification};
pub use player::Player;
pub use round::{create_initial_state, create_initial_state_seeded, is_round_ended, next_round};
pub use score::{RankEntry, ScoreRow, SeasonFinal, StatLine};
pub use visibility::get_visible_state;
