//! Season statistics ledger, round rewards, and season finalization.
//!
//! Every scoring call is an additive update keyed by seat. Magnitudes are
//! the ones the effect resolvers use: tail differentials with an optional
//! +1 boost, a x2 ignore-defense factor, and a multi-kill factor, applied
//! in exactly that order.

use crate::card::{tail, tail_opt};
use crate::game_state::{GameState, TurnPhase};
use crate::ids::{CardId, PlayerId};

/// Live per-seat statistic categories plus the season-end survival inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StatLine {
    pub coin: u32,
    pub attack: u32,
    pub defense: u32,
    pub hit: u32,
    pub intel: u32,
    pub survival_turns: u32,
    pub reached_final: bool,
    pub won_final: bool,
}

impl StatLine {
    /// Survival score derived at season end: turns survived, doubled for
    /// reaching the final showdown and doubled again for winning it.
    pub fn survival_score(&self) -> u32 {
        let reached = if self.reached_final { 2 } else { 1 };
        let won = if self.won_final { 2 } else { 1 };
        self.survival_turns * reached * won
    }
}

/// One row of the finalized season scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreRow {
    pub seat: PlayerId,
    pub coin: u32,
    pub attack: u32,
    pub defense: u32,
    pub hit: u32,
    pub intel: u32,
    pub survival: u32,
}

/// One entry of the gold ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct RankEntry {
    pub seat: PlayerId,
    pub name: String,
    pub avatar: u8,
    pub coins: u32,
}

/// The frozen season scoreboard, produced when the chest empties.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonFinal {
    pub season_no: u32,
    pub ranking: Vec<RankEntry>,
    pub scoreboard: Vec<ScoreRow>,
}

/// Multiplicative bonuses a duel kill can carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuelBonuses {
    pub boost: bool,
    pub ignore_defense: bool,
    pub multi_kill: u32,
}

fn stat_mut(st: &mut GameState, seat: PlayerId) -> Option<&mut StatLine> {
    st.stats.get_mut(seat.index())
}

fn duel_score(mine: Option<CardId>, theirs: Option<CardId>, bonuses: DuelBonuses) -> u32 {
    let mut base = (tail_opt(mine) as u32).saturating_sub(tail_opt(theirs) as u32);
    if bonuses.boost {
        base += 1;
    }
    if bonuses.ignore_defense {
        base *= 2;
    }
    if bonuses.multi_kill > 1 {
        base *= bonuses.multi_kill;
    }
    base
}

/// Attack score for winning a duel.
pub fn duel_attack(
    st: &mut GameState,
    by: PlayerId,
    mine: Option<CardId>,
    theirs: Option<CardId>,
    bonuses: DuelBonuses,
) {
    let gain = duel_score(mine, theirs, bonuses);
    if let Some(s) = stat_mut(st, by) {
        s.attack += gain;
    }
}

/// Defense score for winning a duel from the defending side.
pub fn duel_reversal(
    st: &mut GameState,
    defender: PlayerId,
    mine: Option<CardId>,
    theirs: Option<CardId>,
    bonuses: DuelBonuses,
) {
    let gain = duel_score(mine, theirs, bonuses);
    if let Some(s) = stat_mut(st, defender) {
        s.defense += gain;
    }
}

/// Defense score for blocking a hostile card outright: the blocked card's
/// tail.
pub fn defense_block(st: &mut GameState, defender: PlayerId, blocked_card: CardId) {
    if let Some(s) = stat_mut(st, defender) {
        s.defense += tail(blocked_card) as u32;
    }
}

/// Hit score for a correct digit guess, scaled by the chain streak.
pub fn guess_hit(st: &mut GameState, by: PlayerId, target_card: CardId, streak: u32) {
    if let Some(s) = stat_mut(st, by) {
        s.hit += tail(target_card) as u32 * streak.max(1);
    }
}

/// Hit score for a kill through a forced discard: double the thrown tail.
pub fn discard_kill(st: &mut GameState, by: PlayerId, thrown: CardId) {
    if let Some(s) = stat_mut(st, by) {
        s.hit += tail(thrown) as u32 * 2;
    }
}

/// Hit score for a correct winner prediction: five per coin won.
pub fn predict_payout(st: &mut GameState, by: PlayerId, coins: u32) {
    if let Some(s) = stat_mut(st, by) {
        s.hit += coins * 5;
    }
}

/// Intel score for seeing a concealed card.
pub fn peek_intel(st: &mut GameState, by: PlayerId, seen: CardId) {
    if let Some(s) = stat_mut(st, by) {
        s.intel += tail(seen) as u32;
    }
}

/// One survival turn for the seat whose draw phase arrived.
pub fn survival_turn(st: &mut GameState, seat: PlayerId) {
    if let Some(s) = stat_mut(st, seat) {
        s.survival_turns += 1;
    }
}

pub fn mark_reached_final(st: &mut GameState, seat: PlayerId) {
    if let Some(s) = stat_mut(st, seat) {
        s.reached_final = true;
    }
}

pub fn mark_won_final(st: &mut GameState, seat: PlayerId) {
    if let Some(s) = stat_mut(st, seat) {
        s.won_final = true;
    }
}

/// Grant the round reward: base 1, plus kills credited during the winner's
/// final turn, plus the accumulated showdown tie bonus, clamped to the
/// chest. A correct prediction earns its holder a matching clamped share.
/// Emptying the chest finalizes the season.
pub fn award_round(st: &mut GameState, winner: PlayerId, tie_bonus: u32) {
    let bonus_kills = st.turn_kills.get(winner.index()).copied().unwrap_or(0);
    let mut gain = 1 + bonus_kills + tie_bonus;

    if st.chest_left == 0 {
        st.log.push("The chest is empty; no coins to claim.".to_string());
        return;
    }
    gain = gain.min(st.chest_left);
    if let Some(p) = st.player_mut(winner) {
        p.gold += gain;
    }
    st.chest_left -= gain;
    if let Some(s) = stat_mut(st, winner) {
        s.coin += gain;
    }
    st.log.push(format!(
        "Round winner: P{} +{gain} gold (base 1 + kills {bonus_kills}{}) -> chest {} left",
        winner.index() + 1,
        if tie_bonus > 0 {
            format!(" + tie bonus {tie_bonus}")
        } else {
            String::new()
        },
        st.chest_left
    ));

    if let Some(pred) = st.prediction
        && pred.pick == winner
    {
        if st.chest_left > 0 {
            let share = gain.min(st.chest_left);
            if let Some(p) = st.player_mut(pred.by) {
                p.gold += share;
            }
            st.chest_left -= share;
            if let Some(s) = stat_mut(st, pred.by) {
                s.coin += share;
            }
            predict_payout(st, pred.by, share);
            st.log.push(format!(
                "Correct prediction: P{} also gains {share}",
                pred.by.index() + 1
            ));
        } else {
            st.log
                .push("Correct prediction, but the chest is already empty.".to_string());
        }
    }

    if st.chest_left == 0 {
        finalize_season(st);
    }
}

/// Freeze the season scoreboard and force the round ended.
pub fn finalize_season(st: &mut GameState) {
    let scoreboard = st
        .stats
        .iter()
        .enumerate()
        .map(|(i, s)| ScoreRow {
            seat: PlayerId::from_index(i),
            coin: s.coin,
            attack: s.attack,
            defense: s.defense,
            hit: s.hit,
            intel: s.intel,
            survival: s.survival_score(),
        })
        .collect();

    let mut ranking: Vec<RankEntry> = st
        .players
        .iter()
        .map(|p| RankEntry {
            seat: p.id,
            name: p.name.clone(),
            avatar: p.avatar,
            coins: p.gold,
        })
        .collect();
    ranking.sort_by(|a, b| b.coins.cmp(&a.coins));

    st.season_final = Some(SeasonFinal {
        season_no: st.season_no,
        ranking,
        scoreboard,
    });
    st.phase = TurnPhase::Ended;
    st.log
        .push("The chest is empty: season scoreboard finalized.".to_string());
}
