//! Cutlass - self-play driver.
//!
//! Runs seeded bot games against the engine and prints the round log,
//! optionally with a JSON dump of one seat's redacted view.
//!
//! ## Usage
//!
//! ```
//! cutlass [OPTIONS]
//!
//! Options:
//!   --seats N     Number of players (default 4)
//!   --seed N      RNG seed (default 1)
//!   --rounds N    Stop after N rounds even if the season runs on (default 20)
//!   --json        Print player 0's redacted view of the final state
//! ```

use cutlass::decision::Pending;
use cutlass::{
    Action, ActionKind, GameState, PlaySource, PlayerId, TurnPhase, apply_action,
    create_initial_state_seeded, get_visible_state,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::process;

struct Options {
    seats: usize,
    seed: u64,
    rounds: u32,
    json: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        seats: 4,
        seed: 1,
        rounds: 20,
        json: false,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seats" => {
                let v = args.next().ok_or("--seats needs a value")?;
                opts.seats = v.parse().map_err(|_| format!("bad seat count: {v}"))?;
            }
            "--seed" => {
                let v = args.next().ok_or("--seed needs a value")?;
                opts.seed = v.parse().map_err(|_| format!("bad seed: {v}"))?;
            }
            "--rounds" => {
                let v = args.next().ok_or("--rounds needs a value")?;
                opts.rounds = v.parse().map_err(|_| format!("bad round count: {v}"))?;
            }
            "--json" => opts.json = true,
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(opts)
}

/// One plausible action for the current state, or `None` once the round
/// has ended.
fn bot_action(st: &GameState, rng: &mut StdRng) -> Option<Action> {
    if st.phase == TurnPhase::Ended {
        return None;
    }
    if let Some(pending) = &st.pending {
        let responder = pending.responder(st);
        let others: Vec<PlayerId> = st
            .living()
            .filter(|p| p.id != responder)
            .map(|p| p.id)
            .collect();
        let target = if others.is_empty() {
            responder
        } else {
            others[rng.random_range(0..others.len())]
        };
        let kind = match pending {
            Pending::GuessDigit { .. } => ActionKind::PickDigit {
                digit: [0u8, 2, 3, 4, 5, 6, 7, 8, 9][rng.random_range(0..9)],
            },
            Pending::Duel {
                first_done: true, ..
            } => ActionKind::SecondDuel {
                target: others.first().copied(),
            },
            Pending::SwapConfirm { .. }
            | Pending::StripDuelConfirm { .. }
            | Pending::ExtortChoice { .. } => ActionKind::Choose {
                choice: rng.random_bool(0.5),
            },
            Pending::CoinSelf => ActionKind::FlipCoin,
            Pending::CoinChain { .. } => ActionKind::ChainCoinFlip,
            Pending::ReorderTop { count, .. } => {
                let mut order: Vec<usize> = (0..*count).collect();
                order.reverse();
                ActionKind::CommitOrder { order }
            }
            Pending::CoverPick { .. } => ActionKind::CommitPicks { picked: vec![0] },
            _ => ActionKind::PickTarget { target },
        };
        return Some(Action::new(responder, kind));
    }
    let seat = PlayerId::from_index(st.turn_index);
    match st.phase {
        TurnPhase::Draw => Some(Action::new(seat, ActionKind::Draw)),
        TurnPhase::Choose => Some(Action::new(seat, ActionKind::PlayCard {
            which: if rng.random_bool(0.5) {
                PlaySource::Hand
            } else {
                PlaySource::Drawn
            },
        })),
        TurnPhase::Ended => None,
    }
}

fn main() {
    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    let mut st = create_initial_state_seeded(opts.seats, opts.seed);
    let mut rng = StdRng::seed_from_u64(opts.seed.wrapping_add(1));
    let mut printed = 0;

    'season: for _ in 0..opts.rounds {
        for _ in 0..10_000 {
            let Some(action) = bot_action(&st, &mut rng) else {
                break;
            };
            st = apply_action(&st, &action).state;
            while printed < st.log.len() {
                println!("{}", st.log[printed]);
                printed += 1;
            }
        }
        if st.season_final.is_some() {
            break 'season;
        }
        st = apply_action(&st, &Action::new(PlayerId(0), ActionKind::StartRound)).state;
        while printed < st.log.len() {
            println!("{}", st.log[printed]);
            printed += 1;
        }
    }

    if let Some(fin) = &st.season_final {
        println!("--- season {} final ---", fin.season_no);
        for entry in &fin.ranking {
            println!("  {} ({} gold)", entry.name, entry.coins);
        }
    }

    if opts.json {
        match serde_json::to_string_pretty(&get_visible_state(&st, PlayerId(0))) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize the state: {e}");
                process::exit(1);
            }
        }
    }
}
