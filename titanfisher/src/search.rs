//! Turn-by-turn exploration over a frontier of game states. Each call to
//! `next_turn` expands every frontier state through `next_states` until all
//! successors have crossed the turn boundary or a terminal state shows up.
//! The global meter bounds the whole thing: when it trips, the search bails
//! out cooperatively and the trial records an overflow instead of a result.

use std::collections::BTreeMap;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::deck::Decklist;
use crate::state::{GameError, GameState, StateSet};

/// Process-wide search accounting. Every state construction ticks the
/// counter; the turn driver reads it between yields. The search itself is
/// single-threaded, so the meter is thread-scoped: one trial owns one
/// thread from its `reset_clock` to its last state, and parallel trials
/// (the CLI runs them on a rayon pool) never clobber each other.
pub mod meter {
    use std::cell::RefCell;
    use std::time::Instant;

    #[derive(Clone, Copy, Debug)]
    pub struct SearchLimits {
        pub max_states: u64,
        pub max_millis: u128,
    }

    impl Default for SearchLimits {
        fn default() -> Self {
            SearchLimits {
                max_states: 200_000,
                max_millis: 60_000,
            }
        }
    }

    struct Meter {
        created: u64,
        start: Instant,
        limits: SearchLimits,
    }

    thread_local! {
        static METER: RefCell<Meter> = RefCell::new(Meter {
            created: 0,
            start: Instant::now(),
            limits: SearchLimits::default(),
        });
    }

    pub fn configure(limits: SearchLimits) {
        METER.with(|meter| meter.borrow_mut().limits = limits);
    }

    pub(crate) fn reset() {
        METER.with(|meter| {
            let mut meter = meter.borrow_mut();
            meter.created = 0;
            meter.start = Instant::now();
        });
    }

    pub(crate) fn tick() {
        METER.with(|meter| meter.borrow_mut().created += 1);
    }

    pub fn states_created() -> u64 {
        METER.with(|meter| meter.borrow().created)
    }

    pub fn elapsed_ms() -> u128 {
        METER.with(|meter| meter.borrow().start.elapsed().as_millis())
    }

    pub(crate) fn exceeded() -> bool {
        METER.with(|meter| {
            let meter = meter.borrow();
            meter.created > meter.limits.max_states
                || meter.start.elapsed().as_millis() > meter.limits.max_millis
        })
    }

    pub fn performance() -> String {
        format!(
            "{} states in {:.2}s",
            states_created(),
            elapsed_ms() as f64 / 1000.0
        )
    }
}

impl StateSet {
    /// Expands every member until each successor has advanced past the
    /// current turn or is terminal. Short-circuits to a singleton as soon
    /// as a goal or overflow state appears. Raises `GameError::Overflow`
    /// when the meter trips, after logging the deepest line reached.
    pub fn next_turn(&self, max_turns: u32) -> Result<StateSet, GameError> {
        let turn = match self.turn() {
            Some(turn) => turn,
            None => return Ok(StateSet::new()),
        };
        let mut work = if turn == max_turns {
            StateSet::new()
        } else {
            self.clone()
        };
        let mut crossed = StateSet::new();
        while let Some(state) = work.pop() {
            for successor in state.next_states(max_turns)? {
                if successor.done() || successor.overflowed() {
                    return Ok(StateSet::from(successor));
                }
                if successor.turn() > turn {
                    crossed.insert(successor);
                } else {
                    work.insert(successor);
                }
                if meter::exceeded() {
                    if let Some(deepest) = crossed.longest_trace().or_else(|| work.longest_trace())
                    {
                        let deepest = deepest.overflow();
                        debug!("deepest line at overflow:{}", deepest.notes());
                    }
                    return Err(GameError::Overflow {
                        states: meter::states_created(),
                        elapsed_ms: meter::elapsed_ms(),
                    });
                }
            }
        }
        Ok(crossed)
    }
}

/// The per-trial result record: `true` means the goal fell on that turn,
/// `false` means the frontier survived the turn without it, `None` means
/// the search overflowed at that turn or later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub on_the_play: bool,
    pub turns: BTreeMap<u32, Option<bool>>,
}

impl Summary {
    pub fn win_turn(&self) -> Option<u32> {
        self.turns
            .iter()
            .find_map(|(turn, outcome)| match outcome {
                Some(true) => Some(*turn),
                _ => None,
            })
    }

    pub fn overflowed(&self) -> bool {
        self.turns.values().any(|outcome| outcome.is_none())
    }

    pub fn headline(&self) -> String {
        let side = if self.on_the_play {
            "on the play"
        } else {
            "on the draw"
        };
        for (turn, outcome) in self.turns.iter() {
            match outcome {
                Some(true) => return format!("turn {turn} success {side}"),
                None => return format!("turn {turn} overflow {side}"),
                Some(false) => {}
            }
        }
        match self.turns.keys().last() {
            Some(turn) => format!("turn {turn} failure {side}"),
            None => format!("no turns searched {side}"),
        }
    }
}

/// A finished trial: the record plus the state that witnesses it — the goal
/// state on success, the overflow-flagged initial state on overflow, the
/// initial state otherwise.
#[derive(Clone, Debug)]
pub struct Simulation {
    pub summary: Summary,
    pub state: GameState,
}

impl Simulation {
    /// The witnessing play sequence, present only when the goal was reached.
    pub fn trace(&self) -> Option<&str> {
        if self.state.done() {
            Some(self.state.notes())
        } else {
            None
        }
    }
}

pub fn simulate(
    decklist: &Decklist,
    rng: &mut impl Rng,
    max_turns: u32,
) -> Result<Simulation, GameError> {
    simulate_with(decklist, rng, max_turns, meter::SearchLimits::default())
}

/// Runs one trial: shuffle, draw seven, then search one turn at a time up
/// to `max_turns`. Overflow is not fatal; it truncates the record with
/// `None` entries. Missing handlers and other programmer errors abort the
/// trial with `Err`.
pub fn simulate_with(
    decklist: &Decklist,
    rng: &mut impl Rng,
    max_turns: u32,
    limits: meter::SearchLimits,
) -> Result<Simulation, GameError> {
    meter::configure(limits);
    let mut deck = decklist.cards()?;
    deck.shuffle(rng);
    let on_the_play = rng.gen::<bool>();

    let initial = GameState::new(deck, on_the_play, true).draw(7);
    let initial = initial.note(&format!("hand: {}", initial.hand()));
    let mut summary = Summary {
        on_the_play,
        turns: BTreeMap::new(),
    };

    let mut frontier = initial.pass_turn()?;
    for turn in 1..=max_turns {
        match frontier.next_turn(turn + 1) {
            Ok(next) => {
                if let Some(winner) = next.winner() {
                    summary.turns.insert(turn, Some(true));
                    debug!("goal on turn {turn}:{}", winner.notes());
                    return Ok(Simulation {
                        summary,
                        state: winner.clone(),
                    });
                }
                debug!(
                    "turn {turn}: frontier of {count} states, {performance}",
                    count = next.len(),
                    performance = meter::performance(),
                );
                summary.turns.insert(turn, Some(false));
                frontier = next;
            }
            Err(GameError::Overflow { states, elapsed_ms }) => {
                warn!("overflow searching turn {turn}: {states} states in {elapsed_ms}ms");
                for late in turn..=max_turns {
                    summary.turns.insert(late, None);
                }
                return Ok(Simulation {
                    summary,
                    state: initial.overflow(),
                });
            }
            Err(fatal) => return Err(fatal),
        }
    }
    Ok(Simulation {
        summary,
        state: initial,
    })
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::card::Card;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn named(names: &[&str]) -> Vec<Card> {
        names.iter().map(|name| Card::named(name)).collect()
    }

    fn padded(opening: &[&str], filler: &str, total: usize) -> Vec<Card> {
        let mut deck = named(opening);
        while deck.len() < total {
            deck.push(Card::named(filler));
        }
        deck
    }

    #[test]
    fn it_finds_the_turn_two_titan_line() {
        // the classic: two amulets never needed, one is enough with bloom
        // bouncing the chamber through itself three times
        let deck = padded(
            &["Forest", "Forest", "Amulet of Vigor", "Amulet of Vigor",
              "Simic Growth Chamber", "Summer Bloom", "Primeval Titan"],
            "Forest",
            20,
        );
        meter::configure(meter::SearchLimits::default());
        let initial = GameState::new(deck, true, true).draw(7);
        let frontier = initial.pass_turn().unwrap();

        let after_one = frontier.next_turn(2).unwrap();
        assert_eq!(true, after_one.winner().is_none());
        assert_eq!(Some(2), after_one.turn());

        let after_two = after_one.next_turn(3).unwrap();
        let winner = match after_two.winner() {
            Some(winner) => winner,
            None => panic!("expected a turn-two goal"),
        };
        assert_eq!(2, winner.turn());
        assert_eq!(true, winner.notes().contains("cast Primeval Titan"));
    }

    #[test]
    fn it_records_false_for_a_hand_that_cannot_keep_a_board() {
        // no lands anywhere: every line dies at the first turn boundary
        let decklist = Decklist {
            entries: vec![
                ("Amulet of Vigor".to_string(), 10),
                ("Summer Bloom".to_string(), 10),
            ],
            colors: None,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = simulate(&decklist, &mut rng, 3).unwrap();
        assert_eq!(None, outcome.summary.win_turn());
        assert_eq!(false, outcome.summary.overflowed());
        assert_eq!(
            vec![Some(false), Some(false), Some(false)],
            outcome.summary.turns.values().copied().collect::<Vec<_>>()
        );
        assert_eq!(None, outcome.trace());
    }

    #[test]
    fn it_raises_overflow_from_the_driver() {
        let deck = padded(&[], "Forest", 30);
        let mut state = GameState::new(deck, true, true);
        state.hand = named(&[
            "Simic Growth Chamber", "Gruul Turf", "Golgari Rot Farm",
            "Gemstone Mine", "Forest", "Forest",
        ]).into_iter().collect();
        state.battlefield = named(&["Amulet of Vigor", "Forest"]).into_iter().collect();
        state.turn = 1;
        state.land_drops = 1;

        meter::configure(meter::SearchLimits { max_states: 30, max_millis: 60_000 });
        meter::reset();
        let result = StateSet::from(state).next_turn(2);
        assert_eq!(true, matches!(result, Err(GameError::Overflow { .. })));
        meter::configure(meter::SearchLimits::default());
    }

    #[test]
    fn it_overflows_and_records_null_from_that_turn_on() {
        // every hand from an all-lands deck branches enough to walk a tiny
        // cumulative state cap off a cliff within a couple of turns
        let decklist = Decklist {
            entries: vec![
                ("Simic Growth Chamber".to_string(), 10),
                ("Gruul Turf".to_string(), 10),
                ("Golgari Rot Farm".to_string(), 10),
                ("Gemstone Mine".to_string(), 10),
                ("Khalni Garden".to_string(), 10),
                ("Forest".to_string(), 10),
            ],
            colors: None,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let limits = meter::SearchLimits { max_states: 50, max_millis: 60_000 };
        let outcome = simulate_with(&decklist, &mut rng, 4, limits).unwrap();

        assert_eq!(true, outcome.summary.overflowed());
        assert_eq!(true, outcome.state.overflowed());
        assert_eq!(None, outcome.summary.win_turn());
        assert_eq!(4, outcome.summary.turns.len());
        // every turn from the overflow on is null
        let mut seen_null = false;
        for recorded in outcome.summary.turns.values() {
            if recorded.is_none() {
                seen_null = true;
            }
            assert_eq!(seen_null, recorded.is_none());
        }
        assert_eq!(true, seen_null);
    }

    #[test]
    fn it_short_circuits_the_driver_on_a_goal() {
        let deck = padded(&["Forest"], "Forest", 10);
        meter::configure(meter::SearchLimits::default());
        let mut state = GameState::new(deck, true, true);
        state.battlefield = named(&["Forest"]).into_iter().collect();
        state.turn = 1;
        let goal = state.win();
        let frontier = StateSet::from(goal);
        let driven = frontier.next_turn(2).unwrap();
        assert_eq!(1, driven.len());
        assert_eq!(true, driven.winner().is_some());
    }

    #[test]
    fn it_yields_only_advanced_or_terminal_states() {
        let deck = padded(
            &["Forest", "Forest", "Explore", "Amulet of Vigor", "Tranquil Thicket",
              "Khalni Garden", "Gemstone Mine"],
            "Forest",
            20,
        );
        meter::configure(meter::SearchLimits::default());
        let initial = GameState::new(deck, true, true).draw(7);
        let frontier = initial.pass_turn().unwrap();
        let turn = frontier.turn().unwrap_or(0);
        let next = frontier.next_turn(turn + 1).unwrap();
        assert_eq!(false, next.is_empty());
        for state in next.iter() {
            assert_eq!(true, state.turn() > turn);
        }
    }

    #[test]
    fn it_summarizes_headlines() {
        let mut turns = BTreeMap::new();
        turns.insert(1, Some(false));
        turns.insert(2, Some(true));
        let summary = Summary { on_the_play: true, turns };
        assert_eq!("turn 2 success on the play", summary.headline());
        assert_eq!(Some(2), summary.win_turn());

        let mut turns = BTreeMap::new();
        turns.insert(1, Some(false));
        turns.insert(2, None);
        let summary = Summary { on_the_play: false, turns };
        assert_eq!("turn 2 overflow on the draw", summary.headline());

        let mut turns = BTreeMap::new();
        turns.insert(1, Some(false));
        let summary = Summary { on_the_play: false, turns };
        assert_eq!("turn 1 failure on the draw", summary.headline());
    }
}
