//! Rush mode: bell respins with momentum

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::outcome::OutcomeSource;
use crate::symbols::GRID_SLOTS;

/// Rush grid. `None` is an unfilled slot, distinct from a zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellGrid {
    slots: [Option<i64>; GRID_SLOTS],
}

impl BellGrid {
    /// Empty grid
    pub fn new() -> Self {
        Self {
            slots: [None; GRID_SLOTS],
        }
    }

    /// All slots in order
    pub fn slots(&self) -> &[Option<i64>] {
        &self.slots
    }

    /// Fill a slot; returns false if it was already filled or out of range
    pub fn fill(&mut self, position: usize, value: i64) -> bool {
        match self.slots.get_mut(position) {
            Some(slot) if slot.is_none() => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Positions still unfilled
    pub fn unfilled(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of filled slots; unfilled contribute zero
    pub fn total(&self) -> i64 {
        self.slots
            .iter()
            .flatten()
            .fold(0i64, |total, &value| total.saturating_add(value))
    }
}

impl Default for BellGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Completed rush round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushOutcome {
    /// Sum of every filled slot
    pub total_win: i64,
    /// Respin iterations consumed
    pub respins: u32,
    /// Filled slots at exit
    pub filled: usize,
    /// Bells that started the round
    pub prefilled: usize,
    /// Final grid
    pub bells: BellGrid,
}

/// One rush round in progress.
///
/// Mirrors the hold-and-win flow: activate with the triggering bells, respin
/// until the budget runs out or the grid fills, then settle.
pub struct RushRound<'a> {
    config: &'a GameConfig,
    stake: i64,
    grid: BellGrid,
    prefilled: usize,
    remaining_respins: u32,
    total_respins: u32,
}

impl<'a> RushRound<'a> {
    /// Start a round, filling the first `prefilled` slots with fresh bells
    pub fn activate<S: OutcomeSource + ?Sized>(
        config: &'a GameConfig,
        stake: i64,
        prefilled: usize,
        source: &mut S,
    ) -> Self {
        let prefilled = prefilled.min(GRID_SLOTS);
        let mut grid = BellGrid::new();
        for position in 0..prefilled {
            grid.fill(position, source.bell_value(stake, &config.bell_values));
        }

        Self {
            config,
            stake,
            grid,
            prefilled,
            remaining_respins: config.rush.initial_respins,
            total_respins: 0,
        }
    }

    /// Whether another respin will run
    pub fn is_active(&self) -> bool {
        self.remaining_respins > 0 && !self.grid.is_full()
    }

    pub fn remaining_respins(&self) -> u32 {
        self.remaining_respins
    }

    pub fn grid(&self) -> &BellGrid {
        &self.grid
    }

    /// Run one respin. Returns the number of slots filled by it.
    pub fn respin<S: OutcomeSource + ?Sized>(&mut self, source: &mut S) -> usize {
        if !self.is_active() {
            return 0;
        }

        let numerator = self.config.rush.hit_numerator;
        let denominator = self.config.rush_hit_denominator();

        let mut landed = 0;
        for position in self.grid.unfilled() {
            if source.chance(numerator, denominator) {
                let value = source.bell_value(self.stake, &self.config.bell_values);
                self.grid.fill(position, value);
                landed += 1;
            }
        }

        if landed > 0 {
            self.remaining_respins = self.config.rush.initial_respins;
        } else {
            self.remaining_respins = self.remaining_respins.saturating_sub(1);
        }
        self.total_respins += 1;

        landed
    }

    /// Settle the round
    pub fn finish(self) -> RushOutcome {
        RushOutcome {
            total_win: self.grid.total(),
            respins: self.total_respins,
            filled: self.grid.filled_count(),
            prefilled: self.prefilled,
            bells: self.grid,
        }
    }
}

/// Simulate a whole rush round from `prefilled` triggering bells
pub fn run_rush<S: OutcomeSource + ?Sized>(
    config: &GameConfig,
    stake: i64,
    prefilled: usize,
    source: &mut S,
) -> RushOutcome {
    let mut round = RushRound::activate(config, stake, prefilled, source);
    while round.is_active() {
        round.respin(source);
    }
    let outcome = round.finish();
    log::trace!(
        "rush: {} prefilled -> {} filled in {} respins, won {}",
        outcome.prefilled,
        outcome.filled,
        outcome.respins,
        outcome.total_win
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BellValueConfig, SymbolWeights};
    use crate::outcome::RandomOutcomes;
    use crate::symbols::Symbol;
    use std::collections::VecDeque;

    /// Scripted source: bell values are always one stake, hits follow a queue
    struct Scripted {
        hits: VecDeque<bool>,
    }

    impl Scripted {
        fn new(hits: &[bool]) -> Self {
            Self {
                hits: hits.iter().copied().collect(),
            }
        }
    }

    impl OutcomeSource for Scripted {
        fn symbol(&mut self, _odds: u32, _weights: &SymbolWeights) -> Symbol {
            Symbol::Empty
        }

        fn bell_value(&mut self, stake: i64, _table: &BellValueConfig) -> i64 {
            stake
        }

        fn chance(&mut self, _numerator: u32, _denominator: u32) -> bool {
            self.hits.pop_front().unwrap_or(false)
        }
    }

    #[test]
    fn test_no_hits_runs_three_respins() {
        let config = GameConfig::default();
        let mut source = Scripted::new(&[]);
        let outcome = run_rush(&config, 100, 5, &mut source);

        assert_eq!(outcome.respins, 3);
        assert_eq!(outcome.filled, 5);
        assert_eq!(outcome.total_win, 500);
    }

    #[test]
    fn test_hit_resets_budget() {
        let config = GameConfig::default();
        // 15 unfilled slots: first respin lands slot 5 only, then nothing
        let mut script = vec![true];
        script.extend(std::iter::repeat_n(false, 14));
        let mut source = Scripted::new(&script);
        let outcome = run_rush(&config, 100, 5, &mut source);

        assert_eq!(outcome.respins, 4);
        assert_eq!(outcome.filled, 6);
        assert_eq!(outcome.bells.slots()[5], Some(100));
    }

    #[test]
    fn test_full_grid_exits_immediately() {
        let config = GameConfig::default();
        let mut source = Scripted::new(&[]);
        let outcome = run_rush(&config, 100, GRID_SLOTS, &mut source);

        assert_eq!(outcome.respins, 0);
        assert_eq!(outcome.filled, GRID_SLOTS);
        assert_eq!(outcome.total_win, 100 * GRID_SLOTS as i64);
    }

    #[test]
    fn test_prefill_clamped_to_grid() {
        let config = GameConfig::default();
        let mut source = Scripted::new(&[]);
        let outcome = run_rush(&config, 1, GRID_SLOTS + 5, &mut source);
        assert_eq!(outcome.prefilled, GRID_SLOTS);
        assert_eq!(outcome.filled, GRID_SLOTS);
    }

    #[test]
    fn test_fill_rejects_filled_slot() {
        let mut grid = BellGrid::new();
        assert!(grid.fill(3, 10));
        assert!(!grid.fill(3, 20));
        assert!(!grid.fill(GRID_SLOTS, 20));
        assert_eq!(grid.total(), 10);
    }

    #[test]
    fn test_random_rounds_hold_invariants() {
        let config = GameConfig::default().with_odds(150);
        let mut source = RandomOutcomes::from_seed(77);

        for prefilled in 5..=GRID_SLOTS {
            for _ in 0..50 {
                let outcome = run_rush(&config, 100, prefilled, &mut source);
                let sum: i64 = outcome.bells.slots().iter().flatten().sum();

                assert_eq!(outcome.total_win, sum);
                assert!(outcome.bells.slots().iter().flatten().all(|&v| v >= 100));
                assert_eq!(outcome.filled, outcome.bells.filled_count());
                assert!(outcome.filled >= prefilled);
                if prefilled < GRID_SLOTS {
                    assert!(outcome.respins >= 1);
                } else {
                    assert_eq!(outcome.respins, 0);
                }
            }
        }
    }
}
