//! Random outcome generation

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::{BellValueConfig, GameConfig, SymbolWeights};
use crate::symbols::{GRID_SLOTS, Symbol, SymbolGrid};

/// Source of every random draw a session makes.
///
/// Each simulation unit owns its own source; nothing is shared between
/// sessions.
pub trait OutcomeSource {
    /// Draw one base-game symbol
    fn symbol(&mut self, odds: u32, weights: &SymbolWeights) -> Symbol;

    /// Draw one bell value for the given stake
    fn bell_value(&mut self, stake: i64, table: &BellValueConfig) -> i64;

    /// Bernoulli trial with probability `numerator / denominator`
    fn chance(&mut self, numerator: u32, denominator: u32) -> bool;
}

/// ChaCha8-backed outcome source
#[derive(Debug, Clone)]
pub struct RandomOutcomes {
    rng: ChaCha8Rng,
    seed: u64,
    stream: u64,
}

impl RandomOutcomes {
    /// Create a source seeded from `seed`, or from the OS when `None`
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_seed(seed.unwrap_or_else(fresh_seed))
    }

    /// Create a source from an explicit seed
    pub fn from_seed(seed: u64) -> Self {
        Self::for_stream(seed, 0)
    }

    /// Create an independent stream of the seeded generator.
    ///
    /// Distinct `stream` values with the same seed never overlap.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng, seed, stream }
    }

    /// Seed used for this source
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream id used for this source
    pub fn stream(&self) -> u64 {
        self.stream
    }
}

impl OutcomeSource for RandomOutcomes {
    fn symbol(&mut self, odds: u32, weights: &SymbolWeights) -> Symbol {
        if odds == 0 {
            return Symbol::Empty;
        }
        weights.symbol_for_roll(self.rng.random_range(0..odds))
    }

    fn bell_value(&mut self, stake: i64, table: &BellValueConfig) -> i64 {
        let roll = self.rng.random_range(1..=100u32);
        if roll <= table.unit_percent {
            return stake;
        }
        let factor = self.rng.random_range(1..=table.max_factor.max(1));
        table.value_for(stake, roll, factor)
    }

    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        if denominator == 0 || numerator == 0 {
            return false;
        }
        if numerator >= denominator {
            return true;
        }
        self.rng.random_ratio(numerator, denominator)
    }
}

/// Draw a fresh base-game grid
pub fn draw_grid<S: OutcomeSource + ?Sized>(source: &mut S, config: &GameConfig) -> SymbolGrid {
    let mut slots = [Symbol::Empty; GRID_SLOTS];
    for slot in &mut slots {
        *slot = source.symbol(config.odds, &config.weights);
    }
    SymbolGrid::new(slots)
}

/// Draw a seed from the OS for unseeded runs
pub fn fresh_seed() -> u64 {
    rand::rng().random()
}
