//! Game configuration: odds knob, symbol weights, paytable and rush parameters

use serde::{Deserialize, Serialize};

use crate::symbols::{GRID_SLOTS, Symbol};
use crate::{ConfigError, Result};

/// Weight of each favourable symbol out of an `odds`-sized roll.
///
/// A roll uniform in `[0, odds)` is mapped onto consecutive bands in the
/// order Bell, Crown, Star, Heart, Diamond; anything past the last band is
/// `Empty`. Raising the odds knob widens only the empty band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolWeights {
    pub bell: u32,
    pub crown: u32,
    pub star: u32,
    pub heart: u32,
    pub diamond: u32,
}

impl Default for SymbolWeights {
    fn default() -> Self {
        Self {
            bell: 20,
            crown: 15,
            star: 10,
            heart: 8,
            diamond: 5,
        }
    }
}

impl SymbolWeights {
    /// Sum of all favourable bands
    pub fn favourable_total(&self) -> u32 {
        self.bell + self.crown + self.star + self.heart + self.diamond
    }

    /// Map a roll in `[0, odds)` to a symbol
    pub fn symbol_for_roll(&self, roll: u32) -> Symbol {
        let bands = [
            (self.bell, Symbol::Bell),
            (self.crown, Symbol::Crown),
            (self.star, Symbol::Star),
            (self.heart, Symbol::Heart),
            (self.diamond, Symbol::Diamond),
        ];
        let mut upper = 0u32;
        for (weight, symbol) in bands {
            upper += weight;
            if roll < upper {
                return symbol;
            }
        }
        Symbol::Empty
    }

    /// Probability of drawing `symbol` at the given odds
    pub fn probability(&self, symbol: Symbol, odds: u32) -> f64 {
        if odds == 0 {
            return 0.0;
        }
        let weight = match symbol {
            Symbol::Bell => self.bell,
            Symbol::Crown => self.crown,
            Symbol::Star => self.star,
            Symbol::Heart => self.heart,
            Symbol::Diamond => self.diamond,
            Symbol::Empty => odds.saturating_sub(self.favourable_total()),
        };
        weight as f64 / odds as f64
    }
}

/// Bell value distribution (multiples of the hand size)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BellValueConfig {
    /// Percent of draws that return exactly one stake
    pub unit_percent: u32,
    /// Largest stake multiple for the remaining draws (smallest is 1)
    pub max_factor: u32,
}

impl Default for BellValueConfig {
    fn default() -> Self {
        Self {
            unit_percent: 70,
            max_factor: 19,
        }
    }
}

impl BellValueConfig {
    /// Resolve a draw: `roll` in `[1, 100]`, `factor` in `[1, max_factor]`
    pub fn value_for(&self, stake: i64, roll: u32, factor: u32) -> i64 {
        if roll <= self.unit_percent {
            stake
        } else {
            stake.saturating_mul(i64::from(factor.clamp(1, self.max_factor.max(1))))
        }
    }
}

/// Base-game bonus rules. Multipliers are in units of hand size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paytable {
    pub crown_min_count: usize,
    pub crown_multiplier: i64,
    pub star_streak_length: usize,
    pub star_multiplier: i64,
    pub heart_multiplier: i64,
    pub diamond_min_count: usize,
    pub diamond_multiplier: i64,
}

impl Default for Paytable {
    fn default() -> Self {
        Self {
            crown_min_count: 4,
            crown_multiplier: 20,
            star_streak_length: 3,
            star_multiplier: 15,
            heart_multiplier: 30,
            diamond_min_count: 2,
            diamond_multiplier: 20,
        }
    }
}

/// Rush (respin with momentum) parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RushConfig {
    /// Bell count that triggers rush mode
    pub trigger_count: usize,
    /// Respin budget on entry and after every hit
    pub initial_respins: u32,
    /// Per-slot hit chance is `hit_numerator / (odds - odds_offset)`
    pub hit_numerator: u32,
    pub odds_offset: u32,
}

impl Default for RushConfig {
    fn default() -> Self {
        Self {
            trigger_count: 5,
            initial_respins: 3,
            hit_numerator: 10,
            odds_offset: 100,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Odds knob: higher values make favourable outcomes rarer
    pub odds: u32,
    pub weights: SymbolWeights,
    pub bell_values: BellValueConfig,
    pub paytable: Paytable,
    pub rush: RushConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            odds: 330,
            weights: SymbolWeights::default(),
            bell_values: BellValueConfig::default(),
            paytable: Paytable::default(),
            rush: RushConfig::default(),
        }
    }
}

impl GameConfig {
    /// Builder: set the odds knob
    pub fn with_odds(mut self, odds: u32) -> Self {
        self.odds = odds;
        self
    }

    /// Builder: replace the paytable
    pub fn with_paytable(mut self, paytable: Paytable) -> Self {
        self.paytable = paytable;
        self
    }

    /// Builder: replace rush parameters
    pub fn with_rush(mut self, rush: RushConfig) -> Self {
        self.rush = rush;
        self
    }

    /// Denominator of the per-slot rush hit chance
    pub fn rush_hit_denominator(&self) -> u32 {
        self.odds.saturating_sub(self.rush.odds_offset)
    }

    /// Per-slot rush hit probability
    pub fn rush_hit_probability(&self) -> f64 {
        let denominator = self.rush_hit_denominator();
        if denominator == 0 {
            return 0.0;
        }
        (self.rush.hit_numerator as f64 / denominator as f64).min(1.0)
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<()> {
        let favourable = self.weights.favourable_total();
        if favourable == 0 {
            return Err(ConfigError::InvalidWeights(
                "all symbol weights are zero".into(),
            ));
        }
        if self.odds < favourable {
            return Err(ConfigError::OddsTooLow {
                odds: self.odds,
                minimum: favourable,
            });
        }
        if self.odds <= self.rush.odds_offset {
            return Err(ConfigError::OddsTooLow {
                odds: self.odds,
                minimum: self.rush.odds_offset + 1,
            });
        }
        if self.bell_values.unit_percent > 100 {
            return Err(ConfigError::InvalidValue(format!(
                "bell unit_percent must be <= 100, got {}",
                self.bell_values.unit_percent
            )));
        }
        if self.bell_values.max_factor == 0 {
            return Err(ConfigError::InvalidValue(
                "bell max_factor must be at least 1".into(),
            ));
        }
        if self.rush.trigger_count == 0 || self.rush.trigger_count > GRID_SLOTS {
            return Err(ConfigError::InvalidValue(format!(
                "rush trigger_count must be in 1..={}, got {}",
                GRID_SLOTS, self.rush.trigger_count
            )));
        }
        if self.rush.initial_respins == 0 {
            return Err(ConfigError::InvalidValue(
                "rush initial_respins must be at least 1".into(),
            ));
        }
        if self.paytable.star_streak_length == 0 {
            return Err(ConfigError::InvalidValue(
                "star_streak_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
