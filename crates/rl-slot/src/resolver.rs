//! Base-game bonus resolution

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, Paytable};
use crate::symbols::{GRID_SLOTS, Symbol, SymbolGrid};

/// Additive base-game bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bonus {
    Crown,
    StarStreak,
    Heart,
    Diamond,
}

/// Result of resolving one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Rush mode triggered; `bells` slots start pre-filled. Pays nothing here.
    Rush { bells: usize },
    /// Base-game payout (possibly zero) and the bonuses that produced it
    Paid { payout: i64, bonuses: Vec<Bonus> },
}

impl Resolution {
    /// Base-game payout for this spin
    pub fn payout(&self) -> i64 {
        match self {
            Resolution::Rush { .. } => 0,
            Resolution::Paid { payout, .. } => *payout,
        }
    }

    /// Pre-filled bell count if rush triggered
    pub fn rush_bells(&self) -> Option<usize> {
        match self {
            Resolution::Rush { bells } => Some(*bells),
            Resolution::Paid { .. } => None,
        }
    }

    pub fn triggers_rush(&self) -> bool {
        matches!(self, Resolution::Rush { .. })
    }

    /// Bonuses awarded (empty on rush)
    pub fn bonuses(&self) -> &[Bonus] {
        match self {
            Resolution::Rush { .. } => &[],
            Resolution::Paid { bonuses, .. } => bonuses,
        }
    }
}

impl Paytable {
    /// Sum every additive bonus the grid qualifies for
    pub fn evaluate(&self, grid: &SymbolGrid, stake: i64) -> (i64, Vec<Bonus>) {
        let mut payout: i64 = 0;
        let mut bonuses = Vec::new();

        if grid.count(Symbol::Crown) >= self.crown_min_count {
            payout = payout.saturating_add(self.crown_multiplier.saturating_mul(stake));
            bonuses.push(Bonus::Crown);
        }

        // Paid at most once, however many streaks land
        if grid.longest_run(Symbol::Star) >= self.star_streak_length {
            payout = payout.saturating_add(self.star_multiplier.saturating_mul(stake));
            bonuses.push(Bonus::StarStreak);
        }

        if grid.count(Symbol::Heart) == GRID_SLOTS {
            payout = payout.saturating_add(self.heart_multiplier.saturating_mul(stake));
            bonuses.push(Bonus::Heart);
        }

        if grid.count(Symbol::Diamond) >= self.diamond_min_count {
            payout = payout.saturating_add(self.diamond_multiplier.saturating_mul(stake));
            bonuses.push(Bonus::Diamond);
        }

        (payout, bonuses)
    }
}

/// Resolve one grid. Pure: same grid, stake and config give the same result.
///
/// The rush check runs first and excludes every additive bonus.
pub fn resolve(grid: &SymbolGrid, stake: i64, config: &GameConfig) -> Resolution {
    let bells = grid.count(Symbol::Bell);
    if bells >= config.rush.trigger_count {
        return Resolution::Rush { bells };
    }

    let (payout, bonuses) = config.paytable.evaluate(grid, stake);
    Resolution::Paid { payout, bonuses }
}
