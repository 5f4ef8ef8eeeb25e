//! Batch and sweep aggregation

use serde::{Deserialize, Serialize};

use rl_slot::SessionSummary;

/// Aggregate of one batch of tries.
///
/// Losing tries are booked at the flat loss-limit value, not their real
/// profit. The summed real loss is kept in `actual_loss` for analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// 1-based batch number
    pub batch: u32,
    pub tries: u32,
    /// Profit-target wins plus time-limit wins
    pub winning_tries: u32,
    pub time_limit_wins: u32,
    /// Sum of profit over winning tries
    pub total_won: i64,
    /// Sum of real (negative or zero) profit over losing tries
    pub actual_loss: i64,
    pub total_spins: u64,
    pub total_rushes: u64,
    /// Loss booked per losing try
    pub loss_limit: i64,
}

impl BatchStats {
    pub fn new(batch: u32, loss_limit: i64) -> Self {
        Self {
            batch,
            loss_limit,
            ..Default::default()
        }
    }

    /// Fold one finished try into the batch
    pub fn record(&mut self, summary: &SessionSummary) {
        self.tries += 1;
        self.total_spins = self.total_spins.saturating_add(summary.totals.spins);
        self.total_rushes = self
            .total_rushes
            .saturating_add(u64::from(summary.totals.rush_count));

        if summary.is_win() {
            self.winning_tries += 1;
            self.total_won = self.total_won.saturating_add(summary.profit());
            if summary.is_time_limit_win() {
                self.time_limit_wins += 1;
            }
        } else {
            self.actual_loss = self.actual_loss.saturating_add(summary.profit());
        }
    }

    pub fn losing_tries(&self) -> u32 {
        self.tries - self.winning_tries
    }

    /// Flat loss: losing tries times the loss limit
    pub fn total_lost(&self) -> i64 {
        i64::from(self.losing_tries()).saturating_mul(self.loss_limit)
    }

    /// Won plus flat loss
    pub fn total(&self) -> i64 {
        self.total_won.saturating_add(self.total_lost())
    }

    /// Winning tries as a percentage of all tries
    pub fn win_rate(&self) -> f64 {
        if self.tries == 0 {
            return 0.0;
        }
        f64::from(self.winning_tries) * 100.0 / f64::from(self.tries)
    }

    /// None when nothing won
    pub fn avg_profit_per_win(&self) -> Option<f64> {
        if self.winning_tries == 0 {
            return None;
        }
        Some(self.total_won as f64 / f64::from(self.winning_tries))
    }

    pub fn avg_spins(&self) -> f64 {
        self.per_try(self.total_spins)
    }

    pub fn avg_rushes(&self) -> f64 {
        self.per_try(self.total_rushes)
    }

    fn per_try(&self, value: u64) -> f64 {
        if self.tries == 0 {
            return 0.0;
        }
        value as f64 / f64::from(self.tries)
    }
}

/// Per-odds averages over all batches, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub odds: u32,
    pub average_won: i64,
    pub average_lost: i64,
    pub average_profit: i64,
}

impl SweepPoint {
    /// Integer averages, truncated toward zero
    pub fn from_batches(odds: u32, batches: &[BatchStats]) -> Self {
        let count = batches.len().max(1) as i64;
        let sum = |value: fn(&BatchStats) -> i64| {
            batches
                .iter()
                .map(value)
                .fold(0i64, i64::saturating_add)
        };
        let won = sum(|b| b.total_won);
        let lost = sum(BatchStats::total_lost);
        let profit = sum(BatchStats::total);

        Self {
            odds,
            average_won: won / count,
            average_lost: lost / count,
            average_profit: profit / count,
        }
    }
}

/// Every batch run at one odds value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsResult {
    pub odds: u32,
    pub batches: Vec<BatchStats>,
    pub averages: SweepPoint,
}

impl OddsResult {
    pub fn new(odds: u32, batches: Vec<BatchStats>) -> Self {
        let averages = SweepPoint::from_batches(odds, &batches);
        Self {
            odds,
            batches,
            averages,
        }
    }

    /// Win rate across every try at this odds value
    pub fn overall_win_rate(&self) -> f64 {
        let tries: u64 = self.batches.iter().map(|b| u64::from(b.tries)).sum();
        let wins: u64 = self.batches.iter().map(|b| u64::from(b.winning_tries)).sum();
        if tries == 0 {
            return 0.0;
        }
        wins as f64 * 100.0 / tries as f64
    }
}

/// Whole run: the seed used plus one result per odds value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub odds: Vec<OddsResult>,
}

impl SimulationReport {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
