//! Session state machine: one playthrough from first spin to a stop condition

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::outcome::{OutcomeSource, draw_grid};
use crate::resolver::{Bonus, resolve};
use crate::rush::{RushOutcome, run_rush};

/// Session state. Only `Spinning` is non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Spinning,
    ProfitTargetHit,
    LossLimitHit,
    TimeLimitHit,
    SpinCapExhausted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Spinning)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Spinning
    }
}

/// How a finished session counts in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TryOutcome {
    /// Reached the profit target
    ProfitTargetWin,
    /// Ran out of time without being down
    TimeLimitWin,
    /// Everything else, accounted at the flat loss-limit value
    Loss,
}

impl TryOutcome {
    pub fn is_win(&self) -> bool {
        !matches!(self, TryOutcome::Loss)
    }
}

/// Stop conditions and stake for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Stake per spin
    pub hand_size: i64,
    /// Hard cap on spins
    pub max_spins: u64,
    /// Stop once profit reaches this
    pub profit_target: i64,
    /// Stop once profit falls to this (negative)
    pub loss_limit: i64,
    /// Simulated seconds per spin
    pub seconds_per_spin: u32,
    /// Simulated time budget in seconds
    pub max_seconds: u32,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            hand_size: 100,
            max_spins: 100_000,
            profit_target: 200,
            loss_limit: -3000,
            seconds_per_spin: 5,
            max_seconds: 3 * 60,
        }
    }
}

/// Running totals for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub invested: i64,
    pub won: i64,
    pub elapsed_secs: u32,
    pub spins: u64,
    pub rush_count: u32,
    pub rush_spins: u64,
    /// Highest profit seen (starts at zero)
    pub max_profit: i64,
    /// Filled bells at the end of the most recent rush
    pub last_rush_bells: usize,
}

impl SessionTotals {
    /// Always `won - invested`
    pub fn profit(&self) -> i64 {
        self.won.saturating_sub(self.invested)
    }
}

/// Snapshot handed to observers after every spin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinRecord {
    pub spin: u64,
    pub invested: i64,
    pub won: i64,
    pub profit: i64,
    /// Base game plus rush winnings for this spin
    pub spin_win: i64,
    pub rush_triggered: bool,
    pub bonuses: Vec<Bonus>,
}

/// Finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub state: SessionState,
    pub outcome: TryOutcome,
    pub totals: SessionTotals,
}

impl SessionSummary {
    pub fn profit(&self) -> i64 {
        self.totals.profit()
    }

    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }

    pub fn is_time_limit_win(&self) -> bool {
        self.outcome == TryOutcome::TimeLimitWin
    }
}

/// Hooks for per-spin detail output. Every method defaults to a no-op.
pub trait SpinObserver {
    fn on_session_start(&mut self) {}

    /// Called before `on_spin` for the spin that triggered the rush
    fn on_rush(&mut self, _rush: &RushOutcome) {}

    fn on_spin(&mut self, _record: &SpinRecord) {}

    fn on_session_end(&mut self, _summary: &SessionSummary) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SpinObserver for NoopObserver {}

/// One playthrough
pub struct Session<'a, S: OutcomeSource + ?Sized> {
    game: &'a GameConfig,
    limits: &'a SessionLimits,
    source: &'a mut S,
    state: SessionState,
    totals: SessionTotals,
}

impl<'a, S: OutcomeSource + ?Sized> Session<'a, S> {
    pub fn new(game: &'a GameConfig, limits: &'a SessionLimits, source: &'a mut S) -> Self {
        Self {
            game,
            limits,
            source,
            state: SessionState::Spinning,
            totals: SessionTotals::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn totals(&self) -> &SessionTotals {
        &self.totals
    }

    /// Play one spin and apply the stop conditions.
    ///
    /// A terminal session ignores further calls.
    pub fn spin<O: SpinObserver + ?Sized>(&mut self, observer: &mut O) -> SessionState {
        if self.state.is_terminal() {
            return self.state;
        }

        let stake = self.limits.hand_size;
        self.totals.spins += 1;
        // Saturating: stakes and spin times are only bounded below
        self.totals.invested = self.totals.invested.saturating_add(stake);
        self.totals.elapsed_secs = self
            .totals
            .elapsed_secs
            .saturating_add(self.limits.seconds_per_spin);

        let grid = draw_grid(&mut *self.source, self.game);
        let resolution = resolve(&grid, stake, self.game);
        let mut spin_win = resolution.payout();

        if let Some(bells) = resolution.rush_bells() {
            let rush = run_rush(self.game, stake, bells, &mut *self.source);
            spin_win = spin_win.saturating_add(rush.total_win);
            self.totals.rush_count = self.totals.rush_count.saturating_add(1);
            self.totals.rush_spins = self
                .totals
                .rush_spins
                .saturating_add(u64::from(rush.respins));
            self.totals.last_rush_bells = rush.filled;
            observer.on_rush(&rush);
        }

        self.totals.won = self.totals.won.saturating_add(spin_win);
        let profit = self.totals.profit();
        self.totals.max_profit = self.totals.max_profit.max(profit);

        observer.on_spin(&SpinRecord {
            spin: self.totals.spins,
            invested: self.totals.invested,
            won: self.totals.won,
            profit,
            spin_win,
            rush_triggered: resolution.triggers_rush(),
            bonuses: resolution.bonuses().to_vec(),
        });

        self.state = self.check_stop(profit);
        self.state
    }

    fn check_stop(&self, profit: i64) -> SessionState {
        if profit >= self.limits.profit_target {
            SessionState::ProfitTargetHit
        } else if profit <= self.limits.loss_limit {
            SessionState::LossLimitHit
        } else if self.totals.elapsed_secs >= self.limits.max_seconds {
            SessionState::TimeLimitHit
        } else if self.totals.spins >= self.limits.max_spins {
            SessionState::SpinCapExhausted
        } else {
            SessionState::Spinning
        }
    }

    /// Spin until a stop condition fires
    pub fn run<O: SpinObserver + ?Sized>(mut self, observer: &mut O) -> SessionSummary {
        observer.on_session_start();
        while !self.state.is_terminal() {
            self.spin(observer);
        }

        let summary = self.summary();
        log::trace!(
            "session ended {:?} after {} spins, profit {}",
            summary.state,
            summary.totals.spins,
            summary.profit()
        );
        observer.on_session_end(&summary);
        summary
    }

    /// Classify the current state
    pub fn summary(&self) -> SessionSummary {
        let outcome = match self.state {
            SessionState::ProfitTargetHit => TryOutcome::ProfitTargetWin,
            SessionState::TimeLimitHit if self.totals.profit() >= 0 => TryOutcome::TimeLimitWin,
            _ => TryOutcome::Loss,
        };
        SessionSummary {
            state: self.state,
            outcome,
            totals: self.totals.clone(),
        }
    }
}

/// Play one full session
pub fn play_session<S, O>(
    game: &GameConfig,
    limits: &SessionLimits,
    source: &mut S,
    observer: &mut O,
) -> SessionSummary
where
    S: OutcomeSource + ?Sized,
    O: SpinObserver + ?Sized,
{
    Session::new(game, limits, source).run(observer)
}
