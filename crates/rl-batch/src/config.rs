//! Simulation configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rl_slot::{GameConfig, SessionLimits};

use crate::{BatchError, Result};

/// Odds values to sweep: `start..=end` stepping by `step`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsSweep {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl Default for OddsSweep {
    fn default() -> Self {
        Self {
            start: 300,
            end: 301,
            step: 10,
        }
    }
}

impl OddsSweep {
    /// Sweep over a single odds value
    pub fn single(odds: u32) -> Self {
        Self {
            start: odds,
            end: odds,
            step: 1,
        }
    }

    /// Every odds value in the sweep, in order
    pub fn values(&self) -> Vec<u32> {
        if self.step == 0 || self.start > self.end {
            return Vec::new();
        }
        (self.start..=self.end).step_by(self.step as usize).collect()
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of batches per odds value
    pub batches: u32,
    /// Tries (sessions) per batch
    pub tries_per_batch: u32,
    /// Stake per spin
    pub hand_size: i64,
    /// Spin cap per try
    pub max_spins: u64,
    pub profit_target: i64,
    /// Negative loss limit; also the flat loss booked per losing try
    pub loss_limit: i64,
    pub seconds_per_spin: u32,
    pub max_minutes: u32,
    pub odds_sweep: OddsSweep,
    /// Write per-spin detail files
    pub verbose_detail: bool,
    pub output_dir: PathBuf,
    /// Currency label used in reports
    pub currency: String,
    /// Random seed (None = drawn at startup)
    pub seed: Option<u64>,
    /// Run tries in parallel (needs the `parallel` feature)
    pub parallel: bool,
    /// Game rules; `game.odds` is overridden by the sweep
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            batches: 10,
            tries_per_batch: 100,
            hand_size: 100,
            max_spins: 100_000,
            profit_target: 200,
            loss_limit: -3000,
            seconds_per_spin: 5,
            max_minutes: 3,
            odds_sweep: OddsSweep::default(),
            verbose_detail: false,
            output_dir: PathBuf::from("Result"),
            currency: "RON".into(),
            seed: None,
            parallel: false,
            game: GameConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Small config for tests and smoke runs
    pub fn quick() -> Self {
        Self {
            batches: 2,
            tries_per_batch: 20,
            ..Default::default()
        }
    }

    /// Load from a YAML or JSON file (chosen by extension, YAML otherwise)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Builder: batches and tries per batch
    pub fn with_batches(mut self, batches: u32, tries_per_batch: u32) -> Self {
        self.batches = batches;
        self.tries_per_batch = tries_per_batch;
        self
    }

    /// Builder: sweep a single odds value
    pub fn with_odds(mut self, odds: u32) -> Self {
        self.odds_sweep = OddsSweep::single(odds);
        self
    }

    /// Builder: set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder: enable per-spin detail files
    pub fn with_verbose_detail(mut self, verbose: bool) -> Self {
        self.verbose_detail = verbose;
        self
    }

    /// Simulated time budget in seconds
    pub fn max_seconds(&self) -> u32 {
        self.max_minutes.saturating_mul(60)
    }

    /// Stop conditions for one session
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            hand_size: self.hand_size,
            max_spins: self.max_spins,
            profit_target: self.profit_target,
            loss_limit: self.loss_limit,
            seconds_per_spin: self.seconds_per_spin,
            max_seconds: self.max_seconds(),
        }
    }

    /// Game rules at a given odds value
    pub fn game_at(&self, odds: u32) -> GameConfig {
        self.game.clone().with_odds(odds)
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.batches == 0 {
            return Err(BatchError::Config("batches must be at least 1".into()));
        }
        if self.tries_per_batch == 0 {
            return Err(BatchError::Config(
                "tries_per_batch must be at least 1".into(),
            ));
        }
        if self.hand_size <= 0 {
            return Err(BatchError::Config(format!(
                "hand_size must be positive, got {}",
                self.hand_size
            )));
        }
        if self.max_spins == 0 {
            return Err(BatchError::Config("max_spins must be at least 1".into()));
        }
        if self.loss_limit >= 0 {
            return Err(BatchError::Config(format!(
                "loss_limit must be negative, got {}",
                self.loss_limit
            )));
        }
        if self.profit_target <= 0 {
            return Err(BatchError::Config(format!(
                "profit_target must be positive, got {}",
                self.profit_target
            )));
        }
        if self.seconds_per_spin == 0 {
            return Err(BatchError::Config(
                "seconds_per_spin must be at least 1".into(),
            ));
        }

        let odds = self.odds_sweep.values();
        if odds.is_empty() {
            return Err(BatchError::Config(format!(
                "odds sweep {}..={} step {} is empty",
                self.odds_sweep.start, self.odds_sweep.end, self.odds_sweep.step
            )));
        }
        for value in odds {
            self.game_at(value).validate()?;
        }
        Ok(())
    }
}
