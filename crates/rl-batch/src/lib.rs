//! # rl-batch: batch simulation and reporting for RushLab
//!
//! Runs many independent bell-rush sessions, aggregates them into batches,
//! sweeps the odds knob and writes the summary artifacts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │  SimulationConfig   │────▶│  SimulationRunner   │
//! │  (YAML / JSON)      │     │  odds → batch → try │
//! └─────────────────────┘     └──────────┬──────────┘
//!                                        │ SessionSummary
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │  BatchStats         │
//!                             │  SweepPoint         │
//!                             └──────────┬──────────┘
//!                                        │
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │  ReportSink         │
//!                             │  FileReport / Null  │
//!                             │  DetailWriter       │
//!                             └─────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rl_batch::{FileReport, SimulationConfig, SimulationRunner};
//!
//! let config = SimulationConfig::quick().with_seed(7);
//! let runner = SimulationRunner::new(config.clone()).unwrap();
//! let mut sink = FileReport::create(&config).unwrap();
//! let report = runner.run(&mut sink).unwrap();
//! println!("{} odds values swept", report.odds.len());
//! ```

pub mod config;
pub mod detail;
pub mod report;
pub mod runner;
pub mod stats;

pub use config::*;
pub use detail::*;
pub use report::*;
pub use runner::*;
pub use stats::*;

use std::path::PathBuf;

use thiserror::Error;

/// Batch simulation errors
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid game rules: {0}")]
    Game(#[from] rl_slot::ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BatchError>;
