//! # rl-slot: bell-rush slot engine for RushLab
//!
//! Simulates single playthroughs of a 5×4 bell-rush slot: weighted symbol
//! draws, base-game bonus resolution, the rush respin round and the session
//! stop conditions.
//!
//! ## Architecture
//!
//! ```text
//! OutcomeSource (ChaCha8 stream per session)
//!     │
//!     ├── draw_grid → SymbolGrid
//!     │                 │
//!     │                 v
//!     │           resolve (Paytable, rush trigger)
//!     │                 │
//!     └── run_rush ◄────┘ (≥5 bells)
//!           │
//!           v
//!     Session → SessionSummary
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rl_slot::{GameConfig, NoopObserver, RandomOutcomes, SessionLimits, play_session};
//!
//! let game = GameConfig::default();
//! let limits = SessionLimits::default();
//! let mut source = RandomOutcomes::from_seed(7);
//! let summary = play_session(&game, &limits, &mut source, &mut NoopObserver);
//! assert!(summary.state.is_terminal());
//! ```

pub mod config;
pub mod outcome;
pub mod resolver;
pub mod rush;
pub mod session;
pub mod symbols;

pub use config::*;
pub use outcome::*;
pub use resolver::*;
pub use rush::*;
pub use session::*;
pub use symbols::*;

use thiserror::Error;

/// Invalid game configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Odds {odds} too low, must be at least {minimum}")]
    OddsTooLow { odds: u32, minimum: u32 },

    #[error("Invalid symbol weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
