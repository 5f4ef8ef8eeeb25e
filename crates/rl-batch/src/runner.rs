//! Simulation runner: odds sweep → batches → tries

use std::time::Instant;

use rl_slot::{
    GameConfig, NoopObserver, RandomOutcomes, SessionLimits, SessionSummary, SpinObserver,
    fresh_seed, play_session,
};

use crate::config::SimulationConfig;
use crate::stats::{BatchStats, OddsResult, SimulationReport, SweepPoint};
use crate::Result;

/// Receives results as the run progresses.
///
/// Every method defaults to a no-op. Errors abort the run.
pub trait ReportSink {
    fn begin_odds(&mut self, _odds: u32) -> Result<()> {
        Ok(())
    }

    fn begin_batch(&mut self, _batch: u32) -> Result<()> {
        Ok(())
    }

    /// Observer for every try of the current batch. Returning one forces
    /// sequential execution.
    fn detail_observer(&mut self) -> Option<&mut dyn SpinObserver> {
        None
    }

    fn end_batch(&mut self, _stats: &BatchStats) -> Result<()> {
        Ok(())
    }

    fn end_odds(&mut self, _point: &SweepPoint) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Drives a full simulation.
///
/// Try `k` of the run (counted across odds values and batches) draws from
/// stream `k` of the seeded generator, so results do not depend on whether
/// tries run sequentially or in parallel.
pub struct SimulationRunner {
    config: SimulationConfig,
    seed: u64,
}

impl SimulationRunner {
    /// Validate the config and fix the seed
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(fresh_seed);
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn tries_per_odds(&self) -> u64 {
        u64::from(self.config.batches) * u64::from(self.config.tries_per_batch)
    }

    /// Run the whole sweep
    pub fn run<K: ReportSink + ?Sized>(&self, sink: &mut K) -> Result<SimulationReport> {
        let odds_values = self.config.odds_sweep.values();
        log::info!(
            "Starting simulation: {} odds values x {} batches x {} tries (seed {})",
            odds_values.len(),
            self.config.batches,
            self.config.tries_per_batch,
            self.seed
        );

        let started = Instant::now();
        let mut results = Vec::with_capacity(odds_values.len());
        for (index, odds) in odds_values.into_iter().enumerate() {
            let first_stream = index as u64 * self.tries_per_odds();
            results.push(self.run_odds(odds, first_stream, sink)?);
        }
        sink.finish()?;

        log::info!(
            "Simulation finished in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        Ok(SimulationReport {
            seed: self.seed,
            odds: results,
        })
    }

    /// Run every batch at one odds value
    pub fn run_odds<K: ReportSink + ?Sized>(
        &self,
        odds: u32,
        first_stream: u64,
        sink: &mut K,
    ) -> Result<OddsResult> {
        let game = self.config.game_at(odds);
        let limits = self.config.session_limits();
        log::debug!(
            "Odds {}: rush hit chance {:.4}",
            odds,
            game.rush_hit_probability()
        );

        sink.begin_odds(odds)?;
        let tries = u64::from(self.config.tries_per_batch);
        let mut batches = Vec::with_capacity(self.config.batches as usize);
        for batch in 1..=self.config.batches {
            let stream = first_stream + u64::from(batch - 1) * tries;
            batches.push(self.run_batch(&game, &limits, batch, stream, sink)?);
        }

        let result = OddsResult::new(odds, batches);
        log::info!(
            "Odds {}: win rate {:.2}%, average profit {}",
            odds,
            result.overall_win_rate(),
            result.averages.average_profit
        );
        sink.end_odds(&result.averages)?;
        Ok(result)
    }

    /// Run one batch of tries
    pub fn run_batch<K: ReportSink + ?Sized>(
        &self,
        game: &GameConfig,
        limits: &SessionLimits,
        batch: u32,
        first_stream: u64,
        sink: &mut K,
    ) -> Result<BatchStats> {
        sink.begin_batch(batch)?;

        let summaries = match sink.detail_observer() {
            Some(observer) => self.play_observed(game, limits, first_stream, observer),
            None => self.play_tries(game, limits, first_stream),
        };

        let mut stats = BatchStats::new(batch, self.config.loss_limit);
        for summary in &summaries {
            stats.record(summary);
        }
        log::debug!(
            "Batch #{}: {}/{} winning tries, total {}",
            batch,
            stats.winning_tries,
            stats.tries,
            stats.total()
        );

        sink.end_batch(&stats)?;
        Ok(stats)
    }

    fn play_one<O: SpinObserver + ?Sized>(
        &self,
        game: &GameConfig,
        limits: &SessionLimits,
        stream: u64,
        observer: &mut O,
    ) -> SessionSummary {
        let mut source = RandomOutcomes::for_stream(self.seed, stream);
        play_session(game, limits, &mut source, observer)
    }

    fn play_observed(
        &self,
        game: &GameConfig,
        limits: &SessionLimits,
        first_stream: u64,
        observer: &mut dyn SpinObserver,
    ) -> Vec<SessionSummary> {
        (0..u64::from(self.config.tries_per_batch))
            .map(|t| self.play_one(game, limits, first_stream + t, observer))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn play_tries(
        &self,
        game: &GameConfig,
        limits: &SessionLimits,
        first_stream: u64,
    ) -> Vec<SessionSummary> {
        use rayon::prelude::*;

        let tries = self.config.tries_per_batch;
        let play = |t: u32| {
            self.play_one(game, limits, first_stream + u64::from(t), &mut NoopObserver)
        };

        if self.config.parallel {
            (0..tries).into_par_iter().map(play).collect()
        } else {
            (0..tries).map(play).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn play_tries(
        &self,
        game: &GameConfig,
        limits: &SessionLimits,
        first_stream: u64,
    ) -> Vec<SessionSummary> {
        if self.config.parallel {
            log::warn!("Built without the `parallel` feature; running tries sequentially");
        }
        (0..u64::from(self.config.tries_per_batch))
            .map(|t| self.play_one(game, limits, first_stream + t, &mut NoopObserver))
            .collect()
    }
}

/// Run a full simulation with `config`, reporting into `sink`
pub fn run_simulation<K: ReportSink + ?Sized>(
    config: SimulationConfig,
    sink: &mut K,
) -> Result<SimulationReport> {
    SimulationRunner::new(config)?.run(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullSink;
    use crate::BatchError;

    #[derive(Default)]
    struct Recording {
        events: Vec<String>,
    }

    impl ReportSink for Recording {
        fn begin_odds(&mut self, odds: u32) -> Result<()> {
            self.events.push(format!("odds {}", odds));
            Ok(())
        }

        fn begin_batch(&mut self, batch: u32) -> Result<()> {
            self.events.push(format!("batch {}", batch));
            Ok(())
        }

        fn end_batch(&mut self, stats: &BatchStats) -> Result<()> {
            self.events.push(format!("end batch {} ({} tries)", stats.batch, stats.tries));
            Ok(())
        }

        fn end_odds(&mut self, point: &SweepPoint) -> Result<()> {
            self.events.push(format!("end odds {}", point.odds));
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.events.push("finish".into());
            Ok(())
        }
    }

    struct Failing;

    impl ReportSink for Failing {
        fn end_batch(&mut self, _stats: &BatchStats) -> Result<()> {
            Err(std::io::Error::other("read-only filesystem").into())
        }
    }

    fn small_config() -> SimulationConfig {
        SimulationConfig::default()
            .with_batches(2, 5)
            .with_seed(1234)
    }

    #[test]
    fn test_event_order() {
        let mut config = small_config();
        config.odds_sweep.start = 300;
        config.odds_sweep.end = 310;
        config.odds_sweep.step = 10;

        let mut sink = Recording::default();
        let report = run_simulation(config, &mut sink).unwrap();

        assert_eq!(report.odds.len(), 2);
        assert_eq!(
            sink.events,
            vec![
                "odds 300",
                "batch 1",
                "end batch 1 (5 tries)",
                "batch 2",
                "end batch 2 (5 tries)",
                "end odds 300",
                "odds 310",
                "batch 1",
                "end batch 1 (5 tries)",
                "batch 2",
                "end batch 2 (5 tries)",
                "end odds 310",
                "finish",
            ]
        );
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = run_simulation(small_config(), &mut NullSink).unwrap();
        let b = run_simulation(small_config(), &mut NullSink).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 1234);
    }

    #[test]
    fn test_batch_totals_are_consistent() {
        let report = run_simulation(small_config().with_batches(3, 25), &mut NullSink).unwrap();
        let result = &report.odds[0];

        assert_eq!(result.batches.len(), 3);
        for stats in &result.batches {
            assert_eq!(stats.tries, 25);
            assert!(stats.winning_tries <= stats.tries);
            assert!(stats.time_limit_wins <= stats.winning_tries);
            assert_eq!(stats.total_lost(), i64::from(stats.losing_tries()) * -3000);
            assert!(stats.total_won >= 0);
            assert!(stats.actual_loss <= 0);
            // 5 s per spin, 3 min budget
            assert!(stats.total_spins <= 25 * 36);
        }
    }

    #[test]
    fn test_sink_failure_aborts() {
        let err = run_simulation(small_config(), &mut Failing).unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_batches(0, 5);
        assert!(matches!(
            SimulationRunner::new(config),
            Err(BatchError::Config(_))
        ));
    }

    #[test]
    fn test_unseeded_runner_picks_seed() {
        let config = SimulationConfig::quick().with_batches(1, 3);
        let runner = SimulationRunner::new(config).unwrap();
        assert_eq!(runner.config().seed, None);

        let report = runner.run(&mut NullSink).unwrap();
        assert_eq!(report.seed, runner.seed());

        // Replaying the drawn seed reproduces the run
        let replay = small_config()
            .with_batches(1, 3)
            .with_seed(runner.seed());
        assert_eq!(run_simulation(replay, &mut NullSink).unwrap(), report);
    }

    #[test]
    fn test_extreme_limits_do_not_overflow() {
        let slow_spins = SimulationConfig {
            seconds_per_spin: 1 << 31,
            max_minutes: u32::MAX,
            loss_limit: -1_000_000_000,
            ..small_config()
        };
        let report = run_simulation(slow_spins, &mut NullSink).unwrap();
        for stats in &report.odds[0].batches {
            assert_eq!(stats.tries, 5);
            assert!(stats.total_spins <= 5 * 2);
        }

        let huge_stake = SimulationConfig {
            hand_size: i64::MAX / 4,
            loss_limit: -1_000_000_000,
            ..small_config()
        };
        let report = run_simulation(huge_stake, &mut NullSink).unwrap();
        for stats in &report.odds[0].batches {
            assert_eq!(stats.tries, 5);
            assert!(stats.total_won >= 0);
            assert!(stats.actual_loss <= 0);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = SimulationConfig {
            parallel: false,
            ..small_config().with_batches(3, 40)
        };
        let parallel = SimulationConfig {
            parallel: true,
            ..sequential.clone()
        };

        let a = run_simulation(sequential, &mut NullSink).unwrap();
        let b = run_simulation(parallel, &mut NullSink).unwrap();
        assert_eq!(a, b);
    }
}
