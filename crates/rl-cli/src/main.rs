//! RushLab command-line simulator
//!
//! Usage:
//!   rushlab                         - Run with defaults, reports in ./Result
//!   rushlab --config sim.yaml       - Load settings from YAML or JSON
//!   rushlab --odds-start 200 --odds-end 400 --odds-step 20
//!   rushlab --print-config          - Show the effective config and exit
//!   rushlab --json-report run.json  - Also dump every batch as JSON

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rl_batch::{FileReport, SimulationConfig, SimulationRunner};

#[derive(Parser, Debug)]
#[command(name = "rushlab", version, about = "Bell-rush slot batch simulator")]
struct Cli {
    /// Config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Batches per odds value
    #[arg(long)]
    batches: Option<u32>,

    /// Tries per batch
    #[arg(long)]
    tries: Option<u32>,

    /// Stake per spin
    #[arg(long)]
    hand_size: Option<i64>,

    /// First odds value of the sweep
    #[arg(long)]
    odds_start: Option<u32>,

    /// Last odds value of the sweep (inclusive)
    #[arg(long)]
    odds_end: Option<u32>,

    /// Odds sweep step
    #[arg(long)]
    odds_step: Option<u32>,

    /// Random seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for report files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write per-spin detail files
    #[arg(long)]
    verbose_detail: bool,

    /// Run tries on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Also write the full run (all batches, real losses) as JSON
    #[arg(long)]
    json_report: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(batches) = self.batches {
            config.batches = batches;
        }
        if let Some(tries) = self.tries {
            config.tries_per_batch = tries;
        }
        if let Some(hand_size) = self.hand_size {
            config.hand_size = hand_size;
        }
        if let Some(start) = self.odds_start {
            config.odds_sweep.start = start;
        }
        if let Some(end) = self.odds_end {
            config.odds_sweep.end = end;
        }
        if let Some(step) = self.odds_step {
            config.odds_sweep.step = step;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.verbose_detail |= self.verbose_detail;
        config.parallel |= self.parallel;

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = cli.load_config()?;
    config.validate().context("Invalid simulation configuration")?;

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let seed = *config.seed.get_or_insert_with(rl_slot::fresh_seed);
    log::info!("Using seed {}", seed);

    let runner = SimulationRunner::new(config.clone())?;
    let mut sink = FileReport::create(&config).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let report = runner
        .run(&mut sink)
        .context("Simulation aborted while writing reports")?;

    for result in &report.odds {
        log::info!(
            "Odds {}: average won {} | average lost {} | average profit {}",
            result.odds,
            result.averages.average_won,
            result.averages.average_lost,
            result.averages.average_profit
        );
    }

    if let Some(path) = &cli.json_report {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Simulation complete. Results saved in CSV files.");
    Ok(())
}
