//! Summary report formatting and the file-backed report sink

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rl_slot::SpinObserver;

use crate::config::SimulationConfig;
use crate::detail::DetailWriter;
use crate::runner::ReportSink;
use crate::stats::{BatchStats, SweepPoint};
use crate::Result;

pub const SUMMARY_FILE: &str = "gambling_simulation_data.txt";
pub const BATCH_CSV_FILE: &str = "gambling_simulation_data.csv";
pub const SWEEP_CSV_FILE: &str = "gambling_simulation_important_data.csv";

pub const BATCH_CSV_HEADER: &str = "Batch,Winning Tries,Time-Limit Wins,Total Won,Total Lost,Total Profit,Win Rate (%),Avg Profit per Win,Avg Spins per Try,Avg Rushes per Try";
pub const SWEEP_CSV_HEADER: &str = "Odd,Average Win,Average Lost,Average Profit";

/// Per-batch detail file name
pub fn detail_file_name(batch: u32) -> String {
    format!("simulation_results_{}.csv", batch)
}

/// Parameters block that opens the summary report
pub fn parameters_header(config: &SimulationConfig, odds: u32) -> String {
    format!(
        "=== Simulation Parameters ===\n\
         Simulations: {}\n\
         Odds: {}\n\
         Batches of: {} tryes\n\
         HandSize: {} {}\n\
         Profit target: {}\n\
         Loss limit: {}\n\
         Time limit: {} min \n\
         \n\
         Simulation start.\n\n",
        config.batches,
        odds,
        config.tries_per_batch,
        config.hand_size,
        config.currency,
        config.profit_target,
        config.loss_limit,
        config.max_minutes,
    )
}

/// One `=== Batch #N Summary ===` section
pub fn batch_summary(stats: &BatchStats, currency: &str) -> String {
    let average = match stats.avg_profit_per_win() {
        Some(avg) => format!("+{:.2} {}", avg, currency),
        None => "N/A".to_string(),
    };

    format!(
        "=== Batch #{batch} Summary ===\n\
         Total tries: {tries}\n\
         Winning tries: {wins}\n\
         Winning time run out tries: {time_wins}\n\
         Won: +{won:.2} {currency}\n\
         Lost: {lost:.2} {currency}\n\
         Total: {total:.2} {currency}\n\
         Win rate: {rate:.2}%\n\
         Average profit per winning try: {average}\n\
         Total spins: {spins}\n\
         Total rushes: {rushes}\n\
         Average spins per try: {avg_spins:.2}\n\
         Average rushes per try: {avg_rushes:.2}\n\n",
        batch = stats.batch,
        tries = stats.tries,
        wins = stats.winning_tries,
        time_wins = stats.time_limit_wins,
        won = stats.total_won as f64,
        lost = stats.total_lost() as f64,
        total = stats.total() as f64,
        rate = stats.win_rate(),
        spins = stats.total_spins,
        rushes = stats.total_rushes,
        avg_spins = stats.avg_spins(),
        avg_rushes = stats.avg_rushes(),
    )
}

/// Closing averages section of the summary report
pub fn sweep_averages(point: &SweepPoint, currency: &str) -> String {
    format!(
        "\n=== Simulation Averages === \n\
         Average Won: {won} {currency} | Average Lost: {lost} {currency} | Average Profit: {profit} {currency} \n\n",
        won = point.average_won,
        lost = point.average_lost,
        profit = point.average_profit,
    )
}

/// Row for the per-batch CSV.
///
/// Amounts and rates are always fixed at 2 decimals (`1500.00`, never the
/// shortest form `1500`) and a zero-win average is `N/A`.
pub fn batch_csv_row(stats: &BatchStats) -> String {
    let average = stats
        .avg_profit_per_win()
        .map_or_else(|| "N/A".to_string(), |avg| format!("{:.2}", avg));

    format!(
        "{},{},{},{:.2},{:.2},{:.2},{:.2},{},{:.2},{:.2}",
        stats.batch,
        stats.winning_tries,
        stats.time_limit_wins,
        stats.total_won as f64,
        stats.total_lost() as f64,
        stats.total() as f64,
        stats.win_rate(),
        average,
        stats.avg_spins(),
        stats.avg_rushes(),
    )
}

/// Row for the odds sweep CSV
pub fn sweep_csv_row(point: &SweepPoint) -> String {
    format!(
        "{},{},{},{}",
        point.odds, point.average_won, point.average_lost, point.average_profit
    )
}

type FileWriter = BufWriter<File>;

fn create(path: &Path) -> Result<FileWriter> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Writes the summary report and CSV tables into `output_dir`.
///
/// The summary text and batch CSV are recreated for each odds value, so
/// after a sweep they hold the last odds value's batches. The sweep CSV
/// accumulates one row per odds value.
pub struct FileReport {
    config: SimulationConfig,
    dir: PathBuf,
    summary: Option<FileWriter>,
    batch_csv: Option<FileWriter>,
    sweep_csv: FileWriter,
    detail: Option<DetailWriter<FileWriter>>,
}

impl FileReport {
    /// Create the output directory and open the sweep table
    pub fn create(config: &SimulationConfig) -> Result<Self> {
        let dir = config.output_dir.clone();
        fs::create_dir_all(&dir)?;

        let mut sweep_csv = create(&dir.join(SWEEP_CSV_FILE))?;
        writeln!(sweep_csv, "{}", SWEEP_CSV_HEADER)?;

        log::debug!("Writing reports to {}", dir.display());

        Ok(Self {
            config: config.clone(),
            dir,
            summary: None,
            batch_csv: None,
            sweep_csv,
            detail: None,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.dir
    }

    fn close_detail(&mut self) -> Result<()> {
        if let Some(detail) = self.detail.take() {
            detail.finish()?;
        }
        Ok(())
    }
}

impl ReportSink for FileReport {
    fn begin_odds(&mut self, odds: u32) -> Result<()> {
        let mut summary = create(&self.dir.join(SUMMARY_FILE))?;
        summary.write_all(parameters_header(&self.config, odds).as_bytes())?;

        let mut batch_csv = create(&self.dir.join(BATCH_CSV_FILE))?;
        writeln!(batch_csv, "{}", BATCH_CSV_HEADER)?;

        self.summary = Some(summary);
        self.batch_csv = Some(batch_csv);
        Ok(())
    }

    fn begin_batch(&mut self, batch: u32) -> Result<()> {
        self.close_detail()?;
        if self.config.verbose_detail {
            let file = create(&self.dir.join(detail_file_name(batch)))?;
            self.detail = Some(DetailWriter::new(file, &self.config.currency));
        }
        Ok(())
    }

    fn detail_observer(&mut self) -> Option<&mut dyn SpinObserver> {
        self.detail
            .as_mut()
            .map(|detail| detail as &mut dyn SpinObserver)
    }

    fn end_batch(&mut self, stats: &BatchStats) -> Result<()> {
        self.close_detail()?;
        if let Some(summary) = self.summary.as_mut() {
            summary.write_all(batch_summary(stats, &self.config.currency).as_bytes())?;
        }
        if let Some(csv) = self.batch_csv.as_mut() {
            writeln!(csv, "{}", batch_csv_row(stats))?;
        }
        Ok(())
    }

    fn end_odds(&mut self, point: &SweepPoint) -> Result<()> {
        if let Some(mut summary) = self.summary.take() {
            summary.write_all(sweep_averages(point, &self.config.currency).as_bytes())?;
            summary.flush()?;
        }
        if let Some(mut csv) = self.batch_csv.take() {
            csv.flush()?;
        }
        writeln!(self.sweep_csv, "{}", sweep_csv_row(point))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.close_detail()?;
        self.sweep_csv.flush()?;
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {}
