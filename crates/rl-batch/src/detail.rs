//! Per-spin detail log

use std::fmt;
use std::io::{self, Write};

use rl_slot::{RushOutcome, SessionSummary, SpinObserver, SpinRecord, TryOutcome};

pub const DETAIL_CSV_HEADER: &str = "Spin,Total Invested,Total Won,Profit/Loss";

/// Writes one batch's per-spin detail log.
///
/// Observer callbacks cannot fail, so the first write error is held and
/// returned by [`DetailWriter::finish`]. Later writes are skipped.
pub struct DetailWriter<W: Write> {
    out: W,
    currency: String,
    tries: u32,
    error: Option<io::Error>,
}

impl<W: Write> DetailWriter<W> {
    pub fn new(out: W, currency: &str) -> Self {
        Self {
            out,
            currency: currency.to_string(),
            tries: 0,
            error: None,
        }
    }

    /// Tries started so far
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Flush and hand back the writer, or the first error seen
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_fmt(args) {
            log::warn!("detail log write failed: {}", err);
            self.error = Some(err);
        }
    }
}

/// Rush bell dump: every slot in grid order, unfilled shown as 0
pub fn rush_dump(rush: &RushOutcome, currency: &str) -> String {
    let values: String = rush
        .bells
        .slots()
        .iter()
        .map(|slot| format!("[{}] ", slot.unwrap_or(0)))
        .collect();
    format!(
        "=== Bell Values From Rush ===\n{}\n=== Adding Up To: {} {} ===\n",
        values, rush.total_win, currency
    )
}

/// Winner line for a finished try, or None for a loss
pub fn winner_line(summary: &SessionSummary, try_number: u32, currency: &str) -> Option<String> {
    let label = match summary.outcome {
        TryOutcome::ProfitTargetWin => "THIS IS A PROFIT TARGET WINNER",
        TryOutcome::TimeLimitWin => "TIME LIMIT POSITIVE SESSION",
        TryOutcome::Loss => return None,
    };
    Some(format!(
        "{} | Try #{} | PROFIT: {} {}",
        label,
        try_number,
        summary.profit(),
        currency
    ))
}

impl<W: Write> SpinObserver for DetailWriter<W> {
    fn on_session_start(&mut self) {
        self.tries += 1;
        self.emit(format_args!("{}\n", DETAIL_CSV_HEADER));
    }

    fn on_rush(&mut self, rush: &RushOutcome) {
        let dump = rush_dump(rush, &self.currency);
        self.emit(format_args!("{}", dump));
    }

    fn on_spin(&mut self, record: &SpinRecord) {
        self.emit(format_args!(
            "{},{},{},{}\n",
            record.spin, record.invested, record.won, record.profit
        ));
    }

    fn on_session_end(&mut self, summary: &SessionSummary) {
        let elapsed = summary.totals.elapsed_secs;
        self.emit(format_args!(
            "\nSimulated time used: {} minutes {} seconds\n",
            elapsed / 60,
            elapsed % 60
        ));

        if let Some(line) = winner_line(summary, self.tries, &self.currency) {
            self.emit(format_args!("{}\n", line));
        }

        let totals = &summary.totals;
        let currency = self.currency.clone();
        self.emit(format_args!(
            "MAX PROFIT: {} {} | RUSH SPINS: {} | RUSH TOTAL BELLS COUNT: {}\n\n",
            totals.max_profit, currency, totals.rush_count, totals.last_rush_bells
        ));
    }
}
