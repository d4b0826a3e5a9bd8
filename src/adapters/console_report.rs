//! Plain-text report adapter implementing ReportPort.

use std::io::Write;

use crate::domain::comparison::ModeComparison;
use crate::domain::error::RadarError;
use crate::domain::position::Trade;
use crate::domain::screen::ScreenRanking;
use crate::domain::simulator::SimulationResult;
use crate::domain::strategy::EntryMode;
use crate::domain::symbol_data::SymbolData;
use crate::ports::report_port::ReportPort;

const RULE_WIDTH: usize = 40;

pub struct ConsoleReport<W: Write> {
    out: W,
    show_trades: bool,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_trades: false,
        }
    }

    /// Also list every fill under each comparison.
    pub fn with_trades(mut self, show_trades: bool) -> Self {
        self.show_trades = show_trades;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_trades(&mut self, trades: &[Trade]) -> Result<(), RadarError> {
        if trades.is_empty() {
            writeln!(self.out, "    (no trades)")?;
        }
        for t in trades {
            writeln!(
                self.out,
                "    {} {:<12} {:>10} @ {:.2}",
                t.date, t.kind, t.shares, t.price
            )?;
        }
        Ok(())
    }
}

fn mode_label(mode: EntryMode) -> &'static str {
    match mode {
        EntryMode::AtOpen => "at open",
        EntryMode::AtClose => "at close",
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

impl<W: Write> ReportPort for ConsoleReport<W> {
    fn write_comparisons(&mut self, comparisons: &[ModeComparison]) -> Result<(), RadarError> {
        for cmp in comparisons {
            writeln!(self.out, "[{}] ({})", cmp.name, cmp.code)?;
            for mode in EntryMode::ALL {
                let result = cmp.result(mode);
                writeln!(
                    self.out,
                    "  {:<9} {:>8.2}%  final {}",
                    format!("{}:", mode_label(mode)),
                    result.roi_pct(),
                    group_thousands(result.final_value)
                )?;
                if self.show_trades {
                    self.write_trades(&result.trades)?;
                }
            }

            let diff = cmp.diff_pct();
            writeln!(
                self.out,
                "  -> {} ahead by {:.2}%p",
                mode_label(cmp.winner()),
                diff.abs()
            )?;
            writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_run(&mut self, symbol: &SymbolData, result: &SimulationResult) -> Result<(), RadarError> {
        writeln!(
            self.out,
            "[{}] ({}) {}",
            symbol.name,
            symbol.code,
            mode_label(result.entry_mode)
        )?;
        self.write_trades(&result.trades)?;
        if result.position.shares > 0 {
            writeln!(
                self.out,
                "    open: {} shares marked at {:.2}",
                result.position.shares, result.last_close
            )?;
        }
        writeln!(
            self.out,
            "  final value: {} ({:.2}%)",
            group_thousands(result.final_value),
            result.roi_pct()
        )?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        self.out.flush()?;
        Ok(())
    }

    fn write_screen(&mut self, ranking: &ScreenRanking) -> Result<(), RadarError> {
        if ranking.is_empty() {
            writeln!(self.out, "No candidates found.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:>4}  {:<8} {:<24} {:>10} {:>6} {:>7} {:>6}",
            "RANK", "CODE", "NAME", "PRICE", "RSI", "DISP", "SCORE"
        )?;
        for (rank, r) in ranking.results.iter().enumerate() {
            let rsi = r
                .rsi
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                self.out,
                "{:>4}  {:<8} {:<24} {:>10} {:>6} {:>7.1} {:>6}{}",
                rank + 1,
                r.code,
                r.name,
                group_thousands(r.price),
                rsi,
                r.disparity,
                r.score,
                if r.is_etf { "  ETF" } else { "" }
            )?;
        }
        if let Some(best) = &ranking.best_etf {
            writeln!(
                self.out,
                "Best ETF: {} ({}) score {}",
                best.name, best.code, best.score
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
