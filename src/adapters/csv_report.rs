//! CSV report adapter implementing ReportPort.
//!
//! Each write produces one table with its own header row, so a report file is
//! expected to hold a single kind of output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::comparison::ModeComparison;
use crate::domain::error::RadarError;
use crate::domain::screen::ScreenRanking;
use crate::domain::simulator::SimulationResult;
use crate::domain::symbol_data::SymbolData;
use crate::ports::report_port::ReportPort;

pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReport<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RadarError> {
        let writer = csv::Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl<W: Write> CsvReport<W> {
    pub fn from_writer(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
        }
    }

    pub fn into_inner(self) -> Result<W, RadarError> {
        self.writer.into_inner().map_err(|e| RadarError::Data {
            reason: format!("failed to flush CSV report: {}", e.error()),
        })
    }
}

fn pct(value: f64) -> String {
    format!("{:.4}", value)
}

impl<W: Write> ReportPort for CsvReport<W> {
    fn write_comparisons(&mut self, comparisons: &[ModeComparison]) -> Result<(), RadarError> {
        self.writer.write_record([
            "code",
            "name",
            "final_open",
            "final_close",
            "roi_open_pct",
            "roi_close_pct",
            "diff_pct",
            "winner",
        ])?;
        for cmp in comparisons {
            self.writer.write_record([
                cmp.code.clone(),
                cmp.name.clone(),
                cmp.at_open.final_value.to_string(),
                cmp.at_close.final_value.to_string(),
                pct(cmp.at_open.roi_pct()),
                pct(cmp.at_close.roi_pct()),
                pct(cmp.diff_pct()),
                cmp.winner().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_run(&mut self, symbol: &SymbolData, result: &SimulationResult) -> Result<(), RadarError> {
        self.writer
            .write_record(["code", "mode", "date", "action", "shares", "price", "notional"])?;
        for t in &result.trades {
            self.writer.write_record([
                symbol.code.clone(),
                result.entry_mode.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.shares.to_string(),
                format!("{:.2}", t.price),
                format!("{:.2}", t.notional()),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_screen(&mut self, ranking: &ScreenRanking) -> Result<(), RadarError> {
        self.writer.write_record([
            "rank", "code", "name", "price", "rsi", "disparity", "score", "etf", "best_etf",
        ])?;
        let best_code = ranking.best_etf.as_ref().map(|b| b.code.as_str());
        for (rank, r) in ranking.results.iter().enumerate() {
            self.writer.write_record([
                (rank + 1).to_string(),
                r.code.clone(),
                r.name.clone(),
                r.price.to_string(),
                r.rsi.map(|v| format!("{:.1}", v)).unwrap_or_default(),
                format!("{:.1}", r.disparity),
                r.score.to_string(),
                r.is_etf.to_string(),
                (best_code == Some(r.code.as_str())).to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::{Position, Trade, TradeKind};
    use crate::domain::screen::ScreenResult;
    use crate::domain::strategy::EntryMode;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn run(mode: EntryMode, final_value: i64, trades: Vec<Trade>) -> SimulationResult {
        SimulationResult {
            entry_mode: mode,
            initial_cash: 10_000_000.0,
            final_value,
            cash: final_value as f64,
            position: Position::default(),
            last_close: 100.0,
            trades,
        }
    }

    fn trades() -> Vec<Trade> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        vec![
            Trade {
                date,
                bar_index: 6,
                kind: TradeKind::Entry,
                shares: 99_009,
                price: 101.0,
            },
            Trade {
                date: date.succ_opt().unwrap(),
                bar_index: 7,
                kind: TradeKind::TrendBreak,
                shares: 99_009,
                price: 100.0,
            },
        ]
    }

    fn lines(report: CsvReport<Vec<u8>>) -> Vec<String> {
        let bytes = report.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn comparisons_table() {
        let cmp = ModeComparison {
            code: "069500".into(),
            name: "KODEX 200".into(),
            at_open: run(EntryMode::AtOpen, 9_900_991, trades()),
            at_close: run(EntryMode::AtClose, 10_000_000, vec![]),
        };
        let mut report = CsvReport::from_writer(Vec::new());
        report.write_comparisons(&[cmp]).unwrap();

        let lines = lines(report);
        assert_eq!(
            lines[0],
            "code,name,final_open,final_close,roi_open_pct,roi_close_pct,diff_pct,winner"
        );
        assert_eq!(
            lines[1],
            "069500,KODEX 200,9900991,10000000,-0.9901,0.0000,0.9901,close"
        );
    }

    #[test]
    fn run_trade_log() {
        let symbol = SymbolData::new("069500".into(), None, vec![]);
        let result = run(EntryMode::AtOpen, 9_900_991, trades());
        let mut report = CsvReport::from_writer(Vec::new());
        report.write_run(&symbol, &result).unwrap();

        let lines = lines(report);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "069500,open,2024-01-07,BUY,99009,101.00,10000009.00");
        assert_eq!(lines[2], "069500,open,2024-01-08,TREND_EXIT,99009,100.00,9900900.00");
    }

    #[test]
    fn screen_table_leaves_undefined_rsi_blank() {
        let results = vec![
            ScreenResult {
                code: "000660".into(),
                name: "SK Hynix".into(),
                price: 187_500,
                rsi: Some(35.2),
                disparity: 96.4,
                score: 40,
                is_etf: false,
            },
            ScreenResult {
                code: "FLAT".into(),
                name: "FLAT".into(),
                price: 100,
                rsi: None,
                disparity: 100.0,
                score: 0,
                is_etf: false,
            },
        ];
        let ranking = ScreenRanking {
            results,
            best_etf: None,
        };
        let mut report = CsvReport::from_writer(Vec::new());
        report.write_screen(&ranking).unwrap();

        let lines = lines(report);
        assert_eq!(lines[1], "1,000660,SK Hynix,187500,35.2,96.4,40,false,false");
        assert_eq!(lines[2], "2,FLAT,FLAT,100,,100.0,0,false,false");
    }

    #[test]
    fn screen_table_flags_the_best_etf() {
        let etf = |code: &str, name: &str, score: i32| ScreenResult {
            code: code.into(),
            name: name.into(),
            price: 35_000,
            rsi: Some(72.0),
            disparity: 101.0,
            score,
            is_etf: true,
        };
        let ranking = ScreenRanking {
            results: vec![etf("069500", "KODEX 200", -20), etf("133690", "TIGER NASDAQ100", 0)],
            best_etf: Some(etf("133690", "TIGER NASDAQ100", 0)),
        };
        let mut report = CsvReport::from_writer(Vec::new());
        report.write_screen(&ranking).unwrap();

        let lines = lines(report);
        assert_eq!(lines[1], "1,069500,KODEX 200,35000,72.0,101.0,-20,true,false");
        assert_eq!(lines[2], "2,133690,TIGER NASDAQ100,35000,72.0,101.0,0,true,true");
    }

    #[test]
    fn from_path_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.csv");
        {
            let mut report = CsvReport::from_path(&path).unwrap();
            report.write_screen(&ScreenRanking::default()).unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "rank,code,name,price,rsi,disparity,score,etf,best_etf\n"
        );
    }

    #[test]
    fn from_path_bad_directory_is_error() {
        assert!(CsvReport::from_path("/nonexistent/dir/report.csv").is_err());
    }
}
