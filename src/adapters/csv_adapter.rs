//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<code>.csv`, with a header row and columns
//! `date,open,high,low,close` (further columns such as volume are ignored).
//! Codes arrive uppercased from the universe parser, so a file whose stem
//! differs only in ASCII case (`spy.csv` for `SPY`) is found as well.

use crate::domain::error::RadarError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<base>/<code>.csv` when it exists, else the first directory entry
    /// whose stem matches `code` ignoring ASCII case. Falls back to the exact
    /// path so a missing file still reports it.
    fn csv_path(&self, code: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", code));
        if exact.is_file() {
            return exact;
        }
        let Ok(entries) = fs::read_dir(&self.base_path) else {
            return exact;
        };
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.extension().is_some_and(|ext| ext == "csv")
                    && path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(code))
            })
            .unwrap_or(exact)
    }
}

fn parse_price(record: &StringRecord, index: usize, column: &str, line: u64) -> Result<f64, RadarError> {
    let raw = record.get(index).ok_or_else(|| RadarError::Data {
        reason: format!("line {line}: missing {column} column"),
    })?;
    let value: f64 = raw.parse().map_err(|e| RadarError::Data {
        reason: format!("line {line}: invalid {column} value '{raw}': {e}"),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(RadarError::Data {
            reason: format!("line {line}: {column} must be positive, got {raw}"),
        });
    }
    Ok(value)
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, code: &str, start_date: NaiveDate) -> Result<Vec<PriceBar>, RadarError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| RadarError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let date_str = record.get(0).ok_or_else(|| RadarError::Data {
                reason: format!("line {line}: missing date column"),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                RadarError::Data {
                    reason: format!("line {line}: invalid date '{date_str}': {e}"),
                }
            })?;

            if date < start_date {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: parse_price(&record, 1, "open", line)?,
                high: parse_price(&record, 2, "high", line)?,
                low: parse_price(&record, 3, "low", line)?,
                close: parse_price(&record, 4, "close", line)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, RadarError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RadarError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| RadarError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
