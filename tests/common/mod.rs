#![allow(dead_code)]

use chrono::NaiveDate;
pub use radar::domain::ohlcv::PriceBar;
use radar::domain::error::RadarError;
use radar::domain::strategy::{EntryMode, StrategyConfig};
use radar::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, code: &str, start_date: NaiveDate) -> Result<Vec<PriceBar>, RadarError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(RadarError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, RadarError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bar `day` days after 2024-01-01.
pub fn bar(day: usize, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day as i64),
        open,
        high,
        low,
        close,
    }
}

pub fn flat(day: usize, price: f64) -> PriceBar {
    bar(day, price, price, price, price)
}

/// Append `(open, high, low, close)` rows after `bars`, continuing the dates.
pub fn extend(mut bars: Vec<PriceBar>, rows: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
    let start = bars.len();
    for (k, &(o, h, l, c)) in rows.iter().enumerate() {
        bars.push(bar(start + k, o, h, l, c));
    }
    bars
}

/// MA windows 5 / 3 so scenarios fit in a handful of bars.
pub fn small_config(mode: EntryMode) -> StrategyConfig {
    StrategyConfig {
        ma_long_window: 5,
        ma_short_window: 3,
        entry_mode: mode,
        ..StrategyConfig::default()
    }
}

/// Five flat bars at 100 then a signal bar closing at 101.
///
/// On bar 5 close 101 is above MA(5) = 100.2 and 101 / MA(3) = 1.0066 sits in
/// the pullback band, so bar 6 decides the fill.
pub fn warmup() -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = (0..5).map(|d| flat(d, 100.0)).collect();
    bars.push(bar(5, 100.0, 101.0, 100.0, 101.0));
    bars
}

/// Both modes buy on bar 6, then bar 7 gaps down through the stop.
pub fn gap_down_stop() -> Vec<PriceBar> {
    extend(
        warmup(),
        &[(101.0, 102.0, 100.0, 101.5), (90.0, 92.0, 80.0, 85.0)],
    )
}

/// Bar 6 opens above the gap floor but closes red: only `at_open` buys.
pub fn open_only() -> Vec<PriceBar> {
    extend(
        warmup(),
        &[(101.0, 101.0, 99.0, 100.0), (100.0, 100.0, 100.0, 100.0)],
    )
}

/// Bar 6 gaps below the floor but closes green: only `at_close` buys.
pub fn close_only() -> Vec<PriceBar> {
    extend(
        warmup(),
        &[(98.0, 103.0, 97.5, 102.0), (99.0, 100.0, 98.0, 99.5)],
    )
}

/// Bar 7 touches both the stop and the take-profit level.
pub fn stop_and_target_same_bar() -> Vec<PriceBar> {
    extend(
        warmup(),
        &[(101.0, 102.0, 100.0, 101.5), (100.0, 120.0, 90.0, 110.0)],
    )
}

/// Entry, half take-profit, trend exit, then a second entry that takes
/// profit again.
pub fn reentry() -> Vec<PriceBar> {
    extend(
        warmup(),
        &[
            (101.0, 112.0, 100.0, 111.0),
            (111.0, 113.0, 110.0, 112.0),
            (110.0, 110.0, 104.0, 105.0),
            (109.0, 111.0, 108.0, 110.0),
            (110.0, 111.0, 109.0, 110.5),
            (112.0, 122.0, 111.0, 121.0),
        ],
    )
}

/// 260 bars for the default 240 / 10 windows: flat at 100 through bar 240, a
/// rally, a pullback on bar 245, a take-profit, a trend break on bar 254 and
/// a slide into the end of the series.
pub fn long_series() -> Vec<PriceBar> {
    let base: Vec<PriceBar> = (0..241).map(|d| flat(d, 100.0)).collect();
    extend(
        base,
        &[
            (101.0, 111.0, 101.0, 110.0),
            (110.0, 116.0, 109.0, 115.0),
            (115.0, 119.0, 114.0, 118.0),
            (118.0, 121.0, 117.0, 120.0),
            (119.0, 119.0, 111.0, 112.0),
            (113.0, 117.0, 112.0, 116.0),
            (118.0, 125.0, 117.0, 124.0),
            (124.0, 126.0, 122.0, 125.0),
            (125.0, 127.0, 123.0, 126.0),
            (126.0, 131.0, 125.0, 130.0),
            (130.0, 132.0, 128.0, 129.0),
            (129.0, 130.0, 126.0, 127.0),
            (127.0, 128.0, 125.0, 126.0),
            (126.0, 127.0, 121.0, 122.0),
            (95.0, 96.0, 90.0, 91.0),
            (91.0, 92.0, 89.0, 90.0),
            (90.0, 91.0, 88.0, 89.0),
            (89.0, 90.0, 87.0, 88.0),
            (88.0, 89.0, 86.0, 87.0),
        ],
    )
}

/// Write `bars` as `<dir>/<code>.csv` in the data-directory layout.
pub fn write_csv(dir: &Path, code: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            b.date, b.open, b.high, b.low, b.close
        ));
    }
    fs::write(dir.join(format!("{code}.csv")), content).unwrap();
}
