//! Technical screener: RSI, moving-average position and disparity scoring.
//!
//! Score contributions for the latest bar:
//! - RSI below `oversold`: +30; above `overbought`: -20
//! - close above MA(`ma_window`): +20
//! - disparity (close / MA * 100) below 98: +10
//!
//! Ranking keeps the best `top` stocks and then every ETF, whatever its
//! score. A symbol is an ETF when its name contains one of `etf_markers`.

use std::cmp::Reverse;
use tracing::warn;

use super::error::RadarError;
use super::indicator::rsi::calculate_rsi;
use super::indicator::sma::calculate_sma;
use super::symbol_data::SymbolData;

const DISPARITY_DIP: f64 = 98.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub rsi_period: usize,
    pub ma_window: usize,
    pub min_bars: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub top: usize,
    /// Name fragments (ASCII case-insensitive) that mark a fund as an ETF.
    pub etf_markers: Vec<String>,
}

impl ScreenConfig {
    pub fn is_etf(&self, name: &str) -> bool {
        let name = name.to_ascii_uppercase();
        self.etf_markers
            .iter()
            .any(|marker| name.contains(&marker.to_ascii_uppercase()))
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            rsi_period: 14,
            ma_window: 20,
            min_bars: 60,
            oversold: 40.0,
            overbought: 70.0,
            top: 25,
            etf_markers: vec!["TIGER".to_string(), "KODEX".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenResult {
    pub code: String,
    pub name: String,
    /// Last close, truncated to whole currency units.
    pub price: i64,
    /// Rounded to one decimal; `None` when undefined (no movement in the window).
    pub rsi: Option<f64>,
    /// Rounded to one decimal.
    pub disparity: f64,
    pub score: i32,
    pub is_etf: bool,
}

/// Screen output: ranked stocks followed by all ETFs in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenRanking {
    pub results: Vec<ScreenResult>,
    /// Highest-scoring ETF; the earliest one wins a tie.
    pub best_etf: Option<ScreenResult>,
}

impl ScreenRanking {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn score_symbol(symbol: &SymbolData, config: &ScreenConfig) -> Result<ScreenResult, RadarError> {
    if symbol.bars.len() < config.min_bars {
        return Err(RadarError::InsufficientHistory {
            bars: symbol.bars.len(),
            minimum: config.min_bars,
        });
    }

    let last_close = symbol
        .last_bar()
        .map(|b| b.close)
        .ok_or_else(|| RadarError::NoData {
            code: symbol.code.clone(),
        })?;
    let ma = calculate_sma(&symbol.bars, config.ma_window)
        .last_value()
        .ok_or(RadarError::InsufficientHistory {
            bars: symbol.bars.len(),
            minimum: config.ma_window,
        })?;
    let rsi = calculate_rsi(&symbol.bars, config.rsi_period).last_value();
    let disparity = last_close / ma * 100.0;

    let mut score = 0;
    match rsi {
        Some(r) if r < config.oversold => score += 30,
        Some(r) if r > config.overbought => score -= 20,
        _ => {}
    }
    if last_close > ma {
        score += 20;
    }
    if disparity < DISPARITY_DIP {
        score += 10;
    }

    Ok(ScreenResult {
        code: symbol.code.clone(),
        name: symbol.name.clone(),
        price: last_close.trunc() as i64,
        rsi: rsi.map(round1),
        disparity: round1(disparity),
        score,
        is_etf: config.is_etf(&symbol.name),
    })
}

/// Score every symbol, skip the ones that cannot be scored, and rank the rest.
pub fn screen(symbols: &[SymbolData], config: &ScreenConfig) -> ScreenRanking {
    let scored = symbols
        .iter()
        .filter_map(|symbol| match score_symbol(symbol, config) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(code = %symbol.code, error = %e, "not scored");
                None
            }
        })
        .collect();
    rank(scored, config.top)
}

/// Best `top` stocks by score (ties keep input order), then every ETF.
pub fn rank(results: Vec<ScreenResult>, top: usize) -> ScreenRanking {
    let (etfs, mut stocks): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_etf);
    stocks.sort_by(|a, b| b.score.cmp(&a.score));
    stocks.truncate(top);

    let best_etf = etfs.iter().min_by_key(|r| Reverse(r.score)).cloned();
    stocks.extend(etfs);
    ScreenRanking {
        results: stocks,
        best_etf,
    }
}
