//! Entry-timing comparison: the same strategy run once per [`EntryMode`].
//!
//! Symbols are independent, so a universe is compared in parallel. Results keep
//! the input order and one symbol's failure never aborts the rest.

use rayon::prelude::*;

use super::error::RadarError;
use super::simulator::{simulate, SimulationResult};
use super::strategy::{EntryMode, StrategyConfig};
use super::symbol_data::SymbolData;

#[derive(Debug, Clone)]
pub struct ModeComparison {
    pub code: String,
    pub name: String,
    pub at_open: SimulationResult,
    pub at_close: SimulationResult,
}

impl ModeComparison {
    /// ROI of `at_close` minus ROI of `at_open`, in percentage points.
    pub fn diff_pct(&self) -> f64 {
        self.at_close.roi_pct() - self.at_open.roi_pct()
    }

    /// `AtClose` only when it strictly beats `AtOpen`.
    pub fn winner(&self) -> EntryMode {
        if self.diff_pct() > 0.0 {
            EntryMode::AtClose
        } else {
            EntryMode::AtOpen
        }
    }

    pub fn result(&self, mode: EntryMode) -> &SimulationResult {
        match mode {
            EntryMode::AtOpen => &self.at_open,
            EntryMode::AtClose => &self.at_close,
        }
    }
}

pub fn compare_entry_modes(
    symbol: &SymbolData,
    config: &StrategyConfig,
) -> Result<ModeComparison, RadarError> {
    let at_open = simulate(&symbol.bars, &config.with_entry_mode(EntryMode::AtOpen))?;
    let at_close = simulate(&symbol.bars, &config.with_entry_mode(EntryMode::AtClose))?;

    Ok(ModeComparison {
        code: symbol.code.clone(),
        name: symbol.name.clone(),
        at_open,
        at_close,
    })
}

pub fn compare_universe(
    symbols: &[SymbolData],
    config: &StrategyConfig,
) -> Vec<(String, Result<ModeComparison, RadarError>)> {
    symbols
        .par_iter()
        .map(|symbol| (symbol.code.clone(), compare_entry_modes(symbol, config)))
        .collect()
}

/// Single-mode run over every symbol, in parallel.
pub fn simulate_universe(
    symbols: &[SymbolData],
    config: &StrategyConfig,
) -> Vec<(String, Result<SimulationResult, RadarError>)> {
    symbols
        .par_iter()
        .map(|symbol| (symbol.code.clone(), simulate(&symbol.bars, config)))
        .collect()
}
