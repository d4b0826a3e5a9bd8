//! Pullback strategy parameters.

use std::fmt;
use std::str::FromStr;

/// Which of the two mutually exclusive entry rules is active for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    /// Buy at the next day's open unless it gaps down past the floor.
    AtOpen,
    /// Buy at the next day's close, only if that day closes green.
    AtClose,
}

impl EntryMode {
    pub const ALL: [EntryMode; 2] = [EntryMode::AtOpen, EntryMode::AtClose];
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::AtOpen => write!(f, "open"),
            EntryMode::AtClose => write!(f, "close"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry mode '{0}' (expected open or close)")]
pub struct ParseEntryModeError(pub String);

impl FromStr for EntryMode {
    type Err = ParseEntryModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "at_open" => Ok(EntryMode::AtOpen),
            "close" | "at_close" => Ok(EntryMode::AtClose),
            other => Err(ParseEntryModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub take_profit_ratio: f64,
    pub stop_loss_ratio: f64,
    pub ma_long_window: usize,
    pub ma_short_window: usize,
    pub entry_mode: EntryMode,
    pub initial_cash: f64,
    /// Lower bound of close / MA_short for a pullback entry.
    pub pullback_low: f64,
    /// Upper bound of close / MA_short for a pullback entry.
    pub pullback_high: f64,
    /// `at_open` rejects a next-day open at or below `close * gap_down_floor`.
    pub gap_down_floor: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            take_profit_ratio: 1.10,
            stop_loss_ratio: 0.95,
            ma_long_window: 240,
            ma_short_window: 10,
            entry_mode: EntryMode::AtOpen,
            initial_cash: 10_000_000.0,
            pullback_low: 0.98,
            pullback_high: 1.05,
            gap_down_floor: 0.98,
        }
    }
}

impl StrategyConfig {
    /// Shortest series the simulator accepts: the long warmup plus one decision
    /// bar and the look-ahead bar it fills against.
    pub fn min_bars(&self) -> usize {
        self.ma_long_window + 2
    }

    pub fn with_entry_mode(&self, entry_mode: EntryMode) -> Self {
        StrategyConfig {
            entry_mode,
            ..self.clone()
        }
    }
}
