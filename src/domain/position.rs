//! Position state and the trade log.

use chrono::NaiveDate;
use std::fmt;

/// Long-only holding for one symbol. `shares == 0` means flat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    pub shares: u64,
    /// Only meaningful while `shares > 0`.
    pub entry_price: f64,
    /// Set once the partial take-profit has fired for the current position.
    pub half_sold: bool,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn stop_price(&self, stop_loss_ratio: f64) -> f64 {
        self.entry_price * stop_loss_ratio
    }

    pub fn take_profit_price(&self, take_profit_ratio: f64) -> f64 {
        self.entry_price * take_profit_ratio
    }

    pub fn should_stop_loss(&self, low: f64, stop_loss_ratio: f64) -> bool {
        low <= self.stop_price(stop_loss_ratio)
    }

    pub fn should_take_profit(&self, high: f64, take_profit_ratio: f64) -> bool {
        !self.half_sold && high >= self.take_profit_price(take_profit_ratio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeKind {
    Entry,
    StopLoss,
    TakeProfit,
    TrendBreak,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TradeKind::Entry => "BUY",
            TradeKind::StopLoss => "STOP",
            TradeKind::TakeProfit => "TAKE_PROFIT",
            TradeKind::TrendBreak => "TREND_EXIT",
        };
        f.pad(label)
    }
}

/// One fill. `bar_index` points into the simulated series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub bar_index: usize,
    pub kind: TradeKind,
    pub shares: u64,
    pub price: f64,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.shares as f64 * self.price
    }
}
