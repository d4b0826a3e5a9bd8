//! Single-symbol account: cash, the open position and the trade log.

use chrono::NaiveDate;

use super::position::{Position, Trade, TradeKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Uninvested balance. Never checked against zero: there is no margin model.
    pub cash: f64,
    pub initial_cash: f64,
    pub position: Position,
    pub trades: Vec<Trade>,
}

impl Account {
    pub fn new(initial_cash: f64) -> Self {
        Account {
            cash: initial_cash,
            initial_cash,
            position: Position::default(),
            trades: Vec::new(),
        }
    }

    /// Spend all available cash on whole shares at `price`.
    ///
    /// Returns the number of shares bought. Zero means the account cannot
    /// afford a single share and nothing changed.
    pub fn open_long(&mut self, date: NaiveDate, bar_index: usize, price: f64) -> u64 {
        let shares = (self.cash / price).floor() as u64;
        if shares == 0 {
            return 0;
        }

        self.cash -= shares as f64 * price;
        self.position = Position {
            shares,
            entry_price: price,
            half_sold: false,
        };
        self.trades.push(Trade {
            date,
            bar_index,
            kind: TradeKind::Entry,
            shares,
            price,
        });
        shares
    }

    /// Sell up to `shares` at `price`, crediting cash. Returns the quantity sold.
    pub fn sell(
        &mut self,
        date: NaiveDate,
        bar_index: usize,
        kind: TradeKind,
        shares: u64,
        price: f64,
    ) -> u64 {
        let shares = shares.min(self.position.shares);
        self.cash += shares as f64 * price;
        self.position.shares -= shares;
        self.trades.push(Trade {
            date,
            bar_index,
            kind,
            shares,
            price,
        });
        shares
    }

    pub fn sell_all(&mut self, date: NaiveDate, bar_index: usize, kind: TradeKind, price: f64) -> u64 {
        let shares = self.position.shares;
        self.sell(date, bar_index, kind, shares, price)
    }

    /// Cash plus open shares marked at `price`.
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }
}
