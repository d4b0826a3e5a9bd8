//! Pullback trade simulator.
//!
//! A single in-memory pass over one symbol's daily bars. Decision bar `i` runs
//! from `ma_long_window` to `len - 2` and every fill is taken against bar `i + 1`:
//!
//! - Flat: enter when close is above the long average and within the pullback
//!   band of the short average, filling per the configured [`EntryMode`].
//! - Holding: stop-loss (whole position, at the stop price) pre-empts everything
//!   else on that bar; otherwise a one-time half take-profit and then the
//!   trend-break exit against the short average are both evaluated.
//!
//! Shares still held after the last bar are marked at the final close. That mark
//! is a reporting convention and is not recorded as a trade.

use tracing::debug;

use super::error::RadarError;
use super::indicator::sma::calculate_sma;
use super::ohlcv::PriceBar;
use super::portfolio::Account;
use super::position::{Position, Trade, TradeKind};
use super::strategy::{EntryMode, StrategyConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub entry_mode: EntryMode,
    pub initial_cash: f64,
    /// `cash + shares * last_close`, truncated to whole currency units.
    pub final_value: i64,
    pub cash: f64,
    pub position: Position,
    pub last_close: f64,
    pub trades: Vec<Trade>,
}

impl SimulationResult {
    /// Percentage return of `final_value` over the starting cash.
    pub fn roi_pct(&self) -> f64 {
        (self.final_value as f64 - self.initial_cash) / self.initial_cash * 100.0
    }

    pub fn count(&self, kind: TradeKind) -> usize {
        self.trades.iter().filter(|t| t.kind == kind).count()
    }
}

pub fn simulate(bars: &[PriceBar], config: &StrategyConfig) -> Result<SimulationResult, RadarError> {
    let minimum = config.min_bars();
    if bars.len() < minimum {
        return Err(RadarError::InsufficientHistory {
            bars: bars.len(),
            minimum,
        });
    }

    let ma_long = calculate_sma(bars, config.ma_long_window);
    let ma_short = calculate_sma(bars, config.ma_short_window);
    let mut account = Account::new(config.initial_cash);

    for i in config.ma_long_window..bars.len() - 1 {
        let today = &bars[i];
        let tomorrow = &bars[i + 1];

        if account.position.is_flat() {
            if !is_pullback(today.close, ma_long.value_at(i), ma_short.value_at(i), config) {
                continue;
            }
            let Some(fill) = entry_fill(today, tomorrow, config.entry_mode, config.gap_down_floor)
            else {
                continue;
            };

            let shares = account.open_long(tomorrow.date, i + 1, fill);
            if shares == 0 {
                debug!(date = %tomorrow.date, price = fill, cash = account.cash, "entry skipped, cannot afford one share");
            } else {
                debug!(date = %tomorrow.date, price = fill, shares, mode = %config.entry_mode, "entered position");
            }
        } else {
            evaluate_exits(&mut account, tomorrow, i + 1, ma_short.value_at(i + 1), config);
        }
    }

    let last_close = bars[bars.len() - 1].close;
    let final_value = account.total_value(last_close).trunc() as i64;

    Ok(SimulationResult {
        entry_mode: config.entry_mode,
        initial_cash: config.initial_cash,
        final_value,
        cash: account.cash,
        position: account.position,
        last_close,
        trades: account.trades,
    })
}

/// Trend filter plus pullback band. An absent average never qualifies.
pub fn is_pullback(
    close: f64,
    ma_long: Option<f64>,
    ma_short: Option<f64>,
    config: &StrategyConfig,
) -> bool {
    let (Some(long), Some(short)) = (ma_long, ma_short) else {
        return false;
    };
    let disparity = close / short;
    close > long && disparity >= config.pullback_low && disparity <= config.pullback_high
}

/// Fill price for an entry signalled on `today`, or `None` when the mode's
/// confirmation rule rejects `tomorrow`.
pub fn entry_fill(
    today: &PriceBar,
    tomorrow: &PriceBar,
    mode: EntryMode,
    gap_down_floor: f64,
) -> Option<f64> {
    let fill = match mode {
        EntryMode::AtOpen => {
            (tomorrow.open > today.close * gap_down_floor).then_some(tomorrow.open)
        }
        EntryMode::AtClose => tomorrow.is_green().then_some(tomorrow.close),
    };
    fill.filter(|price| *price > 0.0)
}

fn evaluate_exits(
    account: &mut Account,
    tomorrow: &PriceBar,
    index: usize,
    ma_short_next: Option<f64>,
    config: &StrategyConfig,
) {
    if account
        .position
        .should_stop_loss(tomorrow.low, config.stop_loss_ratio)
    {
        let price = account.position.stop_price(config.stop_loss_ratio);
        let sold = account.sell_all(tomorrow.date, index, TradeKind::StopLoss, price);
        debug!(date = %tomorrow.date, price, shares = sold, "stop-loss");
        return;
    }

    if account
        .position
        .should_take_profit(tomorrow.high, config.take_profit_ratio)
    {
        let price = account.position.take_profit_price(config.take_profit_ratio);
        let half = account.position.shares / 2;
        if half > 0 {
            account.sell(tomorrow.date, index, TradeKind::TakeProfit, half, price);
        }
        account.position.half_sold = true;
        debug!(date = %tomorrow.date, price, shares = half, "partial take-profit");
    }

    if ma_short_next.is_some_and(|ma| tomorrow.close < ma) {
        let sold = account.sell_all(tomorrow.date, index, TradeKind::TrendBreak, tomorrow.close);
        debug!(date = %tomorrow.date, price = tomorrow.close, shares = sold, "trend-break exit");
    }
}
