//! RSI (Relative Strength Index) with rolling simple averages.
//!
//! Average gain/loss at bar i is the plain mean of the last `period` close-to-close
//! changes (no Wilder smoothing).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100. If both are 0 the value is undefined.
//!
//! Warmup: first `period` bars have no value (need `period` price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut values: Vec<IndicatorPoint> = bars
        .iter()
        .map(|b| IndicatorPoint {
            date: b.date,
            value: None,
        })
        .collect();

    if period == 0 || bars.len() <= period {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    // changes[k] is the move into bar k + 1
    let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

    for i in period..bars.len() {
        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = window.iter().filter(|c| **c < 0.0).map(|c| -c).sum::<f64>() / period as f64;

        values[i].value = if avg_loss == 0.0 {
            (avg_gain > 0.0).then_some(100.0)
        } else {
            Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
        };
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
