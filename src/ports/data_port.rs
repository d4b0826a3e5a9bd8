//! Market data access port trait.

use crate::domain::error::RadarError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `code` from `start_date` on, in chronological order.
    fn fetch_bars(&self, code: &str, start_date: NaiveDate) -> Result<Vec<PriceBar>, RadarError>;

    fn list_symbols(&self) -> Result<Vec<String>, RadarError>;
}
