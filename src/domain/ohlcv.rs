//! Daily price bar representation.

use chrono::NaiveDate;

/// One trading day for one symbol.
///
/// `low <= close <= high` is assumed but never checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Close above open.
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }
}
