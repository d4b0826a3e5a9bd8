//! One symbol's fetched price history.

use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone)]
pub struct SymbolData {
    pub code: String,
    /// Display name; falls back to the code.
    pub name: String,
    pub bars: Vec<PriceBar>,
}

impl SymbolData {
    pub fn new(code: String, name: Option<String>, bars: Vec<PriceBar>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| code.clone());
        Self { code, name, bars }
    }

    pub fn last_bar(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}
