//! Symbol universe: code-list parsing and history loading.
//!
//! Parses code lists from configuration and fetches each symbol's bars,
//! skipping symbols that fail to load or have too little history.

use crate::domain::error::RadarError;
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug)]
pub struct UniverseLoad {
    pub symbols: Vec<SymbolData>,
    pub skipped: Vec<SkippedCode>,
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
    InsufficientBars { bars: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => write!(f, "no data found"),
            SkipReason::InsufficientBars { bars } => write!(f, "insufficient history ({bars} bars)"),
        }
    }
}

/// Fetch every code from `start_date` on. Codes that fail to load or have
/// fewer than `min_bars` bars are returned in `skipped` with their reason; an
/// empty result is an error.
pub fn load_universe(
    data_port: &dyn DataPort,
    codes: &[String],
    name_of: impl Fn(&str) -> Option<String>,
    start_date: NaiveDate,
    min_bars: usize,
) -> Result<UniverseLoad, RadarError> {
    let mut symbols = Vec::new();
    let mut skipped = Vec::new();

    for code in codes {
        let bars = match data_port.fetch_bars(code, start_date) {
            Ok(bars) => bars,
            Err(e) => {
                skipped.push(SkippedCode {
                    code: code.clone(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        if bars.is_empty() {
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < min_bars {
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        debug!(%code, bars = bars.len(), "loaded");
        symbols.push(SymbolData::new(code.clone(), name_of(code), bars));
    }

    if symbols.is_empty() {
        return Err(RadarError::NoData {
            code: codes.join(","),
        });
    }

    Ok(UniverseLoad { symbols, skipped })
}
