//! Report generation port trait.

use crate::domain::comparison::ModeComparison;
use crate::domain::error::RadarError;
use crate::domain::screen::ScreenRanking;
use crate::domain::simulator::SimulationResult;
use crate::domain::symbol_data::SymbolData;

/// Port for writing backtest and screening reports.
pub trait ReportPort {
    /// Open-vs-close comparison for each symbol.
    fn write_comparisons(&mut self, comparisons: &[ModeComparison]) -> Result<(), RadarError>;

    /// A single-mode run with its trade log.
    fn write_run(&mut self, symbol: &SymbolData, result: &SimulationResult) -> Result<(), RadarError>;

    /// Ranked screener output, with the best ETF when one was screened.
    fn write_screen(&mut self, ranking: &ScreenRanking) -> Result<(), RadarError>;
}
