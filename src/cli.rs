//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report::CsvReport;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::comparison::{compare_universe, simulate_universe};
use crate::domain::config_validation::{
    parse_start_date, read_double, read_int, validate_data_config, validate_screen_config,
    validate_strategy_config,
};
use crate::domain::error::RadarError;
use crate::domain::screen::{screen, ScreenConfig};
use crate::domain::strategy::{EntryMode, StrategyConfig};
use crate::domain::universe::{load_universe, parse_codes, UniverseLoad};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "radar", about = "Pullback-entry backtester and technical screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the pullback strategy; compares both entry modes unless --mode is given
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated codes overriding [universe] codes
        #[arg(long)]
        code: Option<String>,
        /// Run a single entry mode (open or close) and print its trade log
        #[arg(short, long)]
        mode: Option<EntryMode>,
        /// Write a CSV report instead of printing to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rank symbols by technical score
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        /// Number of candidates to keep, overriding [screen] top
        #[arg(long)]
        top: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            code,
            mode,
            output,
        } => run_backtest(&config, code.as_deref(), mode, output.as_ref()),
        Command::Screen {
            config,
            code,
            top,
            output,
        } => run_screen(&config, code.as_deref(), top, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, RadarError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, RadarError> {
    let dir = config
        .get_string("data", "dir")
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| RadarError::missing("data", "dir"))?;
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

/// Console report on stdout, or a CSV file when `output` is set.
fn open_report(
    output: Option<&PathBuf>,
    show_trades: bool,
) -> Result<Box<dyn ReportPort>, RadarError> {
    match output {
        Some(path) => {
            info!("writing report to {}", path.display());
            Ok(Box::new(CsvReport::from_path(path)?))
        }
        None => Ok(Box::new(
            ConsoleReport::new(io::stdout()).with_trades(show_trades),
        )),
    }
}

fn run_backtest(
    config_path: &PathBuf,
    code_override: Option<&str>,
    mode: Option<EntryMode>,
    output: Option<&PathBuf>,
) -> Result<(), RadarError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let data_port = data_adapter(&config)?;
    let show_trades = config.get_bool("report", "show_trades", false);
    let mut report = open_report(output, show_trades)?;
    run_backtest_pipeline(&data_port, &config, code_override, mode, report.as_mut())
}

fn run_screen(
    config_path: &PathBuf,
    code_override: Option<&str>,
    top: Option<usize>,
    output: Option<&PathBuf>,
) -> Result<(), RadarError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let data_port = data_adapter(&config)?;
    let mut report = open_report(output, false)?;
    run_screen_pipeline(&data_port, &config, code_override, top, report.as_mut())
}

fn run_validate(config_path: &PathBuf) -> Result<(), RadarError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let strategy = build_strategy_config(&config)?;
    let screen = build_screen_config(&config)?;
    let codes = resolve_codes(None, &config)?;

    eprintln!("Universe: {} codes", codes.len());
    for code in &codes {
        let name = config.get_string("names", code).unwrap_or_default();
        eprintln!("  {code} {name}");
    }
    eprintln!("\nStrategy:");
    eprintln!("  entry_mode:        {}", strategy.entry_mode);
    eprintln!(
        "  moving averages:   {} / {}",
        strategy.ma_short_window, strategy.ma_long_window
    );
    eprintln!(
        "  pullback band:     {} to {}",
        strategy.pullback_low, strategy.pullback_high
    );
    eprintln!("  gap_down_floor:    {}", strategy.gap_down_floor);
    eprintln!("  take_profit_ratio: {}", strategy.take_profit_ratio);
    eprintln!("  stop_loss_ratio:   {}", strategy.stop_loss_ratio);
    eprintln!("  initial_cash:      {}", strategy.initial_cash);
    eprintln!("  min bars:          {}", strategy.min_bars());
    eprintln!("\nScreen:");
    eprintln!(
        "  RSI({}) oversold {} / overbought {}, MA({}), top {}",
        screen.rsi_period, screen.oversold, screen.overbought, screen.ma_window, screen.top
    );
    eprintln!("  ETF markers: {}", screen.etf_markers.join(", "));

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_list_symbols(config_path: &PathBuf) -> Result<(), RadarError> {
    let config = load_config(config_path)?;
    let data_port = data_adapter(&config)?;
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, RadarError> {
    validate_strategy_config(config)?;
    let defaults = StrategyConfig::default();

    let entry_mode = match config.get_string("strategy", "entry_mode") {
        Some(s) => s
            .parse::<EntryMode>()
            .map_err(|e| RadarError::invalid("strategy", "entry_mode", e.to_string()))?,
        None => defaults.entry_mode,
    };

    let double = |key: &str, default: f64| read_double(config, "strategy", key, default);
    let window = |key: &str, default: usize| {
        read_int(config, "strategy", key, default as i64).map(|v| v as usize)
    };

    Ok(StrategyConfig {
        take_profit_ratio: double("take_profit_ratio", defaults.take_profit_ratio)?,
        stop_loss_ratio: double("stop_loss_ratio", defaults.stop_loss_ratio)?,
        ma_long_window: window("ma_long_window", defaults.ma_long_window)?,
        ma_short_window: window("ma_short_window", defaults.ma_short_window)?,
        entry_mode,
        initial_cash: double("initial_cash", defaults.initial_cash)?,
        pullback_low: double("pullback_low", defaults.pullback_low)?,
        pullback_high: double("pullback_high", defaults.pullback_high)?,
        gap_down_floor: double("gap_down_floor", defaults.gap_down_floor)?,
    })
}

pub fn build_screen_config(config: &dyn ConfigPort) -> Result<ScreenConfig, RadarError> {
    validate_screen_config(config)?;
    let defaults = ScreenConfig::default();
    let get = |key: &str, default: usize| {
        read_int(config, "screen", key, default as i64).map(|v| v as usize)
    };

    // Comma-separated; an empty value turns ETF detection off.
    let etf_markers = match config.get_string("screen", "etf_markers") {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect(),
        None => defaults.etf_markers,
    };

    Ok(ScreenConfig {
        rsi_period: get("rsi_period", defaults.rsi_period)?,
        ma_window: get("ma_window", defaults.ma_window)?,
        min_bars: get("min_bars", defaults.min_bars)?,
        oversold: read_double(config, "screen", "oversold", defaults.oversold)?,
        overbought: read_double(config, "screen", "overbought", defaults.overbought)?,
        top: get("top", defaults.top)?,
        etf_markers,
    })
}

/// Log each symbol the universe loader dropped and how many survived.
fn log_skipped(universe: &UniverseLoad) {
    if universe.skipped.is_empty() {
        return;
    }
    for skipped in &universe.skipped {
        warn!(code = %skipped.code, reason = %skipped.reason, "skipping symbol");
    }
    info!(
        "using {} of {} symbols",
        universe.symbols.len(),
        universe.symbols.len() + universe.skipped.len()
    );
}

/// `--code` wins over `[universe] codes`; both accept comma-separated lists.
pub fn resolve_codes(
    code_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, RadarError> {
    if let Some(c) = code_override {
        return parse_codes(c).map_err(|e| RadarError::invalid("universe", "codes", e.to_string()));
    }

    match config.get_string("universe", "codes") {
        Some(codes) if !codes.trim().is_empty() => parse_codes(&codes)
            .map_err(|e| RadarError::invalid("universe", "codes", e.to_string())),
        _ => Err(RadarError::missing("universe", "codes")),
    }
}

/// Load the universe, run the backtest and hand the results to `report`.
///
/// Without `mode` both entry modes are compared per symbol; with it, each
/// symbol gets a single run and its trade log.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &dyn ConfigPort,
    code_override: Option<&str>,
    mode: Option<EntryMode>,
    report: &mut dyn ReportPort,
) -> Result<(), RadarError> {
    let strategy = build_strategy_config(config)?;
    let codes = resolve_codes(code_override, config)?;
    let start_date = parse_start_date(config)?;

    info!(
        codes = codes.len(),
        %start_date,
        min_bars = strategy.min_bars(),
        "loading universe"
    );
    let universe = load_universe(
        data_port,
        &codes,
        |code| config.get_string("names", code),
        start_date,
        strategy.min_bars(),
    )?;
    log_skipped(&universe);

    match mode {
        None => {
            info!(symbols = universe.symbols.len(), "comparing entry modes");
            let mut comparisons = Vec::with_capacity(universe.symbols.len());
            for (code, outcome) in compare_universe(&universe.symbols, &strategy) {
                match outcome {
                    Ok(cmp) => comparisons.push(cmp),
                    Err(e) => warn!(%code, error = %e, "comparison failed"),
                }
            }
            report.write_comparisons(&comparisons)
        }
        Some(mode) => {
            info!(symbols = universe.symbols.len(), %mode, "running backtest");
            let strategy = strategy.with_entry_mode(mode);
            let runs = simulate_universe(&universe.symbols, &strategy);
            for (symbol, (code, outcome)) in universe.symbols.iter().zip(runs) {
                match outcome {
                    Ok(result) => report.write_run(symbol, &result)?,
                    Err(e) => warn!(%code, error = %e, "backtest failed"),
                }
            }
            Ok(())
        }
    }
}

pub fn run_screen_pipeline(
    data_port: &dyn DataPort,
    config: &dyn ConfigPort,
    code_override: Option<&str>,
    top: Option<usize>,
    report: &mut dyn ReportPort,
) -> Result<(), RadarError> {
    let mut screen_config = build_screen_config(config)?;
    if let Some(top) = top {
        screen_config.top = top;
    }
    let codes = resolve_codes(code_override, config)?;
    let start_date = parse_start_date(config)?;

    let universe = load_universe(
        data_port,
        &codes,
        |code| config.get_string("names", code),
        start_date,
        screen_config.min_bars,
    )?;
    log_skipped(&universe);

    info!(symbols = universe.symbols.len(), "screening");
    let ranking = screen(&universe.symbols, &screen_config);
    if let Some(best) = &ranking.best_etf {
        info!(code = %best.code, score = best.score, "best ETF");
    }
    report.write_screen(&ranking)
}
