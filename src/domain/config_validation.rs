//! Configuration validation.
//!
//! Validates all config fields before any data is loaded. Numeric keys are
//! read from their raw text: a value that is present but does not parse, or
//! parses to NaN or infinity, is rejected rather than replaced by its default.

use crate::domain::error::RadarError;
use crate::domain::strategy::EntryMode;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `[section] key` as a finite float, or `default` when the key is absent.
pub fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, RadarError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| RadarError::invalid(section, key, format!("expected a number, got '{raw}'")))?;
    if !value.is_finite() {
        return Err(RadarError::invalid(
            section,
            key,
            format!("{key} must be a finite number, got '{raw}'"),
        ));
    }
    Ok(value)
}

/// `[section] key` as an integer, or `default` when the key is absent.
pub fn read_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, RadarError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            RadarError::invalid(section, key, format!("expected an integer, got '{raw}'"))
        }),
    }
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RadarError> {
    validate_data_dir(config)?;
    parse_start_date(config)?;
    validate_codes(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), RadarError> {
    validate_ratios(config)?;
    validate_windows(config)?;
    validate_initial_cash(config)?;
    validate_pullback_band(config)?;
    validate_entry_mode(config)?;
    Ok(())
}

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), RadarError> {
    for key in ["rsi_period", "ma_window", "min_bars", "top"] {
        if read_int(config, "screen", key, 1)? < 1 {
            return Err(RadarError::invalid("screen", key, format!("{key} must be at least 1")));
        }
    }

    let oversold = read_double(config, "screen", "oversold", 40.0)?;
    let overbought = read_double(config, "screen", "overbought", 70.0)?;
    if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
        return Err(RadarError::invalid(
            "screen",
            "oversold",
            "RSI thresholds must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(RadarError::invalid(
            "screen",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

/// Parse `[data] start_date`, defaulting to 2023-01-01 when absent.
pub fn parse_start_date(config: &dyn ConfigPort) -> Result<NaiveDate, RadarError> {
    match config.get_string("data", "start_date") {
        None => Ok(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
            RadarError::invalid(
                "data",
                "start_date",
                "invalid start_date format, expected YYYY-MM-DD",
            )
        }),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), RadarError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(RadarError::missing("data", "dir")),
    }
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), RadarError> {
    match config.get_string("universe", "codes") {
        Some(c) if !c.trim().is_empty() => parse_codes(&c)
            .map(|_| ())
            .map_err(|e| RadarError::invalid("universe", "codes", e.to_string())),
        _ => Err(RadarError::missing("universe", "codes")),
    }
}

fn validate_ratios(config: &dyn ConfigPort) -> Result<(), RadarError> {
    let take_profit = read_double(config, "strategy", "take_profit_ratio", 1.10)?;
    if take_profit <= 1.0 {
        return Err(RadarError::invalid(
            "strategy",
            "take_profit_ratio",
            "take_profit_ratio must be greater than 1",
        ));
    }

    let stop_loss = read_double(config, "strategy", "stop_loss_ratio", 0.95)?;
    if stop_loss <= 0.0 || stop_loss >= 1.0 {
        return Err(RadarError::invalid(
            "strategy",
            "stop_loss_ratio",
            "stop_loss_ratio must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), RadarError> {
    for (key, default) in [("ma_long_window", 240), ("ma_short_window", 10)] {
        if read_int(config, "strategy", key, default)? < 1 {
            return Err(RadarError::invalid("strategy", key, format!("{key} must be at least 1")));
        }
    }
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), RadarError> {
    let value = read_double(config, "strategy", "initial_cash", 10_000_000.0)?;
    if value <= 0.0 {
        return Err(RadarError::invalid(
            "strategy",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_pullback_band(config: &dyn ConfigPort) -> Result<(), RadarError> {
    let low = read_double(config, "strategy", "pullback_low", 0.98)?;
    let high = read_double(config, "strategy", "pullback_high", 1.05)?;
    if low <= 0.0 || low > high {
        return Err(RadarError::invalid(
            "strategy",
            "pullback_low",
            "pullback band must satisfy 0 < pullback_low <= pullback_high",
        ));
    }

    let floor = read_double(config, "strategy", "gap_down_floor", 0.98)?;
    if floor <= 0.0 || floor > 1.0 {
        return Err(RadarError::invalid(
            "strategy",
            "gap_down_floor",
            "gap_down_floor must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_entry_mode(config: &dyn ConfigPort) -> Result<(), RadarError> {
    match config.get_string("strategy", "entry_mode") {
        None => Ok(()),
        Some(s) => s
            .parse::<EntryMode>()
            .map(|_| ())
            .map_err(|e| RadarError::invalid("strategy", "entry_mode", e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            MapConfig(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    fn data_ok() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("data", "dir", "data"),
            ("data", "start_date", "2023-01-01"),
            ("universe", "codes", "069500,122630"),
        ]
    }

    #[test]
    fn data_config_valid() {
        assert!(validate_data_config(&MapConfig::new(&data_ok())).is_ok());
    }

    #[test]
    fn data_config_missing_dir() {
        let cfg = MapConfig::new(&[("universe", "codes", "069500")]);
        let err = validate_data_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigMissing { key, .. } if key == "dir"));
    }

    #[test]
    fn data_config_bad_date() {
        let mut entries = data_ok();
        entries[1] = ("data", "start_date", "2023/01/01");
        let err = validate_data_config(&MapConfig::new(&entries)).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn data_config_duplicate_codes() {
        let mut entries = data_ok();
        entries[2] = ("universe", "codes", "069500,069500");
        let err = validate_data_config(&MapConfig::new(&entries)).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "codes"));
    }

    #[test]
    fn data_config_missing_codes() {
        let err = validate_data_config(&MapConfig::new(&data_ok()[..2])).unwrap_err();
        assert!(matches!(err, RadarError::ConfigMissing { key, .. } if key == "codes"));
    }

    #[test]
    fn start_date_defaults() {
        let date = parse_start_date(&MapConfig::new(&[])).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn strategy_defaults_are_valid() {
        assert!(validate_strategy_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn take_profit_must_exceed_one() {
        let cfg = MapConfig::new(&[("strategy", "take_profit_ratio", "1.0")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "take_profit_ratio"));
    }

    #[test]
    fn stop_loss_must_be_fraction() {
        for bad in ["0", "1", "1.2", "-0.5"] {
            let cfg = MapConfig::new(&[("strategy", "stop_loss_ratio", bad)]);
            let err = validate_strategy_config(&cfg).unwrap_err();
            assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "stop_loss_ratio"));
        }
    }

    #[test]
    fn windows_must_be_positive() {
        let cfg = MapConfig::new(&[("strategy", "ma_short_window", "0")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "ma_short_window"));
    }

    #[test]
    fn initial_cash_must_be_positive() {
        let cfg = MapConfig::new(&[("strategy", "initial_cash", "0")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for key in ["initial_cash", "take_profit_ratio", "stop_loss_ratio", "pullback_high"] {
            for bad in ["nan", "NaN", "inf", "-inf"] {
                let cfg = MapConfig::new(&[("strategy", key, bad)]);
                let err = validate_strategy_config(&cfg).unwrap_err();
                assert!(
                    matches!(&err, RadarError::ConfigInvalid { key: k, .. } if k == key),
                    "{key} = {bad}: {err}"
                );
            }
        }
    }

    #[test]
    fn unparseable_numbers_are_rejected() {
        let cfg = MapConfig::new(&[("strategy", "initial_cash", "abc")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(&err, RadarError::ConfigInvalid { key, .. } if key == "initial_cash"));
        assert!(err.to_string().contains("abc"));

        let cfg = MapConfig::new(&[("strategy", "ma_long_window", "1.5")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "ma_long_window"));

        let cfg = MapConfig::new(&[("screen", "oversold", "abc")]);
        let err = validate_screen_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "oversold"));

        let cfg = MapConfig::new(&[("screen", "top", "ten")]);
        let err = validate_screen_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "top"));
    }

    #[test]
    fn read_helpers_default_when_absent_and_trim() {
        let cfg = MapConfig::new(&[("strategy", "initial_cash", " 5000000 ")]);
        assert_eq!(read_double(&cfg, "strategy", "initial_cash", 1.0).unwrap(), 5_000_000.0);
        assert_eq!(read_double(&cfg, "strategy", "missing", 1.5).unwrap(), 1.5);
        assert_eq!(read_int(&cfg, "strategy", "missing", 7).unwrap(), 7);
    }

    #[test]
    fn pullback_band_must_be_ordered() {
        let cfg = MapConfig::new(&[
            ("strategy", "pullback_low", "1.1"),
            ("strategy", "pullback_high", "1.05"),
        ]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "pullback_low"));
    }

    #[test]
    fn gap_down_floor_range() {
        let cfg = MapConfig::new(&[("strategy", "gap_down_floor", "1.5")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "gap_down_floor"));
    }

    #[test]
    fn entry_mode_must_parse() {
        let cfg = MapConfig::new(&[("strategy", "entry_mode", "noon")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "entry_mode"));
        let cfg = MapConfig::new(&[("strategy", "entry_mode", "at_close")]);
        assert!(validate_strategy_config(&cfg).is_ok());
    }

    #[test]
    fn screen_defaults_are_valid() {
        assert!(validate_screen_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn screen_thresholds_ordered() {
        let cfg = MapConfig::new(&[("screen", "oversold", "80"), ("screen", "overbought", "70")]);
        assert!(validate_screen_config(&cfg).is_err());
        let cfg = MapConfig::new(&[("screen", "overbought", "120")]);
        assert!(validate_screen_config(&cfg).is_err());
    }

    #[test]
    fn screen_periods_positive() {
        let cfg = MapConfig::new(&[("screen", "top", "0")]);
        let err = validate_screen_config(&cfg).unwrap_err();
        assert!(matches!(err, RadarError::ConfigInvalid { key, .. } if key == "top"));
    }
}
