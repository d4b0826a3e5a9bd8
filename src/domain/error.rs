//! Domain error types.

/// Top-level error type for radar.
#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RadarError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        RadarError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(section: &str, key: &str) -> Self {
        RadarError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<csv::Error> for RadarError {
    fn from(err: csv::Error) -> Self {
        RadarError::Data {
            reason: format!("CSV error: {err}"),
        }
    }
}

impl From<&RadarError> for std::process::ExitCode {
    fn from(err: &RadarError) -> Self {
        let code: u8 = match err {
            RadarError::Io(_) => 1,
            RadarError::ConfigParse { .. }
            | RadarError::ConfigMissing { .. }
            | RadarError::ConfigInvalid { .. } => 2,
            RadarError::Data { .. } => 3,
            RadarError::NoData { .. } | RadarError::InsufficientHistory { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
