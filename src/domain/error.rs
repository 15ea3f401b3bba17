//! Engine error taxonomy.

use chrono::NaiveDate;

/// Top-level error type for basketquant.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid {field}: {reason}")]
    InputValidation { field: String, reason: String },

    #[error("insufficient overlapping history for [{}]", assets.join(", "))]
    EmptyAlignment { assets: Vec<String> },

    #[error("invalid price for {asset} on {date}: {price}")]
    InvalidPrice {
        asset: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("numerical error: {reason}")]
    Numerical { reason: String },

    #[error("price data unavailable for {asset}: {reason}")]
    DataSource { asset: String, reason: String },

    #[error("forecast artifact error: {reason}")]
    Artifact { reason: String },

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

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EngineError::InputValidation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn numerical(reason: impl Into<String>) -> Self {
        EngineError::Numerical {
            reason: reason.into(),
        }
    }
}

impl From<&EngineError> for std::process::ExitCode {
    fn from(err: &EngineError) -> Self {
        let code: u8 = match err {
            EngineError::Io(_) | EngineError::Serialization(_) => 1,
            EngineError::ConfigParse { .. }
            | EngineError::ConfigMissing { .. }
            | EngineError::ConfigInvalid { .. } => 2,
            EngineError::DataSource { .. } | EngineError::Artifact { .. } => 3,
            EngineError::InputValidation { .. } => 4,
            EngineError::EmptyAlignment { .. } | EngineError::InvalidPrice { .. } => 5,
            EngineError::Numerical { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
