//! Run configuration loading and validation.
//!
//! Reads the `[data]`, `[index]` and `[var]` sections, checks every field
//! before any work runs, and reports the first failure.

use crate::domain::catalog;
use crate::domain::error::EngineError;
use crate::domain::messages::{IndexRequest, parse_wire_date};
use crate::domain::rebalance::RebalancePolicy;
use crate::domain::var::{MAX_CONFIDENCE, MAX_SIMULATIONS, MIN_CONFIDENCE, MIN_SIMULATIONS, VarConfig};
use crate::domain::weights::{parse_assets, parse_weights};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

/// VaR settings for a basket run. Without a portfolio value the final index
/// level is used.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSettings {
    pub num_simulations: usize,
    pub confidence_level: f64,
    pub portfolio_value: Option<f64>,
    pub seed: Option<u64>,
}

impl VarSettings {
    pub fn to_var_config(&self, fallback_value: f64) -> VarConfig {
        VarConfig {
            num_simulations: self.num_simulations,
            confidence_level: self.confidence_level,
            portfolio_value: self.portfolio_value.unwrap_or(fallback_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub index: IndexRequest,
    pub var: VarSettings,
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EngineError {
    EngineError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<RunConfig, EngineError> {
    let data_dir = validate_data_dir(config)?;
    let index = validate_index(config)?;
    let var = validate_var(config)?;
    Ok(RunConfig {
        data_dir,
        index,
        var,
    })
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<PathBuf, EngineError> {
    non_empty(config, "data", "dir")
        .map(PathBuf::from)
        .ok_or_else(|| EngineError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        })
}

fn validate_index(config: &dyn ConfigPort) -> Result<IndexRequest, EngineError> {
    let mut request = match non_empty(config, "index", "preset") {
        Some(name) => {
            catalog::preset(&name)
                .ok_or_else(|| invalid("index", "preset", format!("unknown preset '{}'", name)))?
                .config
        }
        None => IndexRequest::default(),
    };

    if let Some(raw) = non_empty(config, "index", "assets") {
        request.assets =
            parse_assets(&raw).map_err(|e| invalid("index", "assets", e.to_string()))?;
    }

    if let Some(raw) = non_empty(config, "index", "weights") {
        let weights =
            parse_weights(&raw).map_err(|e| invalid("index", "weights", e.to_string()))?;
        if let Some(unknown) = weights
            .weights
            .keys()
            .find(|symbol| !request.assets.contains(symbol))
        {
            return Err(invalid(
                "index",
                "weights",
                format!("{} is not in the asset list", unknown),
            ));
        }
        if weights.weights.values().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("index", "weights", "weights must be non-negative"));
        }
        request.weights = Some(weights.weights);
    }

    validate_dates(config, &mut request)?;

    if let Some(level) = config.get_double("index", "initial_level")? {
        if !level.is_finite() || level <= 0.0 {
            return Err(invalid("index", "initial_level", "initial_level must be positive"));
        }
        request.initial_level = level;
    }

    if let Some(raw) = non_empty(config, "index", "rebalance") {
        request.rebalance = raw
            .parse::<RebalancePolicy>()
            .map_err(|_| invalid("index", "rebalance", "expected none, daily, weekly or monthly"))?;
    }

    Ok(request)
}

fn validate_dates(config: &dyn ConfigPort, request: &mut IndexRequest) -> Result<(), EngineError> {
    if let Some(start) = non_empty(config, "index", "start_date") {
        request.start_time = start;
    }
    if let Some(end) = non_empty(config, "index", "end_date") {
        request.end_time = end;
    }

    let date_error = |key: &str| invalid("index", key, "expected YYYY-MM-DD");
    let start = parse_wire_date("start_date", &request.start_time)
        .map_err(|_| date_error("start_date"))?;
    let end =
        parse_wire_date("end_date", &request.end_time).map_err(|_| date_error("end_date"))?;

    if start > end {
        return Err(invalid(
            "index",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

fn validate_var(config: &dyn ConfigPort) -> Result<VarSettings, EngineError> {
    let defaults = VarConfig::default();

    let num_simulations = match config.get_u64("var", "num_simulations")? {
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => defaults.num_simulations,
    };
    if !(MIN_SIMULATIONS..=MAX_SIMULATIONS).contains(&num_simulations) {
        return Err(invalid(
            "var",
            "num_simulations",
            format!(
                "num_simulations must be between {} and {}",
                MIN_SIMULATIONS, MAX_SIMULATIONS
            ),
        ));
    }

    let confidence_level = config
        .get_double("var", "confidence_level")?
        .unwrap_or(defaults.confidence_level);
    if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence_level) {
        return Err(invalid(
            "var",
            "confidence_level",
            format!(
                "confidence_level must be between {:.2} and {:.2}",
                MIN_CONFIDENCE, MAX_CONFIDENCE
            ),
        ));
    }

    let portfolio_value = config.get_double("var", "portfolio_value")?;
    if portfolio_value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
        return Err(invalid("var", "portfolio_value", "portfolio_value must be positive"));
    }

    Ok(VarSettings {
        num_simulations,
        confidence_level,
        portfolio_value,
        seed: config.get_u64("var", "seed")?,
    })
}
