//! Request and response message shapes exchanged with callers.
//!
//! Field names are camelCase on the wire. Dates travel as `YYYY-MM-DD`
//! strings and are parsed by the service layer so that malformed values
//! surface as input validation errors naming the field.

use crate::domain::catalog::AssetCategory;
use crate::domain::error::EngineError;
use crate::domain::metrics::IndexMetrics;
use crate::domain::rebalance::RebalancePolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ASSETS: [&str; 3] = ["BTC-USD", "ETH-USD", "SOL-USD"];
pub const DEFAULT_START: &str = "2021-01-03";
pub const DEFAULT_END: &str = "2026-02-23";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexRequest {
    pub assets: Vec<String>,
    pub weights: Option<BTreeMap<String, f64>>,
    pub start_time: String,
    pub end_time: String,
    pub initial_level: f64,
    pub rebalance: RebalancePolicy,
}

impl Default for IndexRequest {
    fn default() -> Self {
        Self {
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            weights: None,
            start_time: DEFAULT_START.to_string(),
            end_time: DEFAULT_END.to_string(),
            initial_level: 1000.0,
            rebalance: RebalancePolicy::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub dates: Vec<String>,
    pub index_values: Vec<f64>,
    pub component_prices: BTreeMap<String, Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rebalance_dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<IndexMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Rsi,
    Bollinger,
    Macd,
    Volatility,
}

impl FromStr for IndicatorKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "rsi" => Ok(IndicatorKind::Rsi),
            "bollinger" => Ok(IndicatorKind::Bollinger),
            "macd" => Ok(IndicatorKind::Macd),
            "volatility" => Ok(IndicatorKind::Volatility),
            other => Err(EngineError::invalid(
                "indicator",
                format!(
                    "unknown indicator '{}' (expected sma, rsi, bollinger, macd or volatility)",
                    other
                ),
            )),
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Bollinger => "bollinger",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Volatility => "volatility",
        };
        f.write_str(name)
    }
}

fn default_indicator_asset() -> String {
    "Index".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRequest {
    #[serde(default = "default_indicator_asset")]
    pub asset: String,
    pub indicator: String,
    pub prices: Vec<f64>,
    pub dates: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorResponse {
    pub dates: Vec<String>,
    pub values: BTreeMap<String, Vec<Option<f64>>>,
}

/// A symbol the data source can serve, with catalog metadata when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableAsset {
    pub symbol: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub category: Option<AssetCategory>,
}

fn default_num_simulations() -> usize {
    10_000
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_portfolio_value() -> f64 {
    1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarRequest {
    pub returns: Vec<Vec<f64>>,
    #[serde(default)]
    pub asset_names: Vec<String>,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    #[serde(default = "default_portfolio_value")]
    pub portfolio_value: f64,
    /// Fixes the random source for reproducible results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarResponse {
    pub monte_carlo_var: f64,
    pub monte_carlo_var_dollar: f64,
    pub cholesky_var: f64,
    pub cholesky_var_dollar: f64,
    pub simulated_returns: Vec<f64>,
    pub cholesky_returns: Vec<f64>,
}

/// Basket-level VaR: the aligned basket's returns run through both methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub assets: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub observations: usize,
    pub portfolio_value: f64,
    pub var: VarResponse,
}

/// Parses a wire date. Only the leading `YYYY-MM-DD` is read, so timestamps
/// such as `2024-01-02T00:00:00` are accepted.
pub fn parse_wire_date(field: &str, value: &str) -> Result<NaiveDate, EngineError> {
    let head = value.trim().get(..10).unwrap_or(value.trim());
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| EngineError::invalid(field, format!("'{}' is not a date: {}", value, e)))
}

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
