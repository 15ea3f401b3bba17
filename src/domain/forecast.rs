//! Forecast artifacts produced by the offline training pipeline.
//!
//! Artifacts pass through unmodified. The only computation here is
//! `ForecastMetrics::evaluate`, which scores a prediction against actuals.

use crate::domain::error::EngineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub mape: f64,
}

impl ForecastMetrics {
    /// Mean absolute error, root mean squared error and mean absolute
    /// percentage error (as a fraction). Zero actuals divide by 1.
    pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<Self, EngineError> {
        if actual.is_empty() {
            return Err(EngineError::invalid("actual", "no values to evaluate"));
        }
        if actual.len() != predicted.len() {
            return Err(EngineError::invalid(
                "predicted",
                format!(
                    "length {} does not match actual length {}",
                    predicted.len(),
                    actual.len()
                ),
            ));
        }

        let n = actual.len() as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut pct_sum = 0.0;
        for (&a, &p) in actual.iter().zip(predicted) {
            let err = a - p;
            abs_sum += err.abs();
            sq_sum += err * err;
            let denom = if a == 0.0 { 1.0 } else { a };
            pct_sum += (err / denom).abs();
        }

        Ok(ForecastMetrics {
            mae: abs_sum / n,
            rmse: (sq_sum / n).sqrt(),
            mape: pct_sum / n,
        })
    }
}

/// One model's backtest predictions over the holdout window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastArtifact {
    #[serde(alias = "model_name")]
    pub model_name: String,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub predicted: Vec<f64>,
    /// Empty when the model failed to train.
    #[serde(default, deserialize_with = "metrics_or_empty")]
    pub metrics: Option<ForecastMetrics>,
}

impl ForecastArtifact {
    pub fn is_empty(&self) -> bool {
        self.predicted.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelForecast {
    #[serde(alias = "model_name")]
    pub model_name: String,
    #[serde(default)]
    pub predicted: Vec<f64>,
}

/// Forward forecast beyond the last observed date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardForecast {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default, alias = "trailing_dates")]
    pub trailing_dates: Vec<String>,
    #[serde(default, alias = "trailing_values")]
    pub trailing_values: Vec<f64>,
    #[serde(default)]
    pub models: Vec<ModelForecast>,
}

/// The full artifact file: actuals over the holdout window, per-model
/// predictions and an optional forward forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBundle {
    #[serde(default, alias = "actual_dates")]
    pub actual_dates: Vec<String>,
    #[serde(default, alias = "actual_values")]
    pub actual_values: Vec<f64>,
    #[serde(default)]
    pub predictions: Vec<ForecastArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForwardForecast>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ForecastBundle {
    pub fn model(&self, name: &str) -> Option<&ForecastArtifact> {
        self.predictions
            .iter()
            .find(|p| p.model_name.eq_ignore_ascii_case(name))
    }

    /// The trained model with the lowest RMSE.
    pub fn best_model(&self) -> Option<&ForecastArtifact> {
        self.predictions
            .iter()
            .filter_map(|p| p.metrics.map(|m| (p, m.rmse)))
            .filter(|(_, rmse)| rmse.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }
}

fn metrics_or_empty<'de, D>(deserializer: D) -> Result<Option<ForecastMetrics>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Metrics(ForecastMetrics),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Metrics(m) => Some(m),
        Raw::Other(_) => None,
    })
}
