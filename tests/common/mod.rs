#![allow(dead_code)]

use basketquant::domain::error::EngineError;
use basketquant::domain::messages::IndexRequest;
use basketquant::domain::price::{AssetSeries, PriceObservation};
use basketquant::domain::rebalance::RebalancePolicy;
use basketquant::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PriceObservation>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, observations: Vec<PriceObservation>) -> Self {
        self.data.insert(symbol.to_string(), observations);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, EngineError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(EngineError::DataSource {
                asset: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let observations = self
            .data
            .get(symbol)
            .map(|obs| {
                obs.iter()
                    .filter(|o| o.date >= start_date && o.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(AssetSeries::new(symbol, observations))
    }

    fn list_symbols(&self) -> Result<Vec<String>, EngineError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily observations starting at `start`.
pub fn daily_series(start: &str, prices: &[f64]) -> Vec<PriceObservation> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PriceObservation::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

/// A deterministic wobbling price path, distinct per `phase`.
pub fn wobble_prices(count: usize, base: f64, phase: usize) -> Vec<f64> {
    (0..count)
        .map(|i| base * (1.0 + 0.02 * (((i + phase) * 7 % 11) as f64 - 5.0) / 5.0))
        .collect()
}

/// A/B prices from the two-asset index walkthrough.
pub fn scenario_port() -> MockPriceDataPort {
    MockPriceDataPort::new()
        .with_series("A", daily_series("2024-01-02", &[100.0, 110.0, 121.0]))
        .with_series("B", daily_series("2024-01-02", &[50.0, 55.0, 60.5]))
}

pub fn request(assets: &[&str], start: &str, end: &str) -> IndexRequest {
    IndexRequest {
        assets: assets.iter().map(|s| s.to_string()).collect(),
        weights: None,
        start_time: start.to_string(),
        end_time: end.to_string(),
        initial_level: 1000.0,
        rebalance: RebalancePolicy::None,
    }
}
