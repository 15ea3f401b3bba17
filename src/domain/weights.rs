//! Basket weights and asset list parsing.

use crate::domain::error::EngineError;
use std::collections::{BTreeMap, HashSet};

/// Target weight per asset symbol. Raw values are normalized before use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightVector {
    pub weights: BTreeMap<String, f64>,
}

impl WeightVector {
    pub fn new(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn equal(symbols: &[String]) -> Self {
        if symbols.is_empty() {
            return Self::default();
        }
        let w = 1.0 / symbols.len() as f64;
        Self {
            weights: symbols.iter().map(|s| (s.clone(), w)).collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.weights.get(symbol).copied()
    }

    /// Weights in the order of `symbols`, normalized to sum to 1.0.
    ///
    /// Symbols without a weight get 0. A zero raw sum is returned as-is.
    pub fn normalized_for(&self, symbols: &[String]) -> Result<Vec<f64>, EngineError> {
        for (symbol, &w) in &self.weights {
            if !w.is_finite() || w < 0.0 {
                return Err(EngineError::invalid(
                    "weights",
                    format!("weight for {symbol} must be a non-negative number, got {w}"),
                ));
            }
        }

        let raw: Vec<f64> = symbols
            .iter()
            .map(|s| self.get(s).unwrap_or(0.0))
            .collect();
        let total: f64 = raw.iter().sum();

        if total > 0.0 {
            Ok(raw.iter().map(|w| w / total).collect())
        } else {
            tracing::warn!("basket weights sum to zero; using them unnormalized");
            Ok(raw)
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum BasketParseError {
    #[error("empty token in asset list")]
    EmptyToken,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),

    #[error("malformed weight entry: {0}")]
    MalformedWeight(String),
}

/// Parses `BTC-USD, eth-usd` into upper-cased, de-duplicated symbols.
pub fn parse_assets(input: &str) -> Result<Vec<String>, BasketParseError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(BasketParseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(BasketParseError::DuplicateAsset(symbol));
        }
        assets.push(symbol);
    }

    Ok(assets)
}

/// Parses `BTC-USD:0.5, ETH-USD:0.5` into a weight vector.
pub fn parse_weights(input: &str) -> Result<WeightVector, BasketParseError> {
    let mut weights = BTreeMap::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(BasketParseError::EmptyToken);
        }
        let (symbol, value) = trimmed
            .split_once(':')
            .ok_or_else(|| BasketParseError::MalformedWeight(trimmed.to_string()))?;
        let symbol = symbol.trim().to_uppercase();
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| BasketParseError::MalformedWeight(trimmed.to_string()))?;
        if weights.insert(symbol.clone(), value).is_some() {
            return Err(BasketParseError::DuplicateAsset(symbol));
        }
    }

    Ok(WeightVector::new(weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn syms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn equal_weights_sum_to_one() {
        let w = WeightVector::equal(&syms(&["A", "B", "C", "D"]));
        let normalized = w.normalized_for(&syms(&["A", "B", "C", "D"])).unwrap();
        assert_relative_eq!(normalized.iter().sum::<f64>(), 1.0);
        assert_relative_eq!(normalized[0], 0.25);
    }

    #[test]
    fn normalizes_raw_weights() {
        let w = parse_weights("A:2,B:6").unwrap();
        let normalized = w.normalized_for(&syms(&["A", "B"])).unwrap();
        assert_relative_eq!(normalized[0], 0.25);
        assert_relative_eq!(normalized[1], 0.75);
    }

    #[test]
    fn missing_symbol_gets_zero_and_extras_ignored() {
        let w = parse_weights("A:1,Z:5").unwrap();
        let normalized = w.normalized_for(&syms(&["A", "B"])).unwrap();
        assert_eq!(normalized, vec![1.0, 0.0]);
    }

    #[test]
    fn zero_sum_used_as_is() {
        let w = parse_weights("A:0,B:0").unwrap();
        let normalized = w.normalized_for(&syms(&["A", "B"])).unwrap();
        assert_eq!(normalized, vec![0.0, 0.0]);
    }

    #[test]
    fn negative_weight_rejected() {
        let w = parse_weights("A:-1,B:2").unwrap();
        assert!(matches!(
            w.normalized_for(&syms(&["A", "B"])),
            Err(EngineError::InputValidation { field, .. }) if field == "weights"
        ));
    }

    #[test]
    fn parse_assets_basic() {
        assert_eq!(
            parse_assets(" btc-usd, ETH-USD ,sol-usd").unwrap(),
            vec!["BTC-USD", "ETH-USD", "SOL-USD"]
        );
    }

    #[test]
    fn parse_assets_rejects_empty_and_duplicates() {
        assert_eq!(parse_assets("A,,B"), Err(BasketParseError::EmptyToken));
        assert_eq!(
            parse_assets("A,B,a"),
            Err(BasketParseError::DuplicateAsset("A".into()))
        );
    }

    #[test]
    fn parse_weights_rejects_malformed() {
        assert!(matches!(
            parse_weights("A=0.5"),
            Err(BasketParseError::MalformedWeight(_))
        ));
        assert!(matches!(
            parse_weights("A:abc"),
            Err(BasketParseError::MalformedWeight(_))
        ));
    }
}
