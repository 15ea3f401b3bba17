//! Technical indicators over a single price series.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every calculation keeps the input's date axis; positions without enough
//! history carry no value.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod volatility;

pub use bollinger::calculate_bollinger;
pub use ema::ema_values;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use volatility::calculate_volatility;

use crate::domain::price::PriceObservation;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, value: None }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn simple(&self) -> Option<f64> {
        match self.value {
            Some(IndicatorValue::Simple(v)) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Volatility(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// The band multiplier is held as its `f64` bit pattern so the type
    /// stays hashable. Build it with [`IndicatorType::bollinger`].
    Bollinger { period: usize, stddev_mult_bits: u64 },
}

impl IndicatorType {
    pub fn bollinger(period: usize, stddev_mult: f64) -> Self {
        // Adding zero folds -0.0 into 0.0 so equal multipliers compare equal.
        IndicatorType::Bollinger {
            period,
            stddev_mult_bits: (stddev_mult + 0.0).to_bits(),
        }
    }

    /// Band multiplier of a Bollinger type, `None` for every other kind.
    pub fn stddev_mult(&self) -> Option<f64> {
        match self {
            IndicatorType::Bollinger {
                stddev_mult_bits, ..
            } => Some(f64::from_bits(*stddev_mult_bits)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Named output columns, one entry per input position.
    pub fn columns(&self) -> BTreeMap<String, Vec<Option<f64>>> {
        let column = |f: &dyn Fn(&IndicatorValue) -> Option<f64>| -> Vec<Option<f64>> {
            self.values
                .iter()
                .map(|p| p.value.as_ref().and_then(f))
                .collect()
        };

        let mut out = BTreeMap::new();
        match self.indicator_type {
            IndicatorType::Sma(_) => {
                out.insert("sma".to_string(), column(&simple_of));
            }
            IndicatorType::Rsi(_) => {
                out.insert("rsi".to_string(), column(&simple_of));
            }
            IndicatorType::Volatility(_) => {
                out.insert("volatility".to_string(), column(&simple_of));
            }
            IndicatorType::Macd { .. } => {
                out.insert(
                    "macd".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Macd { line, .. } => Some(*line),
                        _ => None,
                    }),
                );
                out.insert(
                    "signal".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Macd { signal, .. } => Some(*signal),
                        _ => None,
                    }),
                );
                out.insert(
                    "histogram".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Macd { histogram, .. } => Some(*histogram),
                        _ => None,
                    }),
                );
            }
            IndicatorType::Bollinger { .. } => {
                out.insert(
                    "sma".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Bollinger { middle, .. } => Some(*middle),
                        _ => None,
                    }),
                );
                out.insert(
                    "upper".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Bollinger { upper, .. } => Some(*upper),
                        _ => None,
                    }),
                );
                out.insert(
                    "lower".to_string(),
                    column(&|v| match v {
                        IndicatorValue::Bollinger { lower, .. } => Some(*lower),
                        _ => None,
                    }),
                );
            }
        }
        out
    }
}

fn simple_of(value: &IndicatorValue) -> Option<f64> {
    match value {
        IndicatorValue::Simple(v) => Some(*v),
        _ => None,
    }
}

/// Runs the indicator described by `indicator_type` over `prices`.
pub fn calculate(prices: &[PriceObservation], indicator_type: &IndicatorType) -> IndicatorSeries {
    match *indicator_type {
        IndicatorType::Sma(period) => calculate_sma(prices, period),
        IndicatorType::Rsi(period) => calculate_rsi(prices, period),
        IndicatorType::Volatility(period) => calculate_volatility(prices, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(prices, fast, slow, signal),
        IndicatorType::Bollinger {
            period,
            stddev_mult_bits,
        } => calculate_bollinger(prices, period, f64::from_bits(stddev_mult_bits)),
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Volatility(period) => write!(f, "VOLATILITY({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_bits,
            } => write!(
                f,
                "BOLLINGER({},{})",
                period,
                f64::from_bits(*stddev_mult_bits)
            ),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::make_prices;
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::bollinger(20, 2.5);
        assert_eq!(boll.to_string(), "BOLLINGER(20,2.5)");
    }

    #[test]
    fn bollinger_type_keeps_exact_multiplier() {
        let a = IndicatorType::bollinger(20, 2.333);
        let b = IndicatorType::bollinger(20, 2.33);
        assert_ne!(a, b);
        assert_eq!(a.stddev_mult(), Some(2.333));
        assert_eq!(a.to_string(), "BOLLINGER(20,2.333)");
        assert_eq!(IndicatorType::bollinger(20, -0.0), IndicatorType::bollinger(20, 0.0));
        assert_eq!(IndicatorType::Sma(5).stddev_mult(), None);
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Rsi(14), "rsi14");
        map.insert(IndicatorType::Volatility(30), "vol30");

        assert_eq!(map.get(&IndicatorType::Rsi(14)), Some(&"rsi14"));
        assert_eq!(map.get(&IndicatorType::Volatility(30)), Some(&"vol30"));
        assert_eq!(map.get(&IndicatorType::Rsi(7)), None);
    }

    #[test]
    fn columns_for_macd() {
        let prices = make_prices(&[1.0, 2.0, 3.0]);
        let series = calculate(
            &prices,
            &IndicatorType::Macd {
                fast: 2,
                slow: 3,
                signal: 2,
            },
        );
        let columns = series.columns();
        let keys: Vec<&str> = columns.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["histogram", "macd", "signal"]);
        assert!(columns.values().all(|c| c.len() == 3));
    }

    #[test]
    fn columns_for_bollinger_keep_gaps() {
        let prices = make_prices(&[1.0, 2.0, 3.0, 4.0]);
        let series = calculate(
            &prices,
            &IndicatorType::bollinger(3, 2.0),
        );
        let columns = series.columns();
        assert_eq!(columns["sma"][..2], [None, None]);
        assert_eq!(columns["sma"][2], Some(2.0));
        assert!(columns["upper"][3].unwrap() > columns["lower"][3].unwrap());
    }

    #[test]
    fn calculate_dispatches_by_type() {
        let prices = make_prices(&[1.0, 2.0, 3.0]);
        let series = calculate(&prices, &IndicatorType::Sma(2));
        assert_eq!(series.indicator_type, IndicatorType::Sma(2));
        assert_eq!(series.values[1].simple(), Some(1.5));
    }
}
