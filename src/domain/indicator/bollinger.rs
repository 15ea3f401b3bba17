//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) positions have no value. Periods below 2 have no
//! defined deviation and produce no values.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceObservation;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

pub fn calculate_bollinger(
    prices: &[PriceObservation],
    period: usize,
    mult: f64,
) -> IndicatorSeries {
    let values = prices
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            if period < 2 || i + 1 < period {
                return IndicatorPoint::empty(obs.date);
            }
            let window: Vec<f64> = prices[i + 1 - period..=i].iter().map(|o| o.price).collect();
            let middle = window.iter().sum::<f64>() / period as f64;
            let value = sample_stddev(&window).map(|sd| IndicatorValue::Bollinger {
                upper: middle + mult * sd,
                middle,
                lower: middle - mult * sd,
            });
            IndicatorPoint {
                date: obs.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::bollinger(period, mult),
        values,
    }
}
