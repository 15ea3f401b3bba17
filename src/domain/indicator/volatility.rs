//! Realized volatility.
//!
//! Rolling sample standard deviation of period-over-period percentage
//! returns over n returns, annualized by √365. The first n positions have no
//! value (n returns need n+1 prices).

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceObservation;

pub const DEFAULT_PERIOD: usize = 30;
pub const PERIODS_PER_YEAR: f64 = 365.0;

pub fn calculate_volatility(prices: &[PriceObservation], period: usize) -> IndicatorSeries {
    // returns[i] is the change from i-1 to i; returns[0] is unused.
    let returns: Vec<f64> = prices
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            if i == 0 {
                f64::NAN
            } else {
                let prev = prices[i - 1].price;
                (obs.price - prev) / prev
            }
        })
        .collect();

    let annualize = PERIODS_PER_YEAR.sqrt();
    let values = prices
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            if period < 2 || i < period {
                return IndicatorPoint::empty(obs.date);
            }
            let vol = sample_stddev(&returns[i + 1 - period..=i])
                .map(|sd| sd * annualize)
                .filter(|v| v.is_finite());
            IndicatorPoint {
                date: obs.date,
                value: vol.map(IndicatorValue::Simple),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Volatility(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_prices;

    #[test]
    fn volatility_warmup_needs_period_plus_one_prices() {
        let series = calculate_volatility(&make_prices(&[100.0, 101.0, 99.0, 102.0, 103.0]), 3);
        assert!(!series.values[0].is_valid());
        assert!(!series.values[2].is_valid());
        assert!(series.values[3].is_valid());
        assert!(series.values[4].is_valid());
    }

    #[test]
    fn volatility_known_value() {
        // Returns: +10%, -10%.
        let series = calculate_volatility(&make_prices(&[100.0, 110.0, 99.0]), 2);
        let r = [0.1, -0.1];
        let mean = 0.0;
        let sd = (((r[0] - mean) * (r[0] - mean) + (r[1] - mean) * (r[1] - mean)) / 1.0_f64).sqrt();
        let expected = sd * 365.0_f64.sqrt();
        assert!((series.values[2].simple().unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn volatility_constant_growth_is_zero() {
        let series = calculate_volatility(&make_prices(&[100.0, 110.0, 121.0, 133.1]), 2);
        let v = series.values[3].simple().unwrap();
        assert!(v.abs() < 1e-9);
    }

    #[test]
    fn volatility_zero_previous_price_has_no_value() {
        let series = calculate_volatility(&make_prices(&[0.0, 1.0, 2.0]), 2);
        assert!(!series.values[2].is_valid());
    }

    #[test]
    fn volatility_indicator_type() {
        let series = calculate_volatility(&make_prices(&[1.0]), 30);
        assert_eq!(series.indicator_type, IndicatorType::Volatility(30));
        assert_eq!(series.values.len(), 1);
    }
}
