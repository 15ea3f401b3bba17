//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]). Warmup: first (n-1) positions have no value.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceObservation;

pub fn calculate_sma(prices: &[PriceObservation], period: usize) -> IndicatorSeries {
    let values = prices
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            if period == 0 || i + 1 < period {
                return IndicatorPoint::empty(obs.date);
            }
            let window = &prices[i + 1 - period..=i];
            let mean = window.iter().map(|o| o.price).sum::<f64>() / period as f64;
            IndicatorPoint {
                date: obs.date,
                value: Some(IndicatorValue::Simple(mean)),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_prices;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&make_prices(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert!(!series.values[0].is_valid());
        assert!(!series.values[1].is_valid());
        assert_eq!(series.values[2].simple(), Some(2.0));
        assert_eq!(series.values[4].simple(), Some(4.0));
    }

    #[test]
    fn sma_window_one_is_identity() {
        let raw = [10.5, 3.25, 7.0, 99.125];
        let series = calculate_sma(&make_prices(&raw), 1);
        let values: Vec<f64> = series.values.iter().filter_map(|p| p.simple()).collect();
        assert_eq!(values, raw.to_vec());
    }

    #[test]
    fn sma_window_longer_than_series() {
        let series = calculate_sma(&make_prices(&[1.0, 2.0]), 5);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.is_valid()));
    }

    #[test]
    fn sma_zero_period_keeps_axis() {
        let series = calculate_sma(&make_prices(&[1.0, 2.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.is_valid()));
    }

    #[test]
    fn sma_preserves_dates() {
        let prices = make_prices(&[1.0, 2.0, 3.0]);
        let series = calculate_sma(&prices, 2);
        for (point, obs) in series.values.iter().zip(&prices) {
            assert_eq!(point.date, obs.date);
        }
    }
}
