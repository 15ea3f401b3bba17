//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! All EMAs are seeded with their first input, so there is no warmup.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, ema_values,
};
use crate::domain::price::PriceObservation;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    prices: &[PriceObservation],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: prices.iter().map(|o| IndicatorPoint::empty(o.date)).collect(),
        };
    }

    let closes: Vec<f64> = prices.iter().map(|o| o.price).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = prices
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(obs, (&line, &signal))| IndicatorPoint {
            date: obs.date,
            value: Some(IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_prices;
    use proptest::prelude::*;

    fn parts(point: &IndicatorPoint) -> (f64, f64, f64) {
        match point.value {
            Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) => (line, signal, histogram),
            _ => panic!("Expected Macd value"),
        }
    }

    fn default_macd(prices: &[PriceObservation]) -> IndicatorSeries {
        calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_has_no_warmup() {
        let series = default_macd(&make_prices(&ramp(5)));
        assert!(series.values.iter().all(|p| p.is_valid()));
        let (line, signal, histogram) = parts(&series.values[0]);
        assert_eq!((line, signal, histogram), (0.0, 0.0, 0.0));
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let raw = [10.0, 20.0, 30.0, 40.0, 50.0, 45.0, 70.0, 80.0, 60.0, 100.0];
        let series = calculate_macd(&make_prices(&raw), 3, 5, 2);

        let ema_fast = ema_values(&raw, 3);
        let ema_slow = ema_values(&raw, 5);
        for (i, point) in series.values.iter().enumerate() {
            let (line, _, _) = parts(point);
            assert!(
                (line - (ema_fast[i] - ema_slow[i])).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_signal_is_ema_of_line() {
        let raw = [5.0, 7.0, 6.0, 9.0, 12.0, 11.0];
        let series = calculate_macd(&make_prices(&raw), 2, 4, 3);
        let lines: Vec<f64> = series.values.iter().map(|p| parts(p).0).collect();
        let expected = ema_values(&lines, 3);
        for (point, want) in series.values.iter().zip(expected) {
            assert!((parts(point).1 - want).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn macd_rising_prices_positive_line() {
        let series = default_macd(&make_prices(&ramp(40)));
        let (line, _, _) = parts(series.values.last().unwrap());
        assert!(line > 0.0);
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd(&make_prices(&[100.0, 101.0, 102.0]), 5, 10, 3);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_prices() {
        assert!(default_macd(&[]).values.is_empty());
    }

    #[test]
    fn macd_zero_period_keeps_axis() {
        let prices = make_prices(&[100.0, 101.0, 102.0]);
        for (f, s, g) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
            let series = calculate_macd(&prices, f, s, g);
            assert_eq!(series.values.len(), 3);
            assert!(series.values.iter().all(|p| !p.is_valid()));
        }
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }

    proptest! {
        #[test]
        fn macd_histogram_equals_line_minus_signal(
            prices in prop::collection::vec(1.0f64..500.0, 1..60),
        ) {
            let series = default_macd(&make_prices(&prices));
            for point in &series.values {
                let (line, signal, histogram) = parts(point);
                prop_assert_eq!(histogram, line - signal);
            }
        }
    }
}
