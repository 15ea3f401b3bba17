//! RSI (Relative Strength Index).
//!
//! Gains and losses are the positive and negative price deltas, with the
//! first position (no delta) counted as zero. Both are averaged over a
//! trailing window of up to n deltas, so early values use a shorter lookback.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100. If both are 0: no value.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceObservation;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[PriceObservation], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: prices.iter().map(|o| IndicatorPoint::empty(o.date)).collect(),
        };
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());
    for (i, obs) in prices.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            obs.price - prices[i - 1].price
        };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let values = prices
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let start = (i + 1).saturating_sub(period);
            let count = (i + 1 - start) as f64;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / count;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / count;

            let rsi = if avg_loss == 0.0 {
                if avg_gain == 0.0 { None } else { Some(100.0) }
            } else {
                Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
            };

            IndicatorPoint {
                date: obs.date,
                value: rsi.map(IndicatorValue::Simple),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
