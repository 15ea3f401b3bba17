//! Summary statistics over an index level series.
//!
//! All figures are fractions (0.05 = 5%). Periods are calendar days, so
//! annualization uses 365.

use serde::{Deserialize, Serialize};

const PERIODS_PER_YEAR: f64 = 365.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetrics {
    pub current: f64,
    pub change_1d: f64,
    pub change_7d: f64,
    pub change_30d: f64,
    pub total_return: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl IndexMetrics {
    /// Returns `None` for fewer than two levels.
    pub fn compute(levels: &[f64], risk_free_rate: f64) -> Option<Self> {
        if levels.len() < 2 {
            return None;
        }
        let n = levels.len();
        let current = levels[n - 1];
        let first = levels[0];
        // Short histories fall back to the first level.
        let lookback = |days: usize| if n > days { levels[n - 1 - days] } else { first };
        // A non-positive base has no meaningful relative change.
        let change = |base: f64| if base > 0.0 { (current - base) / base } else { 0.0 };

        let daily_rf = risk_free_rate / PERIODS_PER_YEAR;
        let (volatility, sharpe_ratio) = compute_risk_adjusted(levels, daily_rf);

        Some(IndexMetrics {
            current,
            change_1d: change(levels[n - 2]),
            change_7d: change(lookback(7)),
            change_30d: change(lookback(30)),
            total_return: change(first),
            volatility,
            max_drawdown: compute_drawdown(levels),
            sharpe_ratio,
        })
    }
}

/// Largest peak-to-trough decline, as a non-positive fraction of the peak.
fn compute_drawdown(levels: &[f64]) -> f64 {
    let Some(&first) = levels.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &level in levels {
        if level > peak {
            peak = level;
        } else if peak > 0.0 {
            let dd = (level - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized volatility and Sharpe ratio from population statistics of
/// period returns.
fn compute_risk_adjusted(levels: &[f64], daily_rf: f64) -> (f64, f64) {
    let returns: Vec<f64> = levels
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect();

    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let sharpe = if stddev > 0.0 {
        ((mean - daily_rf) / stddev) * PERIODS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    (stddev * PERIODS_PER_YEAR.sqrt(), sharpe)
}
