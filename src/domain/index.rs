//! Weighted basket index construction.
//!
//! At the anchor date each asset receives `initial_level * weight / price`
//! units, so the anchor level is `initial_level` exactly. Each later level is
//! the value of the held units. When the rebalance policy triggers, units are
//! reset to target weights at that close, after the level is recorded.

use crate::domain::alignment::AlignedPrices;
use crate::domain::error::EngineError;
use crate::domain::rebalance::RebalancePolicy;
use crate::domain::weights::WeightVector;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_LEVEL: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSeries {
    pub points: Vec<IndexPoint>,
    /// The aligned component prices the levels were computed from.
    pub prices: AlignedPrices,
    pub rebalance_dates: Vec<NaiveDate>,
}

impl IndexSeries {
    pub fn levels(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.level).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn final_level(&self) -> Option<f64> {
        self.points.last().map(|p| p.level)
    }
}

pub fn compute_index(
    prices: &AlignedPrices,
    weights: Option<&WeightVector>,
    initial_level: f64,
    policy: RebalancePolicy,
) -> Result<IndexSeries, EngineError> {
    if !initial_level.is_finite() || initial_level <= 0.0 {
        return Err(EngineError::invalid(
            "initialLevel",
            format!("must be a positive number, got {initial_level}"),
        ));
    }
    if prices.is_empty() || prices.asset_count() == 0 {
        return Err(EngineError::EmptyAlignment {
            assets: prices.symbols.clone(),
        });
    }

    let target = match weights {
        Some(w) => w.normalized_for(&prices.symbols)?,
        None => WeightVector::equal(&prices.symbols).normalized_for(&prices.symbols)?,
    };

    let mut units = holdings_at(prices, 0, initial_level, &target)?;
    let mut points = Vec::with_capacity(prices.len());
    let mut rebalance_dates = Vec::new();

    points.push(IndexPoint {
        date: prices.dates[0],
        level: initial_level,
    });

    for t in 1..prices.len() {
        let date = prices.dates[t];
        let level = portfolio_value(&units, &prices.rows[t]);
        points.push(IndexPoint { date, level });

        if policy.triggers(Some(prices.dates[t - 1]), date) {
            units = holdings_at(prices, t, level, &target)?;
            rebalance_dates.push(date);
        }
    }

    tracing::debug!(
        assets = prices.asset_count(),
        points = points.len(),
        rebalances = rebalance_dates.len(),
        %policy,
        "computed index"
    );

    Ok(IndexSeries {
        points,
        prices: prices.clone(),
        rebalance_dates,
    })
}

/// Units per asset that put `value * weight` into each asset at row `t`.
fn holdings_at(
    prices: &AlignedPrices,
    t: usize,
    value: f64,
    target: &[f64],
) -> Result<Vec<f64>, EngineError> {
    prices.rows[t]
        .iter()
        .zip(target)
        .zip(&prices.symbols)
        .map(|((&price, &weight), symbol)| {
            if !price.is_finite() || price <= 0.0 {
                return Err(EngineError::InvalidPrice {
                    asset: symbol.clone(),
                    date: prices.dates[t],
                    price,
                });
            }
            Ok(value * weight / price)
        })
        .collect()
}

fn portfolio_value(units: &[f64], row: &[f64]) -> f64 {
    units.iter().zip(row).map(|(u, p)| u * p).sum()
}
