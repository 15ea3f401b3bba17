//! Value-at-Risk simulation.
//!
//! Two independent estimates over the same returns matrix:
//!
//! - Monte Carlo: collapse each observation to its equal-weighted cross-asset
//!   mean, fit a normal distribution to that series and sample it.
//! - Cholesky: factor the sample covariance of the asset columns and push
//!   independent standard normals through the factor, so the draws carry the
//!   observed correlation. Each draw is aggregated by its cross-asset mean.
//!
//! Both take the left-tail empirical quantile at
//! `floor((1 - confidence) * simulations)` of the sorted draws. Dollar VaR
//! keeps the sign of the quantile return.
//!
//! All entry points take the random source from the caller. Pass a seeded
//! generator for reproducible results.

use crate::domain::error::EngineError;
use crate::domain::indicator::stddev::{mean, population_stddev};
use crate::domain::returns::ReturnsMatrix;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use tracing::debug;

pub const MIN_SIMULATIONS: usize = 1000;
pub const MAX_SIMULATIONS: usize = 50_000;
pub const MIN_CONFIDENCE: f64 = 0.80;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Relative floor on the squared Cholesky diagonal below which the
/// covariance is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarConfig {
    pub num_simulations: usize,
    pub confidence_level: f64,
    pub portfolio_value: f64,
}

impl Default for VarConfig {
    fn default() -> Self {
        Self {
            num_simulations: 10_000,
            confidence_level: 0.95,
            portfolio_value: 1000.0,
        }
    }
}

impl VarConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_SIMULATIONS..=MAX_SIMULATIONS).contains(&self.num_simulations) {
            return Err(EngineError::invalid(
                "numSimulations",
                format!(
                    "{} is outside [{}, {}]",
                    self.num_simulations, MIN_SIMULATIONS, MAX_SIMULATIONS
                ),
            ));
        }
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&self.confidence_level) {
            return Err(EngineError::invalid(
                "confidenceLevel",
                format!(
                    "{} is outside [{:.2}, {:.2}]",
                    self.confidence_level, MIN_CONFIDENCE, MAX_CONFIDENCE
                ),
            ));
        }
        if !self.portfolio_value.is_finite() {
            return Err(EngineError::invalid("portfolioValue", "must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarEstimate {
    pub quantile_return: f64,
    pub dollar_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarReport {
    pub monte_carlo: VarEstimate,
    pub cholesky: VarEstimate,
    /// Monte Carlo draws in generation order.
    pub simulated_returns: Vec<f64>,
    /// Aggregated Cholesky draws in generation order.
    pub cholesky_returns: Vec<f64>,
    pub quantile_index: usize,
}

/// Tolerance absorbed before flooring the tail rank, so that a tail share
/// such as `1 - 0.8` that is inexact in binary still lands on its integer.
const RANK_SNAP: f64 = 1e-9;

/// Rank of the left-tail quantile in a sorted sample of `num_simulations`.
pub fn quantile_index(confidence_level: f64, num_simulations: usize) -> usize {
    let raw = (1.0 - confidence_level) * num_simulations as f64;
    let idx = (raw + RANK_SNAP).floor() as usize;
    idx.min(num_simulations.saturating_sub(1))
}

fn estimate(draws: &[f64], config: &VarConfig) -> Result<VarEstimate, EngineError> {
    let mut sorted = draws.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let quantile_return = sorted
        .get(quantile_index(config.confidence_level, sorted.len()))
        .copied()
        .ok_or_else(|| EngineError::numerical("no simulated draws"))?;
    if !quantile_return.is_finite() {
        return Err(EngineError::numerical("simulated quantile is not finite"));
    }
    Ok(VarEstimate {
        quantile_return,
        dollar_value: config.portfolio_value * quantile_return,
    })
}

fn check_shape(returns: &ReturnsMatrix) -> Result<(), EngineError> {
    if returns.row_count() < 2 {
        return Err(EngineError::invalid(
            "returns",
            format!("need at least 2 observations, got {}", returns.row_count()),
        ));
    }
    if returns.asset_count() < 2 {
        return Err(EngineError::invalid(
            "returns",
            format!("need at least 2 assets, got {}", returns.asset_count()),
        ));
    }
    Ok(())
}

/// Independent-asset approximation. Returns the estimate and the raw draws.
pub fn monte_carlo_var<R: Rng + ?Sized>(
    returns: &ReturnsMatrix,
    config: &VarConfig,
    rng: &mut R,
) -> Result<(VarEstimate, Vec<f64>), EngineError> {
    let aggregated = returns.row_means();
    let mu = mean(&aggregated).ok_or_else(|| EngineError::numerical("no return observations"))?;
    let sigma = population_stddev(&aggregated)
        .ok_or_else(|| EngineError::numerical("no return observations"))?;

    let normal = Normal::new(mu, sigma)
        .map_err(|e| EngineError::numerical(format!("cannot fit normal distribution: {}", e)))?;
    let draws: Vec<f64> = (0..config.num_simulations)
        .map(|_| normal.sample(rng))
        .collect();

    debug!(mu, sigma, draws = draws.len(), "monte carlo draws complete");
    Ok((estimate(&draws, config)?, draws))
}

/// Sample covariance of the asset columns.
pub fn covariance_matrix(returns: &ReturnsMatrix) -> DMatrix<f64> {
    let n = returns.row_count();
    let k = returns.asset_count();
    let rows = returns.rows();
    let means: Vec<f64> = (0..k)
        .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n as f64)
        .collect();
    let denom = n.saturating_sub(1).max(1) as f64;

    DMatrix::from_fn(k, k, |i, j| {
        rows.iter()
            .map(|r| (r[i] - means[i]) * (r[j] - means[j]))
            .sum::<f64>()
            / denom
    })
}

/// Lower-triangular factor of `cov`, or `Numerical` when `cov` is not
/// positive-definite.
pub fn cholesky_factor(cov: &DMatrix<f64>) -> Result<DMatrix<f64>, EngineError> {
    let not_pd = || EngineError::numerical("covariance matrix not positive-definite");

    let l = cov.clone().cholesky().ok_or_else(not_pd)?.l();
    for i in 0..l.nrows() {
        let d = l[(i, i)];
        if !d.is_finite() || d * d <= SINGULAR_TOLERANCE * cov[(i, i)] {
            return Err(not_pd());
        }
    }
    Ok(l)
}

/// Correlation-aware simulation. Returns the estimate and the aggregated
/// draws.
pub fn cholesky_var<R: Rng + ?Sized>(
    returns: &ReturnsMatrix,
    config: &VarConfig,
    rng: &mut R,
) -> Result<(VarEstimate, Vec<f64>), EngineError> {
    let k = returns.asset_count();
    let cov = covariance_matrix(returns);
    let l = cholesky_factor(&cov)?;

    let mut draws = Vec::with_capacity(config.num_simulations);
    let mut z = vec![0.0; k];
    for _ in 0..config.num_simulations {
        for zj in z.iter_mut() {
            *zj = StandardNormal.sample(rng);
        }
        // Row i of L·z, which equals the draw row z·Lᵀ.
        let total: f64 = (0..k)
            .map(|i| (0..=i).map(|j| l[(i, j)] * z[j]).sum::<f64>())
            .sum();
        draws.push(total / k as f64);
    }

    debug!(assets = k, draws = draws.len(), "cholesky draws complete");
    Ok((estimate(&draws, config)?, draws))
}

/// Runs both methods over `returns`, Monte Carlo first, from the same
/// random source.
pub fn simulate_var<R: Rng + ?Sized>(
    returns: &ReturnsMatrix,
    config: &VarConfig,
    rng: &mut R,
) -> Result<VarReport, EngineError> {
    config.validate()?;
    check_shape(returns)?;

    let (monte_carlo, simulated_returns) = monte_carlo_var(returns, config, rng)?;
    let (cholesky, cholesky_returns) = cholesky_var(returns, config, rng)?;

    Ok(VarReport {
        monte_carlo,
        cholesky,
        simulated_returns,
        cholesky_returns,
        quantile_index: quantile_index(config.confidence_level, config.num_simulations),
    })
}
