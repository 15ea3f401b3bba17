//! Request orchestration: validate a request, run the engines, shape the
//! response. Every call builds its own state; nothing is shared between
//! calls.

use crate::domain::alignment::{AlignedPrices, align_series};
use crate::domain::catalog::{self, CASH_SYMBOL, cash_series};
use crate::domain::config_validation::VarSettings;
use crate::domain::error::EngineError;
use crate::domain::index::{IndexSeries, compute_index};
use crate::domain::indicator::{self, IndicatorType, bollinger, macd, rsi, volatility};
use crate::domain::messages::{
    AvailableAsset, IndexRequest, IndexResponse, IndicatorKind, IndicatorRequest, IndicatorResponse,
    RiskResponse, VarRequest, VarResponse, format_wire_date, parse_wire_date,
};
use crate::domain::metrics::{DEFAULT_RISK_FREE_RATE, IndexMetrics};
use crate::domain::price::PriceObservation;
use crate::domain::returns::ReturnsMatrix;
use crate::domain::var::{VarConfig, simulate_var};
use crate::domain::weights::WeightVector;
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const DEFAULT_SMA_WINDOW: usize = 50;

/// Fetches every basket asset for the request's date range and aligns them.
/// `CASH` is synthesized rather than fetched.
pub fn fetch_basket(
    request: &IndexRequest,
    port: &dyn PriceDataPort,
) -> Result<AlignedPrices, EngineError> {
    if request.assets.is_empty() {
        return Err(EngineError::invalid("assets", "at least one asset is required"));
    }
    let start = parse_wire_date("startTime", &request.start_time)?;
    let end = parse_wire_date("endTime", &request.end_time)?;
    if start > end {
        return Err(EngineError::invalid(
            "startTime",
            format!("{} is after endTime {}", start, end),
        ));
    }

    let series = request
        .assets
        .iter()
        .map(|symbol| {
            if symbol == CASH_SYMBOL {
                Ok(cash_series(start, end))
            } else {
                port.fetch_prices(symbol, start, end)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    align_series(&series)
}

/// Runs the index engine for a request.
pub fn build_index(
    request: &IndexRequest,
    port: &dyn PriceDataPort,
) -> Result<IndexSeries, EngineError> {
    let prices = fetch_basket(request, port)?;
    let weights = request.weights.clone().map(WeightVector::new);
    let index = compute_index(
        &prices,
        weights.as_ref(),
        request.initial_level,
        request.rebalance,
    )?;
    info!(
        assets = request.assets.len(),
        points = index.points.len(),
        rebalances = index.rebalance_dates.len(),
        rebalance = %request.rebalance,
        "index computed"
    );
    Ok(index)
}

pub fn compute_index_request(
    request: &IndexRequest,
    port: &dyn PriceDataPort,
) -> Result<IndexResponse, EngineError> {
    let index = build_index(request, port)?;
    let levels = index.levels();

    Ok(IndexResponse {
        dates: index.dates().into_iter().map(format_wire_date).collect(),
        metrics: IndexMetrics::compute(&levels, DEFAULT_RISK_FREE_RATE),
        index_values: levels,
        component_prices: index.prices.columns(),
        rebalance_dates: index
            .rebalance_dates
            .iter()
            .copied()
            .map(format_wire_date)
            .collect(),
    })
}

fn window_param(
    params: &BTreeMap<String, f64>,
    key: &str,
    default: usize,
    minimum: usize,
) -> Result<usize, EngineError> {
    let Some(&raw) = params.get(key) else {
        return Ok(default);
    };
    if !raw.is_finite() || raw.trunc() < minimum as f64 {
        return Err(EngineError::invalid(
            key,
            format!("must be an integer >= {}, got {}", minimum, raw),
        ));
    }
    // Fractional windows truncate toward zero.
    Ok(raw.trunc() as usize)
}

fn resolve_indicator(
    kind: IndicatorKind,
    params: &BTreeMap<String, f64>,
) -> Result<IndicatorType, EngineError> {
    Ok(match kind {
        IndicatorKind::Sma => IndicatorType::Sma(window_param(params, "window", DEFAULT_SMA_WINDOW, 1)?),
        IndicatorKind::Rsi => IndicatorType::Rsi(window_param(params, "window", rsi::DEFAULT_PERIOD, 1)?),
        IndicatorKind::Volatility => IndicatorType::Volatility(window_param(
            params,
            "window",
            volatility::DEFAULT_PERIOD,
            2,
        )?),
        IndicatorKind::Bollinger => {
            let num_std = params
                .get("num_std")
                .copied()
                .unwrap_or(bollinger::DEFAULT_MULT);
            if !num_std.is_finite() || num_std < 0.0 {
                return Err(EngineError::invalid(
                    "num_std",
                    format!("must be a non-negative number, got {}", num_std),
                ));
            }
            IndicatorType::bollinger(
                window_param(params, "window", bollinger::DEFAULT_PERIOD, 2)?,
                num_std,
            )
        }
        IndicatorKind::Macd => IndicatorType::Macd {
            fast: window_param(params, "short_window", macd::DEFAULT_FAST, 1)?,
            slow: window_param(params, "long_window", macd::DEFAULT_SLOW, 1)?,
            signal: window_param(params, "signal_window", macd::DEFAULT_SIGNAL, 1)?,
        },
    })
}

fn parse_indicator_dates(dates: &[String]) -> Result<Vec<NaiveDate>, EngineError> {
    let parsed = dates
        .iter()
        .map(|d| parse_wire_date("dates", d))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(i) = parsed.windows(2).position(|w| w[0] >= w[1]) {
        return Err(EngineError::invalid(
            "dates",
            format!(
                "must be strictly increasing ({} is followed by {})",
                dates[i],
                dates[i + 1]
            ),
        ));
    }
    Ok(parsed)
}

pub fn compute_indicator_request(
    request: &IndicatorRequest,
) -> Result<IndicatorResponse, EngineError> {
    let kind: IndicatorKind = request.indicator.parse()?;
    if request.prices.len() != request.dates.len() {
        return Err(EngineError::invalid(
            "prices",
            format!(
                "{} prices for {} dates",
                request.prices.len(),
                request.dates.len()
            ),
        ));
    }
    if let Some(i) = request.prices.iter().position(|p| !p.is_finite()) {
        return Err(EngineError::invalid(
            "prices",
            format!("non-finite price at position {}", i),
        ));
    }
    let dates = parse_indicator_dates(&request.dates)?;
    let indicator_type = resolve_indicator(kind, &request.params)?;

    let observations: Vec<PriceObservation> = dates
        .iter()
        .zip(&request.prices)
        .map(|(&date, &price)| PriceObservation::new(date, price))
        .collect();

    let series = indicator::calculate(&observations, &indicator_type);
    let mut values = series.columns();
    if matches!(kind, IndicatorKind::Sma | IndicatorKind::Bollinger) {
        values.insert(
            "price".to_string(),
            request.prices.iter().copied().map(Some).collect(),
        );
    }

    debug!(asset = %request.asset, indicator = %indicator_type, points = observations.len(), "indicator computed");
    Ok(IndicatorResponse {
        dates: request.dates.clone(),
        values,
    })
}

/// Runs both VaR methods with the caller's random source.
pub fn simulate_var_request<R: Rng + ?Sized>(
    request: &VarRequest,
    rng: &mut R,
) -> Result<VarResponse, EngineError> {
    let config = VarConfig {
        num_simulations: request.num_simulations,
        confidence_level: request.confidence_level,
        portfolio_value: request.portfolio_value,
    };
    config.validate()?;

    let returns = ReturnsMatrix::new(request.returns.clone())?;
    if !request.asset_names.is_empty() && request.asset_names.len() != returns.asset_count() {
        return Err(EngineError::invalid(
            "assetNames",
            format!(
                "{} names for {} return columns",
                request.asset_names.len(),
                returns.asset_count()
            ),
        ));
    }

    let report = simulate_var(&returns, &config, rng)?;
    info!(
        simulations = config.num_simulations,
        confidence = config.confidence_level,
        monte_carlo_var = report.monte_carlo.quantile_return,
        cholesky_var = report.cholesky.quantile_return,
        "var simulated"
    );

    Ok(VarResponse {
        monte_carlo_var: report.monte_carlo.quantile_return,
        monte_carlo_var_dollar: report.monte_carlo.dollar_value,
        cholesky_var: report.cholesky.quantile_return,
        cholesky_var_dollar: report.cholesky.dollar_value,
        simulated_returns: report.simulated_returns,
        cholesky_returns: report.cholesky_returns,
    })
}

/// Runs a VaR request on a fresh generator, seeded from `request.seed`
/// when present and from OS entropy otherwise.
pub fn simulate_var_request_seeded(request: &VarRequest) -> Result<VarResponse, EngineError> {
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    simulate_var_request(request, &mut rng)
}

/// VaR over a configured basket. Returns come from the aligned component
/// prices; the portfolio value defaults to the final index level.
pub fn simulate_basket_var(
    request: &IndexRequest,
    settings: &VarSettings,
    port: &dyn PriceDataPort,
) -> Result<RiskResponse, EngineError> {
    let index = build_index(request, port)?;
    let returns = ReturnsMatrix::from_prices(&index.prices)?;
    let final_level = index.final_level().unwrap_or(request.initial_level);
    let config = settings.to_var_config(final_level);

    let var_request = VarRequest {
        returns: returns.rows().to_vec(),
        asset_names: index.prices.symbols.clone(),
        num_simulations: config.num_simulations,
        confidence_level: config.confidence_level,
        portfolio_value: config.portfolio_value,
        seed: settings.seed,
    };
    let var = simulate_var_request_seeded(&var_request)?;

    Ok(RiskResponse {
        assets: index.prices.symbols.clone(),
        start_date: index.dates().first().copied().map(format_wire_date).unwrap_or_default(),
        end_date: index.dates().last().copied().map(format_wire_date).unwrap_or_default(),
        observations: returns.row_count(),
        portfolio_value: config.portfolio_value,
        var,
    })
}

/// Symbols the port can serve, sorted, joined with catalog metadata.
/// `CASH` is always listed because it never comes from the port.
pub fn list_available_assets(port: &dyn PriceDataPort) -> Result<Vec<AvailableAsset>, EngineError> {
    let mut symbols = port.list_symbols()?;
    if !symbols.iter().any(|s| s == CASH_SYMBOL) {
        symbols.push(CASH_SYMBOL.to_string());
    }
    symbols.sort();
    symbols.dedup();

    let assets: Vec<AvailableAsset> = symbols
        .into_iter()
        .map(|symbol| {
            let meta = catalog::lookup(&symbol);
            AvailableAsset {
                name: meta.map(|m| m.name.to_string()),
                color: meta.map(|m| m.color.to_string()),
                category: meta.map(|m| m.category),
                symbol,
            }
        })
        .collect();

    let unknown = assets.iter().filter(|a| a.name.is_none()).count();
    info!(count = assets.len(), unknown, "listed available assets");
    Ok(assets)
}
