//! CLI definition and dispatch.
//!
//! Results are written as JSON to stdout or to `--output`. Progress and
//! errors go through `tracing` so stdout stays machine-readable.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::artifact_adapter::JsonArtifactAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::catalog;
use crate::domain::config_validation::{RunConfig, validate_run_config};
use crate::domain::error::EngineError;
use crate::domain::forecast::ForecastBundle;
use crate::domain::messages::{
    AvailableAsset, IndexResponse, IndicatorRequest, RiskResponse, VarRequest, VarResponse,
};
use crate::domain::service;
use crate::ports::forecast_port::ForecastPort;

#[derive(Parser, Debug)]
#[command(name = "basketquant", about = "Basket index, indicators and Value-at-Risk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the basket index and its metrics
    Index {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run an indicator request
    Indicator {
        #[arg(short, long)]
        request: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a Value-at-Risk request
    Var {
        #[arg(short, long)]
        request: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Value-at-Risk of the configured basket
    Risk {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the basket presets
    Presets,
    /// Print the asset catalog, or the symbols in a config's data directory
    Assets {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Summarize a forecast artifact file
    Forecasts {
        #[arg(short, long)]
        file: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Index { config, output } => {
            run_index(&config).and_then(|resp| write_output(&resp, output.as_deref()))
        }
        Command::Indicator { request, output } => read_json::<IndicatorRequest>(&request)
            .and_then(|req| service::compute_indicator_request(&req))
            .and_then(|resp| write_output(&resp, output.as_deref())),
        Command::Var {
            request,
            seed,
            output,
        } => run_var(&request, seed).and_then(|resp| write_output(&resp, output.as_deref())),
        Command::Risk { config, output } => {
            run_risk(&config).and_then(|resp| write_output(&resp, output.as_deref()))
        }
        Command::Validate { config } => run_validate(&config),
        Command::Presets => write_output(&catalog::presets(), None),
        Command::Assets { config: None } => write_output(&catalog::ASSETS, None),
        Command::Assets {
            config: Some(config),
        } => run_assets(&config).and_then(|assets| write_output(&assets, None)),
        Command::Forecasts { file } => JsonArtifactAdapter::new(file)
            .load_forecasts()
            .and_then(|bundle| write_output(&summarize_forecasts(&bundle), None)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig, EngineError> {
    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_run_config(&adapter)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Pretty JSON to `path`, or to stdout when no path is given.
pub fn write_output<T: Serialize + ?Sized>(
    value: &T,
    path: Option<&Path>,
) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_index(config_path: &Path) -> Result<IndexResponse, EngineError> {
    let config = load_config(config_path)?;
    let port = CsvAdapter::new(config.data_dir.clone());
    service::compute_index_request(&config.index, &port)
}

pub fn run_risk(config_path: &Path) -> Result<RiskResponse, EngineError> {
    let config = load_config(config_path)?;
    let port = CsvAdapter::new(config.data_dir.clone());
    service::simulate_basket_var(&config.index, &config.var, &port)
}

pub fn run_assets(config_path: &Path) -> Result<Vec<AvailableAsset>, EngineError> {
    let config = load_config(config_path)?;
    let port = CsvAdapter::new(config.data_dir.clone());
    service::list_available_assets(&port)
}

/// `seed` overrides any seed in the request file.
pub fn run_var(request_path: &Path, seed: Option<u64>) -> Result<VarResponse, EngineError> {
    let mut request: VarRequest = read_json(request_path)?;
    if seed.is_some() {
        request.seed = seed;
    }
    service::simulate_var_request_seeded(&request)
}

fn run_validate(config_path: &Path) -> Result<(), EngineError> {
    let config = load_config(config_path)?;
    info!(
        data_dir = %config.data_dir.display(),
        assets = %config.index.assets.join(","),
        start = %config.index.start_time,
        end = %config.index.end_time,
        rebalance = %config.index.rebalance,
        "configuration is valid"
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub model_name: String,
    pub points: usize,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub mape: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub actual_points: usize,
    pub models: Vec<ModelSummary>,
    pub best_model: Option<String>,
    pub forward_points: usize,
}

pub fn summarize_forecasts(bundle: &ForecastBundle) -> ForecastSummary {
    ForecastSummary {
        actual_points: bundle.actual_values.len(),
        models: bundle
            .predictions
            .iter()
            .map(|p| ModelSummary {
                model_name: p.model_name.clone(),
                points: p.predicted.len(),
                mae: p.metrics.map(|m| m.mae),
                rmse: p.metrics.map(|m| m.rmse),
                mape: p.metrics.map(|m| m.mape),
            })
            .collect(),
        best_model: bundle.best_model().map(|p| p.model_name.clone()),
        forward_points: bundle.forecast.as_ref().map_or(0, |f| f.dates.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::{ForecastArtifact, ForecastMetrics};

    #[test]
    fn parses_index_command() {
        let cli = Cli::try_parse_from(["basketquant", "index", "-c", "run.ini", "-o", "out.json"])
            .unwrap();
        match cli.command {
            Command::Index { config, output } => {
                assert_eq!(config, PathBuf::from("run.ini"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_var_seed() {
        let cli =
            Cli::try_parse_from(["basketquant", "var", "--request", "r.json", "--seed", "7"])
                .unwrap();
        assert!(matches!(cli.command, Command::Var { seed: Some(7), output: None, .. }));
    }

    #[test]
    fn assets_config_is_optional() {
        let cli = Cli::try_parse_from(["basketquant", "assets"]).unwrap();
        assert!(matches!(cli.command, Command::Assets { config: None }));

        let cli = Cli::try_parse_from(["basketquant", "assets", "-c", "run.ini"]).unwrap();
        match cli.command {
            Command::Assets { config } => assert_eq!(config, Some(PathBuf::from("run.ini"))),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn missing_required_argument_is_rejected() {
        assert!(Cli::try_parse_from(["basketquant", "risk"]).is_err());
    }

    #[test]
    fn summary_picks_lowest_rmse() {
        let artifact = |name: &str, rmse: Option<f64>| ForecastArtifact {
            model_name: name.to_string(),
            dates: vec!["2024-01-01".into()],
            predicted: vec![1.0],
            metrics: rmse.map(|rmse| ForecastMetrics {
                mae: rmse / 2.0,
                rmse,
                mape: 1.0,
            }),
        };
        let bundle = ForecastBundle {
            actual_dates: vec!["2024-01-01".into()],
            actual_values: vec![1.0],
            predictions: vec![
                artifact("ARIMA", Some(4.0)),
                artifact("LSTM", Some(2.5)),
                artifact("Prophet", None),
            ],
            forecast: None,
            metadata: serde_json::Value::Null,
        };

        let summary = summarize_forecasts(&bundle);
        assert_eq!(summary.best_model.as_deref(), Some("LSTM"));
        assert_eq!(summary.models.len(), 3);
        assert_eq!(summary.models[2].rmse, None);
        assert_eq!(summary.forward_points, 0);
    }
}
