//! Forecast artifact port trait.

use crate::domain::error::EngineError;
use crate::domain::forecast::ForecastBundle;

/// Loads precomputed forecasts. A missing artifact is `EngineError::Artifact`.
pub trait ForecastPort {
    fn load_forecasts(&self) -> Result<ForecastBundle, EngineError>;
}
