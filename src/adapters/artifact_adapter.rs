//! JSON file adapter for forecast artifacts.

use crate::domain::error::EngineError;
use crate::domain::forecast::ForecastBundle;
use crate::ports::forecast_port::ForecastPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonArtifactAdapter {
    path: PathBuf,
}

impl JsonArtifactAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ForecastPort for JsonArtifactAdapter {
    fn load_forecasts(&self) -> Result<ForecastBundle, EngineError> {
        let content = fs::read_to_string(&self.path).map_err(|e| EngineError::Artifact {
            reason: format!(
                "no forecasts available at {}: {}",
                self.path.display(),
                e
            ),
        })?;
        serde_json::from_str(&content).map_err(|e| EngineError::Artifact {
            reason: format!("malformed forecast file {}: {}", self.path.display(), e),
        })
    }
}
