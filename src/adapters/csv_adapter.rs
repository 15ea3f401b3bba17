//! CSV file price data adapter.
//!
//! Each asset lives in `<base_path>/<SYMBOL>.csv` with a header row naming a
//! date column (`date` or `timestamp`) and a price column (`price` or
//! `close`). Other columns are ignored.

use crate::domain::error::EngineError;
use crate::domain::price::{AssetSeries, PriceObservation};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

impl PriceDataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, EngineError> {
        let source_error = |reason: String| EngineError::DataSource {
            asset: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| source_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| source_error(format!("CSV header error: {}", e)))?
            .clone();
        let date_col = column_index(&headers, &["date", "timestamp"])
            .ok_or_else(|| source_error("missing date column".into()))?;
        let price_col = column_index(&headers, &["price", "close"])
            .ok_or_else(|| source_error("missing price column".into()))?;

        let mut observations = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;

            let raw_date = record.get(date_col).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(raw_date.get(..10).unwrap_or(raw_date), "%Y-%m-%d")
                .map_err(|e| {
                    source_error(format!("row {}: invalid date '{}': {}", line + 1, raw_date, e))
                })?;

            if date < start_date || date > end_date {
                continue;
            }

            let raw_price = record.get(price_col).unwrap_or("").trim();
            let price: f64 = raw_price.parse().map_err(|e| {
                source_error(format!("row {}: invalid price '{}': {}", line + 1, raw_price, e))
            })?;

            observations.push(PriceObservation::new(date, price));
        }

        tracing::debug!(symbol, rows = observations.len(), "loaded CSV prices");
        Ok(AssetSeries::new(symbol, observations))
    }

    fn list_symbols(&self) -> Result<Vec<String>, EngineError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| EngineError::DataSource {
            asset: "*".to_string(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
