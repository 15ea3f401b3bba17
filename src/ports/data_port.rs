//! Market data port trait.

use crate::domain::error::EngineError;
use crate::domain::price::AssetSeries;
use chrono::NaiveDate;

/// Source of daily close prices. Implementations return observations
/// within `[start_date, end_date]` in chronological order; an asset with no
/// data in range is an empty series, not an error.
pub trait PriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssetSeries, EngineError>;

    fn list_symbols(&self) -> Result<Vec<String>, EngineError>;
}
