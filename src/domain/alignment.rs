//! Aligns a basket of asset series onto one shared timestamp axis.
//!
//! Outer-joins every observation date, forward-fills each asset from its last
//! known price, then drops rows where any asset is still missing.

use crate::domain::error::EngineError;
use crate::domain::price::AssetSeries;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Price matrix with one row per date and one column per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPrices {
    pub dates: Vec<NaiveDate>,
    pub symbols: Vec<String>,
    /// `rows[t][a]` is the price of `symbols[a]` on `dates[t]`.
    pub rows: Vec<Vec<f64>>,
}

impl AlignedPrices {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn column_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn column(&self, symbol: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(symbol)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// All columns keyed by symbol.
    pub fn columns(&self) -> BTreeMap<String, Vec<f64>> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| {
                (
                    symbol.clone(),
                    self.rows.iter().map(|row| row[idx]).collect(),
                )
            })
            .collect()
    }
}

pub fn build_unified_timeline(series: &[AssetSeries]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.observations.iter().map(|o| o.date))
        .collect();
    unique_dates.into_iter().collect()
}

pub fn align_series(series: &[AssetSeries]) -> Result<AlignedPrices, EngineError> {
    let symbols: Vec<String> = series.iter().map(|s| s.symbol.clone()).collect();

    let mut seen = HashSet::new();
    for symbol in &symbols {
        if !seen.insert(symbol.as_str()) {
            return Err(EngineError::invalid(
                "assets",
                format!("duplicate asset {symbol}"),
            ));
        }
    }

    if series.is_empty() {
        return Err(EngineError::EmptyAlignment { assets: symbols });
    }

    // First observation wins when an asset repeats a date.
    let lookups: Vec<BTreeMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| {
            let mut by_date = BTreeMap::new();
            for obs in s.observations.iter().filter(|o| o.price.is_finite()) {
                by_date.entry(obs.date).or_insert(obs.price);
            }
            by_date
        })
        .collect();

    let timeline = build_unified_timeline(series);
    let mut last_known: Vec<Option<f64>> = vec![None; series.len()];
    let mut dates = Vec::with_capacity(timeline.len());
    let mut rows = Vec::with_capacity(timeline.len());

    for date in timeline {
        for (slot, lookup) in last_known.iter_mut().zip(&lookups) {
            if let Some(&price) = lookup.get(&date) {
                *slot = Some(price);
            }
        }

        let row: Option<Vec<f64>> = last_known.iter().copied().collect();
        if let Some(row) = row {
            dates.push(date);
            rows.push(row);
        }
    }

    if dates.is_empty() {
        return Err(EngineError::EmptyAlignment { assets: symbols });
    }

    tracing::debug!(
        assets = symbols.len(),
        rows = dates.len(),
        "aligned price series"
    );

    Ok(AlignedPrices {
        dates,
        symbols,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceObservation;

    fn series(symbol: &str, points: &[(u32, f64)]) -> AssetSeries {
        AssetSeries::new(
            symbol,
            points
                .iter()
                .map(|&(day, price)| {
                    PriceObservation::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), price)
                })
                .collect(),
        )
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn unified_timeline_merges_and_sorts() {
        let a = series("A", &[(2, 1.0), (5, 1.0)]);
        let b = series("B", &[(1, 1.0), (3, 1.0), (5, 2.0)]);
        assert_eq!(build_unified_timeline(&[a, b]), vec![d(1), d(2), d(3), d(5)]);
    }

    #[test]
    fn identical_axes_pass_through() {
        let a = series("A", &[(1, 100.0), (2, 110.0), (3, 121.0)]);
        let b = series("B", &[(1, 50.0), (2, 55.0), (3, 60.5)]);
        let aligned = align_series(&[a, b]).unwrap();

        assert_eq!(aligned.dates, vec![d(1), d(2), d(3)]);
        assert_eq!(aligned.symbols, vec!["A", "B"]);
        assert_eq!(aligned.rows[1], vec![110.0, 55.0]);
    }

    #[test]
    fn forward_fills_gaps() {
        let a = series("A", &[(1, 10.0), (2, 11.0), (3, 12.0), (4, 13.0)]);
        let b = series("B", &[(1, 20.0), (3, 22.0)]);
        let aligned = align_series(&[a, b]).unwrap();

        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.column("B").unwrap(), vec![20.0, 20.0, 22.0, 22.0]);
    }

    #[test]
    fn drops_leading_rows_before_late_listing() {
        let a = series("A", &[(1, 10.0), (2, 11.0), (3, 12.0)]);
        let b = series("B", &[(3, 30.0)]);
        let aligned = align_series(&[a, b]).unwrap();

        assert_eq!(aligned.dates, vec![d(3)]);
        assert_eq!(aligned.rows, vec![vec![12.0, 30.0]]);
    }

    #[test]
    fn weekend_only_asset_is_carried_into_weekdays() {
        let crypto = series("BTC-USD", &[(6, 40.0), (7, 41.0), (8, 42.0)]);
        let equity = series("AAPL", &[(8, 180.0), (9, 181.0)]);
        let aligned = align_series(&[crypto, equity]).unwrap();

        assert_eq!(aligned.dates, vec![d(8), d(9)]);
        assert_eq!(aligned.column("BTC-USD").unwrap(), vec![42.0, 42.0]);
    }

    #[test]
    fn duplicate_dates_keep_first_observation() {
        let a = series("A", &[(1, 10.0), (1, 99.0), (2, 11.0)]);
        let aligned = align_series(&[a]).unwrap();
        assert_eq!(aligned.column("A").unwrap(), vec![10.0, 11.0]);
    }

    #[test]
    fn non_finite_prices_are_missing() {
        let a = series("A", &[(1, 10.0), (2, f64::NAN), (3, 12.0)]);
        let aligned = align_series(&[a]).unwrap();
        assert_eq!(aligned.column("A").unwrap(), vec![10.0, 10.0, 12.0]);
    }

    #[test]
    fn asset_without_data_is_empty_alignment() {
        let a = series("A", &[(1, 10.0)]);
        let b = series("B", &[]);
        let result = align_series(&[a, b]);
        assert!(
            matches!(result, Err(EngineError::EmptyAlignment { assets }) if assets == vec!["A", "B"])
        );
    }

    #[test]
    fn empty_basket_is_empty_alignment() {
        assert!(matches!(
            align_series(&[]),
            Err(EngineError::EmptyAlignment { .. })
        ));
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let a = series("A", &[(1, 10.0)]);
        let result = align_series(&[a.clone(), a]);
        assert!(matches!(
            result,
            Err(EngineError::InputValidation { field, .. }) if field == "assets"
        ));
    }

    #[test]
    fn columns_keyed_by_symbol() {
        let a = series("A", &[(1, 1.0), (2, 2.0)]);
        let b = series("B", &[(1, 3.0), (2, 4.0)]);
        let aligned = align_series(&[a, b]).unwrap();
        let columns = aligned.columns();
        assert_eq!(columns["A"], vec![1.0, 2.0]);
        assert_eq!(columns["B"], vec![3.0, 4.0]);
        assert!(aligned.column("C").is_none());
    }
}
