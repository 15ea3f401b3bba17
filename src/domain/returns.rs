//! Period-over-period return matrices (rows = observations, columns = assets).

use crate::domain::alignment::AlignedPrices;
use crate::domain::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsMatrix {
    rows: Vec<Vec<f64>>,
    asset_count: usize,
}

impl ReturnsMatrix {
    /// Validates shape and values: at least one row, every row the same
    /// non-zero width, every value finite.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        let Some(first) = rows.first() else {
            return Err(EngineError::invalid("returns", "matrix is empty"));
        };
        let asset_count = first.len();
        if asset_count == 0 {
            return Err(EngineError::invalid("returns", "rows have no columns"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != asset_count {
                return Err(EngineError::invalid(
                    "returns",
                    format!(
                        "row {} has {} columns, expected {}",
                        i,
                        row.len(),
                        asset_count
                    ),
                ));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(EngineError::invalid(
                    "returns",
                    format!("non-finite value at row {}, column {}", i, j),
                ));
            }
        }
        Ok(Self { rows, asset_count })
    }

    /// Percentage change between consecutive aligned rows. A zero previous
    /// price contributes a return of 0.
    pub fn from_prices(prices: &AlignedPrices) -> Result<Self, EngineError> {
        if prices.len() < 2 {
            return Err(EngineError::invalid(
                "returns",
                format!("need at least 2 price rows, got {}", prices.len()),
            ));
        }
        let rows = prices
            .rows
            .windows(2)
            .map(|pair| {
                pair[0]
                    .iter()
                    .zip(&pair[1])
                    .map(|(&prev, &cur)| if prev == 0.0 { 0.0 } else { (cur - prev) / prev })
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn asset_count(&self) -> usize {
        self.asset_count
    }

    /// Equal-weighted cross-asset mean of each row.
    pub fn row_means(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.iter().sum::<f64>() / self.asset_count as f64)
            .collect()
    }
}
