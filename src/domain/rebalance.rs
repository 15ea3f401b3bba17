//! Rebalance schedules for the index engine.

use crate::domain::error::EngineError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalancePolicy {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RebalancePolicy {
    /// Whether holdings are reset at the close of `date`.
    ///
    /// `previous` is the preceding timestamp on the aligned axis; the first
    /// timestamp has none and is balanced by construction.
    pub fn triggers(&self, previous: Option<NaiveDate>, date: NaiveDate) -> bool {
        match self {
            RebalancePolicy::None => false,
            RebalancePolicy::Daily => true,
            RebalancePolicy::Weekly => date.weekday() == Weekday::Mon,
            RebalancePolicy::Monthly => match previous {
                Some(prev) => (prev.year(), prev.month()) != (date.year(), date.month()),
                None => false,
            },
        }
    }

    /// Every date in `dates` that would trigger a rebalance.
    pub fn trigger_dates(&self, dates: &[NaiveDate]) -> Vec<NaiveDate> {
        dates
            .iter()
            .enumerate()
            .filter(|&(i, &date)| {
                let previous = i.checked_sub(1).map(|p| dates[p]);
                self.triggers(previous, date)
            })
            .map(|(_, &date)| date)
            .collect()
    }
}

impl fmt::Display for RebalancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RebalancePolicy::None => "none",
            RebalancePolicy::Daily => "daily",
            RebalancePolicy::Weekly => "weekly",
            RebalancePolicy::Monthly => "monthly",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RebalancePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RebalancePolicy::None),
            "daily" => Ok(RebalancePolicy::Daily),
            "weekly" => Ok(RebalancePolicy::Weekly),
            "monthly" => Ok(RebalancePolicy::Monthly),
            other => Err(EngineError::invalid(
                "rebalance",
                format!("expected one of none, daily, weekly, monthly; got '{other}'"),
            )),
        }
    }
}
