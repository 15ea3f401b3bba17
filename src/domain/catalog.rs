//! Supported assets, named basket presets and the synthetic cash series.

use crate::domain::messages::IndexRequest;
use crate::domain::price::{AssetSeries, PriceObservation};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

pub const CASH_SYMBOL: &str = "CASH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Crypto,
    Equity,
    Etf,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetMetadata {
    pub symbol: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub category: AssetCategory,
}

const fn asset(
    symbol: &'static str,
    name: &'static str,
    color: &'static str,
    category: AssetCategory,
) -> AssetMetadata {
    AssetMetadata {
        symbol,
        name,
        color,
        category,
    }
}

use AssetCategory::{Cash, Crypto, Equity, Etf};

pub static ASSETS: &[AssetMetadata] = &[
    asset("BTC-USD", "Bitcoin", "#F7931A", Crypto),
    asset("ETH-USD", "Ethereum", "#627EEA", Crypto),
    asset("XRP-USD", "Ripple", "#00AAE4", Crypto),
    asset("SOL-USD", "Solana", "#9945FF", Crypto),
    asset("ADA-USD", "Cardano", "#0033AD", Crypto),
    asset("LINK-USD", "Chainlink", "#2A5ADA", Crypto),
    asset("AVAX-USD", "Avalanche", "#E84142", Crypto),
    asset("DOT-USD", "Polkadot", "#E6007A", Crypto),
    asset("LTC-USD", "Litecoin", "#BFBBBB", Crypto),
    asset("BCH-USD", "Bitcoin Cash", "#8DC351", Crypto),
    asset("MATIC-USD", "Polygon", "#8247E5", Crypto),
    asset("UNI-USD", "Uniswap", "#FF007A", Crypto),
    asset("ATOM-USD", "Cosmos", "#2E3148", Crypto),
    asset("XLM-USD", "Stellar", "#14B6E7", Crypto),
    asset("ALGO-USD", "Algorand", "#6B7280", Crypto),
    asset("AAPL", "Apple", "#A2AAAD", Equity),
    asset("MSFT", "Microsoft", "#00A4EF", Equity),
    asset("GOOGL", "Alphabet", "#4285F4", Equity),
    asset("AMZN", "Amazon", "#FF9900", Equity),
    asset("NVDA", "Nvidia", "#76B900", Equity),
    asset("META", "Meta", "#0668E1", Equity),
    asset("TSLA", "Tesla", "#CC0000", Equity),
    asset("JPM", "JPMorgan", "#003087", Equity),
    asset("V", "Visa", "#1A1F71", Equity),
    asset("JNJ", "Johnson & Johnson", "#D51900", Equity),
    asset("SPY", "S&P 500 ETF", "#22C55E", Etf),
    asset("QQQ", "Nasdaq 100 ETF", "#3B82F6", Etf),
    asset("IWM", "Russell 2000 ETF", "#EAB308", Etf),
    asset("URTH", "MSCI World ETF", "#A855F7", Etf),
    asset(CASH_SYMBOL, "Cash", "#9CA3AF", Cash),
];

pub fn lookup(symbol: &str) -> Option<&'static AssetMetadata> {
    ASSETS.iter().find(|a| a.symbol.eq_ignore_ascii_case(symbol))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: IndexRequest,
}

fn basket(assets: &[&str]) -> IndexRequest {
    IndexRequest {
        assets: assets.iter().map(|s| s.to_string()).collect(),
        ..IndexRequest::default()
    }
}

/// Built fresh on every call.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Original 5",
            description: "Top 5 non-BTC/non-stablecoin by market cap (Jan 2021)",
            config: IndexRequest::default(),
        },
        Preset {
            name: "Smart Contract Platforms",
            description: "ETH, SOL, ADA, AVAX, DOT",
            config: basket(&["ETH-USD", "SOL-USD", "ADA-USD", "AVAX-USD", "DOT-USD"]),
        },
        Preset {
            name: "Legacy Payments",
            description: "BCH, XRP, LTC, XLM",
            config: basket(&["BCH-USD", "XRP-USD", "LTC-USD", "XLM-USD"]),
        },
    ]
}

pub fn preset(name: &str) -> Option<Preset> {
    let name = name.trim();
    presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Constant 1.0 on every weekday in `[start, end]`.
pub fn cash_series(start: NaiveDate, end: NaiveDate) -> AssetSeries {
    let observations = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|d| PriceObservation::new(d, 1.0))
        .collect();
    AssetSeries::new(CASH_SYMBOL, observations)
}
