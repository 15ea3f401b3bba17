//! Core domain types and logic.

pub mod alignment;
pub mod catalog;
pub mod config_validation;
pub mod error;
pub mod forecast;
pub mod index;
pub mod indicator;
pub mod messages;
pub mod metrics;
pub mod price;
pub mod rebalance;
pub mod returns;
pub mod service;
pub mod var;
pub mod weights;
