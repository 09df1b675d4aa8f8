//! Drawdown Monitor core: catalog, price data, drawdown calculator and severity tiers.
//!
//! This crate holds everything below the presentation layer:
//! - Domain types (instruments, price series)
//! - The instrument catalog, built-in or loaded from TOML
//! - Price providers (Yahoo Finance, synthetic), circuit breaker, TTL cache
//! - The drawdown calculator for trailing 52-week and all-time highs
//! - Severity classification

pub mod catalog;
pub mod data;
pub mod domain;
pub mod drawdown;
pub mod severity;

pub use catalog::{Catalog, CatalogError, Category};
pub use drawdown::{compute, DrawdownResult, HighWaterMode};
pub use severity::{tier, Severity};
