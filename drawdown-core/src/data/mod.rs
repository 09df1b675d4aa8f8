//! Price data: providers, circuit breaker, TTL cache and the cached fetcher.

pub mod cache;
pub mod circuit_breaker;
pub mod fetcher;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use cache::{CachedFetch, PriceCache, DEFAULT_TTL};
pub use circuit_breaker::CircuitBreaker;
pub use fetcher::{FetchOutcome, PriceFetcher, DEFAULT_LOOKBACK_DAYS};
pub use provider::{DataError, DataProvider, DataSource};
pub use synthetic::{synthetic_series, SyntheticProvider};
pub use yahoo::{YahooProvider, YahooSettings};
