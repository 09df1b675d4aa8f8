//! Dashboard configuration loaded from TOML.
//!
//! Every field is optional. Lookup order: an explicit path, then
//! `<config dir>/drawdown-monitor/config.toml` if it exists, then defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use drawdown_core::catalog::{Catalog, CatalogError};
use drawdown_core::data::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use drawdown_core::data::{
    CircuitBreaker, DataError, DataProvider, PriceCache, PriceFetcher, SyntheticProvider,
    YahooProvider, YahooSettings, DEFAULT_LOOKBACK_DAYS,
};
use drawdown_core::drawdown::HighWaterMode;

use crate::session::{MinDrawdown, SessionFilters, SortOrder};

/// Directory name under the platform config/cache dirs.
pub const APP_DIR: &str = "drawdown-monitor";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "tui.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("set up price provider: {0}")]
    Provider(#[from] DataError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Per-ticker request timeout.
    pub timeout_secs: u64,
    pub lookback_days: i64,
    pub user_agent: String,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            timeout_secs: 10,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub mode: HighWaterMode,
    pub sort: SortOrder,
    pub min_drawdown: MinDrawdown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Replaces the built-in catalog when set.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub defaults: DefaultsConfig,
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub log: LogConfig,
}

impl DashboardConfig {
    /// `<config dir>/drawdown-monitor/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load from `explicit`, else the default path if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttl_secs must be positive".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be positive".into(),
            ));
        }
        if self.provider.lookback_days <= 0 {
            return Err(ConfigError::Invalid(
                "provider.lookback_days must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Session filters seeded from `[defaults]`.
    pub fn initial_filters(&self) -> SessionFilters {
        SessionFilters::new(
            self.defaults.mode,
            self.defaults.sort,
            self.defaults.min_drawdown,
        )
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog.path {
            Some(path) => Ok(Catalog::from_file(path)?),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Provider plus cache as configured. `force_synthetic` overrides `provider.kind`.
    pub fn build_fetcher(&self, force_synthetic: bool) -> Result<PriceFetcher, ConfigError> {
        let kind = if force_synthetic {
            ProviderKind::Synthetic
        } else {
            self.provider.kind
        };

        let provider: Box<dyn DataProvider> = match kind {
            ProviderKind::Synthetic => Box::new(SyntheticProvider::new()),
            ProviderKind::Yahoo => Box::new(YahooProvider::new(
                YahooSettings {
                    base_url: self.provider.base_url.clone(),
                    user_agent: self.provider.user_agent.clone(),
                    timeout: Duration::from_secs(self.provider.timeout_secs),
                },
                Arc::new(CircuitBreaker::default_provider()),
            )?),
        };
        tracing::info!(
            provider = provider.name(),
            ttl_secs = self.cache.ttl_secs,
            "price fetcher ready"
        );

        let cache = PriceCache::new(Duration::from_secs(self.cache.ttl_secs));
        Ok(PriceFetcher::new(provider, cache).with_lookback_days(self.provider.lookback_days))
    }

    /// TUI log file: configured path, else `<cache dir>/drawdown-monitor/tui.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR).join(LOG_FILE_NAME)))
    }
}
