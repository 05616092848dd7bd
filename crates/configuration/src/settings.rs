use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty or absent
/// `config.toml` is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub history: HistorySettings,
    pub analysis: AnalysisSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

/// Connection parameters for the market data API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// The Hyperliquid `/info` endpoint.
    pub info_url: String,
    /// Upper bound on a single HTTP request, connect to last byte.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How many history requests may be in flight at once.
    pub max_concurrent_requests: usize,
}

/// The window of daily history requested for every asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// First day of history requested; later clamped to the upstream bar cap.
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Minimum overlapping return observations for a meaningful correlation.
    pub min_overlap: usize,
    /// Assets whose row has a strictly larger low-data share are dropped.
    pub max_low_data_fraction: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Directory holding the JSON cache slot.
    pub directory: PathBuf,
    /// Logical key of the single cache slot.
    pub key: String,
    /// Freshness window, measured from the entry's timestamp.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            info_url: "https://api.hyperliquid.xyz/info".to_string(),
            request_timeout: Duration::from_secs(20),
            max_concurrent_requests: 16,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_overlap: 5,
            max_low_data_fraction: 0.8,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from(".cache"),
            key: "hyperCorrCache_v1".to_string(),
            ttl: Duration::from_millis(604_800_000),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.max_concurrent_requests == 0 {
            return Err(ConfigError::ValidationError(
                "api.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.api.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "api.request_timeout must be greater than zero".to_string(),
            ));
        }
        if self.analysis.min_overlap < 2 {
            return Err(ConfigError::ValidationError(
                "analysis.min_overlap must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.analysis.max_low_data_fraction) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.max_low_data_fraction must be within [0, 1], got {}",
                self.analysis.max_low_data_fraction
            )));
        }
        if self.cache.key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "cache.key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded settings, then re-validates.
    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) -> Result<(), ConfigError> {
        if let Some(limit) = overrides.max_concurrent_requests {
            self.api.max_concurrent_requests = limit;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.api.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.no_cache {
            self.cache.enabled = false;
        }
        self.validate()
    }
}

/// Command-line overrides for the most commonly tuned settings.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct SettingsOverrides {
    /// Maximum number of concurrent history requests.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub max_concurrent_requests: Option<usize>,

    /// Per-request timeout in seconds.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub request_timeout_secs: Option<u64>,

    /// Log filter directive, e.g. "debug" or "engine=trace".
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub log_level: Option<String>,

    /// Neither read nor write the result cache.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub no_cache: bool,
}
