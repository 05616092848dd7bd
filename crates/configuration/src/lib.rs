use crate::error::ConfigError;
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, ApiSettings, CacheSettings, HistorySettings, LoggingSettings, Settings,
    SettingsOverrides,
};

/// The file read when no explicit path is given. It is optional.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `HYPERCORR_API__MAX_CONCURRENT_REQUESTS=8`.
pub const ENV_PREFIX: &str = "HYPERCORR";

/// Loads and validates the application settings.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults,
/// 2. the TOML file at `path` (required) or `config.toml` (optional),
/// 3. `HYPERCORR_*` environment variables, nested with `__`.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let builder = config::Config::builder()
        .add_source(config::File::from(file.as_path()).required(path.is_some()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
