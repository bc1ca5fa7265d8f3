use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::adapters::arcade_sim::{MAX_GRID, MIN_GRID};
use crate::domain::models::config::Config;
use crate::services::strategy_catalog::StrategyCatalog;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".forage";

/// Primary config file, written by `forage init`.
pub const CONFIG_FILE: &str = ".forage/config.yaml";

/// Optional local overrides.
pub const LOCAL_CONFIG_FILE: &str = ".forage/local.yaml";

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "FORAGE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid budget: {0}. Must be at least 1")]
    InvalidBudget(u32),

    #[error("Invalid rotation_period: {0}. Must be at least 1")]
    InvalidRotationPeriod(u32),

    #[error("Invalid stop_check_interval: {0}. Must be at least 1")]
    InvalidStopCheckInterval(u32),

    #[error("Strategy list cannot be empty")]
    EmptyStrategies,

    #[error("Invalid poll_interval_ms: {0}. Must be at least 1")]
    InvalidPollInterval(u64),

    #[error("Invalid wait_timeout_ms: {timeout_ms} is shorter than poll_interval_ms {poll_ms}")]
    InvalidWaitTimeout { timeout_ms: u64, poll_ms: u64 },

    #[error("Invalid max_observations_per_second: {0}. Must be positive")]
    InvalidPacing(u32),

    #[error("Invalid simulator grid {width}x{height}. Each side must be between 5 and 1024")]
    InvalidGrid { width: u32, height: u32 },

    #[error("WebDriver {0} cannot be empty")]
    EmptyWebDriverField(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .forage/config.yaml (project config, created by init)
    /// 3. .forage/local.yaml (local overrides, optional)
    /// 4. Environment variables (FORAGE_* prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Self::base()
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment
    /// overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Self::base()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let search = &config.search;
        if search.budget == 0 {
            return Err(ConfigError::InvalidBudget(search.budget));
        }
        if search.rotation_period == 0 {
            return Err(ConfigError::InvalidRotationPeriod(search.rotation_period));
        }
        if search.stop_check_interval == 0 {
            return Err(ConfigError::InvalidStopCheckInterval(
                search.stop_check_interval,
            ));
        }
        if search.strategies.is_empty() {
            return Err(ConfigError::EmptyStrategies);
        }
        StrategyCatalog::from_kinds(&search.strategies)
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        let lifecycle = &config.lifecycle;
        if lifecycle.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval(lifecycle.poll_interval_ms));
        }
        if lifecycle.wait_timeout_ms < lifecycle.poll_interval_ms {
            return Err(ConfigError::InvalidWaitTimeout {
                timeout_ms: lifecycle.wait_timeout_ms,
                poll_ms: lifecycle.poll_interval_ms,
            });
        }

        if config.pacing.max_observations_per_second == 0 {
            return Err(ConfigError::InvalidPacing(
                config.pacing.max_observations_per_second,
            ));
        }

        let sim = &config.simulator;
        let side = MIN_GRID..=MAX_GRID;
        if !side.contains(&sim.width) || !side.contains(&sim.height) {
            return Err(ConfigError::InvalidGrid {
                width: sim.width,
                height: sim.height,
            });
        }

        let webdriver = &config.webdriver;
        if webdriver.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyWebDriverField("endpoint"));
        }
        if webdriver.game_url.trim().is_empty() {
            return Err(ConfigError::EmptyWebDriverField("game_url"));
        }
        for (name, selector) in webdriver.selectors.named() {
            if selector.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "selector '{name}' cannot be empty"
                )));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
