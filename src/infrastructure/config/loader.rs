//! Figment-based configuration loader.

use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "ENGINE_BOOTSTRAP_";

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "conf/chassis.yaml";

/// Optional local overrides, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "conf/local.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Log level is not one of the tracing levels
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Log format is neither json nor pretty
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown rotation policy
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    /// Zero request timeout
    #[error("Invalid HTTP timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    /// `servicecomb.engine.domain` is blank
    #[error("Engine domain cannot be empty")]
    EmptyEngineDomain,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `conf/chassis.yaml`, or `path` when given
    /// 3. `conf/local.yaml` (optional overrides)
    /// 4. Environment variables (`ENGINE_BOOTSTRAP_*`, `__` separates
    ///    sections, e.g. `ENGINE_BOOTSTRAP_SERVICECOMB__ENGINE__MANAGER_ADDRESS`)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let primary = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config: Config = Self::figment(primary)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file, without local or environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(primary: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .split("__")
                    .map(|key| camel_case_key(key.as_str()).into())
                    .lowercase(false),
            )
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        if config.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.http.timeout_secs));
        }

        if config.servicecomb.engine.domain.trim().is_empty() {
            return Err(ConfigError::EmptyEngineDomain);
        }

        Ok(())
    }
}

/// `servicecomb.engine.manager_address` -> `servicecomb.engine.managerAddress`
fn camel_case_key(key: &str) -> String {
    key.to_ascii_lowercase()
        .split('.')
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper = false;
            for c in segment.chars() {
                if c == '_' {
                    upper = true;
                } else if upper {
                    out.push(c.to_ascii_uppercase());
                    upper = false;
                } else {
                    out.push(c);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}
