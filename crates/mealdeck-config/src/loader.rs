//! Configuration loading utilities

use crate::Config;
use mealdeck_common::{MealdeckError, Result as MealdeckResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "MEALDECK_CONFIG_PATH";

/// Files probed in the working directory when no path is given
const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for MealdeckError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        MealdeckError::config_with_source(message, err)
    }
}

/// Parse an override value, naming the variable on failure
fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse().map_err(|e| ConfigError::EnvParse {
        var: var.to_string(),
        source: Box::new(e),
    })
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |var| env::var(var).ok())
    }

    /// Same as [`ConfigLoader::load_config`] with an explicit variable lookup
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let mut config = Self::parse_file(path)?;
        info!("Loaded configuration from {}", path.display());

        Self::apply_overrides(&mut config, &lookup)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Parse a file, choosing the format from its extension (YAML unless `.toml`)
    fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Load configuration from environment variables and files
    pub fn load() -> MealdeckResult<Config> {
        Ok(Self::load_with(|var| env::var(var).ok())?)
    }

    /// Resolve the configuration file (explicit variable, then the working
    /// directory), falling back to defaults, then apply overrides
    pub fn load_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(config_path) = lookup(CONFIG_PATH_VAR) {
            if !Path::new(&config_path).exists() {
                return Err(ConfigError::MissingConfig(format!(
                    "{} points at '{}', which does not exist",
                    CONFIG_PATH_VAR, config_path
                )));
            }
            return Self::load_config_with(&config_path, lookup);
        }

        if let Some(found) = DEFAULT_CONFIG_FILES
            .iter()
            .find(|candidate| Path::new(candidate).exists())
        {
            return Self::load_config_with(found, lookup);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_overrides(&mut config, &lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MealdeckResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply `MEALDECK_*` overrides to configuration
    fn apply_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store overrides
        if let Some(url) = lookup("MEALDECK_STORE_URL") {
            config.store.url = url;
        }

        if let Some(timeout) = lookup("MEALDECK_STORE_TIMEOUT") {
            config.store.timeout_seconds = parse_var("MEALDECK_STORE_TIMEOUT", &timeout)?;
        }

        if let Some(retries) = lookup("MEALDECK_STORE_MAX_RETRIES") {
            config.store.max_retries = parse_var("MEALDECK_STORE_MAX_RETRIES", &retries)?;
        }

        if let Some(rate) = lookup("MEALDECK_STORE_RATE_LIMIT") {
            config.store.rate_limit_per_sec = parse_var("MEALDECK_STORE_RATE_LIMIT", &rate)?;
        }

        // Analytics overrides
        if let Some(top_n) = lookup("MEALDECK_TOP_N") {
            config.analytics.top_n = parse_var("MEALDECK_TOP_N", &top_n)?;
        }

        if let Some(policy) = lookup("MEALDECK_ORPHAN_POLICY") {
            config.analytics.orphan_policy = parse_var("MEALDECK_ORPHAN_POLICY", &policy)?;
        }

        // Logging overrides
        if let Some(level) = lookup("MEALDECK_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("MEALDECK_LOG_FORMAT") {
            config.logging.format = parse_var("MEALDECK_LOG_FORMAT", &format)?;
        }

        if let Some(file) = lookup("MEALDECK_LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}
