//! Application configuration structures

use mealdeck_common::{LogFormat, LoggingConfig, OrphanPolicy, StoreClientConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// REST data store connection
    #[validate(nested)]
    pub store: StoreConfig,

    /// Dashboard and moderation settings
    #[validate(nested)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// Data store connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store
    #[validate(custom(function = "crate::validation::validate_store_url", message = "Store URL must be an absolute http(s) URL"))]
    pub url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,

    /// Requests per second sent to the store
    #[validate(range(min = 1, max = 1000, message = "Rate limit must be between 1 and 1000 requests per second"))]
    pub rate_limit_per_sec: u32,

    /// Idle pooled connections kept per host
    pub max_idle_per_host: usize,
}

/// Analytics and moderation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Length of every top-N ranking
    #[validate(range(min = 1, max = 50, message = "top_n must be between 1 and 50"))]
    pub top_n: usize,

    /// Handling of records owned by unknown users
    pub orphan_policy: OrphanPolicy,

    /// Page size of the review moderation listing
    #[validate(range(min = 1, max = 100, message = "reviews_per_page must be between 1 and 100"))]
    pub reviews_per_page: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error) or a filter directive list
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Optional log file path
    pub file: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            rate_limit_per_sec: 10,
            max_idle_per_host: 10,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            orphan_policy: OrphanPolicy::Drop,
            reviews_per_page: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.logging.validate_file()?;
        Ok(())
    }
}

impl LoggingSettings {
    /// Check the optional log file path
    pub fn validate_file(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        if let Some(ref path) = self.file {
            if let Err(err) = crate::validation::validate_file_path(path) {
                errors.add("file", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&StoreConfig> for StoreClientConfig {
    fn from(store: &StoreConfig) -> Self {
        StoreClientConfig::new(store.url.clone())
            .with_timeout(store.timeout_seconds)
            .with_max_retries(store.max_retries as usize)
            .with_rate_limit(store.rate_limit_per_sec)
            .with_pool_size(store.max_idle_per_host)
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(logging: &LoggingSettings) -> Self {
        LoggingConfig {
            level: logging.level.clone(),
            format: logging.format,
            file_path: logging.file.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.store.url, "http://localhost:3000");
        assert_eq!(config.analytics.top_n, 5);
        assert_eq!(config.analytics.reviews_per_page, 10);
        assert_eq!(config.analytics.orphan_policy, OrphanPolicy::Drop);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let yaml = serde_yaml::to_string(&config).expect("Failed to serialize to YAML");
        assert!(yaml.contains("store:"));
        assert!(yaml.contains("analytics:"));
        assert!(yaml.contains("orphan_policy: drop"));

        let deserialized: Config =
            serde_yaml::from_str(&yaml).expect("Failed to deserialize from YAML");
        assert_eq!(config.store.timeout_seconds, deserialized.store.timeout_seconds);
        assert_eq!(config.analytics.top_n, deserialized.analytics.top_n);
    }

    #[test]
    fn test_store_config_validation() {
        let mut config = StoreConfig::default();
        assert!(config.validate().is_ok());

        config.url = "not_a_url".to_string();
        assert!(config.validate().is_err());

        config.url = "http://localhost:3000".to_string();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.timeout_seconds = 30;
        config.max_retries = 11;
        assert!(config.validate().is_err());

        config.max_retries = 0;
        config.rate_limit_per_sec = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analytics_config_validation() {
        let mut config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());

        config.top_n = 0;
        assert!(config.validate().is_err());

        config.top_n = 51;
        assert!(config.validate().is_err());

        config.top_n = 10;
        config.reviews_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_settings_validation() {
        let mut config = LoggingSettings::default();
        assert!(config.validate().is_ok());

        config.level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.level = "debug".to_string();
        config.file = Some("bad|name.log".to_string());
        assert!(config.validate().is_ok());
        assert!(config.validate_file().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r"
store:
  url: 'http://recipes.internal:3000'
analytics:
  orphan_policy: reject
";
        let config: Config = serde_yaml::from_str(yaml).expect("Failed to parse partial config");
        assert!(config.validate_all().is_ok());
        assert_eq!(config.store.url, "http://recipes.internal:3000");
        assert_eq!(config.store.timeout_seconds, 30);
        assert_eq!(config.analytics.orphan_policy, OrphanPolicy::Reject);
        assert_eq!(config.analytics.top_n, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_conversions() {
        let mut config = Config::default();
        config.store.max_retries = 7;
        config.logging.format = LogFormat::Json;
        config.logging.file = Some("/tmp/mealdeck.log".to_string());

        let client: StoreClientConfig = (&config.store).into();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.max_retries, 7);
        assert_eq!(client.rate_limit_per_sec, 10);

        let logging: LoggingConfig = (&config.logging).into();
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(logging.file_path.as_deref(), Some("/tmp/mealdeck.log"));
    }
}
