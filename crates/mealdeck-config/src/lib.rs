//! Configuration management for mealdeck

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_VAR};
pub use settings::{AnalyticsConfig, Config, LoggingSettings, StoreConfig};
