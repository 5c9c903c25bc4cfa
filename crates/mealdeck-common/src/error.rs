//! Error types and utilities for mealdeck

use thiserror::Error;

/// Result type alias for mealdeck operations
pub type Result<T> = std::result::Result<T, MealdeckError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for mealdeck operations
#[derive(Error, Debug)]
pub enum MealdeckError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP transport, timeouts, connection failures)
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Timeouts and refused connections; asking again may succeed
        retryable: bool,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The REST data store answered, but not with what we asked for
    #[error("Data store error: {message}")]
    Store {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single record that could not be decoded or violates the input contract
    #[error("Malformed record in '{collection}': {message}")]
    MalformedRecord { collection: String, message: String },

    /// A user-owned record pointing at a user that is not in the loaded user set
    #[error("Record in '{collection}' references unknown user {user_id}")]
    OrphanedReference { collection: String, user_id: String },

    /// Validation errors for input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl MealdeckError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            retryable: false,
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            retryable: false,
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error worth retrying (timeout, connect failure)
    pub fn transient_network(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            retryable: true,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new data store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new data store error with the HTTP status it answered with
    pub fn store_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Store {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new malformed record error
    pub fn malformed(collection: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedRecord {
            collection: collection.into(),
            message: msg.into(),
        }
    }

    /// Create a new orphaned reference error
    pub fn orphaned(collection: impl Into<String>, user_id: impl ToString) -> Self {
        Self::OrphanedReference {
            collection: collection.into(),
            user_id: user_id.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status code carried by a store error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Store { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { retryable, .. } => *retryable,
            Self::Store { status_code, .. } => status_code.map_or(false, |s| s >= 500),
            _ => false,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to MealdeckError
///
/// Only timeouts and connect failures are retryable; redirect, builder,
/// body and decode failures repeat identically.
impl From<reqwest::Error> for MealdeckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transient_network("Request timeout", err)
        } else if err.is_connect() {
            Self::transient_network("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16());
            Self::Store {
                message: format!("HTTP error: {}", status_code.unwrap_or(0)),
                status_code,
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Request failed", err)
        }
    }
}

/// Convert from toml::de::Error to MealdeckError
impl From<toml::de::Error> for MealdeckError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

/// Convert from serde_yaml::Error to MealdeckError
impl From<serde_yaml::Error> for MealdeckError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = MealdeckError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = MealdeckError::config("config issue");
        assert_eq!(config_error.to_string(), "Configuration error: config issue");

        let store_error = MealdeckError::store_with_status("Server error", 500);
        assert!(store_error.to_string().contains("Data store error"));
        assert_eq!(store_error.status_code(), Some(500));

        let validation_error = MealdeckError::validation_field("Invalid input", "rating");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_record_level_errors() {
        let malformed = MealdeckError::malformed("reviews", "rating 9 is outside 1-5");
        assert_eq!(
            malformed.to_string(),
            "Malformed record in 'reviews': rating 9 is outside 1-5"
        );

        let orphan = MealdeckError::orphaned("mealPlans", 42);
        assert_eq!(
            orphan.to_string(),
            "Record in 'mealPlans' references unknown user 42"
        );
        assert!(!orphan.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(!MealdeckError::network("reset").is_transient());
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert!(MealdeckError::transient_network("Connection failed", refused).is_transient());
        assert!(MealdeckError::store_with_status("bad gateway", 502).is_transient());
        assert!(!MealdeckError::store_with_status("not found", 404).is_transient());
        assert!(!MealdeckError::store("no status").is_transient());
        assert!(!MealdeckError::config("nope").is_transient());
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = MealdeckError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: MealdeckError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#)
            .unwrap_err();
        let error: MealdeckError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let error: MealdeckError = yaml_error.into();

        assert!(error.to_string().contains("Configuration error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = MealdeckError::config_with_source("Middle layer", root_error);
        let top_error = MealdeckError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
        }

        assert_eq!(depth, 2);
    }
}
