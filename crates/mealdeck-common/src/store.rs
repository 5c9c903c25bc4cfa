//! REST data store client with connection pooling, rate limiting and retries
//!
//! The store is a generic JSON document server: every collection is served as
//! a JSON array at `GET {base_url}/{collection}`. Records are decoded one by
//! one so that a single bad document costs only itself.

use crate::error::{MealdeckError, Result};
use crate::models::{Collection, CustomRecipe, Favorite, MealPlan, Record, Review, User};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Response};
use serde::Serialize;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, info, instrument, warn};

/// Configuration for the data store client
#[derive(Debug, Clone)]
pub struct StoreClientConfig {
    /// Base URL of the store (e.g., "http://localhost:3000")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
}

impl Default for StoreClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
            max_retries: 3,
        }
    }
}

impl StoreClientConfig {
    /// Create a new configuration pointing at the given store
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Decoded collection plus the records that had to be skipped
#[derive(Debug)]
pub struct DecodedCollection<R> {
    /// Records that decoded cleanly
    pub records: Vec<R>,
    /// One `MalformedRecord` per skipped document
    pub rejected: Vec<MealdeckError>,
}

/// Decode a JSON array document-by-document into records of `R`
pub fn decode_records<R: Record>(values: Vec<serde_json::Value>) -> DecodedCollection<R> {
    let collection = R::COLLECTION;
    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<R>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = MealdeckError::malformed(
                    collection.path(),
                    format!("document #{} could not be decoded: {}", index, e),
                );
                warn!(%collection, index, "Skipping malformed record: {}", err);
                rejected.push(err);
            }
        }
    }

    DecodedCollection { records, rejected }
}

/// Data store client with connection pooling and rate limiting
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
    config: StoreClientConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl StoreClient {
    /// Create a new store client with the given configuration
    pub fn new(config: StoreClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| MealdeckError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| MealdeckError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default settings for the given store
    pub fn with_defaults(base_url: impl Into<String>) -> Result<Self> {
        Self::new(StoreClientConfig::new(base_url))
    }

    /// URL of a collection on the store
    fn build_url(&self, collection: Collection) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            collection.path()
        )
    }

    /// One GET attempt, classified into retryable and final failures
    async fn send_once(&self, url: &str) -> Result<Response> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    debug!("Request successful: {}", status);
                    Ok(response)
                } else if status.is_client_error() {
                    // 4xx will not get better by asking again
                    error!("Client error: {}", status);
                    Err(MealdeckError::store_with_status(
                        format!("Store returned client error: {}", status),
                        status.as_u16(),
                    ))
                } else {
                    warn!("Server error, will retry: {}", status);
                    Err(MealdeckError::store_with_status(
                        format!("Store returned server error: {}", status),
                        status.as_u16(),
                    ))
                }
            }
            Err(e) => {
                let err = MealdeckError::from(e);
                if err.is_transient() {
                    warn!("{}, will retry", err);
                } else {
                    error!("{}", err);
                }
                Err(err)
            }
        }
    }

    /// GET a collection with retry on transient failures
    #[instrument(skip(self), fields(collection = %collection))]
    async fn make_request(&self, collection: Collection) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let url = self.build_url(collection);
        debug!("Making request to: {}", url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = RetryIf::start(
            retry_strategy,
            || self.send_once(&url),
            |e: &MealdeckError| e.is_transient(),
        )
        .await?;

        info!("Successfully completed request to {}", collection);
        Ok(response)
    }

    /// Fetch every record of a collection
    #[instrument(skip(self), fields(collection = %R::COLLECTION))]
    pub async fn fetch_collection<R: Record>(&self) -> Result<Vec<R>> {
        let response = self.make_request(R::COLLECTION).await?;
        let text = response
            .text()
            .await
            .map_err(|e| MealdeckError::network_with_source("Failed to read response body", e))?;

        let values: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
            MealdeckError::Store {
                message: format!("'{}' did not return a JSON array", R::COLLECTION),
                status_code: None,
                source: Some(Box::new(e)),
            }
        })?;

        let decoded = decode_records::<R>(values);
        if !decoded.rejected.is_empty() {
            warn!(
                "Skipped {} malformed record(s) in '{}'",
                decoded.rejected.len(),
                R::COLLECTION
            );
        }
        debug!("Decoded {} record(s)", decoded.records.len());
        Ok(decoded.records)
    }

    // ============================================================================
    // Public API Methods
    // ============================================================================

    /// Get all user accounts
    pub async fn fetch_all_users(&self) -> Result<Vec<User>> {
        self.fetch_collection::<User>().await
    }

    /// Get all favorites of all users
    pub async fn fetch_all_favorites(&self) -> Result<Vec<Favorite>> {
        self.fetch_collection::<Favorite>().await
    }

    /// Get all saved meal plans
    pub async fn fetch_all_meal_plans(&self) -> Result<Vec<MealPlan>> {
        self.fetch_collection::<MealPlan>().await
    }

    /// Get all reviews
    pub async fn fetch_all_reviews(&self) -> Result<Vec<Review>> {
        self.fetch_collection::<Review>().await
    }

    /// Get all user-authored recipes
    pub async fn fetch_all_custom_recipes(&self) -> Result<Vec<CustomRecipe>> {
        self.fetch_collection::<CustomRecipe>().await
    }

    /// Test the connection to the store
    ///
    /// Requests the users collection; true if the store answered with a
    /// decodable array.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> bool {
        info!("Testing connection to data store");
        match self.fetch_all_users().await {
            Ok(_) => {
                info!("Connection test successful");
                true
            }
            Err(e) => {
                warn!("Connection test failed: {}", e);
                false
            }
        }
    }

    /// Client configuration and state, for monitoring and debugging
    pub fn client_metrics(&self) -> ClientMetrics {
        ClientMetrics {
            base_url: self.config.base_url.clone(),
            timeout_secs: self.config.timeout_secs,
            max_idle_per_host: self.config.max_idle_per_host,
            rate_limit_per_sec: self.config.rate_limit_per_sec,
            max_retries: self.config.max_retries,
            has_rate_limit_capacity: self.rate_limiter.check().is_ok(),
        }
    }
}

/// Client metrics for monitoring and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    /// Base URL being used
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection pool max idle per host
    pub max_idle_per_host: usize,
    /// Rate limit requests per second
    pub rate_limit_per_sec: u32,
    /// Maximum retry attempts
    pub max_retries: usize,
    /// Whether we currently have rate limit capacity
    pub has_rate_limit_capacity: bool,
}
