//! # mealdeck common
//!
//! Error type, logging setup, record models and the REST data store client
//! shared by every mealdeck crate.

pub mod error;
pub mod logging;
pub mod models;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{MealdeckError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LogFormat, LoggingConfig};
pub use models::{
    Collection, CustomRecipe, Favorite, MealPlan, OrphanPolicy, Owned, RecipeId, Record, RecordKey,
    Review, User, UserId, MAX_RATING, MIN_RATING,
};
pub use store::{decode_records, ClientMetrics, DecodedCollection, StoreClient, StoreClientConfig};
