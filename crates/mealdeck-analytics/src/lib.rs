//! # mealdeck analytics
//!
//! Turns the five store collections into the admin dashboard: most-favorited,
//! most-reviewed and highest-rated recipes, the most active users, the rating
//! distribution and the participation rates. Also hosts the read-only
//! moderation listings.
//!
//! Loading goes through [`DataLoader`], which joins all five fetches before
//! any aggregation runs. Every aggregator is a pure [`DataAggregator`] over
//! the resulting [`DataSnapshot`].

pub mod aggregator;
pub mod engagement;
pub mod engine;
pub mod histogram;
pub mod loader;
pub mod moderation;
pub mod overview;
pub mod popularity;
pub mod rates;
pub mod reviews;
pub mod types;

pub use aggregator::{rank_top, DataAggregator, DEFAULT_TOP_N};
pub use engagement::EngagementAggregator;
pub use engine::{AnalyticsEngine, EngineSettings};
pub use histogram::RatingHistogramAggregator;
pub use loader::{
    ingest, CollectionLoad, CollectionSource, DataLoader, DataSnapshot, LoadProgress,
};
pub use moderation::{count_by_rating, filter_users, paginate, Page, ReviewFilter};
pub use overview::OverviewAggregator;
pub use popularity::{tally_favorites, PopularityAggregator, RecipeTally};
pub use rates::RatesAggregator;
pub use reviews::{
    recipe_label, tally_reviews, HighestRatedAggregator, MostReviewedAggregator, RatingTally,
    MIN_REVIEWS_FOR_RATING,
};
pub use types::{
    CollectionState, CollectionStatus, DashboardReport, EngagementRates, OverviewStats, Rate,
    RatingBucket, RatingDistribution, RecipeStat, UserActivity,
};
