//! Dashboard report types

use chrono::{DateTime, Utc};
use mealdeck_common::{Collection, RecipeId, UserId, MAX_RATING, MIN_RATING};
use serde::Serialize;

/// Format a value with one decimal place, as the dashboard prints it
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

/// `part / whole` as a percentage, 0 for an empty whole
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// A ranked recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeStat {
    pub recipe_id: RecipeId,
    pub title: String,
    /// Number of records referencing the recipe
    pub count: usize,
    /// Mean rating, only for the highest-rated ranking
    pub average_rating: Option<f64>,
}

impl RecipeStat {
    /// Average rounded to one decimal, if there is one
    pub fn display_average(&self) -> Option<String> {
        self.average_rating.map(one_decimal)
    }
}

/// Activity vector of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub user_id: UserId,
    pub name: String,
    pub favorite_count: usize,
    pub review_count: usize,
    pub meal_plan_count: usize,
    /// Unweighted sum of the three counts
    pub total: usize,
}

impl UserActivity {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            favorite_count: 0,
            review_count: 0,
            meal_plan_count: 0,
            total: 0,
        }
    }

    pub(crate) fn refresh_total(&mut self) {
        self.total = self.favorite_count + self.review_count + self.meal_plan_count;
    }
}

/// One star bucket of the rating histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
    pub percentage: f64,
}

/// Share of reviews per star rating, listed 5 down to 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub total_reviews: usize,
    pub buckets: Vec<RatingBucket>,
}

impl RatingDistribution {
    /// Build the five buckets from per-rating counts indexed by `rating - 1`
    pub fn from_counts(counts: [usize; 5]) -> Self {
        let total_reviews = counts.iter().sum();
        let buckets = (MIN_RATING..=MAX_RATING)
            .rev()
            .map(|rating| {
                let count = counts[usize::from(rating - MIN_RATING)];
                RatingBucket {
                    rating,
                    count,
                    percentage: percentage(count, total_reviews),
                }
            })
            .collect();

        Self {
            total_reviews,
            buckets,
        }
    }

    fn bucket(&self, rating: u8) -> Option<&RatingBucket> {
        self.buckets.iter().find(|bucket| bucket.rating == rating)
    }

    /// Number of reviews with exactly this rating
    pub fn count(&self, rating: u8) -> usize {
        self.bucket(rating).map_or(0, |bucket| bucket.count)
    }

    /// Percentage of reviews with exactly this rating
    pub fn percentage(&self, rating: u8) -> f64 {
        self.bucket(rating).map_or(0.0, |bucket| bucket.percentage)
    }

    pub fn is_empty(&self) -> bool {
        self.total_reviews == 0
    }
}

impl Default for RatingDistribution {
    fn default() -> Self {
        Self::from_counts([0; 5])
    }
}

/// A participation ratio over the user population
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub numerator: usize,
    pub denominator: usize,
    /// Percentage with one decimal, `"0"` when there are no users
    pub percent: String,
}

impl Rate {
    pub fn new(numerator: usize, denominator: usize) -> Self {
        let percent = if denominator == 0 {
            "0".to_string()
        } else {
            one_decimal(percentage(numerator, denominator))
        };

        Self {
            numerator,
            denominator,
            percent,
        }
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// The three derived participation rates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementRates {
    /// Users with at least one favorite or review
    pub engagement: Rate,
    /// Users owning at least one custom recipe
    pub content_creation: Rate,
    /// Users owning at least one meal plan
    pub planner: Rate,
}

/// Headline numbers of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub total_users: usize,
    pub admin_count: usize,
    pub regular_user_count: usize,
    pub total_favorites: usize,
    pub total_meal_plans: usize,
    pub total_reviews: usize,
    pub total_custom_recipes: usize,
    /// Distinct recipe ids across all favorites
    pub unique_recipes: usize,
    pub avg_favorites_per_user: String,
    pub avg_meal_plans_per_user: String,
    pub average_rating: String,
}

impl Default for OverviewStats {
    fn default() -> Self {
        Self {
            total_users: 0,
            admin_count: 0,
            regular_user_count: 0,
            total_favorites: 0,
            total_meal_plans: 0,
            total_reviews: 0,
            total_custom_recipes: 0,
            unique_recipes: 0,
            avg_favorites_per_user: "0".to_string(),
            avg_meal_plans_per_user: "0".to_string(),
            average_rating: "0.0".to_string(),
        }
    }
}

/// Outcome of loading one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CollectionState {
    Loaded { records: usize, rejected: usize },
    Failed { reason: String },
}

/// Load outcome per collection, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    pub collection: Collection,
    #[serde(flatten)]
    pub state: CollectionState,
}

/// Everything the admin dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub overview: OverviewStats,
    pub most_favorited: Vec<RecipeStat>,
    pub most_reviewed: Vec<RecipeStat>,
    pub highest_rated: Vec<RecipeStat>,
    pub top_users: Vec<UserActivity>,
    pub rating_distribution: RatingDistribution,
    pub rates: EngagementRates,
    pub load_status: Vec<CollectionStatus>,
}

impl DashboardReport {
    /// Collections that failed to load
    pub fn failed_collections(&self) -> impl Iterator<Item = &CollectionStatus> {
        self.load_status
            .iter()
            .filter(|status| matches!(status.state, CollectionState::Failed { .. }))
    }
}
