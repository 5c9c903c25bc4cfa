//! Headline totals and averages

use crate::aggregator::DataAggregator;
use crate::loader::DataSnapshot;
use crate::types::{one_decimal, OverviewStats};
use mealdeck_common::{RecipeId, Result};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// `total / users` with one decimal, `"0"` without users
fn per_user(total: usize, users: usize) -> String {
    if users == 0 {
        "0".to_string()
    } else {
        one_decimal(total as f64 / users as f64)
    }
}

/// Computes the overview card numbers
#[derive(Debug, Default)]
pub struct OverviewAggregator;

impl OverviewAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator for OverviewAggregator {
    type Output = OverviewStats;
    const SECTION: &'static str = "overview";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<OverviewStats> {
        let users = snapshot.users();
        let reviews = snapshot.reviews();

        let total_users = users.len();
        let admin_count = users.iter().filter(|user| user.is_admin).count();
        let total_favorites = snapshot.favorites().len();
        let total_meal_plans = snapshot.meal_plans().len();

        let unique_recipes = snapshot
            .favorites()
            .iter()
            .map(|favorite| favorite.recipe_id)
            .collect::<HashSet<RecipeId>>()
            .len();

        let average_rating = if reviews.is_empty() {
            "0.0".to_string()
        } else {
            let sum: u64 = reviews.iter().map(|review| u64::from(review.rating)).sum();
            one_decimal(sum as f64 / reviews.len() as f64)
        };

        let stats = OverviewStats {
            total_users,
            admin_count,
            regular_user_count: total_users - admin_count,
            total_favorites,
            total_meal_plans,
            total_reviews: reviews.len(),
            total_custom_recipes: snapshot.custom_recipes().len(),
            unique_recipes,
            avg_favorites_per_user: per_user(total_favorites, total_users),
            avg_meal_plans_per_user: per_user(total_meal_plans, total_users),
            average_rating,
        };

        debug!(?stats, "Computed overview");
        Ok(stats)
    }
}
