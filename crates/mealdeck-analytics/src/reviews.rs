//! Most-reviewed and highest-rated recipes
//!
//! Reviews carry no recipe title, so both rankings label recipes with a
//! synthesized "Recipe #<id>".

use crate::aggregator::{rank_top, DataAggregator, DEFAULT_TOP_N};
use crate::loader::DataSnapshot;
use crate::types::RecipeStat;
use indexmap::IndexMap;
use mealdeck_common::{RecipeId, Result, Review};
use tracing::{debug, instrument};

/// Reviews a recipe needs before it can be ranked by average rating
pub const MIN_REVIEWS_FOR_RATING: usize = 2;

/// Display label for a recipe known only by id
pub fn recipe_label(recipe_id: RecipeId) -> String {
    format!("Recipe #{}", recipe_id)
}

/// Rating sum and review count of one recipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub sum: u64,
    pub count: usize,
}

impl RatingTally {
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

/// Sum ratings per recipe, in first-appearance order
pub fn tally_reviews(reviews: &[Review]) -> IndexMap<RecipeId, RatingTally> {
    let mut tallies: IndexMap<RecipeId, RatingTally> = IndexMap::new();

    for review in reviews {
        let tally = tallies.entry(review.recipe_id).or_default();
        tally.sum += u64::from(review.rating);
        tally.count += 1;
    }

    tallies
}

/// Ranks recipes by number of reviews
#[derive(Debug)]
pub struct MostReviewedAggregator {
    /// Maximum number of recipes to return
    pub limit: usize,
}

impl MostReviewedAggregator {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_TOP_N,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for MostReviewedAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAggregator for MostReviewedAggregator {
    type Output = Vec<RecipeStat>;
    const SECTION: &'static str = "most_reviewed";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<Vec<RecipeStat>> {
        let stats: Vec<RecipeStat> = tally_reviews(snapshot.reviews())
            .into_iter()
            .map(|(recipe_id, tally)| RecipeStat {
                recipe_id,
                title: recipe_label(recipe_id),
                count: tally.count,
                average_rating: None,
            })
            .collect();

        let result = rank_top(stats, self.limit, |a, b| b.count.cmp(&a.count));

        debug!("Aggregated {} most reviewed recipe(s)", result.len());
        Ok(result)
    }
}

/// Ranks recipes with at least [`MIN_REVIEWS_FOR_RATING`] reviews by mean rating
#[derive(Debug)]
pub struct HighestRatedAggregator {
    /// Maximum number of recipes to return
    pub limit: usize,
}

impl HighestRatedAggregator {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_TOP_N,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for HighestRatedAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAggregator for HighestRatedAggregator {
    type Output = Vec<RecipeStat>;
    const SECTION: &'static str = "highest_rated";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<Vec<RecipeStat>> {
        let tallies = tally_reviews(snapshot.reviews());
        let below_threshold = tallies
            .values()
            .filter(|tally| tally.count < MIN_REVIEWS_FOR_RATING)
            .count();

        let stats: Vec<RecipeStat> = tallies
            .into_iter()
            .filter(|(_, tally)| tally.count >= MIN_REVIEWS_FOR_RATING)
            .map(|(recipe_id, tally)| RecipeStat {
                recipe_id,
                title: recipe_label(recipe_id),
                count: tally.count,
                average_rating: tally.average(),
            })
            .collect();

        let result = rank_top(stats, self.limit, |a, b| {
            let a = a.average_rating.unwrap_or(0.0);
            let b = b.average_rating.unwrap_or(0.0);
            b.total_cmp(&a)
        });

        debug!(
            below_threshold,
            "Aggregated {} highest rated recipe(s)",
            result.len()
        );
        Ok(result)
    }
}
