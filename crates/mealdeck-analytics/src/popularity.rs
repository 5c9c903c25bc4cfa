//! Most-favorited recipes

use crate::aggregator::{rank_top, DataAggregator, DEFAULT_TOP_N};
use crate::loader::DataSnapshot;
use crate::types::RecipeStat;
use indexmap::IndexMap;
use mealdeck_common::{Favorite, RecipeId, Result};
use tracing::{debug, instrument};

/// Favorite count and latest seen title of one recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTally {
    pub title: String,
    pub count: usize,
}

/// Count favorites per recipe, in first-appearance order.
///
/// The title is the one carried by the last favorite seen for the recipe.
pub fn tally_favorites(favorites: &[Favorite]) -> IndexMap<RecipeId, RecipeTally> {
    let mut tallies: IndexMap<RecipeId, RecipeTally> = IndexMap::new();

    for favorite in favorites {
        let tally = tallies.entry(favorite.recipe_id).or_insert_with(|| RecipeTally {
            title: String::new(),
            count: 0,
        });
        tally.title.clone_from(&favorite.title);
        tally.count += 1;
    }

    tallies
}

/// Ranks recipes by how many favorites reference them
#[derive(Debug)]
pub struct PopularityAggregator {
    /// Maximum number of recipes to return
    pub limit: usize,
}

impl PopularityAggregator {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_TOP_N,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for PopularityAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAggregator for PopularityAggregator {
    type Output = Vec<RecipeStat>;
    const SECTION: &'static str = "most_favorited";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<Vec<RecipeStat>> {
        let stats: Vec<RecipeStat> = tally_favorites(snapshot.favorites())
            .into_iter()
            .map(|(recipe_id, tally)| RecipeStat {
                recipe_id,
                title: tally.title,
                count: tally.count,
                average_rating: None,
            })
            .collect();

        let result = rank_top(stats, self.limit, |a, b| b.count.cmp(&a.count));

        debug!("Aggregated {} most favorited recipe(s)", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealdeck_common::test_utils::favorite;

    fn snapshot(favorites: Vec<Favorite>) -> DataSnapshot {
        DataSnapshot::from_records(vec![], favorites, vec![], vec![], vec![])
    }

    #[test]
    fn test_counts_and_ranking() {
        let favorites = vec![
            favorite(1, 1, "A"),
            favorite(2, 1, "A"),
            favorite(1, 2, "B"),
        ];
        let result = PopularityAggregator::new()
            .aggregate(&snapshot(favorites))
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].recipe_id, RecipeId(1));
        assert_eq!(result[0].title, "A");
        assert_eq!(result[0].count, 2);
        assert_eq!(result[1].count, 1);
    }

    #[test]
    fn test_last_title_wins() {
        let tallies = tally_favorites(&[favorite(1, 9, "Old name"), favorite(2, 9, "New name")]);
        assert_eq!(tallies[&RecipeId(9)].title, "New name");
        assert_eq!(tallies[&RecipeId(9)].count, 2);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let favorites = vec![
            favorite(1, 30, "C"),
            favorite(1, 10, "A"),
            favorite(1, 20, "B"),
            favorite(2, 20, "B"),
        ];
        let ids: Vec<u64> = PopularityAggregator::new()
            .aggregate(&snapshot(favorites))
            .unwrap()
            .iter()
            .map(|stat| stat.recipe_id.0)
            .collect();
        assert_eq!(ids, vec![20, 30, 10]);
    }

    #[test]
    fn test_limit() {
        let favorites: Vec<Favorite> = (0..8).map(|id| favorite(1, id, "x")).collect();
        let result = PopularityAggregator::with_limit(3)
            .aggregate(&snapshot(favorites))
            .unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_no_favorites() {
        let result = PopularityAggregator::new()
            .aggregate(&DataSnapshot::default())
            .unwrap();
        assert!(result.is_empty());
    }
}
