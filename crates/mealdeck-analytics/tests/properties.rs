//! Property tests for the aggregators.

use chrono::Utc;
use mealdeck_analytics::{
    tally_favorites, AnalyticsEngine, DataAggregator, DataSnapshot, HighestRatedAggregator,
    RatesAggregator, RatingHistogramAggregator, MIN_REVIEWS_FOR_RATING,
};
use mealdeck_common::test_utils::{favorite, meal_plan, review, user};
use mealdeck_common::{Favorite, RecipeId, Review, User};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn users_strategy() -> impl Strategy<Value = Vec<User>> {
    (0u64..8).prop_map(|n| (1..=n).map(|id| user(id, &format!("user{}", id))).collect())
}

fn favorites_strategy() -> impl Strategy<Value = Vec<Favorite>> {
    prop::collection::vec((1u64..10, 1u64..12), 0..40)
        .prop_map(|pairs| pairs.into_iter().map(|(u, r)| favorite(u, r, "t")).collect())
}

fn reviews_strategy() -> impl Strategy<Value = Vec<Review>> {
    prop::collection::vec((1u64..10, 1u64..12, 1u8..=5), 0..40)
        .prop_map(|rows| rows.into_iter().map(|(u, r, s)| review(u, r, s)).collect())
}

fn snapshot_strategy() -> impl Strategy<Value = DataSnapshot> {
    (
        users_strategy(),
        favorites_strategy(),
        prop::collection::vec(1u64..10, 0..10),
        reviews_strategy(),
    )
        .prop_map(|(users, favorites, planners, reviews)| {
            DataSnapshot::from_records(
                users,
                favorites,
                planners.into_iter().map(meal_plan).collect(),
                reviews,
                vec![],
            )
        })
}

proptest! {
    #[test]
    fn compute_is_idempotent(snapshot in snapshot_strategy()) {
        let engine = AnalyticsEngine::default();
        let at = Utc::now();
        let first = serde_json::to_string(&engine.compute_at(&snapshot, at)).unwrap();
        let second = serde_json::to_string(&engine.compute_at(&snapshot, at)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn favorite_counts_are_conserved(favorites in favorites_strategy()) {
        let total: usize = tally_favorites(&favorites).values().map(|t| t.count).sum();
        prop_assert_eq!(total, favorites.len());
    }

    #[test]
    fn single_review_recipes_never_rank(reviews in reviews_strategy()) {
        let mut per_recipe: HashMap<RecipeId, usize> = HashMap::new();
        for r in &reviews {
            *per_recipe.entry(r.recipe_id).or_default() += 1;
        }

        let snapshot = DataSnapshot::from_records(vec![], vec![], vec![], reviews, vec![]);
        let ranked = HighestRatedAggregator::with_limit(50).aggregate(&snapshot).unwrap();

        for stat in &ranked {
            prop_assert!(per_recipe[&stat.recipe_id] >= MIN_REVIEWS_FOR_RATING);
        }
        let qualifying = per_recipe.values().filter(|&&c| c >= MIN_REVIEWS_FOR_RATING).count();
        prop_assert_eq!(ranked.len(), qualifying);
    }

    #[test]
    fn histogram_is_complete(reviews in reviews_strategy()) {
        let count = reviews.len();
        let snapshot = DataSnapshot::from_records(vec![], vec![], vec![], reviews, vec![]);
        let distribution = RatingHistogramAggregator::new().aggregate(&snapshot).unwrap();
        let sum: f64 = distribution.buckets.iter().map(|b| b.percentage).sum();

        if count == 0 {
            prop_assert!(distribution.buckets.iter().all(|b| b.percentage == 0.0));
        } else {
            prop_assert!((sum - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn engagement_counts_each_user_once(
        users in users_strategy(),
        favorites in favorites_strategy(),
        reviews in reviews_strategy(),
    ) {
        let expected: HashSet<_> = favorites
            .iter()
            .map(|f| f.user_id)
            .chain(reviews.iter().map(|r| r.user_id))
            .collect();

        let snapshot = DataSnapshot::from_records(users, favorites, vec![], reviews, vec![]);
        let rates = RatesAggregator::new().aggregate(&snapshot).unwrap();
        prop_assert_eq!(rates.engagement.numerator, expected.len());
    }

    #[test]
    fn rankings_respect_top_n(snapshot in snapshot_strategy(), top_n in 1usize..8) {
        let engine = AnalyticsEngine::new(mealdeck_analytics::EngineSettings {
            top_n,
            ..Default::default()
        });
        let report = engine.compute(&snapshot);
        prop_assert!(report.most_favorited.len() <= top_n);
        prop_assert!(report.most_reviewed.len() <= top_n);
        prop_assert!(report.highest_rated.len() <= top_n);
        prop_assert!(report.top_users.len() <= top_n);
        prop_assert!(report.most_favorited.windows(2).all(|w| w[0].count >= w[1].count));
        prop_assert!(report.top_users.windows(2).all(|w| w[0].total >= w[1].total));
    }
}
