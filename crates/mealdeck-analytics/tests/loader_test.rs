//! Loader and engine tests against an in-memory source.

use async_trait::async_trait;
use mealdeck_analytics::{
    AnalyticsEngine, CollectionSource, CollectionState, DataLoader, LoadProgress,
};
use mealdeck_common::test_utils::{custom_recipe, favorite, meal_plan, review, user};
use mealdeck_common::{
    Collection, CustomRecipe, Favorite, MealPlan, MealdeckError, Result, Review, User,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// Serves fixed collections, optionally failing or delaying some of them
#[derive(Default)]
struct MemorySource {
    users: Vec<User>,
    favorites: Vec<Favorite>,
    meal_plans: Vec<MealPlan>,
    reviews: Vec<Review>,
    custom_recipes: Vec<CustomRecipe>,
    failing: Vec<Collection>,
    delays_ms: HashMap<Collection, u64>,
}

impl MemorySource {
    fn sample() -> Self {
        Self {
            users: vec![user(1, "Ann"), user(2, "Ben"), user(3, "Cat")],
            favorites: vec![favorite(1, 10, "Soup"), favorite(2, 10, "Soup"), favorite(1, 11, "Pie")],
            meal_plans: vec![meal_plan(1)],
            reviews: vec![review(1, 10, 5), review(2, 10, 4), review(3, 11, 9)],
            custom_recipes: vec![custom_recipe(3, "Stew")],
            ..Default::default()
        }
    }

    fn failing(mut self, collection: Collection) -> Self {
        self.failing.push(collection);
        self
    }

    fn delayed(mut self, collection: Collection, ms: u64) -> Self {
        self.delays_ms.insert(collection, ms);
        self
    }

    async fn serve<T: Clone>(&self, collection: Collection, records: &[T]) -> Result<Vec<T>> {
        if let Some(ms) = self.delays_ms.get(&collection) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.failing.contains(&collection) {
            return Err(MealdeckError::store_with_status(
                format!("{} unavailable", collection),
                503,
            ));
        }
        Ok(records.to_vec())
    }
}

#[async_trait]
impl CollectionSource for MemorySource {
    async fn fetch_all_users(&self) -> Result<Vec<User>> {
        self.serve(Collection::Users, &self.users).await
    }

    async fn fetch_all_favorites(&self) -> Result<Vec<Favorite>> {
        self.serve(Collection::Favorites, &self.favorites).await
    }

    async fn fetch_all_meal_plans(&self) -> Result<Vec<MealPlan>> {
        self.serve(Collection::MealPlans, &self.meal_plans).await
    }

    async fn fetch_all_reviews(&self) -> Result<Vec<Review>> {
        self.serve(Collection::Reviews, &self.reviews).await
    }

    async fn fetch_all_custom_recipes(&self) -> Result<Vec<CustomRecipe>> {
        self.serve(Collection::CustomRecipes, &self.custom_recipes).await
    }
}

fn drain(mut rx: mpsc::UnboundedReceiver<LoadProgress>) -> Vec<LoadProgress> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_load_all_collections() {
    let source = MemorySource::sample();
    let snapshot = DataLoader::new(&source).load_all().await;

    assert_eq!(snapshot.users().len(), 3);
    assert_eq!(snapshot.favorites().len(), 3);
    // the rating 9 review is rejected at ingestion
    assert_eq!(snapshot.reviews().len(), 2);
    assert_eq!(
        snapshot.status()[3].state,
        CollectionState::Loaded {
            records: 2,
            rejected: 1
        }
    );
}

#[tokio::test]
async fn test_progress_ends_with_single_complete() {
    let source = MemorySource::sample()
        .delayed(Collection::Users, 40)
        .delayed(Collection::Reviews, 5);
    let (tx, rx) = mpsc::unbounded_channel();

    DataLoader::new(&source).with_progress(tx).load_all().await;
    let events = drain(rx);

    assert_eq!(events.len(), Collection::ALL.len() + 1);
    assert_eq!(
        events.last(),
        Some(&LoadProgress::Complete {
            loaded: 5,
            failed: 0
        })
    );

    let completions: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            LoadProgress::Collection { completed, .. } => Some(*completed),
            LoadProgress::Complete { .. } => None,
        })
        .collect();
    assert_eq!(completions, vec![1, 2, 3, 4, 5]);

    // the slowest collection reports last, whichever it is
    match &events[Collection::ALL.len() - 1] {
        LoadProgress::Collection { collection, .. } => assert_eq!(*collection, Collection::Users),
        other => panic!("Expected a collection event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_collection_does_not_block_others() {
    let source = MemorySource::sample().failing(Collection::Favorites);
    let (tx, rx) = mpsc::unbounded_channel();

    let report = AnalyticsEngine::default().run(&source, Some(tx)).await;

    assert!(report.most_favorited.is_empty());
    assert_eq!(report.overview.unique_recipes, 0);
    assert_eq!(report.most_reviewed.len(), 1);
    assert_eq!(report.highest_rated.len(), 1);
    assert_eq!(report.overview.total_users, 3);
    assert_eq!(report.rates.planner.percent, "33.3");

    let failed: Vec<Collection> = report.failed_collections().map(|s| s.collection).collect();
    assert_eq!(failed, vec![Collection::Favorites]);

    let events = drain(rx);
    assert_eq!(
        events.last(),
        Some(&LoadProgress::Complete {
            loaded: 4,
            failed: 1
        })
    );
}

#[tokio::test]
async fn test_everything_failing_still_produces_a_report() {
    let source = Collection::ALL
        .iter()
        .fold(MemorySource::sample(), |source, &c| source.failing(c));

    let report = AnalyticsEngine::default().run(&source, None).await;

    assert_eq!(report.failed_collections().count(), 5);
    assert!(report.top_users.is_empty());
    assert!(report.rating_distribution.is_empty());
    assert_eq!(report.rates.engagement.percent, "0");
    assert_eq!(report.overview.average_rating, "0.0");
}

#[tokio::test]
async fn test_engagement_waits_for_every_collection() {
    // meal plans arrive last; their counts must still be in the ranking
    let source = MemorySource::sample().delayed(Collection::MealPlans, 30);
    let report = AnalyticsEngine::default().run(&source, None).await;

    let ann = report
        .top_users
        .iter()
        .find(|entry| entry.name == "Ann")
        .expect("Ann is ranked");
    assert_eq!(ann.favorite_count, 2);
    assert_eq!(ann.review_count, 1);
    assert_eq!(ann.meal_plan_count, 1);
    assert_eq!(ann.total, 4);
    assert_eq!(report.top_users[0].name, "Ann");
}

#[test]
fn test_blocking_run_with_tokio_test() {
    let source = MemorySource::sample();
    let report = tokio_test::block_on(AnalyticsEngine::default().run(&source, None));
    assert_eq!(report.overview.total_custom_recipes, 1);
    assert_eq!(report.rates.content_creation.percent, "33.3");
}
