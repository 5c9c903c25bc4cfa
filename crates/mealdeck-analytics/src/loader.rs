//! Concurrent load of the five store collections
//!
//! All five fetches are issued at once and joined before anything is
//! aggregated, so no aggregator ever sees a partially loaded snapshot. A
//! failed fetch is recorded for its collection only.

use crate::types::{CollectionState, CollectionStatus};
use async_trait::async_trait;
use mealdeck_common::{
    Collection, CustomRecipe, Favorite, MealPlan, Record, Result, Review, StoreClient, User,
};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Read access to the five collections
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_all_users(&self) -> Result<Vec<User>>;
    async fn fetch_all_favorites(&self) -> Result<Vec<Favorite>>;
    async fn fetch_all_meal_plans(&self) -> Result<Vec<MealPlan>>;
    async fn fetch_all_reviews(&self) -> Result<Vec<Review>>;
    async fn fetch_all_custom_recipes(&self) -> Result<Vec<CustomRecipe>>;
}

#[async_trait]
impl CollectionSource for StoreClient {
    async fn fetch_all_users(&self) -> Result<Vec<User>> {
        StoreClient::fetch_all_users(self).await
    }

    async fn fetch_all_favorites(&self) -> Result<Vec<Favorite>> {
        StoreClient::fetch_all_favorites(self).await
    }

    async fn fetch_all_meal_plans(&self) -> Result<Vec<MealPlan>> {
        StoreClient::fetch_all_meal_plans(self).await
    }

    async fn fetch_all_reviews(&self) -> Result<Vec<Review>> {
        StoreClient::fetch_all_reviews(self).await
    }

    async fn fetch_all_custom_recipes(&self) -> Result<Vec<CustomRecipe>> {
        StoreClient::fetch_all_custom_recipes(self).await
    }
}

/// Outcome of fetching one collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionLoad<T> {
    /// Records that passed ingestion, plus how many were rejected
    Loaded { records: Vec<T>, rejected: usize },
    /// The fetch failed; the reason is kept for the report
    Failed(String),
}

impl<T> CollectionLoad<T> {
    pub fn loaded(records: Vec<T>) -> Self {
        Self::Loaded {
            records,
            rejected: 0,
        }
    }

    /// Records of the collection; empty when the load failed
    pub fn records(&self) -> &[T] {
        match self {
            Self::Loaded { records, .. } => records,
            Self::Failed(_) => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    fn state(&self) -> CollectionState {
        match self {
            Self::Loaded { records, rejected } => CollectionState::Loaded {
                records: records.len(),
                rejected: *rejected,
            },
            Self::Failed(reason) => CollectionState::Failed {
                reason: reason.clone(),
            },
        }
    }
}

impl<T> Default for CollectionLoad<T> {
    fn default() -> Self {
        Self::loaded(Vec::new())
    }
}

/// Immutable view of all five collections after the barrier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub users: CollectionLoad<User>,
    pub favorites: CollectionLoad<Favorite>,
    pub meal_plans: CollectionLoad<MealPlan>,
    pub reviews: CollectionLoad<Review>,
    pub custom_recipes: CollectionLoad<CustomRecipe>,
}

impl DataSnapshot {
    /// Snapshot of fully loaded collections
    pub fn from_records(
        users: Vec<User>,
        favorites: Vec<Favorite>,
        meal_plans: Vec<MealPlan>,
        reviews: Vec<Review>,
        custom_recipes: Vec<CustomRecipe>,
    ) -> Self {
        Self {
            users: CollectionLoad::loaded(users),
            favorites: CollectionLoad::loaded(favorites),
            meal_plans: CollectionLoad::loaded(meal_plans),
            reviews: CollectionLoad::loaded(reviews),
            custom_recipes: CollectionLoad::loaded(custom_recipes),
        }
    }

    pub fn users(&self) -> &[User] {
        self.users.records()
    }

    pub fn favorites(&self) -> &[Favorite] {
        self.favorites.records()
    }

    pub fn meal_plans(&self) -> &[MealPlan] {
        self.meal_plans.records()
    }

    pub fn reviews(&self) -> &[Review] {
        self.reviews.records()
    }

    pub fn custom_recipes(&self) -> &[CustomRecipe] {
        self.custom_recipes.records()
    }

    /// Per-collection load outcome in request order
    pub fn status(&self) -> Vec<CollectionStatus> {
        vec![
            CollectionStatus {
                collection: Collection::Users,
                state: self.users.state(),
            },
            CollectionStatus {
                collection: Collection::Favorites,
                state: self.favorites.state(),
            },
            CollectionStatus {
                collection: Collection::MealPlans,
                state: self.meal_plans.state(),
            },
            CollectionStatus {
                collection: Collection::Reviews,
                state: self.reviews.state(),
            },
            CollectionStatus {
                collection: Collection::CustomRecipes,
                state: self.custom_recipes.state(),
            },
        ]
    }
}

/// Progress of a running load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadProgress {
    /// One collection finished, successfully or not
    Collection {
        collection: Collection,
        state: CollectionState,
        completed: usize,
        total: usize,
    },
    /// Every collection has finished; sent exactly once, last
    Complete { loaded: usize, failed: usize },
}

/// Drop records that decoded but break the input contract, logging each one
pub fn ingest<R: Record>(records: Vec<R>) -> CollectionLoad<R> {
    let total = records.len();
    let mut rejected = 0;
    let records: Vec<R> = records
        .into_iter()
        .filter(|record| match record.check() {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejecting record: {}", e);
                rejected += 1;
                false
            }
        })
        .collect();

    if rejected > 0 {
        warn!(
            collection = %R::COLLECTION,
            "Excluded {} of {} record(s) at ingestion", rejected, total
        );
    }

    CollectionLoad::Loaded { records, rejected }
}

/// Issues the five fetches and joins them into a [`DataSnapshot`]
pub struct DataLoader<'a, S: CollectionSource + ?Sized> {
    source: &'a S,
    progress_tx: Option<mpsc::UnboundedSender<LoadProgress>>,
}

impl<'a, S: CollectionSource + ?Sized> DataLoader<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            progress_tx: None,
        }
    }

    /// Report per-collection progress on the given channel
    pub fn with_progress(mut self, progress_tx: mpsc::UnboundedSender<LoadProgress>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    fn send_progress(&self, progress: LoadProgress) {
        if let Some(ref tx) = self.progress_tx {
            // a dropped receiver only means nobody is watching
            let _ = tx.send(progress);
        }
    }

    /// Await one fetch, run ingestion on it and report its completion
    async fn track<R, F>(&self, fetch: F, completed: &AtomicUsize) -> CollectionLoad<R>
    where
        R: Record,
        F: Future<Output = Result<Vec<R>>>,
    {
        let collection = R::COLLECTION;
        let load = match fetch.await {
            Ok(records) => {
                debug!(%collection, "Fetched {} record(s)", records.len());
                ingest(records)
            }
            Err(e) => {
                error!(%collection, "Failed to load collection: {}", e);
                CollectionLoad::Failed(e.to_string())
            }
        };

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.send_progress(LoadProgress::Collection {
            collection,
            state: load.state(),
            completed: done,
            total: Collection::ALL.len(),
        });

        load
    }

    /// Load all five collections concurrently and wait for every one of them
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> DataSnapshot {
        let completed = AtomicUsize::new(0);

        let (users, favorites, meal_plans, reviews, custom_recipes) = tokio::join!(
            self.track(self.source.fetch_all_users(), &completed),
            self.track(self.source.fetch_all_favorites(), &completed),
            self.track(self.source.fetch_all_meal_plans(), &completed),
            self.track(self.source.fetch_all_reviews(), &completed),
            self.track(self.source.fetch_all_custom_recipes(), &completed),
        );

        let snapshot = DataSnapshot {
            users,
            favorites,
            meal_plans,
            reviews,
            custom_recipes,
        };

        let loaded = snapshot
            .status()
            .iter()
            .filter(|status| matches!(status.state, CollectionState::Loaded { .. }))
            .count();
        let failed = Collection::ALL.len() - loaded;

        if failed > 0 {
            warn!("{} of {} collection(s) failed to load", failed, Collection::ALL.len());
        } else {
            info!("All collections loaded");
        }
        self.send_progress(LoadProgress::Complete { loaded, failed });

        snapshot
    }
}
