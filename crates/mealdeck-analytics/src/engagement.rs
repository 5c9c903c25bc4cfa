//! Per-user activity ranking

use crate::aggregator::{rank_top, DataAggregator, DEFAULT_TOP_N};
use crate::loader::DataSnapshot;
use crate::types::UserActivity;
use indexmap::IndexMap;
use mealdeck_common::{Collection, MealdeckError, OrphanPolicy, Owned, Result, User, UserId};
use tracing::{debug, instrument};

/// Which counter a record increments
#[derive(Debug, Clone, Copy)]
enum Activity {
    Favorite,
    Review,
    MealPlan,
}

/// Activity of every known user, in user-list order.
///
/// A user listed twice keeps the first entry.
fn initial_activity(users: &[User]) -> IndexMap<UserId, UserActivity> {
    let mut activity = IndexMap::with_capacity(users.len());
    for user in users {
        activity
            .entry(user.id)
            .or_insert_with(|| UserActivity::new(user.id, user.name.clone()));
    }
    activity
}

/// Ranks users by their combined favorites, reviews and meal plans
#[derive(Debug)]
pub struct EngagementAggregator {
    /// Maximum number of users to return
    pub limit: usize,
    /// Handling of records owned by unknown users
    pub orphan_policy: OrphanPolicy,
}

impl EngagementAggregator {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_TOP_N,
            orphan_policy: OrphanPolicy::Drop,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::new()
        }
    }

    pub fn with_orphan_policy(mut self, orphan_policy: OrphanPolicy) -> Self {
        self.orphan_policy = orphan_policy;
        self
    }

    /// Credit one record kind to its owners
    fn credit<R: Owned>(
        &self,
        activity: &mut IndexMap<UserId, UserActivity>,
        records: &[R],
        collection: Collection,
        kind: Activity,
    ) -> Result<()> {
        let mut dropped = 0;

        for record in records {
            let owner = record.owner();
            match activity.get_mut(&owner) {
                Some(entry) => match kind {
                    Activity::Favorite => entry.favorite_count += 1,
                    Activity::Review => entry.review_count += 1,
                    Activity::MealPlan => entry.meal_plan_count += 1,
                },
                None => match self.orphan_policy {
                    OrphanPolicy::Drop => dropped += 1,
                    OrphanPolicy::Reject => {
                        return Err(MealdeckError::orphaned(collection.path(), owner));
                    }
                },
            }
        }

        if dropped > 0 {
            debug!(%collection, "Dropped {} record(s) owned by unknown users", dropped);
        }
        Ok(())
    }

    /// Activity of every known user, unranked
    pub fn activity(&self, snapshot: &DataSnapshot) -> Result<Vec<UserActivity>> {
        let mut activity = initial_activity(snapshot.users());

        self.credit(
            &mut activity,
            snapshot.favorites(),
            Collection::Favorites,
            Activity::Favorite,
        )?;
        self.credit(
            &mut activity,
            snapshot.reviews(),
            Collection::Reviews,
            Activity::Review,
        )?;
        self.credit(
            &mut activity,
            snapshot.meal_plans(),
            Collection::MealPlans,
            Activity::MealPlan,
        )?;

        Ok(activity
            .into_values()
            .map(|mut entry| {
                entry.refresh_total();
                entry
            })
            .collect())
    }
}

impl Default for EngagementAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAggregator for EngagementAggregator {
    type Output = Vec<UserActivity>;
    const SECTION: &'static str = "top_users";

    #[instrument(skip(self, snapshot), fields(policy = ?self.orphan_policy))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<Vec<UserActivity>> {
        let activity = self.activity(snapshot)?;
        let result = rank_top(activity, self.limit, |a, b| b.total.cmp(&a.total));

        debug!("Aggregated {} top user(s)", result.len());
        Ok(result)
    }
}
