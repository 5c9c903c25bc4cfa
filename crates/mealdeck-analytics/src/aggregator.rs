//! Aggregation trait and shared ranking helpers

use crate::loader::DataSnapshot;
use mealdeck_common::Result;
use std::cmp::Ordering;
use tracing::error;

/// Default length of every ranking
pub const DEFAULT_TOP_N: usize = 5;

/// A pure reduction of a snapshot into one dashboard section
pub trait DataAggregator {
    /// Section produced; its `Default` is the empty state
    type Output: Default;

    /// Section name for logs
    const SECTION: &'static str;

    /// Reduce the snapshot
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<Self::Output>;

    /// Reduce the snapshot, logging a failure and falling back to the empty section
    fn aggregate_or_default(&self, snapshot: &DataSnapshot) -> Self::Output {
        self.aggregate(snapshot).unwrap_or_else(|e| {
            error!(section = Self::SECTION, "Aggregation failed, showing empty section: {}", e);
            Self::Output::default()
        })
    }
}

/// Stable sort by `compare`, then keep the first `limit` items.
///
/// Equal items keep their input order, which for tallies built in arrival
/// order means first appearance wins the tie.
pub fn rank_top<T, F>(mut items: Vec<T>, limit: usize, compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
    items.truncate(limit);
    items
}
