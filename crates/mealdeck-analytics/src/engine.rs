//! Dashboard engine: load barrier, then every aggregator exactly once

use crate::aggregator::{DataAggregator, DEFAULT_TOP_N};
use crate::engagement::EngagementAggregator;
use crate::histogram::RatingHistogramAggregator;
use crate::loader::{CollectionSource, DataLoader, DataSnapshot, LoadProgress};
use crate::overview::OverviewAggregator;
use crate::popularity::PopularityAggregator;
use crate::rates::RatesAggregator;
use crate::reviews::{HighestRatedAggregator, MostReviewedAggregator};
use crate::types::DashboardReport;
use chrono::{DateTime, Utc};
use mealdeck_common::OrphanPolicy;
use mealdeck_config::AnalyticsConfig;
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// Settings shared by the aggregators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Length of every ranking
    pub top_n: usize,
    pub orphan_policy: OrphanPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}

impl From<&AnalyticsConfig> for EngineSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            top_n: config.top_n,
            orphan_policy: config.orphan_policy,
        }
    }
}

/// Builds the admin dashboard from the five store collections
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: EngineSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Load every collection, then compute the report
    #[instrument(skip(self, source, progress_tx))]
    pub async fn run<S>(
        &self,
        source: &S,
        progress_tx: Option<mpsc::UnboundedSender<LoadProgress>>,
    ) -> DashboardReport
    where
        S: CollectionSource + ?Sized,
    {
        let mut loader = DataLoader::new(source);
        if let Some(tx) = progress_tx {
            loader = loader.with_progress(tx);
        }

        let snapshot = loader.load_all().await;
        self.compute(&snapshot)
    }

    /// Compute the report for a loaded snapshot, stamped now
    pub fn compute(&self, snapshot: &DataSnapshot) -> DashboardReport {
        self.compute_at(snapshot, Utc::now())
    }

    /// Compute the report for a loaded snapshot with a fixed timestamp.
    ///
    /// Same snapshot and timestamp always give an identical report.
    pub fn compute_at(&self, snapshot: &DataSnapshot, generated_at: DateTime<Utc>) -> DashboardReport {
        let top_n = self.settings.top_n;

        let report = DashboardReport {
            generated_at,
            overview: OverviewAggregator::new().aggregate_or_default(snapshot),
            most_favorited: PopularityAggregator::with_limit(top_n).aggregate_or_default(snapshot),
            most_reviewed: MostReviewedAggregator::with_limit(top_n).aggregate_or_default(snapshot),
            highest_rated: HighestRatedAggregator::with_limit(top_n).aggregate_or_default(snapshot),
            top_users: EngagementAggregator::with_limit(top_n)
                .with_orphan_policy(self.settings.orphan_policy)
                .aggregate_or_default(snapshot),
            rating_distribution: RatingHistogramAggregator::new().aggregate_or_default(snapshot),
            rates: RatesAggregator::new().aggregate_or_default(snapshot),
            load_status: snapshot.status(),
        };

        info!(
            users = report.overview.total_users,
            favorites = report.overview.total_favorites,
            reviews = report.overview.total_reviews,
            "Dashboard computed"
        );
        report
    }
}
