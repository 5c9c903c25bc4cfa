//! Participation rates over the user population
//!
//! Numerators are distinct user ids found in the owning collections; the
//! denominator is the size of the users collection.

use crate::aggregator::DataAggregator;
use crate::loader::DataSnapshot;
use crate::types::{EngagementRates, Rate};
use mealdeck_common::{Owned, Result, UserId};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Distinct owners of a set of records
fn owners<'a, R: Owned + 'a>(records: impl IntoIterator<Item = &'a R>) -> HashSet<UserId> {
    records.into_iter().map(|record| record.owner()).collect()
}

/// Computes engagement, content-creation and planner rates
#[derive(Debug, Default)]
pub struct RatesAggregator;

impl RatesAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator for RatesAggregator {
    type Output = EngagementRates;
    const SECTION: &'static str = "rates";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<EngagementRates> {
        let population = snapshot.users().len();

        let mut engaged = owners(snapshot.favorites());
        engaged.extend(owners(snapshot.reviews()));
        let creators = owners(snapshot.custom_recipes());
        let planners = owners(snapshot.meal_plans());

        let rates = EngagementRates {
            engagement: Rate::new(engaged.len(), population),
            content_creation: Rate::new(creators.len(), population),
            planner: Rate::new(planners.len(), population),
        };

        debug!(
            engagement = %rates.engagement.percent,
            content_creation = %rates.content_creation.percent,
            planner = %rates.planner.percent,
            "Computed participation rates over {} user(s)",
            population
        );
        Ok(rates)
    }
}
