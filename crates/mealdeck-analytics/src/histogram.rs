//! Rating distribution over the five star buckets

use crate::aggregator::DataAggregator;
use crate::loader::DataSnapshot;
use crate::types::RatingDistribution;
use mealdeck_common::{Result, MAX_RATING, MIN_RATING};
use tracing::{debug, instrument, warn};

/// Buckets reviews by exact star rating
#[derive(Debug, Default)]
pub struct RatingHistogramAggregator;

impl RatingHistogramAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl DataAggregator for RatingHistogramAggregator {
    type Output = RatingDistribution;
    const SECTION: &'static str = "rating_distribution";

    #[instrument(skip(self, snapshot))]
    fn aggregate(&self, snapshot: &DataSnapshot) -> Result<RatingDistribution> {
        let mut counts = [0usize; 5];
        let mut ignored = 0;

        for review in snapshot.reviews() {
            if (MIN_RATING..=MAX_RATING).contains(&review.rating) {
                counts[usize::from(review.rating - MIN_RATING)] += 1;
            } else {
                // ingestion rejects these; only hand-built snapshots get here
                ignored += 1;
            }
        }

        if ignored > 0 {
            warn!("Ignored {} review(s) with a rating outside the star buckets", ignored);
        }

        let distribution = RatingDistribution::from_counts(counts);
        debug!("Bucketed {} review(s)", distribution.total_reviews);
        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealdeck_common::test_utils::review;

    fn histogram(ratings: &[u8]) -> RatingDistribution {
        let reviews = ratings.iter().map(|&r| review(1, 1, r)).collect();
        let snapshot = DataSnapshot::from_records(vec![], vec![], vec![], reviews, vec![]);
        RatingHistogramAggregator::new().aggregate(&snapshot).unwrap()
    }

    #[test]
    fn test_percentages() {
        let distribution = histogram(&[5, 5, 3]);
        assert_eq!(distribution.total_reviews, 3);
        assert_eq!(distribution.count(5), 2);
        assert!((distribution.percentage(5) - 200.0 / 3.0).abs() < 1e-9);
        assert!((distribution.percentage(3) - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(distribution.percentage(4), 0.0);
        assert_eq!(distribution.percentage(1), 0.0);
    }

    #[test]
    fn test_no_reviews() {
        let distribution = histogram(&[]);
        assert!(distribution.is_empty());
        assert!(distribution.buckets.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }

    #[test]
    fn test_out_of_range_ratings_ignored() {
        let distribution = histogram(&[0, 4, 9]);
        assert_eq!(distribution.total_reviews, 1);
        assert_eq!(distribution.percentage(4), 100.0);
    }
}
