//! Read-only listings for review and user moderation

use chrono::{DateTime, NaiveDate, Utc};
use mealdeck_common::{Review, User};
use serde::Serialize;
use std::cmp::Reverse;

/// Search and rating filter over reviews
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    /// Case-insensitive substring of reviewer name or comment
    pub search: Option<String>,
    /// Exact star rating
    pub rating: Option<u8>,
}

/// Review date as a sortable instant; accepts RFC 3339 and plain dates
fn review_instant(review: &Review) -> Option<DateTime<Utc>> {
    let raw = review.date.as_deref()?.trim();

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Whether a single review passes the filter
    pub fn matches(&self, review: &Review) -> bool {
        if let Some(rating) = self.rating {
            if review.rating != rating {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                review
                    .user_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&term))
                    || review.comment.to_lowercase().contains(&term)
            }
        }
    }

    /// Matching reviews, newest first; undated reviews go last in input order
    pub fn apply<'a>(&self, reviews: &'a [Review]) -> Vec<&'a Review> {
        let mut matching: Vec<&Review> = reviews.iter().filter(|r| self.matches(r)).collect();
        // None sorts below Some, so Reverse puts it last
        matching.sort_by_key(|review| Reverse(review_instant(review)));
        matching
    }
}

/// Number of reviews with exactly `rating` stars
pub fn count_by_rating(reviews: &[Review], rating: u8) -> usize {
    reviews.iter().filter(|review| review.rating == rating).count()
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually returned
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out one page; `page` is clamped to the available range
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// Users whose name or email contains `query`, ignoring case
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return users.iter().collect();
    }

    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&query)
                || user
                    .email
                    .as_deref()
                    .is_some_and(|email| email.to_lowercase().contains(&query))
        })
        .collect()
}
