//! Plain-text rendering of the dashboard and the moderation listings

use mealdeck_analytics::{
    CollectionState, DashboardReport, Page, RatingDistribution, RecipeStat, UserActivity,
};
use mealdeck_common::{Review, User, MAX_RATING, MIN_RATING};
use std::fmt::Write;

pub const NO_FAVORITES: &str = "No favorites yet";
pub const NO_REVIEWS: &str = "No reviews yet";
pub const NO_RATINGS: &str = "No ratings yet";
pub const NO_ACTIVITY: &str = "No user activity yet";

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.len()));
}

fn recipe_rows(out: &mut String, stats: &[RecipeStat], unit: &str, placeholder: &str) {
    if stats.is_empty() {
        let _ = writeln!(out, "  {}", placeholder);
        return;
    }

    for (rank, stat) in stats.iter().enumerate() {
        let _ = write!(out, "  {}. {} ({} {})", rank + 1, stat.title, stat.count, unit);
        if let Some(average) = stat.display_average() {
            let _ = write!(out, "  avg {}", average);
        }
        out.push('\n');
    }
}

fn user_rows(out: &mut String, users: &[UserActivity]) {
    if users.is_empty() {
        let _ = writeln!(out, "  {}", NO_ACTIVITY);
        return;
    }

    for (rank, entry) in users.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}: {} total ({} favorites, {} reviews, {} meal plans)",
            rank + 1,
            entry.name,
            entry.total,
            entry.favorite_count,
            entry.review_count,
            entry.meal_plan_count
        );
    }
}

fn distribution_rows(out: &mut String, distribution: &RatingDistribution) {
    if distribution.is_empty() {
        let _ = writeln!(out, "  {}", NO_RATINGS);
        return;
    }

    for bucket in &distribution.buckets {
        let stars = "*".repeat(usize::from(bucket.rating));
        let _ = writeln!(
            out,
            "  {:<5} {:>5.1}% ({})",
            stars, bucket.percentage, bucket.count
        );
    }
}

/// Render the full dashboard
pub fn render_dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();
    let overview = &report.overview;

    let _ = writeln!(
        out,
        "Recipe analytics ({})",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for status in report.failed_collections() {
        if let CollectionState::Failed { reason } = &status.state {
            let _ = writeln!(out, "! {} could not be loaded: {}", status.collection, reason);
        }
    }

    heading(&mut out, "Overview");
    let _ = writeln!(
        out,
        "  Users: {} ({} admins, {} regular)",
        overview.total_users, overview.admin_count, overview.regular_user_count
    );
    let _ = writeln!(
        out,
        "  Favorites: {} across {} recipes, {} per user",
        overview.total_favorites, overview.unique_recipes, overview.avg_favorites_per_user
    );
    let _ = writeln!(
        out,
        "  Meal plans: {}, {} per user",
        overview.total_meal_plans, overview.avg_meal_plans_per_user
    );
    let _ = writeln!(
        out,
        "  Reviews: {}, average rating {}",
        overview.total_reviews, overview.average_rating
    );
    let _ = writeln!(out, "  Custom recipes: {}", overview.total_custom_recipes);

    heading(&mut out, "Most favorited");
    recipe_rows(&mut out, &report.most_favorited, "favorites", NO_FAVORITES);

    heading(&mut out, "Most reviewed");
    recipe_rows(&mut out, &report.most_reviewed, "reviews", NO_REVIEWS);

    heading(&mut out, "Highest rated");
    recipe_rows(&mut out, &report.highest_rated, "reviews", NO_RATINGS);

    heading(&mut out, "Most active users");
    user_rows(&mut out, &report.top_users);

    heading(&mut out, "Rating distribution");
    distribution_rows(&mut out, &report.rating_distribution);

    heading(&mut out, "Participation");
    let rates = &report.rates;
    let _ = writeln!(out, "  Engagement:       {}%", rates.engagement.percent);
    let _ = writeln!(out, "  Content creation: {}%", rates.content_creation.percent);
    let _ = writeln!(out, "  Meal planning:    {}%", rates.planner.percent);

    out
}

/// Render one page of reviews with the per-rating counts of all reviews
pub fn render_reviews(page: &Page<&Review>, all: &[Review]) -> String {
    let mut out = String::new();

    let counts: Vec<String> = (MIN_RATING..=MAX_RATING)
        .rev()
        .map(|rating| {
            format!(
                "{}*: {}",
                rating,
                mealdeck_analytics::count_by_rating(all, rating)
            )
        })
        .collect();
    let _ = writeln!(out, "{}", counts.join("  "));

    if page.items.is_empty() {
        let _ = writeln!(out, "{}", NO_REVIEWS);
        return out;
    }

    for review in &page.items {
        let _ = writeln!(
            out,
            "[{}] {} on recipe {}: {}* {}",
            review.date.as_deref().unwrap_or("undated"),
            review.user_name.as_deref().unwrap_or("anonymous"),
            review.recipe_id,
            review.rating,
            review.comment
        );
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} reviews)",
        page.page,
        page.total_pages.max(1),
        page.total_items
    );

    out
}

/// Render a user listing
pub fn render_users(users: &[&User]) -> String {
    let mut out = String::new();

    if users.is_empty() {
        let _ = writeln!(out, "No users found");
        return out;
    }

    for user in users {
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:<32} {}",
            user.id,
            user.name,
            user.email.as_deref().unwrap_or("-"),
            if user.is_admin { "admin" } else { "user" }
        );
    }
    let _ = writeln!(out, "{} user(s)", users.len());

    out
}
