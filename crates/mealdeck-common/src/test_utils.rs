//! Record fixtures for unit and integration tests across the workspace.

use crate::models::{CustomRecipe, Favorite, MealPlan, RecipeId, Review, User, UserId};

/// A regular (non-admin) user
pub fn user(id: u64, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        is_admin: false,
    }
}

/// An administrator
pub fn admin(id: u64, name: &str) -> User {
    User {
        is_admin: true,
        ..user(id, name)
    }
}

/// A favorite of `recipe_id` saved by `user_id`
pub fn favorite(user_id: u64, recipe_id: u64, title: &str) -> Favorite {
    Favorite {
        id: None,
        user_id: UserId(user_id),
        recipe_id: RecipeId(recipe_id),
        title: title.to_string(),
        image: None,
    }
}

/// A review without comment or date
pub fn review(user_id: u64, recipe_id: u64, rating: u8) -> Review {
    Review {
        id: None,
        recipe_id: RecipeId(recipe_id),
        user_id: UserId(user_id),
        rating,
        comment: String::new(),
        date: None,
        user_name: None,
    }
}

/// A review with comment, author name and RFC 3339 date
pub fn dated_review(user_id: u64, user_name: &str, rating: u8, comment: &str, date: &str) -> Review {
    Review {
        comment: comment.to_string(),
        date: Some(date.to_string()),
        user_name: Some(user_name.to_string()),
        ..review(user_id, 1, rating)
    }
}

/// A meal plan owned by `user_id`
pub fn meal_plan(user_id: u64) -> MealPlan {
    MealPlan {
        id: None,
        user_id: UserId(user_id),
        name: Some("Weekly plan".to_string()),
        week: None,
    }
}

/// A custom recipe owned by `user_id`
pub fn custom_recipe(user_id: u64, title: &str) -> CustomRecipe {
    CustomRecipe {
        id: None,
        user_id: UserId(user_id),
        title: Some(title.to_string()),
        is_public: Some(true),
    }
}
