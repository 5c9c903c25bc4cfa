//! Record models for the five data store collections
//!
//! These mirror the JSON documents the REST store holds. Only the fields the
//! admin tooling reads are modeled; anything else in a document is ignored.

use crate::error::{MealdeckError, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// The five collections held by the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Users,
    Favorites,
    MealPlans,
    Reviews,
    CustomRecipes,
}

impl Collection {
    /// All collections, in the order they are requested
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Favorites,
        Collection::MealPlans,
        Collection::Reviews,
        Collection::CustomRecipes,
    ];

    /// Path segment of the collection on the data store
    pub fn path(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Favorites => "favorites",
            Collection::MealPlans => "mealPlans",
            Collection::Reviews => "reviews",
            Collection::CustomRecipes => "customRecipes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Accepts `7` and `"7"` alike; the store is not consistent about id types.
fn deserialize_numeric_id<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumericIdVisitor;

    impl<'de> de::Visitor<'de> for NumericIdVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a string holding one")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative id {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("id '{}' is not numeric", v)))
        }
    }

    deserializer.deserialize_any(NumericIdVisitor)
}

/// Identifier of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(pub u64);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_numeric_id(deserializer).map(UserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a recipe in the external recipe catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecipeId(pub u64);

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_numeric_id(deserializer).map(RecipeId)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned document key. Numeric or opaque string, kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordKey(pub String);

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(RecordKey(s)),
            serde_json::Value::Number(n) => Ok(RecordKey(n.to_string())),
            other => Err(de::Error::custom(format!("unsupported record key {}", other))),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record of one of the store collections.
pub trait Record: de::DeserializeOwned + Send + Sync + 'static {
    /// Collection this record type lives in
    const COLLECTION: Collection;

    /// Check the record against the input contract after decoding
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// A user-owned record, foreign-keyed to [`User::id`]
pub trait Owned {
    /// Owning user
    fn owner(&self) -> UserId;
}

/// User account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
}

/// A user's saved recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(default)]
    pub id: Option<RecordKey>,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Record for Favorite {
    const COLLECTION: Collection = Collection::Favorites;
}

impl Owned for Favorite {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// A saved weekly meal plan. Contents are not inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default)]
    pub id: Option<RecordKey>,
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub week: Option<String>,
}

impl Record for MealPlan {
    const COLLECTION: Collection = Collection::MealPlans;
}

impl Owned for MealPlan {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// Lowest rating a review may carry
pub const MIN_RATING: u8 = 1;
/// Highest rating a review may carry
pub const MAX_RATING: u8 = 5;

/// A rating and comment left on a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: Option<RecordKey>,
    pub recipe_id: RecipeId,
    pub user_id: UserId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Record for Review {
    const COLLECTION: Collection = Collection::Reviews;

    fn check(&self) -> Result<()> {
        if (MIN_RATING..=MAX_RATING).contains(&self.rating) {
            Ok(())
        } else {
            Err(MealdeckError::malformed(
                Self::COLLECTION.path(),
                format!(
                    "review of recipe {} by user {} has rating {} outside {}-{}",
                    self.recipe_id, self.user_id, self.rating, MIN_RATING, MAX_RATING
                ),
            ))
        }
    }
}

impl Owned for Review {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// A recipe authored by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecipe {
    #[serde(default)]
    pub id: Option<RecordKey>,
    pub user_id: UserId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl Record for CustomRecipe {
    const COLLECTION: Collection = Collection::CustomRecipes;
}

impl Owned for CustomRecipe {
    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// What to do with user-owned records whose owner is not a known user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Skip the record silently
    #[default]
    Drop,
    /// Fail the aggregation that met the record
    Reject,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = MealdeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            other => Err(MealdeckError::validation_field(
                format!("unknown orphan policy '{}', expected drop or reject", other),
                "orphan_policy",
            )),
        }
    }
}
