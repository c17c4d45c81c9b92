use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which per-user list a recipe belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Favorite,
    Cart,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorite",
            RelationKind::Cart => "cart",
        }
    }

    /// Name of the list as shown to users.
    pub fn list_name(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::Cart => "shopping cart",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored or requested relation kind is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relation kind: {0}")]
pub struct UnknownRelationKind(pub String);

impl FromStr for RelationKind {
    type Err = UnknownRelationKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "favorite" => Ok(RelationKind::Favorite),
            // `shopping_cart` is the spelling used in public URLs.
            "cart" | "shopping_cart" => Ok(RelationKind::Cart),
            other => Err(UnknownRelationKind(other.to_string())),
        }
    }
}

/// Membership of a recipe in one of a user's lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecipeRelation {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub kind: RelationKind,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRelation {
    pub user_id: i32,
    pub recipe_id: i32,
    pub kind: RelationKind,
}

impl NewRelation {
    pub fn new(user_id: i32, recipe_id: i32, kind: RelationKind) -> Self {
        Self {
            user_id,
            recipe_id,
            kind,
        }
    }
}
