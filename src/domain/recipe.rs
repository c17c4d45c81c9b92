use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::tag::Tag;
use crate::pagination::Pagination;

/// A recipe together with its owned composition: tags and ingredient lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique identifier of the recipe.
    pub id: i32,
    /// Identifier of the user who published the recipe and alone may change it.
    pub author_id: i32,
    pub name: String,
    pub text: String,
    /// Cooking time in minutes, at least one.
    pub cooking_time: i32,
    /// Reference returned by the image store.
    pub image: String,
    /// Public short code, assigned once at creation.
    pub short_code: String,
    /// Tags ordered by name.
    pub tags: Vec<Tag>,
    /// Ingredient lines ordered by ingredient name.
    pub ingredients: Vec<RecipeIngredient>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Recipe {
    pub fn is_authored_by(&self, user_id: i32) -> bool {
        self.author_id == user_id
    }
}

/// Ingredient line of a recipe, joined with the live catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RecipeIngredient {
    #[serde(rename = "id")]
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Requested quantity of a catalog ingredient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

impl IngredientAmount {
    pub fn new(ingredient_id: i32, amount: i32) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Complete composition of a recipe to be published in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Patch applied to an existing recipe.
///
/// `tag_ids` and `ingredients`, when present, replace the previous sets
/// wholesale; `None` keeps them untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecipe {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateRecipe {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateRecipe {
    pub fn new() -> Self {
        Self {
            name: None,
            text: None,
            cooking_time: None,
            image: None,
            tag_ids: None,
            ingredients: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn cooking_time(mut self, minutes: i32) -> Self {
        self.cooking_time = Some(minutes);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn tag_ids(mut self, tag_ids: Vec<i32>) -> Self {
        self.tag_ids = Some(tag_ids);
        self
    }

    pub fn ingredients(mut self, ingredients: Vec<IngredientAmount>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }
}

/// Query definition used to list recipes, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    /// Only recipes published by this author.
    pub author_id: Option<i32>,
    /// Only recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Only recipes in this user's favorites.
    pub favorited_by: Option<i32>,
    /// Only recipes in this user's shopping cart.
    pub in_cart_of: Option<i32>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl RecipeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn tags<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    pub fn favorited_by(mut self, user_id: i32) -> Self {
        self.favorited_by = Some(user_id);
        self
    }

    pub fn in_cart_of(mut self, user_id: i32) -> Self {
        self.in_cart_of = Some(user_id);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
