use crate::db::{CancellationToken, DbConnection, DbPool};
use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery, NewIngredient, UpdateIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    relation::{NewRelation, RelationKind, UserRecipeRelation},
    shopping_list::CartLine,
    subscription::{FollowedAuthorsQuery, NewSubscription, Subscription},
    tag::{NewTag, Tag, UpdateTag},
    user::{NewUser, User},
};

pub mod errors;
pub mod ingredient;
pub mod recipe;
pub mod relation;
pub mod subscription;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    cancellation: Option<CancellationToken>,
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            cancellation: None,
        }
    }

    /// Bind a request-scoped cancellation token. Storage calls made through
    /// the returned handle fail with [`RepositoryError::Cancelled`] once the
    /// token fires; an open transaction is rolled back.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            pool: self.pool.clone(),
            cancellation: Some(token),
        }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        self.ensure_active()?;
        Ok(self.pool.get()?)
    }

    fn ensure_active(&self) -> RepositoryResult<()> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(RepositoryError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Read-only operations over the ingredient catalog.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    fn list_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
}

/// Write operations over the ingredient catalog.
pub trait IngredientWriter {
    fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
    fn update_ingredient(
        &self,
        ingredient_id: i32,
        updates: &UpdateIngredient,
    ) -> RepositoryResult<Ingredient>;
    /// Fails with [`RepositoryError::ReferenceViolation`] while a recipe uses it.
    fn delete_ingredient(&self, ingredient_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tags.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn get_tag_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    fn list_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tags.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    fn update_tag(&self, tag_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
    /// Fails with [`RepositoryError::ReferenceViolation`] while a recipe uses it.
    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over recipe aggregates.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
    fn get_recipe_id_by_short_code(&self, code: &str) -> RepositoryResult<Option<i32>>;
    fn short_code_exists(&self, code: &str) -> RepositoryResult<bool>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
}

/// Write operations over recipe aggregates. Every call is one transaction.
pub trait RecipeWriter {
    /// Insert the recipe row, its tag links and ingredient lines together.
    /// Fails with [`RepositoryError::ShortCodeTaken`] when `short_code` collides.
    fn create_recipe(&self, new_recipe: &NewRecipe, short_code: &str) -> RepositoryResult<Recipe>;
    fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
    /// Delete the recipe with its lines, tag links and relation records.
    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over favorite/cart membership.
pub trait RelationReader {
    fn has_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        kind: RelationKind,
    ) -> RepositoryResult<bool>;
    fn list_relation_kinds(&self, user_id: i32, recipe_id: i32)
    -> RepositoryResult<Vec<RelationKind>>;
    /// Ingredient lines of every recipe in the user's cart.
    fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>>;
}

/// Write operations over favorite/cart membership.
pub trait RelationWriter {
    /// Fails with [`RepositoryError::Conflict`] when the relation already exists.
    fn create_relation(&self, new_relation: &NewRelation)
    -> RepositoryResult<UserRecipeRelation>;
    /// Fails with [`RepositoryError::NotFound`] when nothing was removed.
    fn delete_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        kind: RelationKind,
    ) -> RepositoryResult<()>;
}

/// Read-only operations over follow edges.
pub trait SubscriptionReader {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
    fn list_followed_authors(
        &self,
        query: FollowedAuthorsQuery,
    ) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over follow edges.
pub trait SubscriptionWriter {
    fn create_subscription(
        &self,
        new_subscription: &NewSubscription,
    ) -> RepositoryResult<Subscription>;
    fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn list_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    /// Replace (or clear with `None`) the stored avatar reference.
    fn set_avatar(&self, user_id: i32, avatar: Option<String>) -> RepositoryResult<User>;
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
}
