use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::recipe::{
    IngredientAmount, NewRecipe, Recipe, RecipeIngredient, RecipeListQuery, UpdateRecipe,
};
use crate::domain::relation::RelationKind;
use crate::domain::tag::Tag;
use crate::domain::user::{User, Viewer};
use crate::forms::recipes::{CreateRecipeForm, UpdateRecipeForm};
use crate::media::ImageStore;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{
    IngredientReader, RecipeReader, RecipeWriter, RelationReader, RepositoryError,
    SubscriptionReader, TagReader, UserReader,
};
use crate::services::{FieldError, ServiceError, ServiceResult};
use crate::short_code::{CodeSource, MAX_ATTEMPTS};

/// Author profile as seen by a particular viewer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorView {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_subscribed: bool,
}

impl AuthorView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            is_subscribed,
        }
    }
}

/// Full recipe representation with viewer-relative flags.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i32,
    pub author: AuthorView,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: NaiveDateTime,
}

/// Minified recipe used in relation responses and author previews.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Filters accepted by the recipe listing.
///
/// `is_favorited`/`is_in_shopping_cart` use `1`/`0` and are ignored for
/// anonymous viewers.
#[derive(Debug, Default)]
pub struct RecipesQuery {
    pub author: Option<i32>,
    /// Slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: Option<u8>,
    pub is_in_shopping_cart: Option<u8>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Loads a single recipe; anonymous viewers see every flag as `false`.
pub fn get_recipe<R>(repo: &R, viewer: Viewer, recipe_id: i32) -> ServiceResult<RecipeView>
where
    R: RecipeReader + UserReader + SubscriptionReader + RelationReader + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    let mut views = build_views(repo, viewer, vec![recipe])?;
    views
        .pop()
        .ok_or_else(|| ServiceError::Internal("recipe view was not built".to_string()))
}

/// Lists recipes newest first with the requested filters.
pub fn list_recipes<R>(
    repo: &R,
    viewer: Viewer,
    query: RecipesQuery,
) -> ServiceResult<Paginated<RecipeView>>
where
    R: RecipeReader + UserReader + SubscriptionReader + RelationReader + ?Sized,
{
    let RecipesQuery {
        author,
        tags,
        is_favorited,
        is_in_shopping_cart,
        page,
        limit,
    } = query;

    let Pagination { page, per_page } = Pagination::from_params(page, limit)?;

    let mut list_query = RecipeListQuery::new().paginate(page, per_page);

    if let Some(author_id) = author {
        list_query = list_query.author(author_id);
    }

    let slugs: Vec<String> = tags
        .into_iter()
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
        .collect();
    if !slugs.is_empty() {
        list_query = list_query.tags(slugs);
    }

    if let Some(user_id) = viewer.user_id() {
        if is_favorited == Some(1) {
            list_query = list_query.favorited_by(user_id);
        }
        if is_in_shopping_cart == Some(1) {
            list_query = list_query.in_cart_of(user_id);
        }
    }

    let (total, recipes) = repo.list_recipes(list_query)?;
    let views = build_views(repo, viewer, recipes)?;

    Ok(Paginated::new(views, page, per_page, total))
}

/// Publishes a recipe: validates the composition, stores the image, then
/// writes the aggregate with a freshly drawn short code.
pub fn create_recipe<R>(
    repo: &R,
    images: &dyn ImageStore,
    codes: &dyn CodeSource,
    viewer: Viewer,
    form: CreateRecipeForm,
) -> ServiceResult<RecipeView>
where
    R: RecipeReader
        + RecipeWriter
        + TagReader
        + IngredientReader
        + UserReader
        + SubscriptionReader
        + RelationReader
        + ?Sized,
{
    let author_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let draft = form.into_draft()?;
    ensure_catalog_entries(repo, Some(&draft.tag_ids), Some(&draft.ingredients))?;

    let image = images.store(&draft.image).map_err(|err| {
        log::error!("Failed to store recipe image: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let new_recipe = NewRecipe {
        author_id,
        name: draft.name,
        text: draft.text,
        cooking_time: draft.cooking_time,
        image: image.clone(),
        tag_ids: draft.tag_ids,
        ingredients: draft.ingredients,
    };

    let recipe = match insert_with_short_code(repo, codes, &new_recipe) {
        Ok(recipe) => recipe,
        Err(err) => {
            discard_image(images, &image);
            return Err(err);
        }
    };

    get_recipe(repo, viewer, recipe.id)
}

/// Applies a patch from the recipe's author. Tags and ingredient lines are
/// replaced wholesale when present.
pub fn update_recipe<R>(
    repo: &R,
    images: &dyn ImageStore,
    viewer: Viewer,
    recipe_id: i32,
    form: UpdateRecipeForm,
) -> ServiceResult<RecipeView>
where
    R: RecipeReader
        + RecipeWriter
        + TagReader
        + IngredientReader
        + UserReader
        + SubscriptionReader
        + RelationReader
        + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let existing = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;
    if !existing.is_authored_by(user_id) {
        return Err(ServiceError::PermissionDenied);
    }

    let patch = form.into_patch()?;
    ensure_catalog_entries(repo, patch.tag_ids.as_deref(), patch.ingredients.as_deref())?;

    let new_image = match &patch.image {
        Some(upload) => Some(images.store(upload).map_err(|err| {
            log::error!("Failed to store recipe image: {err}");
            ServiceError::Internal(err.to_string())
        })?),
        None => None,
    };

    let mut updates = UpdateRecipe::new();
    updates.name = patch.name;
    updates.text = patch.text;
    updates.cooking_time = patch.cooking_time;
    updates.image = new_image.clone();
    updates.tag_ids = patch.tag_ids;
    updates.ingredients = patch.ingredients;

    if let Err(err) = repo.update_recipe(recipe_id, &updates) {
        if let Some(image) = &new_image {
            discard_image(images, image);
        }
        return Err(ServiceError::from(err));
    }

    if new_image.is_some() {
        discard_image(images, &existing.image);
    }

    get_recipe(repo, viewer, recipe_id)
}

/// Deletes a recipe owned by the viewer together with its lines and relations.
pub fn delete_recipe<R>(
    repo: &R,
    images: &dyn ImageStore,
    viewer: Viewer,
    recipe_id: i32,
) -> ServiceResult<()>
where
    R: RecipeReader + RecipeWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let existing = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;
    if !existing.is_authored_by(user_id) {
        return Err(ServiceError::PermissionDenied);
    }

    repo.delete_recipe(recipe_id)?;
    discard_image(images, &existing.image);

    Ok(())
}

/// Draws short code candidates until one is accepted by the store.
fn insert_with_short_code<R>(
    repo: &R,
    codes: &dyn CodeSource,
    new_recipe: &NewRecipe,
) -> ServiceResult<Recipe>
where
    R: RecipeReader + RecipeWriter + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let code = codes.next_code();

        if repo.short_code_exists(&code)? {
            log::warn!("Short code {code} already assigned (attempt {attempt}/{MAX_ATTEMPTS})");
            continue;
        }

        match repo.create_recipe(new_recipe, &code) {
            Ok(recipe) => return Ok(recipe),
            Err(RepositoryError::ShortCodeTaken) => {
                log::warn!(
                    "Short code {code} taken concurrently (attempt {attempt}/{MAX_ATTEMPTS})"
                );
            }
            Err(err) => return Err(ServiceError::from(err)),
        }
    }

    log::error!("Short code space exhausted after {MAX_ATTEMPTS} attempts");
    Err(ServiceError::ShortCodeExhausted)
}

/// Every referenced tag and ingredient must exist in the catalog.
fn ensure_catalog_entries<R>(
    repo: &R,
    tag_ids: Option<&[i32]>,
    ingredients: Option<&[IngredientAmount]>,
) -> ServiceResult<()>
where
    R: TagReader + IngredientReader + ?Sized,
{
    let mut errors = Vec::new();

    if let Some(tag_ids) = tag_ids {
        let known: HashSet<i32> = repo
            .list_tags_by_ids(tag_ids)?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        for tag_id in tag_ids.iter().filter(|id| !known.contains(id)) {
            errors.push(FieldError::new("tags", format!("unknown tag id {tag_id}")));
        }
    }

    if let Some(lines) = ingredients {
        let ids: Vec<i32> = lines.iter().map(|line| line.ingredient_id).collect();
        let known: HashSet<i32> = repo
            .list_ingredients_by_ids(&ids)?
            .into_iter()
            .map(|ingredient| ingredient.id)
            .collect();
        for (index, line) in lines.iter().enumerate() {
            if !known.contains(&line.ingredient_id) {
                errors.push(FieldError::new(
                    format!("ingredients[{index}].id"),
                    format!("unknown ingredient id {}", line.ingredient_id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors))
    }
}

/// Attach author profiles and relation flags relative to `viewer`.
fn build_views<R>(
    repo: &R,
    viewer: Viewer,
    recipes: Vec<Recipe>,
) -> ServiceResult<Vec<RecipeView>>
where
    R: UserReader + SubscriptionReader + RelationReader + ?Sized,
{
    let mut author_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut authors: HashMap<i32, AuthorView> = HashMap::with_capacity(author_ids.len());
    for user in repo.list_users_by_ids(&author_ids)? {
        let is_subscribed = match viewer.user_id() {
            Some(viewer_id) if viewer_id != user.id => repo.is_subscribed(viewer_id, user.id)?,
            _ => false,
        };
        authors.insert(user.id, AuthorView::new(user, is_subscribed));
    }

    recipes
        .into_iter()
        .map(|recipe| -> ServiceResult<RecipeView> {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!("author {} of recipe is missing", recipe.author_id))
            })?;

            let kinds = match viewer.user_id() {
                Some(viewer_id) => repo.list_relation_kinds(viewer_id, recipe.id)?,
                None => Vec::new(),
            };

            Ok(RecipeView {
                id: recipe.id,
                author,
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                image: recipe.image,
                tags: recipe.tags,
                ingredients: recipe.ingredients,
                is_favorited: kinds.contains(&RelationKind::Favorite),
                is_in_shopping_cart: kinds.contains(&RelationKind::Cart),
                created_at: recipe.created_at,
            })
        })
        .collect()
}

pub(crate) fn discard_image(images: &dyn ImageStore, reference: &str) {
    if let Err(err) = images.remove(reference) {
        log::warn!("Failed to remove image {reference}: {err}");
    }
}
