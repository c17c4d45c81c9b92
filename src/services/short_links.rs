use serde::Serialize;

use crate::repository::RecipeReader;
use crate::services::{ServiceError, ServiceResult};
use crate::short_code::is_well_formed;

/// Shareable link to a recipe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShortLink {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Builds `{host}/s/{code}/` for an existing recipe.
pub fn share_link<R>(repo: &R, recipe_id: i32, host: &str) -> ServiceResult<ShortLink>
where
    R: RecipeReader + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    let host = host.trim_end_matches('/');
    Ok(ShortLink {
        short_link: format!("{host}/s/{}/", recipe.short_code),
    })
}

/// Resolves a short code to the recipe it was assigned to.
pub fn resolve_short_code<R>(repo: &R, code: &str) -> ServiceResult<i32>
where
    R: RecipeReader + ?Sized,
{
    if !is_well_formed(code) {
        return Err(ServiceError::NotFound);
    }

    repo.get_recipe_id_by_short_code(code)?
        .ok_or(ServiceError::NotFound)
}
