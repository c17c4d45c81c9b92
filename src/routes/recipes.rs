use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::relation::RelationKind;
use crate::forms::recipes::{CreateRecipeForm, UpdateRecipeForm};
use crate::media::FsImageStore;
use crate::repository::DieselRepository;
use crate::routes::{error_response, run, viewer};
use crate::services::recipes::{
    RecipesQuery, create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe,
};
use crate::services::relations::{add_relation, remove_relation};
use crate::services::shopping_list::shopping_list_document;
use crate::services::short_links::share_link;
use crate::services::{ServiceError, ServiceResult};
use crate::short_code::ShortCodeGenerator;

#[get("/api/recipes/")]
/// Paginated recipe listing.
///
/// Accepts `author`, repeated `tags`, `is_favorited`, `is_in_shopping_cart`,
/// `page` and `limit`.
pub async fn api_list_recipes(
    params: web::Query<Vec<(String, String)>>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let query = match recipes_query(params.into_inner()) {
        Ok(query) => query,
        Err(err) => return error_response(err),
    };

    match run(repo.get_ref(), move |repo| list_recipes(repo, viewer, query)).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[post("/api/recipes/")]
pub async fn api_create_recipe(
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
    codes: web::Data<ShortCodeGenerator>,
    form: web::Json<CreateRecipeForm>,
) -> impl Responder {
    let viewer = viewer(identity);
    let form = form.into_inner();

    let result = run(repo.get_ref(), move |repo| {
        create_recipe(repo, images.get_ref(), codes.get_ref(), viewer, form)
    })
    .await;

    match result {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => error_response(err),
    }
}

#[get("/api/recipes/download_shopping_cart/")]
/// Shopping list as a plain-text attachment.
pub async fn api_download_shopping_cart(
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);

    match run(repo.get_ref(), move |repo| shopping_list_document(repo, viewer)).await {
        Ok(document) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ))
            .body(document),
        Err(err) => error_response(err),
    }
}

#[get(r"/api/recipes/{recipe_id:\d+}/")]
pub async fn api_get_recipe(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let recipe_id = recipe_id.into_inner();

    match run(repo.get_ref(), move |repo| get_recipe(repo, viewer, recipe_id)).await {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response(err),
    }
}

#[patch(r"/api/recipes/{recipe_id:\d+}/")]
pub async fn api_update_recipe(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
    form: web::Json<UpdateRecipeForm>,
) -> impl Responder {
    let viewer = viewer(identity);
    let recipe_id = recipe_id.into_inner();
    let form = form.into_inner();

    let result = run(repo.get_ref(), move |repo| {
        update_recipe(repo, images.get_ref(), viewer, recipe_id, form)
    })
    .await;

    match result {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response(err),
    }
}

#[delete(r"/api/recipes/{recipe_id:\d+}/")]
pub async fn api_delete_recipe(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
    images: web::Data<FsImageStore>,
) -> impl Responder {
    let viewer = viewer(identity);
    let recipe_id = recipe_id.into_inner();

    let result = run(repo.get_ref(), move |repo| {
        delete_recipe(repo, images.get_ref(), viewer, recipe_id)
    })
    .await;

    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[post(r"/api/recipes/{recipe_id:\d+}/favorite/")]
pub async fn api_add_favorite(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    relation_added(&repo, identity, recipe_id.into_inner(), RelationKind::Favorite).await
}

#[delete(r"/api/recipes/{recipe_id:\d+}/favorite/")]
pub async fn api_remove_favorite(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    relation_removed(&repo, identity, recipe_id.into_inner(), RelationKind::Favorite).await
}

#[post(r"/api/recipes/{recipe_id:\d+}/shopping_cart/")]
pub async fn api_add_to_cart(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    relation_added(&repo, identity, recipe_id.into_inner(), RelationKind::Cart).await
}

#[delete(r"/api/recipes/{recipe_id:\d+}/shopping_cart/")]
pub async fn api_remove_from_cart(
    recipe_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    relation_removed(&repo, identity, recipe_id.into_inner(), RelationKind::Cart).await
}

#[get(r"/api/recipes/{recipe_id:\d+}/get-link/")]
pub async fn api_get_short_link(
    req: HttpRequest,
    recipe_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let recipe_id = recipe_id.into_inner();
    let host = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    match run(repo.get_ref(), move |repo| share_link(repo, recipe_id, &host)).await {
        Ok(link) => HttpResponse::Ok().json(link),
        Err(err) => error_response(err),
    }
}

async fn relation_added(
    repo: &DieselRepository,
    identity: Option<Identity>,
    recipe_id: i32,
    kind: RelationKind,
) -> HttpResponse {
    let viewer = viewer(identity);

    match run(repo, move |repo| add_relation(repo, viewer, recipe_id, kind)).await {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => error_response(err),
    }
}

async fn relation_removed(
    repo: &DieselRepository,
    identity: Option<Identity>,
    recipe_id: i32,
    kind: RelationKind,
) -> HttpResponse {
    let viewer = viewer(identity);

    match run(repo, move |repo| remove_relation(repo, viewer, recipe_id, kind)).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

/// Build listing filters from raw query pairs; `tags` may repeat.
fn recipes_query(pairs: Vec<(String, String)>) -> ServiceResult<RecipesQuery> {
    let mut query = RecipesQuery::default();

    for (key, value) in pairs {
        match key.as_str() {
            "tags" => query.tags.push(value),
            "author" => query.author = Some(parse_param(&key, &value)?),
            "is_favorited" => query.is_favorited = Some(parse_param(&key, &value)?),
            "is_in_shopping_cart" => query.is_in_shopping_cart = Some(parse_param(&key, &value)?),
            "page" => query.page = Some(parse_param(&key, &value)?),
            "limit" => query.limit = Some(parse_param(&key, &value)?),
            _ => {}
        }
    }

    Ok(query)
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> ServiceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ServiceError::invalid(key, format!("`{value}` is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn recipes_query_collects_repeated_tags() {
        let query = recipes_query(pairs(&[
            ("tags", "breakfast"),
            ("tags", "lunch"),
            ("author", "3"),
            ("is_favorited", "1"),
            ("limit", "10"),
            ("unknown", "x"),
        ]))
        .expect("expected query");

        assert_eq!(query.tags, vec!["breakfast", "lunch"]);
        assert_eq!(query.author, Some(3));
        assert_eq!(query.is_favorited, Some(1));
        assert_eq!(query.limit, Some(10));
        assert!(query.page.is_none());
    }

    #[test]
    fn recipes_query_rejects_non_numeric_page() {
        let result = recipes_query(pairs(&[("page", "two")]));

        assert!(matches!(result, Err(ServiceError::Validation(errors)) if errors[0].field == "page"));
    }
}
