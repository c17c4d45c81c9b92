use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{error_response, run};
use crate::services::ingredients::{IngredientsQuery, get_ingredient, list_ingredients};

#[get("/api/ingredients/")]
/// Ingredient lookup by case-insensitive name prefix (`?name=`).
pub async fn api_list_ingredients(
    params: web::Query<IngredientsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = params.into_inner();
    match run(repo.get_ref(), move |repo| list_ingredients(repo, query)).await {
        Ok(ingredients) => HttpResponse::Ok().json(ingredients),
        Err(err) => error_response(err),
    }
}

#[get("/api/ingredients/{ingredient_id}/")]
pub async fn api_get_ingredient(
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ingredient_id = ingredient_id.into_inner();
    match run(repo.get_ref(), move |repo| get_ingredient(repo, ingredient_id)).await {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => error_response(err),
    }
}
