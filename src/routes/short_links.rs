use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{error_response, run};
use crate::services::short_links::resolve_short_code;

#[get("/s/{code}/")]
/// Redirect a shared short link to the recipe page.
pub async fn follow_short_link(
    code: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let code = code.into_inner();

    match run(repo.get_ref(), move |repo| resolve_short_code(repo, &code)).await {
        Ok(recipe_id) => HttpResponse::Found()
            .insert_header((header::LOCATION, format!("/recipes/{recipe_id}/")))
            .finish(),
        Err(err) => error_response(err),
    }
}
