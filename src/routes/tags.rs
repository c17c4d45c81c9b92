use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::{error_response, run};
use crate::services::tags::{get_tag, list_tags};

#[get("/api/tags/")]
pub async fn api_list_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match run(repo.get_ref(), |repo| list_tags(repo)).await {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => error_response(err),
    }
}

#[get("/api/tags/{tag_id}/")]
pub async fn api_get_tag(
    tag_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let tag_id = tag_id.into_inner();
    match run(repo.get_ref(), move |repo| get_tag(repo, tag_id)).await {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response(err),
    }
}
