use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;

use crate::forms::users::AvatarForm;
use crate::media::AvatarStore;
use crate::repository::DieselRepository;
use crate::routes::{error_response, run, viewer};
use crate::services::subscriptions::{FollowedQuery, follow, list_followed, unfollow};
use crate::services::users::{current_user, get_user_profile, remove_avatar, set_avatar};

/// Query parameters accepted by the subscription endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub recipes_limit: Option<i64>,
}

#[get("/api/users/subscriptions/")]
pub async fn api_list_subscriptions(
    params: web::Query<SubscriptionParams>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let SubscriptionParams {
        page,
        limit,
        recipes_limit,
    } = params.into_inner();
    let query = FollowedQuery {
        page,
        limit,
        recipes_limit,
    };

    match run(repo.get_ref(), move |repo| list_followed(repo, viewer, query)).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[post(r"/api/users/{author_id:\d+}/subscribe/")]
pub async fn api_subscribe(
    author_id: web::Path<i32>,
    params: web::Query<SubscriptionParams>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let author_id = author_id.into_inner();
    let recipes_limit = params.recipes_limit;

    match run(repo.get_ref(), move |repo| {
        follow(repo, viewer, author_id, recipes_limit)
    })
    .await
    {
        Ok(author) => HttpResponse::Created().json(author),
        Err(err) => error_response(err),
    }
}

#[delete(r"/api/users/{author_id:\d+}/subscribe/")]
pub async fn api_unsubscribe(
    author_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let author_id = author_id.into_inner();

    match run(repo.get_ref(), move |repo| unfollow(repo, viewer, author_id)).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[get("/api/users/me/")]
pub async fn api_current_user(
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);

    match run(repo.get_ref(), move |repo| current_user(repo, viewer)).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}

#[get(r"/api/users/{user_id:\d+}/")]
pub async fn api_get_user(
    user_id: web::Path<i32>,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let viewer = viewer(identity);
    let user_id = user_id.into_inner();

    match run(repo.get_ref(), move |repo| {
        get_user_profile(repo, viewer, user_id)
    })
    .await
    {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}

#[put("/api/users/me/avatar/")]
pub async fn api_set_avatar(
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
    avatars: web::Data<AvatarStore>,
    form: web::Json<AvatarForm>,
) -> impl Responder {
    let viewer = viewer(identity);
    let form = form.into_inner();

    let result = run(repo.get_ref(), move |repo| {
        set_avatar(repo, avatars.get_ref(), viewer, form)
    })
    .await;

    match result {
        Ok(avatar) => HttpResponse::Ok().json(avatar),
        Err(err) => error_response(err),
    }
}

#[delete("/api/users/me/avatar/")]
pub async fn api_remove_avatar(
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
    avatars: web::Data<AvatarStore>,
) -> impl Responder {
    let viewer = viewer(identity);

    let result = run(repo.get_ref(), move |repo| {
        remove_avatar(repo, avatars.get_ref(), viewer)
    })
    .await;

    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
