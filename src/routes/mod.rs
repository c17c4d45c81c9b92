use actix_identity::Identity;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::db::CancellationToken;
use crate::domain::user::Viewer;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, ServiceResult};

pub mod ingredients;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;

/// Resolve the caller from the session identity; the identity string is the
/// user id. Anything unparsable is treated as anonymous.
pub fn viewer(identity: Option<Identity>) -> Viewer {
    let Some(identity) = identity else {
        return Viewer::Anonymous;
    };

    match identity.id() {
        Ok(id) => match id.parse::<i32>() {
            Ok(user_id) => Viewer::Authenticated(user_id),
            Err(_) => {
                log::warn!("Ignoring non-numeric identity `{id}`");
                Viewer::Anonymous
            }
        },
        Err(err) => {
            log::warn!("Failed to read identity: {err}");
            Viewer::Anonymous
        }
    }
}

/// Fires the request's cancellation token when the handler future is dropped,
/// e.g. because the client went away.
struct CancelOnDrop(CancellationToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Run a blocking service call on the worker pool with a repository bound to
/// this request's cancellation token.
pub async fn run<T, F>(repo: &DieselRepository, call: F) -> ServiceResult<T>
where
    F: FnOnce(&DieselRepository) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let token = CancellationToken::new();
    let _guard = CancelOnDrop(token.clone());
    let scoped = repo.with_cancellation(token);

    match web::block(move || call(&scoped)).await {
        Ok(result) => result,
        Err(err) => {
            log::error!("Blocking task failed: {err}");
            Err(ServiceError::Internal(err.to_string()))
        }
    }
}

/// Translate a service outcome into an HTTP response.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation(errors) => HttpResponse::BadRequest().json(json!({
            "errors": errors,
        })),
        ServiceError::SelfSubscription | ServiceError::AlreadyExists => {
            HttpResponse::BadRequest().json(json!({ "detail": err.to_string() }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "detail": err.to_string() })),
        ServiceError::PermissionDenied => {
            HttpResponse::Forbidden().json(json!({ "detail": err.to_string() }))
        }
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({ "detail": err.to_string() }))
        }
        ServiceError::InUse => HttpResponse::Conflict().json(json!({ "detail": err.to_string() })),
        ServiceError::ShortCodeExhausted | ServiceError::Cancelled => {
            HttpResponse::ServiceUnavailable().json(json!({ "detail": err.to_string() }))
        }
        ServiceError::Internal(message) => {
            log::error!("Request failed: {message}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;
    use crate::services::FieldError;

    #[test]
    fn error_response_maps_statuses() {
        let cases = vec![
            (
                ServiceError::Validation(vec![FieldError::new("tags", "required")]),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::SelfSubscription, StatusCode::BAD_REQUEST),
            (ServiceError::AlreadyExists, StatusCode::BAD_REQUEST),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::PermissionDenied, StatusCode::FORBIDDEN),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::InUse, StatusCode::CONFLICT),
            (ServiceError::ShortCodeExhausted, StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(error_response(err).status(), expected);
        }
    }

    #[test]
    fn missing_identity_is_anonymous() {
        assert_eq!(viewer(None), Viewer::Anonymous);
    }
}
