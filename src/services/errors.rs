use serde::Serialize;
use thiserror::Error;

use crate::forms::ingredients::IngredientFormError;
use crate::forms::recipes::RecipeFormError;
use crate::forms::tags::TagFormError;
use crate::forms::users::AvatarFormError;
use crate::pagination::PaginationError;
use crate::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Validation failure attributed to one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome kinds surfaced to callers of the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("permission denied")]
    PermissionDenied,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("authentication required")]
    Unauthorized,
    /// Reference data is still used by a recipe.
    #[error("still referenced by a recipe")]
    InUse,
    /// Every short code candidate collided; the code space is close to full.
    #[error("short code space exhausted")]
    ShortCodeExhausted,
    #[error("request cancelled")]
    Cancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(_) | RepositoryError::ShortCodeTaken => {
                ServiceError::AlreadyExists
            }
            RepositoryError::ReferenceViolation(_) => ServiceError::InUse,
            RepositoryError::Cancelled => ServiceError::Cancelled,
            other => {
                log::error!("Storage failure: {other}");
                ServiceError::Internal(other.to_string())
            }
        }
    }
}

impl From<PaginationError> for ServiceError {
    fn from(value: PaginationError) -> Self {
        let field = match value {
            PaginationError::LimitTooLarge => "limit",
            PaginationError::PageOutOfRange => "page",
        };
        ServiceError::invalid(field, value.to_string())
    }
}

impl From<AvatarFormError> for ServiceError {
    fn from(value: AvatarFormError) -> Self {
        ServiceError::Validation(value.field_errors())
    }
}

impl From<RecipeFormError> for ServiceError {
    fn from(value: RecipeFormError) -> Self {
        ServiceError::Validation(value.field_errors())
    }
}

impl From<TagFormError> for ServiceError {
    fn from(value: TagFormError) -> Self {
        ServiceError::Validation(value.field_errors())
    }
}

impl From<IngredientFormError> for ServiceError {
    fn from(value: IngredientFormError) -> Self {
        ServiceError::Validation(value.field_errors())
    }
}
