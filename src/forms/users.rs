use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::validation_field_errors;
use crate::media::{ImageError, ImageUpload};
use crate::services::errors::FieldError;

pub type AvatarFormResult<T> = Result<T, AvatarFormError>;

#[derive(Debug, Error)]
pub enum AvatarFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid image: {0}")]
    Image(#[from] ImageError),
}

impl AvatarFormError {
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            AvatarFormError::Validation(errors) => validation_field_errors(errors),
            AvatarFormError::Image(err) => vec![FieldError::new("avatar", err.to_string())],
        }
    }
}

/// New avatar as a base64 `data:` URI.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "avatar is required"))]
    pub avatar: String,
}

impl AvatarForm {
    pub fn into_upload(self) -> AvatarFormResult<ImageUpload> {
        self.validate()?;
        Ok(ImageUpload::from_data_uri(&self.avatar)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_avatar_is_reported_on_its_field() {
        let form: AvatarForm = serde_json::from_str("{}").expect("form should deserialize");

        let err = form.into_upload().expect_err("expected validation failure");
        let fields: Vec<String> = err.field_errors().into_iter().map(|e| e.field).collect();

        assert_eq!(fields, vec!["avatar"]);
    }

    #[test]
    fn foreign_payload_is_an_image_error() {
        let form = AvatarForm {
            avatar: "https://example.com/me.png".to_string(),
        };

        assert!(matches!(
            form.into_upload(),
            Err(AvatarFormError::Image(ImageError::NotDataUri))
        ));
    }
}
