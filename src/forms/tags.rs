use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::{NewTag, UpdateTag, slugify};
use crate::forms::{sanitize_inline_text, validation_field_errors};
use crate::services::errors::FieldError;

/// Maximum allowed length for a tag name.
const NAME_MAX_LEN: usize = 32;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag forms.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
    /// The name transliterates to nothing usable as a slug.
    #[error("tag name `{0}` does not produce a slug")]
    EmptySlug(String),
}

impl TagFormError {
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            TagFormError::Validation(errors) => validation_field_errors(errors),
            TagFormError::EmptyName | TagFormError::EmptySlug(_) => {
                vec![FieldError::new("name", self.to_string())]
            }
        }
    }
}

/// Payload used to add a tag to the catalog.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl AddTagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self) -> TagFormResult<NewTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        let new_tag = NewTag::new(sanitized_name);
        if new_tag.slug.is_empty() {
            return Err(TagFormError::EmptySlug(new_tag.name));
        }

        Ok(new_tag)
    }
}

/// Payload used to rename a tag. The slug keeps its original value.
#[derive(Debug, Deserialize, Validate)]
pub struct EditTagForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl EditTagForm {
    /// Validates and sanitizes the payload into a domain `UpdateTag`.
    pub fn into_update_tag(self) -> TagFormResult<UpdateTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }
        if slugify(&sanitized_name).is_empty() {
            return Err(TagFormError::EmptySlug(sanitized_name));
        }

        Ok(UpdateTag {
            name: sanitized_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_form_sanitizes_and_converts() {
        let form = AddTagForm {
            name: "  Quick \t Dinner  ".to_string(),
        };

        let new_tag = form.into_new_tag().expect("expected conversion to succeed");

        assert_eq!(new_tag.name, "Quick Dinner");
        assert_eq!(new_tag.slug, "quick-dinner");
    }

    #[test]
    fn add_tag_form_rejects_empty_name() {
        let form = AddTagForm {
            name: "   ".to_string(),
        };

        let result = form.into_new_tag();

        assert!(matches!(result, Err(TagFormError::EmptyName)));
    }

    #[test]
    fn add_tag_form_rejects_too_long_name() {
        let form = AddTagForm {
            name: "x".repeat(NAME_MAX_LEN + 1),
        };

        let err = form.into_new_tag().expect_err("expected validation failure");

        assert_eq!(err.field_errors()[0].field, "name");
    }

    #[test]
    fn edit_tag_form_builds_update() {
        let form = EditTagForm {
            name: "  Лёгкий\nужин  ".to_string(),
        };

        let update = form
            .into_update_tag()
            .expect("expected payload conversion to succeed");

        assert_eq!(update.name, "Лёгкий ужин");
    }
}
