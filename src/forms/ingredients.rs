use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::ingredient::{NewIngredient, UpdateIngredient};
use crate::forms::{sanitize_inline_text, validation_field_errors};
use crate::services::errors::FieldError;

const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const UNIT_MAX_LEN: usize = 64;
const UNIT_MAX_LEN_VALIDATOR: u64 = UNIT_MAX_LEN as u64;

pub type IngredientFormResult<T> = Result<T, IngredientFormError>;

#[derive(Debug, Error)]
pub enum IngredientFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("ingredient name cannot be empty")]
    EmptyName,
    #[error("measurement unit cannot be empty")]
    EmptyUnit,
}

impl IngredientFormError {
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            IngredientFormError::Validation(errors) => validation_field_errors(errors),
            IngredientFormError::EmptyName => vec![FieldError::new("name", self.to_string())],
            IngredientFormError::EmptyUnit => {
                vec![FieldError::new("measurement_unit", self.to_string())]
            }
        }
    }
}

/// Catalog entry as submitted for creation or correction.
#[derive(Debug, Deserialize, Validate)]
pub struct IngredientForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1, max = UNIT_MAX_LEN_VALIDATOR))]
    pub measurement_unit: String,
}

impl IngredientForm {
    fn sanitized(self) -> IngredientFormResult<(String, String)> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(IngredientFormError::EmptyName);
        }
        let unit = sanitize_inline_text(&self.measurement_unit);
        if unit.is_empty() {
            return Err(IngredientFormError::EmptyUnit);
        }

        Ok((name, unit))
    }

    pub fn into_new_ingredient(self) -> IngredientFormResult<NewIngredient> {
        let (name, unit) = self.sanitized()?;
        Ok(NewIngredient::new(name, unit))
    }

    pub fn into_update_ingredient(self) -> IngredientFormResult<UpdateIngredient> {
        let (name, measurement_unit) = self.sanitized()?;
        Ok(UpdateIngredient {
            name,
            measurement_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_form_sanitizes_both_fields() {
        let form = IngredientForm {
            name: "  wheat   flour ".to_string(),
            measurement_unit: " g ".to_string(),
        };

        let new_ingredient = form.into_new_ingredient().expect("expected valid ingredient");

        assert_eq!(new_ingredient.name, "wheat flour");
        assert_eq!(new_ingredient.measurement_unit, "g");
    }

    #[test]
    fn ingredient_form_rejects_blank_unit() {
        let form = IngredientForm {
            name: "salt".to_string(),
            measurement_unit: " \t ".to_string(),
        };

        let err = form
            .into_update_ingredient()
            .expect_err("expected blank unit to fail");

        assert!(matches!(err, IngredientFormError::EmptyUnit));
        assert_eq!(err.field_errors()[0].field, "measurement_unit");
    }
}
