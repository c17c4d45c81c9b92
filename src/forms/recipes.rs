use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::IngredientAmount;
use crate::forms::{sanitize_inline_text, validation_field_errors};
use crate::media::{ImageError, ImageUpload};
use crate::services::errors::FieldError;

/// Maximum allowed length for a recipe name.
const NAME_MAX_LEN: usize = 256;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Upper bound for cooking time in minutes.
const COOKING_TIME_MAX: i32 = 32_000;
/// Upper bound for a single ingredient amount.
const AMOUNT_MAX: i32 = 32_000;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing recipe payloads.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("recipe name cannot be empty")]
    EmptyName,
    #[error("recipe text cannot be blank")]
    EmptyText,
    #[error("tag {0} is listed more than once")]
    DuplicateTag(i32),
    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(i32),
    #[error("ingredient line {index} has amount {amount}")]
    InvalidAmount { index: usize, amount: i32 },
    #[error("ingredient line {index} has no valid ingredient id")]
    InvalidIngredientId { index: usize },
    #[error("invalid image: {0}")]
    Image(#[from] ImageError),
}

impl RecipeFormError {
    /// Field-attributed representation handed back to callers.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            RecipeFormError::Validation(errors) => validation_field_errors(errors),
            RecipeFormError::EmptyName => vec![FieldError::new("name", self.to_string())],
            RecipeFormError::EmptyText => vec![FieldError::new("text", self.to_string())],
            RecipeFormError::DuplicateTag(_) => vec![FieldError::new("tags", self.to_string())],
            RecipeFormError::DuplicateIngredient(_) => {
                vec![FieldError::new("ingredients", self.to_string())]
            }
            RecipeFormError::InvalidAmount { index, .. } => vec![FieldError::new(
                format!("ingredients[{index}].amount"),
                format!("amount must be between 1 and {AMOUNT_MAX}"),
            )],
            RecipeFormError::InvalidIngredientId { index } => vec![FieldError::new(
                format!("ingredients[{index}].id"),
                self.to_string(),
            )],
            RecipeFormError::Image(err) => vec![FieldError::new("image", err.to_string())],
        }
    }
}

/// Ingredient line as submitted by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngredientLineForm {
    /// Catalog id of the ingredient.
    pub id: i32,
    pub amount: i32,
}

/// Payload used to publish a recipe.
///
/// Collections and the image default to empty so a missing key is reported
/// against its field instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[validate(range(min = 1, max = COOKING_TIME_MAX))]
    pub cooking_time: i32,
    #[serde(default)]
    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Vec<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one ingredient is required"))]
    pub ingredients: Vec<IngredientLineForm>,
}

/// Validated recipe composition, image still undecided on storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: ImageUpload,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

impl CreateRecipeForm {
    /// Validates the payload and decodes its image.
    pub fn into_draft(self) -> RecipeFormResult<RecipeDraft> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(RecipeFormError::EmptyName);
        }

        let text = check_text(&self.text)?;
        let tag_ids = check_tags(&self.tags)?;
        let ingredients = check_lines(&self.ingredients)?;
        let image = ImageUpload::from_data_uri(&self.image)?;

        Ok(RecipeDraft {
            name,
            text,
            cooking_time: self.cooking_time,
            image,
            tag_ids,
            ingredients,
        })
    }
}

/// Partial update of a recipe. Absent fields keep their stored value;
/// `tags` and `ingredients` replace the stored sets when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "text is required"))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = COOKING_TIME_MAX))]
    pub cooking_time: Option<i32>,
    #[validate(length(min = 1, message = "image is required"))]
    pub image: Option<String>,
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Option<Vec<i32>>,
    #[validate(length(min = 1, message = "at least one ingredient is required"))]
    pub ingredients: Option<Vec<IngredientLineForm>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<ImageUpload>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

impl UpdateRecipeForm {
    /// Validates every present field with the same rules as creation.
    pub fn into_patch(self) -> RecipeFormResult<RecipePatch> {
        self.validate()?;

        let name = match self.name.as_deref() {
            Some(raw) => {
                let name = sanitize_inline_text(raw);
                if name.is_empty() {
                    return Err(RecipeFormError::EmptyName);
                }
                Some(name)
            }
            None => None,
        };

        let text = self.text.as_deref().map(check_text).transpose()?;
        let tag_ids = self.tags.as_deref().map(check_tags).transpose()?;
        let ingredients = self.ingredients.as_deref().map(check_lines).transpose()?;
        let image = self
            .image
            .as_deref()
            .map(ImageUpload::from_data_uri)
            .transpose()?;

        Ok(RecipePatch {
            name,
            text,
            cooking_time: self.cooking_time,
            image,
            tag_ids,
            ingredients,
        })
    }
}

fn check_text(text: &str) -> RecipeFormResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RecipeFormError::EmptyText);
    }
    Ok(text.to_string())
}

fn check_tags(tags: &[i32]) -> RecipeFormResult<Vec<i32>> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag_id in tags {
        if !seen.insert(*tag_id) {
            return Err(RecipeFormError::DuplicateTag(*tag_id));
        }
    }
    Ok(tags.to_vec())
}

fn check_lines(lines: &[IngredientLineForm]) -> RecipeFormResult<Vec<IngredientAmount>> {
    let mut seen = HashSet::with_capacity(lines.len());
    let mut result = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        if line.id < 1 {
            return Err(RecipeFormError::InvalidIngredientId { index });
        }
        if !(1..=AMOUNT_MAX).contains(&line.amount) {
            return Err(RecipeFormError::InvalidAmount {
                index,
                amount: line.amount,
            });
        }
        if !seen.insert(line.id) {
            return Err(RecipeFormError::DuplicateIngredient(line.id));
        }
        result.push(IngredientAmount::new(line.id, line.amount));
    }

    Ok(result)
}
