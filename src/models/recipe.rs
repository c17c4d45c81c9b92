use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recipe::{
    NewRecipe as DomainNewRecipe, Recipe as DomainRecipe, RecipeIngredient as DomainRecipeIngredient,
    UpdateRecipe as DomainUpdateRecipe,
};
use crate::domain::tag::Tag as DomainTag;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::recipes,
    belongs_to(super::user::User, foreign_key = author_id)
)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub short_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: &'a str,
    pub short_code: &'a str,
}

impl<'a> NewRecipe<'a> {
    pub fn from_domain(value: &'a DomainNewRecipe, short_code: &'a str) -> Self {
        Self {
            author_id: value.author_id,
            name: value.name.as_str(),
            text: value.text.as_str(),
            cooking_time: value.cooking_time,
            image: value.image.as_str(),
            short_code,
        }
    }
}

/// Scalar columns of a recipe patch; `None` fields are left untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub image: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            name: value.name.as_deref(),
            text: value.text.as_deref(),
            cooking_time: value.cooking_time,
            image: value.image.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

/// Ingredient line joined with its catalog entry.
#[derive(Debug, Clone, Queryable)]
pub struct RecipeIngredientRow {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredientRow> for DomainRecipeIngredient {
    fn from(value: RecipeIngredientRow) -> Self {
        Self {
            ingredient_id: value.ingredient_id,
            name: value.name,
            measurement_unit: value.measurement_unit,
            amount: value.amount,
        }
    }
}

impl Recipe {
    pub fn into_domain(
        self,
        tags: Vec<DomainTag>,
        ingredients: Vec<DomainRecipeIngredient>,
    ) -> DomainRecipe {
        DomainRecipe {
            id: self.id,
            author_id: self.author_id,
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image: self.image,
            short_code: self.short_code,
            tags,
            ingredients,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
