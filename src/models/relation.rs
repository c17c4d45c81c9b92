use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::relation::{
    NewRelation as DomainNewRelation, UnknownRelationKind,
    UserRecipeRelation as DomainUserRecipeRelation,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::user_recipe_relations,
    belongs_to(super::recipe::Recipe, foreign_key = recipe_id),
    belongs_to(super::user::User, foreign_key = user_id)
)]
pub struct UserRecipeRelation {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub kind: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_recipe_relations)]
pub struct NewRelation {
    pub user_id: i32,
    pub recipe_id: i32,
    pub kind: &'static str,
}

impl TryFrom<UserRecipeRelation> for DomainUserRecipeRelation {
    type Error = UnknownRelationKind;

    fn try_from(value: UserRecipeRelation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            recipe_id: value.recipe_id,
            kind: value.kind.parse()?,
            created_at: value.created_at,
        })
    }
}

impl From<&DomainNewRelation> for NewRelation {
    fn from(value: &DomainNewRelation) -> Self {
        Self {
            user_id: value.user_id,
            recipe_id: value.recipe_id,
            kind: value.kind.as_str(),
        }
    }
}
