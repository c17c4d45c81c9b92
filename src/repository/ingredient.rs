use diesel::dsl::{exists, select};
use diesel::prelude::*;

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, IngredientListQuery, NewIngredient as DomainNewIngredient,
    UpdateIngredient as DomainUpdateIngredient,
};
use crate::models::ingredient::{
    Ingredient as DbIngredient, NewIngredient as DbNewIngredient,
    UpdateIngredient as DbUpdateIngredient,
};
use crate::repository::{
    DieselRepository, IngredientReader, IngredientWriter, RepositoryError, RepositoryResult,
};

impl IngredientReader for DieselRepository {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let ingredient = ingredients::table
            .filter(ingredients::id.eq(id))
            .first::<DbIngredient>(&mut conn)
            .optional()?;

        Ok(ingredient.map(DomainIngredient::from))
    }

    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        let mut items = ingredients::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(prefix) = query.name_prefix.as_ref() {
            let pattern = format!("{}%", escape_like(prefix));
            items = items.filter(ingredients::name.like(pattern).escape('\\'));
        }

        let db_ingredients = items
            .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .load::<DbIngredient>(&mut conn)?;

        Ok(db_ingredients
            .into_iter()
            .map(DomainIngredient::from)
            .collect())
    }

    fn list_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::ingredients;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let db_ingredients = ingredients::table
            .filter(ingredients::id.eq_any(ids))
            .load::<DbIngredient>(&mut conn)?;

        Ok(db_ingredients
            .into_iter()
            .map(DomainIngredient::from)
            .collect())
    }
}

impl IngredientWriter for DieselRepository {
    fn create_ingredient(
        &self,
        new_ingredient: &DomainNewIngredient,
    ) -> RepositoryResult<DomainIngredient> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let insertable = DbNewIngredient::from(new_ingredient);

        let created = diesel::insert_into(ingredients::table)
            .values(&insertable)
            .get_result::<DbIngredient>(&mut conn)?;

        Ok(created.into())
    }

    fn update_ingredient(
        &self,
        ingredient_id: i32,
        updates: &DomainUpdateIngredient,
    ) -> RepositoryResult<DomainIngredient> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateIngredient::from(updates);

        let updated = diesel::update(ingredients::table.filter(ingredients::id.eq(ingredient_id)))
            .set(&db_updates)
            .get_result::<DbIngredient>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_ingredient(&self, ingredient_id: i32) -> RepositoryResult<()> {
        use crate::schema::{ingredients, recipe_ingredients};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let referenced = select(exists(
                recipe_ingredients::table
                    .filter(recipe_ingredients::ingredient_id.eq(ingredient_id)),
            ))
            .get_result::<bool>(conn)?;
            if referenced {
                return Err(RepositoryError::ReferenceViolation(format!(
                    "ingredient {ingredient_id} is used by a recipe"
                )));
            }

            let deleted =
                diesel::delete(ingredients::table.filter(ingredients::id.eq(ingredient_id)))
                    .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
