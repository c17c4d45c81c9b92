use std::collections::HashMap;

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::{
    domain::recipe::{
        IngredientAmount, NewRecipe as DomainNewRecipe, Recipe as DomainRecipe,
        RecipeIngredient as DomainRecipeIngredient, RecipeListQuery,
        UpdateRecipe as DomainUpdateRecipe,
    },
    domain::relation::RelationKind,
    domain::tag::Tag as DomainTag,
    models::recipe::{
        NewRecipe as DbNewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe as DbRecipe,
        RecipeIngredientRow, UpdateRecipe as DbUpdateRecipe,
    },
    models::tag::Tag as DbTag,
    repository::{DieselRepository, RecipeReader, RecipeWriter, RepositoryError, RepositoryResult},
};

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<DomainRecipe>> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let recipe = recipes::table
            .filter(recipes::id.eq(id))
            .first::<DbRecipe>(&mut conn)
            .optional()?;

        match recipe {
            Some(db_recipe) => Ok(Some(hydrate_one(&mut conn, db_recipe)?)),
            None => Ok(None),
        }
    }

    fn get_recipe_id_by_short_code(&self, code: &str) -> RepositoryResult<Option<i32>> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let id = recipes::table
            .filter(recipes::short_code.eq(code))
            .select(recipes::id)
            .first::<i32>(&mut conn)
            .optional()?;

        Ok(id)
    }

    fn short_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let taken = select(exists(recipes::table.filter(recipes::short_code.eq(code))))
            .get_result::<bool>(&mut conn)?;

        Ok(taken)
    }

    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<DomainRecipe>)> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        let total = filtered_recipes(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_recipes(&query)
            .order((recipes::created_at.desc(), recipes::id.desc()));

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        self.ensure_active()?;
        let db_recipes = items.load::<DbRecipe>(&mut conn)?;
        let recipes = hydrate(&mut conn, db_recipes)?;

        Ok((total, recipes))
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(
        &self,
        new_recipe: &DomainNewRecipe,
        short_code: &str,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let insertable = DbNewRecipe::from_domain(new_recipe, short_code);

            // The only unique column on `recipes` besides the key is the short code.
            let created = diesel::insert_into(recipes::table)
                .values(&insertable)
                .get_result::<DbRecipe>(conn)
                .map_err(|err| match RepositoryError::from(err) {
                    RepositoryError::Conflict(_) => RepositoryError::ShortCodeTaken,
                    other => other,
                })?;

            self.ensure_active()?;
            replace_recipe_tags(conn, created.id, &new_recipe.tag_ids)?;
            self.ensure_active()?;
            replace_recipe_ingredients(conn, created.id, &new_recipe.ingredients)?;

            hydrate_one(conn, created)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateRecipe::from(updates);

            let updated = diesel::update(recipes::table.filter(recipes::id.eq(recipe_id)))
                .set(&db_updates)
                .get_result::<DbRecipe>(conn)?;

            if let Some(tag_ids) = updates.tag_ids.as_ref() {
                self.ensure_active()?;
                replace_recipe_tags(conn, recipe_id, tag_ids)?;
            }

            if let Some(ingredients) = updates.ingredients.as_ref() {
                self.ensure_active()?;
                replace_recipe_ingredients(conn, recipe_id, ingredients)?;
            }

            hydrate_one(conn, updated)
        })
    }

    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()> {
        use crate::schema::{recipe_ingredients, recipe_tags, recipes, user_recipe_relations};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            // Owned rows go first; the foreign keys cascade the same way.
            diesel::delete(
                user_recipe_relations::table.filter(user_recipe_relations::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;

            self.ensure_active()?;
            let deleted =
                diesel::delete(recipes::table.filter(recipes::id.eq(recipe_id))).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

/// Recipes matching the filters of `query`. Tag and relation filters run as
/// subselects so no id list is bound.
fn filtered_recipes(query: &RecipeListQuery) -> crate::schema::recipes::BoxedQuery<'_, Sqlite> {
    use crate::schema::{recipe_tags, recipes, tags, user_recipe_relations};

    let mut items = recipes::table.into_boxed::<Sqlite>();

    if let Some(author_id) = query.author_id {
        items = items.filter(recipes::author_id.eq(author_id));
    }

    if !query.tag_slugs.is_empty() {
        let tag_ids = tags::table
            .filter(tags::slug.eq_any(&query.tag_slugs))
            .select(tags::id);
        let tagged = recipe_tags::table
            .filter(recipe_tags::tag_id.eq_any(tag_ids))
            .select(recipe_tags::recipe_id);
        items = items.filter(recipes::id.eq_any(tagged));
    }

    for (user_id, kind) in [
        (query.favorited_by, RelationKind::Favorite),
        (query.in_cart_of, RelationKind::Cart),
    ] {
        if let Some(user_id) = user_id {
            let related = user_recipe_relations::table
                .filter(user_recipe_relations::user_id.eq(user_id))
                .filter(user_recipe_relations::kind.eq(kind.as_str()))
                .select(user_recipe_relations::recipe_id);
            items = items.filter(recipes::id.eq_any(related));
        }
    }

    items
}

fn replace_recipe_tags(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    tag_ids: &[i32],
) -> RepositoryResult<()> {
    use crate::schema::recipe_tags;

    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id))).execute(conn)?;

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn replace_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
) -> RepositoryResult<()> {
    use crate::schema::recipe_ingredients;

    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let rows: Vec<NewRecipeIngredient> = ingredients
        .iter()
        .map(|line| NewRecipeIngredient {
            recipe_id,
            ingredient_id: line.ingredient_id,
            amount: line.amount,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn hydrate_one(conn: &mut SqliteConnection, recipe: DbRecipe) -> RepositoryResult<DomainRecipe> {
    hydrate(conn, vec![recipe])?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

fn hydrate(
    conn: &mut SqliteConnection,
    recipes: Vec<DbRecipe>,
) -> RepositoryResult<Vec<DomainRecipe>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.id).collect();
    let mut tag_map = load_tags_for_recipes(conn, &recipe_ids)?;
    let mut ingredient_map = load_ingredients_for_recipes(conn, &recipe_ids)?;

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let tags = tag_map.remove(&recipe.id).unwrap_or_default();
            let ingredients = ingredient_map.remove(&recipe.id).unwrap_or_default();
            recipe.into_domain(tags, ingredients)
        })
        .collect())
}

fn load_tags_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainTag>>> {
    use crate::schema::{recipe_tags, tags};

    let rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, tags::all_columns))
        .load::<(i32, DbTag)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in rows {
        map.entry(recipe_id).or_default().push(tag.into());
    }

    Ok(map)
}

fn load_ingredients_for_recipes(
    conn: &mut SqliteConnection,
    recipe_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainRecipeIngredient>>> {
    use crate::schema::{ingredients, recipe_ingredients};

    let rows = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load::<RecipeIngredientRow>(conn)?;

    let mut map: HashMap<i32, Vec<DomainRecipeIngredient>> = HashMap::new();
    for row in rows {
        map.entry(row.recipe_id).or_default().push(row.into());
    }

    Ok(map)
}
