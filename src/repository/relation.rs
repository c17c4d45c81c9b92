use diesel::dsl::{exists, select};
use diesel::prelude::*;

use crate::{
    domain::relation::{
        NewRelation as DomainNewRelation, RelationKind, UserRecipeRelation as DomainRelation,
    },
    domain::shopping_list::CartLine,
    models::relation::{NewRelation as DbNewRelation, UserRecipeRelation as DbRelation},
    repository::{
        DieselRepository, RelationReader, RelationWriter, RepositoryError, RepositoryResult,
    },
};

impl RelationReader for DieselRepository {
    fn has_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        kind: RelationKind,
    ) -> RepositoryResult<bool> {
        use crate::schema::user_recipe_relations;

        let mut conn = self.conn()?;
        let present = select(exists(
            user_recipe_relations::table
                .filter(user_recipe_relations::user_id.eq(user_id))
                .filter(user_recipe_relations::recipe_id.eq(recipe_id))
                .filter(user_recipe_relations::kind.eq(kind.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(present)
    }

    fn list_relation_kinds(
        &self,
        user_id: i32,
        recipe_id: i32,
    ) -> RepositoryResult<Vec<RelationKind>> {
        use crate::schema::user_recipe_relations;

        let mut conn = self.conn()?;
        let kinds = user_recipe_relations::table
            .filter(user_recipe_relations::user_id.eq(user_id))
            .filter(user_recipe_relations::recipe_id.eq(recipe_id))
            .select(user_recipe_relations::kind)
            .load::<String>(&mut conn)?;

        kinds
            .iter()
            .map(|kind| {
                kind.parse::<RelationKind>()
                    .map_err(|err| RepositoryError::InvalidData(err.to_string()))
            })
            .collect()
    }

    fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>> {
        use crate::schema::{ingredients, recipe_ingredients, user_recipe_relations};

        let mut conn = self.conn()?;
        let rows = recipe_ingredients::table
            .inner_join(ingredients::table)
            .inner_join(
                user_recipe_relations::table
                    .on(user_recipe_relations::recipe_id.eq(recipe_ingredients::recipe_id)),
            )
            .filter(user_recipe_relations::user_id.eq(user_id))
            .filter(user_recipe_relations::kind.eq(RelationKind::Cart.as_str()))
            .select((
                recipe_ingredients::recipe_id,
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load::<(i32, String, String, i32)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(recipe_id, name, measurement_unit, amount)| CartLine {
                recipe_id,
                name,
                measurement_unit,
                amount,
            })
            .collect())
    }
}

impl RelationWriter for DieselRepository {
    fn create_relation(
        &self,
        new_relation: &DomainNewRelation,
    ) -> RepositoryResult<DomainRelation> {
        use crate::schema::user_recipe_relations;

        let mut conn = self.conn()?;
        let insertable = DbNewRelation::from(new_relation);

        let created = diesel::insert_into(user_recipe_relations::table)
            .values(&insertable)
            .get_result::<DbRelation>(&mut conn)?;

        DomainRelation::try_from(created)
            .map_err(|err| RepositoryError::InvalidData(err.to_string()))
    }

    fn delete_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        kind: RelationKind,
    ) -> RepositoryResult<()> {
        use crate::schema::user_recipe_relations;

        let mut conn = self.conn()?;
        let target = user_recipe_relations::table
            .filter(user_recipe_relations::user_id.eq(user_id))
            .filter(user_recipe_relations::recipe_id.eq(recipe_id))
            .filter(user_recipe_relations::kind.eq(kind.as_str()));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
