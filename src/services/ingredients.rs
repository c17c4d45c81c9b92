use serde::Deserialize;

use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::forms::ingredients::IngredientForm;
use crate::repository::{IngredientReader, IngredientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the ingredient lookup.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientsQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

pub fn list_ingredients<R>(repo: &R, query: IngredientsQuery) -> ServiceResult<Vec<Ingredient>>
where
    R: IngredientReader + ?Sized,
{
    let mut list_query = IngredientListQuery::new();
    if let Some(name) = query.name {
        list_query = list_query.name_prefix(name);
    }

    repo.list_ingredients(list_query).map_err(ServiceError::from)
}

pub fn get_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<Ingredient>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_ingredient<R>(repo: &R, form: IngredientForm) -> ServiceResult<Ingredient>
where
    R: IngredientWriter + ?Sized,
{
    let new_ingredient = form.into_new_ingredient()?;
    repo.create_ingredient(&new_ingredient)
        .map_err(ServiceError::from)
}

/// Corrects an ingredient entry; recipes show the new values immediately.
pub fn rename_ingredient<R>(
    repo: &R,
    ingredient_id: i32,
    form: IngredientForm,
) -> ServiceResult<Ingredient>
where
    R: IngredientWriter + ?Sized,
{
    let update = form.into_update_ingredient()?;
    repo.update_ingredient(ingredient_id, &update)
        .map_err(ServiceError::from)
}

/// Deletes an ingredient no recipe uses; otherwise fails with `InUse`.
pub fn remove_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<()>
where
    R: IngredientWriter + ?Sized,
{
    repo.delete_ingredient(ingredient_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockIngredientReader, MockIngredientWriter};

    fn flour() -> Ingredient {
        Ingredient {
            id: 1,
            name: "flour".to_string(),
            measurement_unit: "g".to_string(),
        }
    }

    #[test]
    fn list_ingredients_passes_prefix() {
        let mut repo = MockIngredientReader::new();
        repo.expect_list_ingredients()
            .times(1)
            .withf(|query| query.name_prefix.as_deref() == Some("fl"))
            .returning(|_| Ok(vec![flour()]));

        let query = IngredientsQuery {
            name: Some(" fl ".to_string()),
        };

        let items = list_ingredients(&repo, query).expect("expected success");

        assert_eq!(items, vec![flour()]);
    }

    #[test]
    fn create_ingredient_reports_duplicates() {
        let mut repo = MockIngredientWriter::new();
        repo.expect_create_ingredient()
            .times(1)
            .withf(|new_ingredient| {
                new_ingredient.name == "flour" && new_ingredient.measurement_unit == "g"
            })
            .returning(|_| Err(RepositoryError::Conflict("ingredients".to_string())));

        let form = IngredientForm {
            name: "flour ".to_string(),
            measurement_unit: "g".to_string(),
        };

        assert!(matches!(
            create_ingredient(&repo, form),
            Err(ServiceError::AlreadyExists)
        ));
    }

    #[test]
    fn remove_ingredient_in_use_is_rejected() {
        let mut repo = MockIngredientWriter::new();
        repo.expect_delete_ingredient()
            .times(1)
            .returning(|_| Err(RepositoryError::ReferenceViolation("fk".to_string())));

        assert!(matches!(
            remove_ingredient(&repo, 1),
            Err(ServiceError::InUse)
        ));
    }

    #[test]
    fn get_ingredient_missing_is_not_found() {
        let mut repo = MockIngredientReader::new();
        repo.expect_get_ingredient_by_id().returning(|_| Ok(None));

        assert!(matches!(get_ingredient(&repo, 9), Err(ServiceError::NotFound)));
    }
}
