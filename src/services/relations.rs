use crate::domain::relation::{NewRelation, RelationKind};
use crate::domain::user::Viewer;
use crate::repository::{RecipeReader, RelationWriter, RepositoryError};
use crate::services::recipes::RecipeSummary;
use crate::services::{ServiceError, ServiceResult};

/// Puts a recipe into the viewer's favorites or cart.
///
/// A second add of the same kind fails with `AlreadyExists`; the unique index
/// on `(user_id, recipe_id, kind)` decides between concurrent adds.
pub fn add_relation<R>(
    repo: &R,
    viewer: Viewer,
    recipe_id: i32,
    kind: RelationKind,
) -> ServiceResult<RecipeSummary>
where
    R: RecipeReader + RelationWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    // The recipe can vanish between the lookup and the insert.
    repo.create_relation(&NewRelation::new(user_id, recipe.id, kind))
        .map_err(|err| match err {
            RepositoryError::ReferenceViolation(_) => ServiceError::NotFound,
            other => ServiceError::from(other),
        })?;

    Ok(RecipeSummary::from(&recipe))
}

/// Takes a recipe out of the viewer's favorites or cart; `NotFound` when it
/// was not there.
pub fn remove_relation<R>(
    repo: &R,
    viewer: Viewer,
    recipe_id: i32,
    kind: RelationKind,
) -> ServiceResult<()>
where
    R: RecipeReader + RelationWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    if repo.get_recipe_by_id(recipe_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    repo.delete_relation(user_id, recipe_id, kind)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::recipe::Recipe;
    use crate::domain::relation::UserRecipeRelation;
    use crate::repository::mock::MockRepo;

    fn recipe(id: i32) -> Recipe {
        Recipe {
            id,
            author_id: 1,
            name: "Soup".to_string(),
            text: "Boil.".to_string(),
            cooking_time: 30,
            image: "/media/recipes/soup.png".to_string(),
            short_code: "Soup01".to_string(),
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn relation(user_id: i32, recipe_id: i32, kind: RelationKind) -> UserRecipeRelation {
        UserRecipeRelation {
            id: 1,
            user_id,
            recipe_id,
            kind,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn add_relation_requires_authentication() {
        let repo = MockRepo::new();

        let result = add_relation(&repo, Viewer::Anonymous, 1, RelationKind::Favorite);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_relation_for_missing_recipe_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_recipe_by_id().returning(|_| Ok(None));
        repo.expect_create_relation().never();

        let result = add_relation(&repo, Viewer::Authenticated(2), 1, RelationKind::Cart);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn add_relation_returns_summary() {
        let mut repo = MockRepo::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        repo.expect_create_relation()
            .times(1)
            .withf(|new_relation| {
                new_relation.user_id == 2
                    && new_relation.recipe_id == 4
                    && new_relation.kind == RelationKind::Favorite
            })
            .returning(|new_relation| {
                Ok(relation(
                    new_relation.user_id,
                    new_relation.recipe_id,
                    new_relation.kind,
                ))
            });

        let summary = add_relation(&repo, Viewer::Authenticated(2), 4, RelationKind::Favorite)
            .expect("expected summary");

        assert_eq!(summary.id, 4);
        assert_eq!(summary.name, "Soup");
        assert_eq!(summary.cooking_time, 30);
    }

    #[test]
    fn second_add_reports_already_exists() {
        let mut repo = MockRepo::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        repo.expect_create_relation()
            .returning(|_| Err(RepositoryError::Conflict("user_recipe_relations".to_string())));

        let result = add_relation(&repo, Viewer::Authenticated(2), 4, RelationKind::Favorite);

        assert!(matches!(result, Err(ServiceError::AlreadyExists)));
    }

    #[test]
    fn recipe_deleted_before_insert_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        repo.expect_create_relation().returning(|_| {
            Err(RepositoryError::ReferenceViolation(
                "FOREIGN KEY constraint failed".to_string(),
            ))
        });

        let result = add_relation(&repo, Viewer::Authenticated(2), 4, RelationKind::Cart);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn removing_absent_relation_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        repo.expect_delete_relation()
            .times(1)
            .withf(|user_id, recipe_id, kind| {
                *user_id == 2 && *recipe_id == 4 && *kind == RelationKind::Cart
            })
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let result = remove_relation(&repo, Viewer::Authenticated(2), 4, RelationKind::Cart);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
