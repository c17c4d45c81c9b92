use serde::Serialize;

use crate::domain::recipe::RecipeListQuery;
use crate::domain::subscription::{FollowedAuthorsQuery, NewSubscription};
use crate::domain::user::{User, Viewer};
use crate::pagination::{Paginated, Pagination};
use crate::repository::{
    RecipeReader, RepositoryError, SubscriptionReader, SubscriptionWriter, UserReader,
};
use crate::services::recipes::{AuthorView, RecipeSummary};
use crate::services::{ServiceError, ServiceResult};

/// Followed author with a preview of their newest recipes.
#[derive(Debug, Clone, Serialize)]
pub struct FollowedAuthorView {
    #[serde(flatten)]
    pub author: AuthorView,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: usize,
}

/// Parameters of the followed-authors listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FollowedQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Preview size; `<= 0` empties the preview, `None` means unlimited.
    pub recipes_limit: Option<i64>,
}

/// Subscribes the viewer to `author_id`.
pub fn follow<R>(
    repo: &R,
    viewer: Viewer,
    author_id: i32,
    recipes_limit: Option<i64>,
) -> ServiceResult<FollowedAuthorView>
where
    R: UserReader + SubscriptionWriter + RecipeReader + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let new_subscription = NewSubscription::new(user_id, author_id);
    if new_subscription.is_self_subscription() {
        return Err(ServiceError::SelfSubscription);
    }

    let author = repo
        .get_user_by_id(author_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.create_subscription(&new_subscription)
        .map_err(|err| match err {
            RepositoryError::ReferenceViolation(_) => ServiceError::NotFound,
            other => ServiceError::from(other),
        })?;

    annotate(repo, author, recipes_limit)
}

/// Removes the viewer's subscription to `author_id`.
pub fn unfollow<R>(repo: &R, viewer: Viewer, author_id: i32) -> ServiceResult<()>
where
    R: SubscriptionWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    repo.delete_subscription(user_id, author_id)
        .map_err(ServiceError::from)
}

/// Authors the viewer follows, each with `recipes_count` and a preview.
pub fn list_followed<R>(
    repo: &R,
    viewer: Viewer,
    query: FollowedQuery,
) -> ServiceResult<Paginated<FollowedAuthorView>>
where
    R: SubscriptionReader + RecipeReader + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let Pagination { page, per_page } = Pagination::from_params(query.page, query.limit)?;

    let (total, authors) =
        repo.list_followed_authors(FollowedAuthorsQuery::new(user_id).paginate(page, per_page))?;

    let views = authors
        .into_iter()
        .map(|author| annotate(repo, author, query.recipes_limit))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(views, page, per_page, total))
}

/// Every entry is built for the subscriber, so `is_subscribed` is true.
fn annotate<R>(
    repo: &R,
    author: User,
    recipes_limit: Option<i64>,
) -> ServiceResult<FollowedAuthorView>
where
    R: RecipeReader + ?Sized,
{
    let mut query = RecipeListQuery::new().author(author.id);
    if let Some(limit) = recipes_limit {
        let limit = usize::try_from(limit.max(0)).unwrap_or(0);
        query = query.paginate(1, limit);
    }

    let (recipes_count, recipes) = repo.list_recipes(query)?;

    Ok(FollowedAuthorView {
        author: AuthorView::new(author, true),
        recipes: recipes.iter().map(RecipeSummary::from).collect(),
        recipes_count,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::recipe::Recipe;
    use crate::domain::subscription::Subscription;
    use crate::repository::mock::MockRepo;

    fn user(id: i32) -> User {
        User {
            id,
            email: format!("author{id}@example.com"),
            username: format!("author{id}"),
            first_name: "Max".to_string(),
            last_name: "Roe".to_string(),
            avatar: None,
            created_at: NaiveDateTime::default(),
        }
    }

    fn recipe(id: i32, author_id: i32) -> Recipe {
        Recipe {
            id,
            author_id,
            name: format!("Recipe {id}"),
            text: "Cook.".to_string(),
            cooking_time: 10,
            image: format!("/media/recipes/{id}.png"),
            short_code: format!("Code{id:02}"),
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn follow_self_is_rejected() {
        let mut repo = MockRepo::new();
        repo.expect_create_subscription().never();

        let result = follow(&repo, Viewer::Authenticated(4), 4, None);

        assert!(matches!(result, Err(ServiceError::SelfSubscription)));
    }

    #[test]
    fn follow_missing_author_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_user_by_id().returning(|_| Ok(None));
        repo.expect_create_subscription().never();

        let result = follow(&repo, Viewer::Authenticated(4), 9, None);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn follow_twice_reports_already_exists() {
        let mut repo = MockRepo::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(user(id))));
        repo.expect_create_subscription()
            .returning(|_| Err(RepositoryError::Conflict("subscriptions".to_string())));

        let result = follow(&repo, Viewer::Authenticated(4), 9, None);

        assert!(matches!(result, Err(ServiceError::AlreadyExists)));
    }

    #[test]
    fn follow_returns_annotated_author() {
        let mut repo = MockRepo::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(user(id))));
        repo.expect_create_subscription()
            .times(1)
            .withf(|new_subscription| {
                new_subscription.user_id == 4 && new_subscription.author_id == 9
            })
            .returning(|new_subscription| {
                Ok(Subscription {
                    id: 1,
                    user_id: new_subscription.user_id,
                    author_id: new_subscription.author_id,
                    created_at: NaiveDateTime::default(),
                })
            });
        repo.expect_list_recipes()
            .times(1)
            .withf(|query| {
                query.author_id == Some(9) && query.pagination.map(|p| p.per_page) == Some(2)
            })
            .returning(|_| Ok((5, vec![recipe(1, 9), recipe(2, 9)])));

        let view = follow(&repo, Viewer::Authenticated(4), 9, Some(2)).expect("expected view");

        assert!(view.author.is_subscribed);
        assert_eq!(view.recipes_count, 5);
        assert_eq!(view.recipes.len(), 2);
    }

    #[test]
    fn non_positive_recipes_limit_empties_preview() {
        let mut repo = MockRepo::new();
        repo.expect_list_followed_authors()
            .times(1)
            .withf(|query| query.user_id == 4)
            .returning(|_| Ok((1, vec![user(9)])));
        repo.expect_list_recipes()
            .times(1)
            .withf(|query| query.pagination.map(|p| p.per_page) == Some(0))
            .returning(|_| Ok((3, Vec::new())));

        let query = FollowedQuery {
            recipes_limit: Some(-1),
            ..FollowedQuery::default()
        };

        let page = list_followed(&repo, Viewer::Authenticated(4), query).expect("expected page");

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].recipes_count, 3);
        assert!(page.results[0].recipes.is_empty());
    }

    #[test]
    fn absent_recipes_limit_is_unlimited() {
        let mut repo = MockRepo::new();
        repo.expect_list_followed_authors()
            .returning(|_| Ok((1, vec![user(9)])));
        repo.expect_list_recipes()
            .times(1)
            .withf(|query| query.pagination.is_none())
            .returning(|_| Ok((2, vec![recipe(1, 9), recipe(2, 9)])));

        let page = list_followed(&repo, Viewer::Authenticated(4), FollowedQuery::default())
            .expect("expected page");

        assert_eq!(page.results[0].recipes.len(), 2);
    }

    #[test]
    fn list_followed_rejects_oversized_limit() {
        let mut repo = MockRepo::new();
        repo.expect_list_followed_authors().never();

        let query = FollowedQuery {
            limit: Some(usize::MAX),
            ..FollowedQuery::default()
        };
        let result = list_followed(&repo, Viewer::Authenticated(4), query);

        assert!(matches!(result, Err(ServiceError::Validation(errors)) if errors[0].field == "limit"));
    }

    #[test]
    fn unfollow_missing_edge_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_delete_subscription()
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            unfollow(&repo, Viewer::Authenticated(4), 9),
            Err(ServiceError::NotFound)
        ));
    }
}
