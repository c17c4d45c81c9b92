use crate::domain::shopping_list::{ShoppingListItem, aggregate, render_text};
use crate::domain::user::Viewer;
use crate::repository::RelationReader;
use crate::services::{ServiceError, ServiceResult};

/// Consolidated ingredient totals over every recipe in the viewer's cart,
/// ordered by ingredient name then unit. An empty cart yields an empty list.
pub fn shopping_list<R>(repo: &R, viewer: Viewer) -> ServiceResult<Vec<ShoppingListItem>>
where
    R: RelationReader + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;

    let lines = repo.list_cart_lines(user_id)?;
    Ok(aggregate(lines))
}

/// Plain-text rendering of [`shopping_list`] for download.
pub fn shopping_list_document<R>(repo: &R, viewer: Viewer) -> ServiceResult<String>
where
    R: RelationReader + ?Sized,
{
    let items = shopping_list(repo, viewer)?;
    Ok(render_text(&items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shopping_list::CartLine;
    use crate::repository::mock::MockRepo;

    fn line(recipe_id: i32, name: &str, unit: &str, amount: i32) -> CartLine {
        CartLine {
            recipe_id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn shopping_list_sums_shared_ingredients() {
        let mut repo = MockRepo::new();
        repo.expect_list_cart_lines()
            .times(1)
            .withf(|user_id| *user_id == 3)
            .returning(|_| {
                Ok(vec![
                    line(1, "flour", "g", 200),
                    line(2, "flour", "g", 300),
                    line(2, "egg", "pcs", 2),
                ])
            });

        let items = shopping_list(&repo, Viewer::Authenticated(3)).expect("expected list");

        assert_eq!(
            items,
            vec![
                ShoppingListItem {
                    name: "egg".to_string(),
                    measurement_unit: "pcs".to_string(),
                    total_amount: 2,
                },
                ShoppingListItem {
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 500,
                },
            ]
        );
    }

    #[test]
    fn empty_cart_gives_empty_list() {
        let mut repo = MockRepo::new();
        repo.expect_list_cart_lines().returning(|_| Ok(Vec::new()));

        let items = shopping_list(&repo, Viewer::Authenticated(3)).expect("expected list");

        assert!(items.is_empty());
    }

    #[test]
    fn anonymous_viewer_has_no_cart() {
        let repo = MockRepo::new();

        assert!(matches!(
            shopping_list_document(&repo, Viewer::Anonymous),
            Err(ServiceError::Unauthorized)
        ));
    }
}
