use diesel::dsl::{exists, select};
use diesel::prelude::*;

use crate::{
    domain::subscription::{
        FollowedAuthorsQuery, NewSubscription as DomainNewSubscription,
        Subscription as DomainSubscription,
    },
    domain::user::User as DomainUser,
    models::subscription::{NewSubscription as DbNewSubscription, Subscription as DbSubscription},
    models::user::User as DbUser,
    repository::{
        DieselRepository, RepositoryError, RepositoryResult, SubscriptionReader,
        SubscriptionWriter,
    },
};

impl SubscriptionReader for DieselRepository {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let subscribed = select(exists(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::author_id.eq(author_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(subscribed)
    }

    fn list_followed_authors(
        &self,
        query: FollowedAuthorsQuery,
    ) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;

        let total = subscriptions::table
            .filter(subscriptions::user_id.eq(query.user_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = users::table
            .inner_join(subscriptions::table.on(subscriptions::author_id.eq(users::id)))
            .filter(subscriptions::user_id.eq(query.user_id))
            .select(users::all_columns)
            .order(users::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let authors = items.load::<DbUser>(&mut conn)?;

        Ok((total, authors.into_iter().map(DomainUser::from).collect()))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn create_subscription(
        &self,
        new_subscription: &DomainNewSubscription,
    ) -> RepositoryResult<DomainSubscription> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let insertable = DbNewSubscription::from(new_subscription);

        let created = diesel::insert_into(subscriptions::table)
            .values(&insertable)
            .get_result::<DbSubscription>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_subscription(&self, user_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let target = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq(author_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
