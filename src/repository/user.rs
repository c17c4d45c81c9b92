use diesel::prelude::*;

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser},
    models::user::{NewUser as DbNewUser, User as DbUser},
    repository::{DieselRepository, RepositoryError, RepositoryResult, UserReader, UserWriter},
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainUser>> {
        use crate::schema::users;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let users = users::table
            .filter(users::id.eq_any(ids))
            .order(users::id.asc())
            .load::<DbUser>(&mut conn)?;

        Ok(users.into_iter().map(Into::into).collect())
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let insertable = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.into())
    }

    fn set_avatar(&self, user_id: i32, avatar: Option<String>) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::avatar.eq(avatar))
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }

    /// Recipes, relations and subscriptions of the user go with it through
    /// the `ON DELETE CASCADE` foreign keys.
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(user_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
