use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Follow edge from a subscriber to an author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub id: i32,
    /// The follower.
    pub user_id: i32,
    /// The followed author; never equal to `user_id`.
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: i32,
    pub author_id: i32,
}

impl NewSubscription {
    pub fn new(user_id: i32, author_id: i32) -> Self {
        Self { user_id, author_id }
    }

    pub fn is_self_subscription(&self) -> bool {
        self.user_id == self.author_id
    }
}

/// Query definition used to list the authors a user follows.
#[derive(Debug, Clone)]
pub struct FollowedAuthorsQuery {
    pub user_id: i32,
    pub pagination: Option<Pagination>,
}

impl FollowedAuthorsQuery {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            pagination: None,
        }
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
