use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account that can author recipes, keep favorites and a cart, and follow
/// other authors. Accounts are issued by the external identity provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().trim().to_lowercase(),
            username: username.into().trim().to_string(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
        }
    }
}

/// Caller identity as resolved by the request boundary.
///
/// The core never authenticates; it only authorizes against this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(i32),
}

impl Viewer {
    pub fn user_id(&self) -> Option<i32> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::Authenticated(_))
    }
}

impl From<Option<i32>> for Viewer {
    fn from(value: Option<i32>) -> Self {
        match value {
            Some(id) => Viewer::Authenticated(id),
            None => Viewer::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_normalizes_email() {
        let user = NewUser::new("  Cook@Example.COM ", " cook ", "Ann", "Lee");

        assert_eq!(user.email, "cook@example.com");
        assert_eq!(user.username, "cook");
    }

    #[test]
    fn anonymous_viewer_has_no_user_id() {
        assert_eq!(Viewer::Anonymous.user_id(), None);
        assert_eq!(Viewer::from(Some(4)).user_id(), Some(4));
        assert!(!Viewer::default().is_authenticated());
    }
}
