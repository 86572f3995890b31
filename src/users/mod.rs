//! User management for StoreRate

mod types;

use crate::auth::Role;
use crate::error::Error;
use crate::fetch::ApiContext;
use crate::validation;

pub use types::*;

/// Client for the `/users` endpoints
#[derive(Clone, Debug)]
pub struct UsersClient {
    ctx: ApiContext,
}

impl UsersClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// List every user
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.ctx.execute(self.ctx.get("/users")).await
    }

    /// Fetch one user
    pub async fn get(&self, id: &str) -> Result<User, Error> {
        self.ctx.execute(self.ctx.get(&format!("/users/{}", id))).await
    }

    /// Create a user with any role
    pub async fn create(&self, user: &NewUser) -> Result<User, Error> {
        validation::validate_new_user(user)?;
        let builder = self.ctx.post("/users").json(user)?;
        self.ctx.execute(builder).await
    }
}

/// Filter by role and sort for display.
///
/// Comparison is plain string ordering, so it is case-sensitive and uppercase
/// sorts before lowercase. The sort is stable.
pub fn filter_and_sort(users: Vec<User>, role: Option<Role>, sort: UserSort) -> Vec<User> {
    let mut users: Vec<User> = match role {
        Some(role) => users.into_iter().filter(|u| u.role == role).collect(),
        None => users,
    };
    match sort {
        UserSort::Name => users.sort_by(|a, b| a.name.cmp(&b.name)),
        UserSort::Email => users.sort_by(|a, b| a.email.cmp(&b.email)),
        UserSort::Role => users.sort_by(|a, b| a.role.as_str().cmp(b.role.as_str())),
    }
    users
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, role: Role) -> User {
        User {
            id: name.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            address: None,
            role,
        }
    }

    #[test]
    fn test_sort_by_name_is_case_sensitive() {
        let users = vec![
            user("Bob", "b@x.io", Role::NormalUser),
            user("alice", "a@x.io", Role::NormalUser),
        ];
        let names: Vec<String> = filter_and_sort(users, None, UserSort::Name)
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Bob", "alice"]);
    }

    #[test]
    fn test_filter_by_role_then_sort_by_email() {
        let users = vec![
            user("Zed", "zed@x.io", Role::StoreOwner),
            user("Amy", "amy@x.io", Role::NormalUser),
            user("Kim", "kim@x.io", Role::StoreOwner),
        ];
        let emails: Vec<String> = filter_and_sort(users, Some(Role::StoreOwner), UserSort::Email)
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["kim@x.io", "zed@x.io"]);
    }

    #[test]
    fn test_sort_by_role_is_stable() {
        let users = vec![
            user("Sam", "s@x.io", Role::SystemAdmin),
            user("Ned", "n@x.io", Role::NormalUser),
            user("Abe", "a@x.io", Role::NormalUser),
        ];
        let names: Vec<String> = filter_and_sort(users, None, UserSort::Role)
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ned", "Abe", "Sam"]);
    }
}
