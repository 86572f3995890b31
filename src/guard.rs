//! Access checks placed in front of protected views

use crate::auth::{Role, Session};
use crate::routes::Route;

/// What a view demands of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, signed in or not
    Public,
    /// Any signed-in user
    Authenticated,
    /// A signed-in user holding one of these roles
    Roles(Vec<Role>),
}

impl Requirement {
    pub fn role(role: Role) -> Self {
        Requirement::Roles(vec![role])
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(Route),
}

/// Decide whether a view may render for `session`.
///
/// Missing session sends the visitor to login; a signed-in user without a
/// permitted role lands on the store listing instead.
pub fn check(requirement: &Requirement, session: Option<&Session>) -> Decision {
    match (requirement, session) {
        (Requirement::Public, _) => Decision::Render,
        (_, None) => Decision::Redirect(Route::Login),
        (Requirement::Authenticated, Some(_)) => Decision::Render,
        (Requirement::Roles(roles), Some(session)) => {
            if roles.contains(&session.role) {
                Decision::Render
            } else {
                Decision::Redirect(Route::Stores)
            }
        }
    }
}
