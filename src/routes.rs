//! The application's route table

use std::fmt;

use crate::auth::{Role, Session};
use crate::guard::{self, Decision, Requirement};

/// A navigable screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Stores,
    StoreDetail(String),
    Dashboard,
    Admin,
    /// `/`, forwarded to the store listing
    Home,
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/stores/12`. Query strings and trailing slashes are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["stores"] => Route::Stores,
            ["stores", id] => Route::StoreDetail((*id).to_string()),
            ["dashboard"] => Route::Dashboard,
            ["admin"] => Route::Admin,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Stores => "/stores".to_string(),
            Route::StoreDetail(id) => format!("/stores/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::Home => "/".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Dashboard => Requirement::Authenticated,
            Route::Admin => Requirement::role(Role::SystemAdmin),
            _ => Requirement::Public,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where navigating to `path` ends up for `session`
pub fn resolve(path: &str, session: Option<&Session>) -> Decision {
    let route = Route::parse(path);
    match route {
        Route::Home | Route::NotFound(_) => Decision::Redirect(Route::Stores),
        _ => guard::check(&route.requirement(), session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Stores,
            Route::StoreDetail("12".to_string()),
            Route::Dashboard,
            Route::Admin,
            Route::Home,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
        assert_eq!(Route::parse("/stores/7/?tab=ratings"), Route::StoreDetail("7".to_string()));
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".to_string()));
    }

    #[test]
    fn test_resolve() {
        let normal = Session::new("t", Role::NormalUser, "1");
        let admin = Session::new("t", Role::SystemAdmin, "2");

        assert_eq!(resolve("/", None), Decision::Redirect(Route::Stores));
        assert_eq!(resolve("/elsewhere", Some(&admin)), Decision::Redirect(Route::Stores));
        assert_eq!(resolve("/stores/3", None), Decision::Render);
        assert_eq!(resolve("/dashboard", None), Decision::Redirect(Route::Login));
        assert_eq!(resolve("/dashboard", Some(&normal)), Decision::Render);
        assert_eq!(resolve("/admin", Some(&normal)), Decision::Redirect(Route::Stores));
        assert_eq!(resolve("/admin", Some(&admin)), Decision::Render);
    }
}
