//! Navigation bar links

use crate::auth::{Role, Session};
use crate::routes::Route;

/// One entry in the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Link { label: &'static str, route: Route },
    Logout,
}

/// Links shown for the given session
pub fn nav_items(session: Option<&Session>) -> Vec<NavItem> {
    let mut items = vec![NavItem::Link {
        label: "Stores",
        route: Route::Stores,
    }];

    match session {
        Some(session) => {
            items.push(NavItem::Link {
                label: "Dashboard",
                route: Route::Dashboard,
            });
            if session.role == Role::SystemAdmin {
                items.push(NavItem::Link {
                    label: "Admin",
                    route: Route::Admin,
                });
            }
            items.push(NavItem::Logout);
        }
        None => {
            items.push(NavItem::Link {
                label: "Login",
                route: Route::Login,
            });
            items.push(NavItem::Link {
                label: "Register",
                route: Route::Register,
            });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[NavItem]) -> Vec<&'static str> {
        items
            .iter()
            .map(|item| match item {
                NavItem::Link { label, .. } => *label,
                NavItem::Logout => "Logout",
            })
            .collect()
    }

    #[test]
    fn test_anonymous_links() {
        assert_eq!(labels(&nav_items(None)), vec!["Stores", "Login", "Register"]);
    }

    #[test]
    fn test_signed_in_links() {
        let owner = Session::new("t", Role::StoreOwner, "1");
        assert_eq!(labels(&nav_items(Some(&owner))), vec!["Stores", "Dashboard", "Logout"]);

        let admin = Session::new("t", Role::SystemAdmin, "2");
        assert_eq!(
            labels(&nav_items(Some(&admin))),
            vec!["Stores", "Dashboard", "Admin", "Logout"]
        );
    }
}
