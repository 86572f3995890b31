//! Types for authentication and user management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role as the backend spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NormalUser,
    StoreOwner,
    SystemAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::NormalUser, Role::StoreOwner, Role::SystemAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalUser => "normal_user",
            Self::StoreOwner => "store_owner",
            Self::SystemAdmin => "system_admin",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::NormalUser => "Normal User",
            Self::StoreOwner => "Store Owner",
            Self::SystemAdmin => "System Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal_user" => Ok(Self::NormalUser),
            "store_owner" => Ok(Self::StoreOwner),
            "system_admin" => Ok(Self::SystemAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: Role,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /users/password`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

/// Authentication response
///
/// Signup answers without a role; login includes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token
    pub token: String,

    /// The user ID, sent as a number or a string depending on the backend
    #[serde(rename = "userId", deserialize_with = "crate::fetch::string_or_number")]
    pub user_id: String,

    /// The role, when the endpoint reports it
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_auth_response_numeric_user_id() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"token":"t","userId":12,"role":"store_owner"}"#).unwrap();
        assert_eq!(resp.user_id, "12");
        assert_eq!(resp.role, Some(Role::StoreOwner));

        let resp: AuthResponse = serde_json::from_str(r#"{"token":"t","userId":"abc"}"#).unwrap();
        assert_eq!(resp.user_id, "abc");
        assert_eq!(resp.role, None);
    }

    #[test]
    fn test_password_update_body() {
        let body = serde_json::to_value(PasswordUpdate {
            current_password: "Old#pass1".to_string(),
            new_password: "New#pass1".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"currentPassword": "Old#pass1", "newPassword": "New#pass1"})
        );
    }
}
