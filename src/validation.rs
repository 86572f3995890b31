//! Client-side form validation
//!
//! These rules mirror the server's so obvious mistakes are reported next to the
//! field before a request is made. The server stays authoritative.

use std::fmt;

use crate::auth::SignupRequest;
use crate::error::Error;
use crate::stores::NewStore;
use crate::users::NewUser;

pub const NAME_MIN: usize = 20;
pub const NAME_MAX: usize = 60;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;
pub const ADDRESS_MAX: usize = 400;

/// A single field-level problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level problems collected from one form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for a given field, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing failed, otherwise an `Error::Validation`
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn check_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.trim().chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        errors.add(
            "name",
            format!("Name must be between {} and {} characters", NAME_MIN, NAME_MAX),
        );
    }
}

pub fn check_email(email: &str, errors: &mut ValidationErrors) {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !valid {
        errors.add("email", "Please enter a valid email address");
    }
}

pub fn check_password(field: &'static str, password: &str, errors: &mut ValidationErrors) {
    let len = password.chars().count();
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_special = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if len < PASSWORD_MIN || len > PASSWORD_MAX || !has_upper || !has_special {
        errors.add(
            field,
            format!(
                "Password must be {}-{} characters with at least one uppercase letter and one special character",
                PASSWORD_MIN, PASSWORD_MAX
            ),
        );
    }
}

pub fn check_address(address: Option<&str>, errors: &mut ValidationErrors) {
    if let Some(address) = address {
        if address.chars().count() > ADDRESS_MAX {
            errors.add(
                "address",
                format!("Address must be at most {} characters", ADDRESS_MAX),
            );
        }
    }
}

pub fn check_rating(rating: u8, errors: &mut ValidationErrors) {
    if !(1..=5).contains(&rating) {
        errors.add("rating", "Rating must be between 1 and 5");
    }
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    check_name(&req.name, &mut errors);
    check_email(&req.email, &mut errors);
    check_password("password", &req.password, &mut errors);
    check_address(req.address.as_deref(), &mut errors);
    errors.into_result()
}

pub fn validate_new_user(user: &NewUser) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    check_name(&user.name, &mut errors);
    check_email(&user.email, &mut errors);
    check_password("password", &user.password, &mut errors);
    check_address(user.address.as_deref(), &mut errors);
    errors.into_result()
}

pub fn validate_new_store(store: &NewStore) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    if store.name.trim().is_empty() {
        errors.add("name", "Store name is required");
    }
    check_email(&store.email, &mut errors);
    check_address(Some(&store.address), &mut errors);
    if store.owner_id.trim().is_empty() {
        errors.add("ownerId", "Owner is required");
    }
    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_password_update(current: &str, new: &str) -> Result<(), Error> {
    let mut errors = ValidationErrors::new();
    if current.is_empty() {
        errors.add("currentPassword", "Current password is required");
    }
    check_password("newPassword", new, &mut errors);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            address: None,
            role: Role::NormalUser,
        }
    }

    #[test]
    fn test_valid_signup() {
        let req = signup("Alexandra Montgomery Smith", "alex@example.com", "Secret#12");
        assert!(validate_signup(&req).is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let req = signup("Bob", "bob@example.com", "Secret#12");
        match validate_signup(&req) {
            Err(Error::Validation(errors)) => {
                assert!(errors.get("name").is_some());
                assert!(errors.get("email").is_none());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_every_role_passes_signup_validation() {
        for role in Role::ALL {
            let mut req = signup("Alexandra Montgomery Smith", "alex@example.com", "Secret#12");
            req.role = role;
            assert!(validate_signup(&req).is_ok(), "{} should be accepted", role);
        }
    }

    #[test]
    fn test_password_rules() {
        let mut errors = ValidationErrors::new();
        check_password("password", "secret#12", &mut errors);
        check_password("password", "Secret12", &mut errors);
        check_password("password", "S#1", &mut errors);
        check_password("password", "Secret#12345678901", &mut errors);
        assert_eq!(errors.errors().len(), 4);

        let mut errors = ValidationErrors::new();
        check_password("password", "Passw0rd!", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_rules() {
        for bad in ["", "plain", "@example.com", "a@b", "a@@b.com", "a@.com"] {
            let mut errors = ValidationErrors::new();
            check_email(bad, &mut errors);
            assert!(!errors.is_empty(), "{bad} should be rejected");
        }
        let mut errors = ValidationErrors::new();
        check_email("someone@shop.example.org", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_address_limit() {
        let mut errors = ValidationErrors::new();
        check_address(Some(&"x".repeat(400)), &mut errors);
        check_address(None, &mut errors);
        assert!(errors.is_empty());
        check_address(Some(&"x".repeat(401)), &mut errors);
        assert_eq!(errors.get("address"), Some("Address must be at most 400 characters"));
    }

    #[test]
    fn test_rating_bounds() {
        let mut errors = ValidationErrors::new();
        check_rating(0, &mut errors);
        check_rating(6, &mut errors);
        assert_eq!(errors.errors().len(), 2);
        let mut errors = ValidationErrors::new();
        (1..=5).for_each(|r| check_rating(r, &mut errors));
        assert!(errors.is_empty());
    }
}
