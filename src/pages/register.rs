use log::warn;

use super::Feedback;
use crate::auth::{Auth, Role, SignupRequest};
use crate::routes::Route;

/// Signup form
#[derive(Debug, Clone)]
pub struct RegisterPage {
    auth: Auth,
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: Role,
    pub loading: bool,
    pub feedback: Feedback,
}

impl RegisterPage {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            address: String::new(),
            role: Role::NormalUser,
            loading: false,
            feedback: Feedback::default(),
        }
    }

    fn request(&self) -> SignupRequest {
        let address = self.address.trim();
        SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            address: (!address.is_empty()).then(|| address.to_string()),
            role: self.role,
        }
    }

    /// Register and sign in; returns where to go next on success
    pub async fn submit(&mut self) -> Option<Route> {
        self.feedback.clear();
        self.loading = true;
        let result = self.auth.sign_up(&self.request()).await;
        self.loading = false;

        match result {
            Ok(_) => Some(Route::Dashboard),
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.feedback.show(&e, "Registration failed");
                None
            }
        }
    }
}
