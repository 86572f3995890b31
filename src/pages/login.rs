use log::warn;

use super::Feedback;
use crate::auth::Auth;
use crate::routes::Route;

/// Login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    auth: Auth,
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub feedback: Feedback,
}

impl LoginPage {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            email: String::new(),
            password: String::new(),
            loading: false,
            feedback: Feedback::default(),
        }
    }

    /// Sign in; returns where to go next on success
    pub async fn submit(&mut self) -> Option<Route> {
        self.feedback.clear();
        self.loading = true;
        let result = self.auth.sign_in(&self.email, &self.password).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.password.clear();
                Some(Route::Stores)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.feedback.show(&e, "Login failed");
                None
            }
        }
    }
}
