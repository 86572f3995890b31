use super::Feedback;
use crate::auth::{Auth, Role};

/// The signed-in user's dashboard: role badge and password change
#[derive(Debug, Clone)]
pub struct DashboardPage {
    auth: Auth,
    pub current_password: String,
    pub new_password: String,
    pub loading: bool,
    pub success: Option<String>,
    pub feedback: Feedback,
}

impl DashboardPage {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            current_password: String::new(),
            new_password: String::new(),
            loading: false,
            success: None,
            feedback: Feedback::default(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.auth.get_session().map(|s| s.role)
    }

    /// Text of the role badge
    pub fn role_badge(&self) -> String {
        match self.role() {
            Some(role) => format!("Role: {}", role.label()),
            None => "Role: -".to_string(),
        }
    }

    pub async fn update_password(&mut self) -> bool {
        self.feedback.clear();
        self.success = None;
        self.loading = true;
        let result = self
            .auth
            .update_password(&self.current_password, &self.new_password)
            .await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.success = Some("Password updated successfully".to_string());
                self.current_password.clear();
                self.new_password.clear();
                true
            }
            Err(e) => {
                self.feedback.show(&e, "Error updating password");
                false
            }
        }
    }
}
