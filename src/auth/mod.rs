//! Authentication and session management for StoreRate

mod session;
mod types;

use log::info;

use crate::error::Error;
use crate::fetch::ApiContext;
use crate::validation;

pub use session::*;
pub use types::*;

/// Client for the `/auth` endpoints and the password update.
///
/// Signup and login write the session store; logout clears it.
#[derive(Clone, Debug)]
pub struct Auth {
    ctx: ApiContext,
}

impl Auth {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and start a session for it.
    ///
    /// The signup response carries no role, so the requested role is stored.
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<AuthResponse, Error> {
        validation::validate_signup(request)?;

        let builder = self.ctx.post_anonymous("/auth/signup").json(request)?;
        let result: AuthResponse = self.ctx.execute(builder).await?;

        let role = result.role.unwrap_or(request.role);
        self.ctx
            .session()
            .set_session(result.token.clone(), role, result.user_id.clone())?;
        info!("Signed up {} as {}", request.email, role);

        Ok(result)
    }

    /// Sign in with email and password and start a session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        validation::validate_login(email, password)?;

        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let builder = self.ctx.post_anonymous("/auth/login").json(&body)?;
        let result: AuthResponse = self.ctx.execute(builder).await?;

        let role = result
            .role
            .ok_or_else(|| Error::general("Login response did not include a role"))?;
        self.ctx
            .session()
            .set_session(result.token.clone(), role, result.user_id.clone())?;
        info!("Signed in {} as {}", body.email, role);

        Ok(result)
    }

    /// Sign out locally. The backend keeps no server-side session to revoke.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.ctx.session().clear_session()
    }

    /// Change the signed-in user's password
    pub async fn update_password(&self, current_password: &str, new_password: &str) -> Result<(), Error> {
        validation::validate_password_update(current_password, new_password)?;

        let body = PasswordUpdate {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let builder = self.ctx.put("/users/password").json(&body)?;
        self.ctx.execute_empty(builder).await
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        self.ctx.session().get_session()
    }
}
