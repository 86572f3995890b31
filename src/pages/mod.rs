//! Headless models of the application's screens
//!
//! Each page owns its local UI state (form fields, loading flag, messages and
//! fetched data) and drives the API clients. Rendering is left to the caller.

mod admin;
mod dashboard;
mod login;
mod register;
mod store_detail;
mod stores;

pub use admin::{AdminPage, AdminTab};
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use store_detail::{RatingState, StoreDetailPage};
pub use stores::StoresPage;

use crate::error::Error;
use crate::validation::ValidationErrors;

/// Messages a page shows after an action
///
/// Validation problems go next to their fields; everything else becomes the
/// single banner message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    pub message: Option<String>,
    pub fields: ValidationErrors,
}

impl Feedback {
    pub fn clear(&mut self) {
        self.message = None;
        self.fields = ValidationErrors::new();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Show `error`, using `fallback` when the server gave no reason
    pub fn show(&mut self, error: &Error, fallback: &str) {
        match error {
            Error::Validation(fields) => {
                self.message = None;
                self.fields = fields.clone();
            }
            other => {
                self.message = Some(other.user_message(fallback));
                self.fields = ValidationErrors::new();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.fields.is_empty()
    }
}
