//! Error handling for the StoreRate client

use std::fmt;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Message shown when no response was received at all
pub const NETWORK_FALLBACK: &str = "Network error, please try again";

/// Unified error type for the StoreRate client
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected locally before anything was sent
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Non-success response from the backend
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw description of the failure
        message: String,
        /// Reason string provided by the server, if any
        reason: Option<String>,
    },

    /// No response was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error from a status and an optional server reason
    pub fn api(status: u16, reason: Option<String>) -> Self {
        let message = match &reason {
            Some(reason) => reason.clone(),
            None => format!("Request failed with status {}", status),
        };
        Error::Api { status, message, reason }
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the backend reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The single human-readable message a screen shows for this error.
    ///
    /// Server-provided reasons win; otherwise `fallback` is used, except for
    /// transport failures which always get the generic retry hint.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api { reason: Some(reason), .. } if !reason.is_empty() => reason.clone(),
            Error::Validation(errors) => errors
                .first_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            Error::Network(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                NETWORK_FALLBACK.to_string()
            }
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_reason() {
        let err = Error::api(400, Some("Store already rated".to_string()));
        assert_eq!(err.user_message("Error submitting rating"), "Store already rated");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = Error::api(500, None);
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
        assert_eq!(err.to_string(), "API error (500): Request failed with status 500");
    }

    #[test]
    fn test_status_helpers() {
        assert!(Error::api(401, None).is_unauthorized());
        assert!(Error::api(404, None).is_not_found());
        assert!(!Error::general("boom").is_unauthorized());
    }
}
