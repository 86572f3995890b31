//! Configuration options for the StoreRate client

use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "STORERATE_API_URL";

/// Configuration options for the StoreRate client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The API base URL, e.g. `http://localhost:5000/api`
    pub api_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Quiet period before a search query is sent
    pub search_debounce: Duration,

    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,

    /// Whether a 401 from the backend drops the local session
    pub clear_session_on_unauthorized: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            search_debounce: Duration::from_millis(300),
            session_file: None,
            clear_session_on_unauthorized: true,
        }
    }
}

impl ClientOptions {
    /// Defaults, with the API URL taken from `STORERATE_API_URL` when set
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => options.with_api_url(&url),
            _ => options,
        }
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_api_url(mut self, value: &str) -> Self {
        self.api_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the search debounce quiet period
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Persist the session to the given file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Set whether a 401 response clears the session
    pub fn with_clear_session_on_unauthorized(mut self, value: bool) -> Self {
        self.clear_session_on_unauthorized = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.api_url, DEFAULT_API_URL);
        assert_eq!(options.search_debounce, Duration::from_millis(300));
        assert!(options.session_file.is_none());
        assert!(options.clear_session_on_unauthorized);
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let options = ClientOptions::default().with_api_url("https://rate.example.com/api/");
        assert_eq!(options.api_url, "https://rate.example.com/api");
    }
}
