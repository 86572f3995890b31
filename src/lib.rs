//! StoreRate Rust Client Library
//!
//! A Rust client for the StoreRate store-rating service: authentication and
//! session handling, route guarding, the REST API, and headless models of the
//! application's screens.

pub mod auth;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod format;
pub mod guard;
pub mod nav;
pub mod pages;
pub mod ratings;
pub mod routes;
pub mod stores;
pub mod users;
pub mod validation;

use log::debug;
use reqwest::Client;

use crate::auth::{Auth, SessionStore};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::ApiContext;
use crate::guard::Decision;
use crate::nav::NavItem;
use crate::ratings::RatingsClient;
use crate::stores::StoresClient;
use crate::users::UsersClient;

/// The main entry point for the StoreRate client
#[derive(Clone, Debug)]
pub struct StoreRate {
    /// Client options
    pub options: ClientOptions,
    ctx: ApiContext,
    auth: Auth,
}

impl StoreRate {
    /// Create a new client with an in-memory session
    ///
    /// # Example
    ///
    /// ```
    /// use storerate_client::StoreRate;
    ///
    /// let client = StoreRate::new("http://localhost:5000/api").unwrap();
    /// assert!(!client.session().is_authenticated());
    /// ```
    pub fn new(api_url: &str) -> Result<Self, Error> {
        Self::new_with_options(ClientOptions::default().with_api_url(api_url))
    }

    /// Create a new client with custom options.
    ///
    /// When `options.session_file` is set, the session is restored from and
    /// persisted to that file.
    ///
    /// ```no_run
    /// use storerate_client::{StoreRate, config::ClientOptions};
    ///
    /// let options = ClientOptions::from_env().with_session_file("/tmp/storerate-session.json");
    /// let client = StoreRate::new_with_options(options).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self, Error> {
        let session = match &options.session_file {
            Some(path) => SessionStore::open_file(path)?,
            None => SessionStore::in_memory(),
        };
        Self::with_session(options, session)
    }

    /// Create a new client sharing an existing session store
    pub fn with_session(options: ClientOptions, session: SessionStore) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        debug!("StoreRate client for {}", options.api_url);
        let ctx = ApiContext::new(http_client, session, &options);
        let auth = Auth::new(ctx.clone());

        Ok(Self { options, ctx, auth })
    }

    /// Get a reference to the auth client for signup, login and logout
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Client for user management
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.ctx.clone())
    }

    /// Client for the store listing and store management
    pub fn stores(&self) -> StoresClient {
        StoresClient::new(self.ctx.clone())
    }

    /// Client for ratings
    pub fn ratings(&self) -> RatingsClient {
        RatingsClient::new(self.ctx.clone())
    }

    /// The shared session store
    pub fn session(&self) -> &SessionStore {
        self.ctx.session()
    }

    /// Guard decision for navigating to `path` with the current session
    pub fn navigate(&self, path: &str) -> Decision {
        routes::resolve(path, self.session().get_session().as_ref())
    }

    /// Navigation bar entries for the current session
    pub fn nav_items(&self) -> Vec<NavItem> {
        nav::nav_items(self.session().get_session().as_ref())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Role, Session, SessionStore};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::guard::{Decision, Requirement};
    pub use crate::routes::Route;
    pub use crate::StoreRate;
}
