//! Session management for authentication

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tempfile::NamedTempFile;

use super::Role;
use crate::error::Error;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the role
pub const ROLE_KEY: &str = "role";
/// Storage key holding the user id
pub const USER_ID_KEY: &str = "userId";

/// Session data
///
/// All three fields exist together; "no session" is `None` at the store level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token
    pub token: String,

    /// The role the backend reported for this user
    pub role: Role,

    /// The user ID
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl Session {
    /// Create a new session
    pub fn new(token: impl Into<String>, role: Role, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role,
            user_id: user_id.into(),
        }
    }

    fn to_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        values.insert(TOKEN_KEY.to_string(), self.token.clone());
        values.insert(ROLE_KEY.to_string(), self.role.as_str().to_string());
        values.insert(USER_ID_KEY.to_string(), self.user_id.clone());
        values
    }

    /// Rebuild a session from persisted values.
    ///
    /// Returns `Ok(None)` when no key is present and `Err` when only some are,
    /// or when the role is not one we know.
    fn from_values(values: &HashMap<String, String>) -> Result<Option<Self>, String> {
        let token = values.get(TOKEN_KEY).filter(|v| !v.is_empty());
        let role = values.get(ROLE_KEY).filter(|v| !v.is_empty());
        let user_id = values.get(USER_ID_KEY).filter(|v| !v.is_empty());

        match (token, role, user_id) {
            (None, None, None) => Ok(None),
            (Some(token), Some(role), Some(user_id)) => {
                let role = role
                    .parse::<Role>()
                    .map_err(|_| format!("unknown role {:?}", role))?;
                Ok(Some(Self::new(token.clone(), role, user_id.clone())))
            }
            _ => Err("incomplete session".to_string()),
        }
    }
}

/// Durable key/value backend for the session
///
/// `save` replaces the whole set of keys in one operation.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<HashMap<String, String>, Error>;
    fn save(&self, values: &HashMap<String, String>) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// In-process storage; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with raw values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<HashMap<String, String>, Error> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.clone())
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<(), Error> {
        let mut current = self.values.lock().unwrap_or_else(|e| e.into_inner());
        *current = values.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut current = self.values.lock().unwrap_or_else(|e| e.into_inner());
        current.clear();
        Ok(())
    }
}

/// Session persisted as a flat JSON object in a file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<HashMap<String, String>, Error> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&text) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(HashMap::new())
            }
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<(), Error> {
        fs::create_dir_all(self.dir())?;
        // Write to a uniquely named sibling and rename it over the session file,
        // so readers see either the old or the new session.
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(&serde_json::to_vec_pretty(values)?)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-wide session state, shared by the API clients, guard and pages.
///
/// The only writers are `set_session` and `clear_session`; both persist first
/// and swap the in-memory value under the same write lock.
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// A store with nothing persisted
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    /// Open a store on top of `storage`, restoring any persisted session.
    ///
    /// A partial or invalid persisted session is discarded and wiped.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Result<Self, Error> {
        let values = storage.load()?;
        let session = match Session::from_values(&values) {
            Ok(session) => session,
            Err(reason) => {
                warn!("Discarding persisted session: {}", reason);
                storage.clear()?;
                None
            }
        };
        if let Some(ref session) = session {
            info!("Restored session for user {} ({})", session.user_id, session.role);
        }
        Ok(Self {
            current: Arc::new(RwLock::new(session)),
            storage,
        })
    }

    /// Open a store persisted in a JSON file
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::open(Arc::new(FileStorage::new(path)))
    }

    /// Replace the session with all three fields at once
    pub fn set_session(
        &self,
        token: impl Into<String>,
        role: Role,
        user_id: impl Into<String>,
    ) -> Result<(), Error> {
        let session = Session::new(token, role, user_id);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        self.storage.save(&session.to_values())?;
        info!("Session started for user {} ({})", session.user_id, session.role);
        *current = Some(session);
        Ok(())
    }

    /// The current session, if any
    pub fn get_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drop the session from memory and storage
    pub fn clear_session(&self) -> Result<(), Error> {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        self.storage.clear()?;
        if current.take().is_some() {
            info!("Session cleared");
        }
        Ok(())
    }

    /// The bearer token, if signed in
    pub fn token(&self) -> Option<String> {
        self.get_session().map(|s| s.token)
    }

    /// The role, if signed in
    pub fn role(&self) -> Option<Role> {
        self.get_session().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let store = SessionStore::in_memory();
        store.set_session("tok", Role::StoreOwner, "42").unwrap();
        assert_eq!(
            store.get_session(),
            Some(Session::new("tok", Role::StoreOwner, "42"))
        );

        store.clear_session().unwrap();
        assert_eq!(store.get_session(), None);
        assert_eq!(store.token(), None);
        assert_eq!(store.role(), None);
    }

    #[test]
    fn test_set_persists_all_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::open(storage.clone()).unwrap();
        store.set_session("tok", Role::SystemAdmin, "7").unwrap();

        let values = storage.load().unwrap();
        assert_eq!(values.get(TOKEN_KEY).map(String::as_str), Some("tok"));
        assert_eq!(values.get(ROLE_KEY).map(String::as_str), Some("system_admin"));
        assert_eq!(values.get(USER_ID_KEY).map(String::as_str), Some("7"));

        store.clear_session().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_partial_persisted_session_is_discarded() {
        let mut values = HashMap::new();
        values.insert(TOKEN_KEY.to_string(), "tok".to_string());
        let storage = Arc::new(MemoryStorage::with_values(values));

        let store = SessionStore::open(storage.clone()).unwrap();
        assert_eq!(store.get_session(), None);
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_role_is_discarded() {
        let mut values = HashMap::new();
        values.insert(TOKEN_KEY.to_string(), "tok".to_string());
        values.insert(ROLE_KEY.to_string(), "admin".to_string());
        values.insert(USER_ID_KEY.to_string(), "1".to_string());
        let store = SessionStore::open(Arc::new(MemoryStorage::with_values(values))).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open_file(&path).unwrap();
        store.set_session("tok", Role::NormalUser, "3").unwrap();
        drop(store);

        let reopened = SessionStore::open_file(&path).unwrap();
        assert_eq!(
            reopened.get_session(),
            Some(Session::new("tok", Role::NormalUser, "3"))
        );

        reopened.clear_session().unwrap();
        assert!(!path.exists());
        assert!(!SessionStore::open_file(&path).unwrap().is_authenticated());
    }

    #[test]
    fn test_concurrent_saves_leave_one_whole_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = SessionStore::open_file(&path).unwrap();
                    for _ in 0..20 {
                        store
                            .set_session(format!("tok-{}", i), Role::StoreOwner, i.to_string())
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let session = SessionStore::open_file(&path).unwrap().get_session().unwrap();
        assert_eq!(session.token, format!("tok-{}", session.user_id));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_corrupt_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let store = SessionStore::open_file(&path).unwrap();
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set_session("tok", Role::NormalUser, "1").unwrap();
        assert!(other.is_authenticated());
        other.clear_session().unwrap();
        assert!(!store.is_authenticated());
    }
}
