//! Mock authentication.
//!
//! There is no identity provider: the "signed in" user is a single record
//! kept in a key-value store under [`USER_STORAGE_KEY`]. Passwords are
//! accepted and ignored. [`AuthSession`] is created explicitly at startup
//! over an injected [`KeyValueStore`] and torn down with
//! [`AuthSession::logout`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;

/// Storage key of the signed-in user record.
pub const USER_STORAGE_KEY: &str = "sv:user";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// String key-value storage, in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// In-process store; contents die with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ClientError> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// A missing file reads as empty, and so does a file that is not a JSON
/// object of strings (it is replaced on the next write). Every write
/// rewrites the whole file through a temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, ClientError> {
        self.lock
            .lock()
            .map_err(|_| ClientError::Storage("file store lock poisoned".to_string()))
    }

    fn read_all(&self) -> Result<HashMap<String, String>, ClientError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Ok(HashMap::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable storage file"
                );
                Ok(HashMap::new())
            }
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self.guard()?;
        let mut entries = self.read_all()?;
        apply(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The current mock-authenticated user, backed by `S`.
#[derive(Debug)]
pub struct AuthSession<S: KeyValueStore> {
    store: S,
    user: Option<User>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Load the stored user, if any.
    ///
    /// An unreadable record is discarded and the session starts signed out.
    pub fn init(store: S) -> Result<Self, ClientError> {
        let user = match store.get(USER_STORAGE_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable stored user");
                    store.remove(USER_STORAGE_KEY)?;
                    None
                }
            },
        };

        Ok(Self { store, user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Create a fresh user and make it current. Replaces any stored user.
    pub fn signup(&mut self, name: &str, email: &str, _password: &str) -> Result<&User, ClientError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.store(user)
    }

    /// Sign in. The stored user is reused as-is; without one, a user named
    /// after the local part of `email` is created.
    pub fn login(&mut self, email: &str, _password: &str) -> Result<&User, ClientError> {
        if let Some(raw) = self.store.get(USER_STORAGE_KEY)? {
            if let Ok(user) = serde_json::from_str::<User>(&raw) {
                tracing::info!(user_id = %user.id, "Signed in stored user");
                return Ok(self.user.insert(user));
            }
        }

        let name = email.split('@').next().unwrap_or_default();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.store(user)
    }

    /// Forget the user, in memory and in storage.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.remove(USER_STORAGE_KEY)?;
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }

    /// Tear down the session, handing back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn store(&mut self, user: User) -> Result<&User, ClientError> {
        self.store
            .set(USER_STORAGE_KEY, &serde_json::to_string(&user)?)?;
        tracing::info!(user_id = %user.id, "Stored user");
        Ok(self.user.insert(user))
    }
}
