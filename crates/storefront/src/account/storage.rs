//! Key/value storage areas for account state.
//!
//! Browsers keep the selected account and per-account data in local storage
//! and the sign-in result in session storage. Here both areas live in the
//! visitor's server-side session, separated by a namespace prefix.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tower_sessions::Session;

/// Errors raised by a storage area.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// A string key/value storage area.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set_item(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Process-local storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Session keys of the persistent area.
const LOCAL_NAMESPACE: &str = "local";
/// Session keys of the per-tab area.
const SESSION_NAMESPACE: &str = "session";

/// A storage area inside a visitor's session.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    session: Session,
    namespace: &'static str,
}

impl SessionStorage {
    /// The persistent area (browser local storage).
    #[must_use]
    pub const fn local(session: Session) -> Self {
        Self {
            session,
            namespace: LOCAL_NAMESPACE,
        }
    }

    /// The sign-in area (browser session storage).
    #[must_use]
    pub const fn session(session: Session) -> Self {
        Self {
            session,
            namespace: SESSION_NAMESPACE,
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

impl Storage for SessionStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(&self.scoped(key)).await?)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.session.insert(&self.scoped(key), value).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.session.remove_value(&self.scoped(key)).await?;
        Ok(())
    }
}
