use academy_core::model::UserProfile;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The registered-user collection.
///
/// Callers read the whole collection, change one record, and write the whole
/// collection back. Last write wins.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load every stored profile in insertion order. Empty when none exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read or decoded.
    async fn load_all_users(&self) -> Result<Vec<UserProfile>, StorageError>;

    /// Replace the stored collection with `users`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    async fn save_all_users(&self, users: &[UserProfile]) -> Result<(), StorageError>;
}

/// The signed-in user's working copy.
///
/// This is a separate snapshot, not a pointer into the user collection; the
/// two can drift apart.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be read or decoded.
    async fn load_current_session(&self) -> Result<Option<UserProfile>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    async fn save_current_session(&self, user: &UserProfile) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be removed.
    async fn clear_current_session(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<Vec<UserProfile>>>,
    session: Arc<Mutex<Option<UserProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            session: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn load_all_users(&self) -> Result<Vec<UserProfile>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_all_users(&self, users: &[UserProfile]) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = users.to_vec();
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn load_current_session(&self) -> Result<Option<UserProfile>, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_current_session(&self, user: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(user.clone());
        Ok(())
    }

    async fn clear_current_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the user and session repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Self { users, sessions }
    }
}
