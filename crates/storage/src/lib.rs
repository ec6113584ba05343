//! Record store for user profiles and the signed-in session.
#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryRepository, SessionRepository, Storage, StorageError, UserRepository};
