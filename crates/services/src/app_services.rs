use std::sync::Arc;

use storage::repository::Storage;

use crate::account_service::AccountService;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    accounts: Arc<AccountService>,
    lessons: Arc<LessonService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an existing storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let accounts = Arc::new(AccountService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.sessions),
        ));
        let lessons = Arc::new(LessonService::new(
            Arc::clone(&storage.users),
            Arc::clone(&storage.sessions),
        ));
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.sessions)));

        Self {
            accounts,
            lessons,
            progress,
        }
    }

    /// Services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
