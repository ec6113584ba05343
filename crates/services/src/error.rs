//! Shared error types for the services crate.

use thiserror::Error;

use academy_core::ledger::LedgerError;
use academy_core::model::UserError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Coarse classification used to decide how a failure is shown to the learner.
///
/// None of these are fatal; the learner can always retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A lesson, subject, or user record does not exist.
    NotFound,
    /// Input was rejected before anything changed.
    Validation,
    /// No account matches, or nobody is signed in.
    Authentication,
    /// The request no longer matches stored state.
    Conflict,
    Storage,
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] UserError),
    #[error("an account with email {0} already exists")]
    EmailTaken(String),
    #[error("no account found for {0}; sign up first")]
    UnknownEmail(String),
    #[error("nobody is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AccountError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_) | AccountError::EmailTaken(_) => ErrorKind::Validation,
            AccountError::UnknownEmail(_) | AccountError::NotSignedIn => {
                ErrorKind::Authentication
            }
            AccountError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonError {
    #[error("nobody is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LessonError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            LessonError::NotSignedIn => ErrorKind::Authentication,
            LessonError::Ledger(LedgerError::LessonNotFound(_)) => ErrorKind::NotFound,
            LessonError::Ledger(LedgerError::Locked(_)) => ErrorKind::Validation,
            LessonError::Ledger(_) => ErrorKind::Conflict,
            LessonError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressViewError {
    #[error("nobody is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProgressViewError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressViewError::NotSignedIn => ErrorKind::Authentication,
            ProgressViewError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
