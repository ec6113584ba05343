//! Application services: accounts, the two-phase lesson flow, and dashboard views.
#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod error;
pub mod lesson_service;
pub mod progress_service;

pub use academy_core::Clock;

pub use account_service::{AccountService, UserSummary};
pub use app_services::AppServices;
pub use error::{AccountError, AppServicesError, ErrorKind, LessonError, ProgressViewError};
pub use lesson_service::{CommitReport, LessonService, LessonView};
pub use progress_service::{DashboardView, ProgressService};
