//! Shared error types for the services crate.

use thiserror::Error;

use hero_core::PlanError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `JourneyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JourneyServiceError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Journey(#[from] JourneyServiceError),
}
