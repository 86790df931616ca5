//! Shared error types for the services crate.
//!
//! The progress and resolver surfaces are total by design (they degrade to
//! safe defaults instead of raising), so the only fallible operation left is
//! bootstrapping storage.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
