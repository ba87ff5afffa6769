use thiserror::Error;

use khata_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
///
/// Infrastructure failures (concurrency, missing documents, lock state) as
/// opposed to domain errors, which pass through via `Domain`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An optimistic version check failed: the snapshot the caller validated
    /// against went stale before the commit.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("document not found: {0}")]
    MissingDocument(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("lock poisoned")]
    LockPoisoned,
}
