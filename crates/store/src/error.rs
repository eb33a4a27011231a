use thiserror::Error;

/// Errors that can occur when interacting with the store.
///
/// Every variant means the storage layer itself is unavailable or broken.
/// Missing rows are not errors here: lookups return `None` and deletes of
/// absent keys are no-ops.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
