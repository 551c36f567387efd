use dosemate_core::error::CoreError;

/// Error returned by every store operation.
///
/// Domain failures (validation, missing user, duplicate email) are reported
/// as [`CoreError`] so both store implementations fail the same way; only
/// the Postgres store produces the `Database` variant.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
