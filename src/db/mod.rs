pub mod entries;
pub mod insights;
pub mod pool;
pub mod seed;

pub use pool::{create_pool, run_migrations};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row referenced a journal entry that does not exist.
    #[error("{0}")]
    Integrity(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::Integrity(db_err.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
