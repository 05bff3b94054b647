//! Storage-specific error types.
//!
//! Diesel and r2d2 errors stay internal to this crate and are
//! flattened into `vesrate_core::RateError::Store` at the trait
//! boundary.

use diesel::result::Error as DieselError;
use thiserror::Error;
use vesrate_core::RateError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl From<StorageError> for RateError {
    fn from(err: StorageError) -> Self {
        RateError::Store(err.to_string())
    }
}
