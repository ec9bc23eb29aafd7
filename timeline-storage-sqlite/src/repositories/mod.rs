//! Repository implementations for SQLite storage

pub mod account;
pub mod customer;
pub mod product;

pub use account::SqliteAccountRepository;
pub use customer::SqliteCustomerRepository;
pub use product::SqliteProductRepository;

use chrono::{DateTime, Utc};
use timeline_core::{Error, error::StorageError};

/// Map a sqlx error into the storage taxonomy.
///
/// Unique-key violations become [`StorageError::Constraint`] so services can
/// report them as duplicates; everything else is logged and reported as a
/// database failure.
pub(crate) fn map_sqlx_err(error: sqlx::Error, context: &str) -> Error {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return StorageError::Constraint(db_error.message().to_string()).into();
        }
    }

    tracing::error!(error = %error, "{context}");
    StorageError::Database(format!("{context}: {error}")).into()
}

/// Decode a stored timestamp. Record timestamps are unix milliseconds.
pub(crate) fn timestamp(millis: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::Database(format!("Invalid timestamp: {millis}")).into())
}

pub(crate) fn optional_timestamp(millis: Option<i64>) -> Result<Option<DateTime<Utc>>, Error> {
    millis.map(timestamp).transpose()
}
