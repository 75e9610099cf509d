//! # Database Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError          stored text that no longer parses  │
//! │            │                                       │                    │
//! │            └──────────────► DbError ◄──────────────┘                    │
//! │                                │                                        │
//! │                                ▼                                        │
//! │              ApiError::Storage (receipt-api), logged, 500               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing receipt is not an error here: lookups return `Option`.

use thiserror::Error;

/// Errors from the receipt store.
#[derive(Debug, Error)]
pub enum DbError {
    /// A receipt id (or an item position) is already taken.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A stored row could not be parsed back into a receipt, e.g. a
    /// `purchase_date` edited outside the service.
    #[error("Corrupt {entity} data for '{id}': {reason}")]
    DataCorruption {
        entity: String,
        id: String,
        reason: String,
    },

    /// Opening the database or the pool failed, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::DataCorruption {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// SQLite reports a unique failure only through the message text
/// (`UNIQUE constraint failed: receipts.id`). The offending value is unknown
/// at this point; the repository fills it in.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                match msg.strip_prefix("UNIQUE constraint failed: ") {
                    Some(field) => DbError::duplicate(field, "unknown"),
                    None => DbError::QueryFailed(msg.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
