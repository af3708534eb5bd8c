//! # Database Error Types
//!
//! Error types for repository, directory and report operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (shelf-core)      SQLite Error (sqlx::Error)           │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  DbError::Validation         DbError::{UniqueViolation, Query...}       │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │            DbError::kind() → Validation | Conflict | Storage            │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │            Caller decides: show message / ask again / report failure    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "No such id" is not an error: updates and deletes report it as `Ok(false)`
//! and `find_by_id` as `Ok(None)`.

use shelf_core::ValidationError;
use thiserror::Error;

/// Coarse grouping of [`DbError`] for callers that only branch on category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input was rejected before anything was written.
    Validation,
    /// The value clashes with an existing record (duplicate username).
    Conflict,
    /// The store refused or failed the statement.
    Storage,
}

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A field failed its check. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A business-level duplicate.
    ///
    /// ## When This Occurs
    /// - Signing up with a username that already exists
    ///
    /// `value` is `None` when the store reported the clash without the
    /// offending value.
    #[error("{}", conflict_message(.field, .value.as_deref()))]
    Conflict { field: String, value: Option<String> },

    /// Unique constraint violation on a column with no business meaning
    /// attached. `field` is SQLite's `table.column`.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - A loan or sale naming a book/borrower that does not exist
    /// - Deleting an author, book or borrower still referenced elsewhere
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - CHECK / NOT NULL constraint refused the row
    /// - Runtime SQL error
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a Conflict error.
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Conflict {
            field: field.into(),
            value: Some(value.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Validation(_) => ErrorKind::Validation,
            DbError::Conflict { .. } => ErrorKind::Conflict,
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => ErrorKind::Storage,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
///   users.username UNIQUE     → DbError::Conflict
///   other UNIQUE              → DbError::UniqueViolation
///   FOREIGN KEY               → DbError::ForeignKeyViolation
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    if field == "users.username" {
                        DbError::Conflict {
                            field: "Username".to_string(),
                            value: None,
                        }
                    } else {
                        DbError::UniqueViolation {
                            field: field.to_string(),
                        }
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

fn conflict_message(field: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{field} '{value}' is already taken"),
        None => format!("{field} is already taken"),
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
