//! # User Directory
//!
//! Account signup and credential checks.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(username, password)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... FROM users WHERE username = ?                               │
//! │       │                                                                 │
//! │       ├── no row ──► hash against a throwaway salt ──► Ok(None)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_password(password, row.salt, row.password_hash)                 │
//! │       │                                                                 │
//! │       ├── mismatch ──► Ok(None)                                         │
//! │       └── match    ──► Ok(Some(UserProfile))                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Unknown user and wrong password are indistinguishable to the caller and
//! in the logs.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use shelf_core::credentials::{generate_salt, hash_password, verify_password};
use shelf_core::validation::{require_non_blank, require_valid_email};
use shelf_core::UserProfile;

/// Salt used to burn the same hashing work when the username is unknown.
const UNKNOWN_USER_SALT: &str = "00000000000000000000000000000000";

/// Full `users` row, credentials included. Never leaves this module.
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    user_id: i64,
    username: String,
    email: String,
    role: String,
    password_hash: String,
    salt: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        UserProfile {
            user_id: record.user_id,
            username: record.username,
            email: record.email,
            role: record.role,
        }
    }
}

/// Signup, login and username lookups over the `users` table.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

impl UserDirectory {
    /// Creates a new UserDirectory.
    pub fn new(pool: SqlitePool) -> Self {
        UserDirectory { pool }
    }

    /// Creates an account and returns its id.
    ///
    /// ## Stored Values
    /// - username and email trimmed
    /// - role trimmed and lower-cased
    /// - a fresh salt and `hash_password(password, salt)`; the password
    ///   itself is hashed exactly as typed
    ///
    /// ## Errors
    /// - `DbError::Validation` for a blank field or a malformed email
    /// - `DbError::Conflict` when the username is taken
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> DbResult<i64> {
        require_non_blank(username, "Username")?;
        require_valid_email(email, "Email")?;
        require_non_blank(password, "Password")?;
        require_non_blank(role, "Role")?;

        let username = username.trim();
        if self.exists(username).await? {
            return Err(DbError::conflict("Username", username));
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let role = role.trim().to_lowercase();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, salt, role)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(username)
        .bind(email.trim())
        .bind(&password_hash)
        .bind(&salt)
        .bind(&role)
        .execute(&self.pool)
        .await
        // A concurrent signup can still win the race to the UNIQUE index.
        .map_err(|e| match DbError::from(e) {
            DbError::Conflict { field, .. } => DbError::conflict(field, username),
            other => other,
        })?;

        let user_id = result.last_insert_rowid();
        info!(user_id, username = %username, role = %role, "User signed up");
        Ok(user_id)
    }

    /// Checks a username/password pair.
    ///
    /// The username must match exactly as stored. Returns `Ok(None)` for an
    /// unknown username and for a wrong password alike.
    pub async fn login(&self, username: &str, password: &str) -> DbResult<Option<UserProfile>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT user_id, username, email, role, password_hash, salt
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(record) = record else {
            std::hint::black_box(hash_password(password, UNKNOWN_USER_SALT));
            warn!(username = %username, "Rejected login");
            return Ok(None);
        };

        if !verify_password(password, &record.salt, &record.password_hash) {
            warn!(username = %username, "Rejected login");
            return Ok(None);
        }

        debug!(user_id = record.user_id, "Login accepted");
        Ok(Some(record.into()))
    }

    /// True when an account with exactly this username exists. No trimming.
    pub async fn exists(&self, username: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
