//! # Borrower Repository
//!
//! Database operations for library members.
//!
//! `type_id` must name a row in `borrower_type` (1 student, 2 staff,
//! 3 public out of the box); anything else is refused by the store.

use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_max_length, validate_borrower, MAX_CONTACT_INFO};
use shelf_core::{Borrower, BorrowerInput};

/// Repository for borrower database operations.
#[derive(Debug, Clone)]
pub struct BorrowerRepository {
    pool: SqlitePool,
}

impl BorrowerRepository {
    /// Creates a new BorrowerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BorrowerRepository { pool }
    }

    pub async fn find_all(&self) -> DbResult<Vec<Borrower>> {
        let borrowers = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT borrower_id, first_name, last_name, type_id, contact_info
            FROM borrower
            ORDER BY borrower_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowers)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT borrower_id, first_name, last_name, type_id, contact_info
            FROM borrower
            WHERE borrower_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(borrower)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrower")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against first name, last name and contact info.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Borrower>> {
        debug!(keyword = %keyword, "Searching borrowers");

        let borrowers = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT borrower_id, first_name, last_name, type_id, contact_info
            FROM borrower
            WHERE first_name LIKE ?1
               OR last_name LIKE ?1
               OR contact_info LIKE ?1
            ORDER BY borrower_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowers)
    }

    /// Filters by full name and contact info.
    pub async fn search_filtered(&self, name: &str, contact: &str) -> DbResult<Vec<Borrower>> {
        let (name, name_like) = filter_binds(name);
        let (contact, contact_like) = filter_binds(contact);

        let borrowers = sqlx::query_as::<_, Borrower>(
            r#"
            SELECT borrower_id, first_name, last_name, type_id, contact_info
            FROM borrower
            WHERE (?1 = '' OR first_name || ' ' || last_name LIKE ?2)
              AND (?3 = '' OR contact_info LIKE ?4)
            ORDER BY borrower_id
            "#,
        )
        .bind(name)
        .bind(name_like)
        .bind(contact)
        .bind(contact_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowers)
    }

    pub async fn insert(&self, input: &BorrowerInput) -> DbResult<i64> {
        validate_borrower(input)?;
        let input = input.trimmed();

        debug!(first_name = %input.first_name, type_id = input.type_id, "Inserting borrower");

        let result = sqlx::query(
            r#"
            INSERT INTO borrower (first_name, last_name, type_id, contact_info)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.type_id)
        .bind(&input.contact_info)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &BorrowerInput) -> DbResult<bool> {
        require_id(id, "Borrower ID")?;
        validate_borrower(input)?;
        let input = input.trimmed();

        debug!(id = %id, "Updating borrower");

        let result = sqlx::query(
            r#"
            UPDATE borrower SET
                first_name = ?2,
                last_name = ?3,
                type_id = ?4,
                contact_info = ?5
            WHERE borrower_id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.type_id)
        .bind(&input.contact_info)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Replaces only the contact info. `None` clears it.
    pub async fn update_contact(&self, id: i64, contact_info: Option<&str>) -> DbResult<bool> {
        require_id(id, "Borrower ID")?;
        require_max_length(contact_info, MAX_CONTACT_INFO, "Contact info")?;

        debug!(id = %id, "Updating borrower contact");

        let result = sqlx::query("UPDATE borrower SET contact_info = ?2 WHERE borrower_id = ?1")
            .bind(id)
            .bind(contact_info.map(str::trim))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting borrower");

        let result = sqlx::query("DELETE FROM borrower WHERE borrower_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
