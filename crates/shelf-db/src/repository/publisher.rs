//! # Publisher Repository
//!
//! Database operations for publishers.

use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_max_length, validate_publisher, MAX_CITY};
use shelf_core::{Publisher, PublisherInput};

/// Repository for publisher database operations.
#[derive(Debug, Clone)]
pub struct PublisherRepository {
    pool: SqlitePool,
}

impl PublisherRepository {
    /// Creates a new PublisherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PublisherRepository { pool }
    }

    pub async fn find_all(&self) -> DbResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT publisher_id, name, city, country, contact_info
            FROM publisher
            ORDER BY publisher_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(publishers)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Publisher>> {
        let publisher = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT publisher_id, name, city, country, contact_info
            FROM publisher
            WHERE publisher_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(publisher)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publisher")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against name, city, country and contact info.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Publisher>> {
        debug!(keyword = %keyword, "Searching publishers");

        let publishers = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT publisher_id, name, city, country, contact_info
            FROM publisher
            WHERE name LIKE ?1
               OR city LIKE ?1
               OR country LIKE ?1
               OR contact_info LIKE ?1
            ORDER BY publisher_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        Ok(publishers)
    }

    /// Filters by name, city and country.
    pub async fn search_filtered(
        &self,
        name: &str,
        city: &str,
        country: &str,
    ) -> DbResult<Vec<Publisher>> {
        let (name, name_like) = filter_binds(name);
        let (city, city_like) = filter_binds(city);
        let (country, country_like) = filter_binds(country);

        let publishers = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT publisher_id, name, city, country, contact_info
            FROM publisher
            WHERE (?1 = '' OR name LIKE ?2)
              AND (?3 = '' OR city LIKE ?4)
              AND (?5 = '' OR country LIKE ?6)
            ORDER BY publisher_id
            "#,
        )
        .bind(name)
        .bind(name_like)
        .bind(city)
        .bind(city_like)
        .bind(country)
        .bind(country_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(publishers)
    }

    pub async fn insert(&self, input: &PublisherInput) -> DbResult<i64> {
        validate_publisher(input)?;
        let input = input.trimmed();

        debug!(name = %input.name, country = %input.country, "Inserting publisher");

        let result = sqlx::query(
            r#"
            INSERT INTO publisher (name, city, country, contact_info)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.country)
        .bind(&input.contact_info)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &PublisherInput) -> DbResult<bool> {
        require_id(id, "Publisher ID")?;
        validate_publisher(input)?;
        let input = input.trimmed();

        debug!(id = %id, "Updating publisher");

        let result = sqlx::query(
            r#"
            UPDATE publisher SET
                name = ?2,
                city = ?3,
                country = ?4,
                contact_info = ?5
            WHERE publisher_id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.country)
        .bind(&input.contact_info)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Replaces only the city. `None` clears it.
    pub async fn update_city(&self, id: i64, city: Option<&str>) -> DbResult<bool> {
        require_id(id, "Publisher ID")?;
        require_max_length(city, MAX_CITY, "City")?;

        debug!(id = %id, "Updating publisher city");

        let result = sqlx::query("UPDATE publisher SET city = ?2 WHERE publisher_id = ?1")
            .bind(id)
            .bind(city.map(str::trim))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Deletes a publisher. Books still pointing at it block the delete.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting publisher");

        let result = sqlx::query("DELETE FROM publisher WHERE publisher_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
