//! # Author Repository
//!
//! Database operations for authors.

use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_max_length, validate_author, MAX_BIO};
use shelf_core::{Author, AuthorInput};

/// Repository for author database operations.
#[derive(Debug, Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    /// Creates a new AuthorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuthorRepository { pool }
    }

    /// Lists every author, oldest first.
    pub async fn find_all(&self) -> DbResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT author_id, first_name, last_name, country, bio
            FROM author
            ORDER BY author_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Gets an author by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Author))` - Author found
    /// * `Ok(None)` - No author with that id
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT author_id, first_name, last_name, country, bio
            FROM author
            WHERE author_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM author")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against first name, last name, country and bio.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Author>> {
        debug!(keyword = %keyword, "Searching authors");

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT author_id, first_name, last_name, country, bio
            FROM author
            WHERE first_name LIKE ?1
               OR last_name LIKE ?1
               OR country LIKE ?1
               OR bio LIKE ?1
            ORDER BY author_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = authors.len(), "Search returned authors");
        Ok(authors)
    }

    /// Filters by full name (`"First Last"`), country and bio.
    pub async fn search_filtered(
        &self,
        name: &str,
        country: &str,
        bio: &str,
    ) -> DbResult<Vec<Author>> {
        let (name, name_like) = filter_binds(name);
        let (country, country_like) = filter_binds(country);
        let (bio, bio_like) = filter_binds(bio);

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT author_id, first_name, last_name, country, bio
            FROM author
            WHERE (?1 = '' OR first_name || ' ' || last_name LIKE ?2)
              AND (?3 = '' OR country LIKE ?4)
              AND (?5 = '' OR bio LIKE ?6)
            ORDER BY author_id
            "#,
        )
        .bind(name)
        .bind(name_like)
        .bind(country)
        .bind(country_like)
        .bind(bio)
        .bind(bio_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Inserts an author and returns the generated id.
    pub async fn insert(&self, input: &AuthorInput) -> DbResult<i64> {
        validate_author(input)?;
        let input = input.trimmed();

        debug!(first_name = %input.first_name, last_name = %input.last_name, "Inserting author");

        let result = sqlx::query(
            r#"
            INSERT INTO author (first_name, last_name, country, bio)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.country)
        .bind(&input.bio)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replaces every field of an author.
    ///
    /// Returns `Ok(false)` when no author has that id.
    pub async fn update(&self, id: i64, input: &AuthorInput) -> DbResult<bool> {
        require_id(id, "Author ID")?;
        validate_author(input)?;
        let input = input.trimmed();

        debug!(id = %id, "Updating author");

        let result = sqlx::query(
            r#"
            UPDATE author SET
                first_name = ?2,
                last_name = ?3,
                country = ?4,
                bio = ?5
            WHERE author_id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.country)
        .bind(&input.bio)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Replaces only the biography. `None` clears it.
    pub async fn update_bio(&self, id: i64, bio: Option<&str>) -> DbResult<bool> {
        require_id(id, "Author ID")?;
        require_max_length(bio, MAX_BIO, "Bio")?;

        debug!(id = %id, "Updating author bio");

        let result = sqlx::query("UPDATE author SET bio = ?2 WHERE author_id = ?1")
            .bind(id)
            .bind(bio.map(str::trim))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Deletes an author. Fails with a foreign-key error while books still
    /// list them.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting author");

        let result = sqlx::query("DELETE FROM author WHERE author_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbError, ErrorKind};
    use crate::repository::test_support::{author, test_db};

    #[tokio::test]
    async fn test_insert_trims_and_assigns_id() {
        let db = test_db().await;
        let repo = db.authors();

        let mut input = author("  Ursula ", " Le Guin ", " USA ");
        input.bio = Some("  Earthsea  ".to_string());
        let id = repo.insert(&input).await.unwrap();
        assert!(id > 0);

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].author_id, id);
        assert_eq!(all[0].first_name, "Ursula");
        assert_eq!(all[0].last_name, "Le Guin");
        assert_eq!(all[0].country.as_deref(), Some("USA"));
        assert_eq!(all[0].bio.as_deref(), Some("Earthsea"));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name_without_writing() {
        let db = test_db().await;
        let repo = db.authors();

        let err = repo.insert(&author("", "Herbert", "USA")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "First name is required.");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_rejects_long_bio() {
        let db = test_db().await;
        let mut input = author("Frank", "Herbert", "USA");
        input.bio = Some("x".repeat(MAX_BIO + 1));

        let err = db.authors().insert(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search() {
        let db = test_db().await;
        let repo = db.authors();
        repo.insert(&author("Ursula", "Le Guin", "USA")).await.unwrap();
        repo.insert(&author("Stanislaw", "Lem", "Poland")).await.unwrap();

        assert_eq!(repo.search("").await.unwrap().len(), 2);
        assert_eq!(repo.search("le").await.unwrap().len(), 2);
        assert_eq!(repo.search("POLAND").await.unwrap().len(), 1);
        assert!(repo.search("tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_keeps_keyword_whitespace() {
        let db = test_db().await;
        let repo = db.authors();
        repo.insert(&author("Ursula", "Le Guin", "USA")).await.unwrap();

        assert!(repo.search("   ").await.unwrap().is_empty());
        assert!(repo.search(" ursula").await.unwrap().is_empty());
        assert_eq!(repo.search("le guin").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_folds_ascii_case_only() {
        let db = test_db().await;
        let repo = db.authors();
        repo.insert(&author("Émile", "Zola", "France")).await.unwrap();

        assert_eq!(repo.search("ZOLA").await.unwrap().len(), 1);
        assert_eq!(repo.search("Émile").await.unwrap().len(), 1);
        // SQLite LIKE folds ASCII letters only.
        assert!(repo.search("émile").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_filtered() {
        let db = test_db().await;
        let repo = db.authors();
        repo.insert(&author("Ursula", "Le Guin", "USA")).await.unwrap();
        repo.insert(&author("Frank", "Herbert", "USA")).await.unwrap();
        repo.insert(&author("Stanislaw", "Lem", "Poland")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(repo.search_filtered("", "", "").await.unwrap(), all);
        assert_eq!(repo.search_filtered(" ", "  ", "").await.unwrap(), all);

        // Full name spans the first/last boundary.
        let hits = repo.search_filtered("ula le", "", "").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "Le Guin");

        // Conjunctive: name alone matches all three, with country only one.
        assert_eq!(repo.search_filtered("e", "", "").await.unwrap().len(), 3);
        let hits = repo.search_filtered("e", "poland", "").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Stanislaw");
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let repo = db.authors();
        let id = repo.insert(&author("Frank", "Herbert", "USA")).await.unwrap();

        let missing = repo.update(id + 100, &author("A", "B", "C")).await.unwrap();
        assert!(!missing);
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().first_name, "Frank");

        let updated = repo
            .update(id, &author("Franklin", "Herbert", "United States"))
            .await
            .unwrap();
        assert!(updated);
        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Franklin");
        assert_eq!(stored.country.as_deref(), Some("United States"));

        let err = repo.update(0, &author("A", "B", "C")).await.unwrap_err();
        assert_eq!(err.to_string(), "Author ID must be > 0.");
    }

    #[tokio::test]
    async fn test_update_bio_and_delete() {
        let db = test_db().await;
        let repo = db.authors();
        let id = repo.insert(&author("Frank", "Herbert", "USA")).await.unwrap();

        assert!(repo.update_bio(id, Some(" Wrote Dune. ")).await.unwrap());
        assert_eq!(
            repo.find_by_id(id).await.unwrap().unwrap().bio.as_deref(),
            Some("Wrote Dune.")
        );
        assert!(repo.update_bio(id, None).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().unwrap().bio.is_none());

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleted_id_is_not_reused() {
        let db = test_db().await;
        let repo = db.authors();

        let first = repo.insert(&author("Frank", "Herbert", "USA")).await.unwrap();
        assert!(repo.delete(first).await.unwrap());
        let second = repo.insert(&author("Ursula", "Le Guin", "USA")).await.unwrap();

        assert!(second > 0);
        assert_ne!(first, second);
    }
}
