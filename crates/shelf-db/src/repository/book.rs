//! # Book Repository
//!
//! Database operations for the catalogue and the book/author links.
//!
//! ## Book ↔ Author
//! ```text
//! book ──< book_author >── author
//!
//! link_author(book, author)     INSERT OR IGNORE
//! unlink_author(book, author)   DELETE
//! author_ids(book)              SELECT author_id ... ORDER BY author_id
//! ```
//! Links feed the "books by author" and "multiple authors" reports and the
//! author column of loan/sale keyword search.

use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_non_negative, validate_book};
use shelf_core::{Book, BookInput, Money};

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    pub async fn find_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, publisher_id, category, book_type, original_price, available
            FROM book
            ORDER BY book_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Gets a book by ID.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, publisher_id, category, book_type, original_price, available
            FROM book
            WHERE book_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against title, category and book type.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let hits = db.books().search("fiction").await?;
    /// ```
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Book>> {
        debug!(keyword = %keyword, "Searching books");

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, publisher_id, category, book_type, original_price, available
            FROM book
            WHERE title LIKE ?1
               OR category LIKE ?1
               OR book_type LIKE ?1
            ORDER BY book_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Search returned books");
        Ok(books)
    }

    /// Filters by title, category and book type.
    pub async fn search_filtered(
        &self,
        title: &str,
        category: &str,
        book_type: &str,
    ) -> DbResult<Vec<Book>> {
        let (title, title_like) = filter_binds(title);
        let (category, category_like) = filter_binds(category);
        let (book_type, book_type_like) = filter_binds(book_type);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, publisher_id, category, book_type, original_price, available
            FROM book
            WHERE (?1 = '' OR title LIKE ?2)
              AND (?3 = '' OR category LIKE ?4)
              AND (?5 = '' OR book_type LIKE ?6)
            ORDER BY book_id
            "#,
        )
        .bind(title)
        .bind(title_like)
        .bind(category)
        .bind(category_like)
        .bind(book_type)
        .bind(book_type_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Inserts a book and returns the generated id.
    ///
    /// A `publisher_id` that names no publisher fails with a foreign-key
    /// error.
    pub async fn insert(&self, input: &BookInput) -> DbResult<i64> {
        validate_book(input)?;
        let input = input.trimmed();

        debug!(title = %input.title, price = %input.original_price, "Inserting book");

        let result = sqlx::query(
            r#"
            INSERT INTO book (title, publisher_id, category, book_type, original_price, available)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&input.title)
        .bind(input.publisher_id)
        .bind(&input.category)
        .bind(&input.book_type)
        .bind(input.original_price)
        .bind(input.available)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replaces every field of a book.
    pub async fn update(&self, id: i64, input: &BookInput) -> DbResult<bool> {
        require_id(id, "Book ID")?;
        validate_book(input)?;
        let input = input.trimmed();

        debug!(id = %id, "Updating book");

        let result = sqlx::query(
            r#"
            UPDATE book SET
                title = ?2,
                publisher_id = ?3,
                category = ?4,
                book_type = ?5,
                original_price = ?6,
                available = ?7
            WHERE book_id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(input.publisher_id)
        .bind(&input.category)
        .bind(&input.book_type)
        .bind(input.original_price)
        .bind(input.available)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Sets the purchase price. Zero is allowed.
    pub async fn update_price(&self, id: i64, price: Money) -> DbResult<bool> {
        require_id(id, "Book ID")?;
        require_non_negative(price, "Original price")?;

        debug!(id = %id, price = %price, "Updating book price");

        let result = sqlx::query("UPDATE book SET original_price = ?2 WHERE book_id = ?1")
            .bind(id)
            .bind(price)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn update_availability(&self, id: i64, available: bool) -> DbResult<bool> {
        require_id(id, "Book ID")?;

        debug!(id = %id, available, "Updating book availability");

        let result = sqlx::query("UPDATE book SET available = ?2 WHERE book_id = ?1")
            .bind(id)
            .bind(available)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting book");

        let result = sqlx::query("DELETE FROM book WHERE book_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Authorship
    // =========================================================================

    /// Records that `author_id` wrote `book_id`.
    ///
    /// Returns `Ok(false)` when the link already existed.
    pub async fn link_author(&self, book_id: i64, author_id: i64) -> DbResult<bool> {
        require_id(book_id, "Book ID")?;
        require_id(author_id, "Author ID")?;

        debug!(book_id = %book_id, author_id = %author_id, "Linking author to book");

        let result = sqlx::query(
            "INSERT OR IGNORE INTO book_author (book_id, author_id) VALUES (?1, ?2)",
        )
        .bind(book_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn unlink_author(&self, book_id: i64, author_id: i64) -> DbResult<bool> {
        debug!(book_id = %book_id, author_id = %author_id, "Unlinking author from book");

        let result = sqlx::query("DELETE FROM book_author WHERE book_id = ?1 AND author_id = ?2")
            .bind(book_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Ids of every author linked to a book.
    pub async fn author_ids(&self, book_id: i64) -> DbResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT author_id FROM book_author WHERE book_id = ?1 ORDER BY author_id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
