//! # Sale Repository
//!
//! Database operations for book sales.
//!
//! ## Sale Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale_price  > 0        (a book's original_price may be 0, a sale not)  │
//! │  sale_date  <= today                                                    │
//! │  book_id, borrower_id   must exist                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keyword search joins book, borrower and authors the same way loan search
//! does, and also matches the price as written (`"12.50"`).

use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_positive_amount, validate_sale};
use shelf_core::{Money, Sale, SaleInput};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub async fn find_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, book_id, borrower_id, sale_price, sale_date
            FROM sale
            ORDER BY sale_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, book_id, borrower_id, sale_price, sale_date
            FROM sale
            WHERE sale_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against ids, price, date, book title, borrower
    /// name and author names.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Sale>> {
        debug!(keyword = %keyword, "Searching sales");

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT DISTINCT s.sale_id, s.book_id, s.borrower_id, s.sale_price, s.sale_date
            FROM sale s
            JOIN book bk ON bk.book_id = s.book_id
            JOIN borrower b ON b.borrower_id = s.borrower_id
            LEFT JOIN book_author ba ON ba.book_id = bk.book_id
            LEFT JOIN author a ON a.author_id = ba.author_id
            WHERE CAST(s.sale_id AS TEXT) LIKE ?1
               OR CAST(s.book_id AS TEXT) LIKE ?1
               OR CAST(s.borrower_id AS TEXT) LIKE ?1
               OR printf('%d.%02d', s.sale_price / 100, s.sale_price % 100) LIKE ?1
               OR s.sale_date LIKE ?1
               OR bk.title LIKE ?1
               OR a.first_name || ' ' || a.last_name LIKE ?1
               OR b.first_name || ' ' || b.last_name LIKE ?1
            ORDER BY s.sale_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Search returned sales");
        Ok(sales)
    }

    /// Filters by book title, borrower full name and sale date text.
    pub async fn search_filtered(
        &self,
        book_title: &str,
        borrower_name: &str,
        sale_date: &str,
    ) -> DbResult<Vec<Sale>> {
        let (book_title, title_like) = filter_binds(book_title);
        let (borrower_name, borrower_like) = filter_binds(borrower_name);
        let (sale_date, date_like) = filter_binds(sale_date);

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT s.sale_id, s.book_id, s.borrower_id, s.sale_price, s.sale_date
            FROM sale s
            JOIN book bk ON bk.book_id = s.book_id
            JOIN borrower b ON b.borrower_id = s.borrower_id
            WHERE (?1 = '' OR bk.title LIKE ?2)
              AND (?3 = '' OR b.first_name || ' ' || b.last_name LIKE ?4)
              AND (?5 = '' OR s.sale_date LIKE ?6)
            ORDER BY s.sale_id
            "#,
        )
        .bind(book_title)
        .bind(title_like)
        .bind(borrower_name)
        .bind(borrower_like)
        .bind(sale_date)
        .bind(date_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Records a sale and returns its id.
    pub async fn insert(&self, input: &SaleInput) -> DbResult<i64> {
        validate_sale(input)?;

        debug!(
            book_id = %input.book_id,
            borrower_id = %input.borrower_id,
            price = %input.sale_price,
            "Inserting sale"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO sale (book_id, borrower_id, sale_price, sale_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(input.book_id)
        .bind(input.borrower_id)
        .bind(input.sale_price)
        .bind(input.sale_date)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &SaleInput) -> DbResult<bool> {
        require_id(id, "Sale ID")?;
        validate_sale(input)?;

        debug!(id = %id, "Updating sale");

        let result = sqlx::query(
            r#"
            UPDATE sale SET
                book_id = ?2,
                borrower_id = ?3,
                sale_price = ?4,
                sale_date = ?5
            WHERE sale_id = ?1
            "#,
        )
        .bind(id)
        .bind(input.book_id)
        .bind(input.borrower_id)
        .bind(input.sale_price)
        .bind(input.sale_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Corrects the price paid. Must stay above zero.
    pub async fn update_price(&self, id: i64, price: Money) -> DbResult<bool> {
        require_id(id, "Sale ID")?;
        require_positive_amount(price, "Sale price")?;

        debug!(id = %id, price = %price, "Updating sale price");

        let result = sqlx::query("UPDATE sale SET sale_price = ?2 WHERE sale_id = ?1")
            .bind(id)
            .bind(price)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sale WHERE sale_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
