//! # Loan Repository
//!
//! Database operations for loans.
//!
//! ## Keyword Search Join
//! ```text
//! loan l
//!   JOIN borrower b       ON b.borrower_id = l.borrower_id
//!   JOIN book bk          ON bk.book_id = l.book_id
//!   LEFT JOIN book_author ON ba.book_id = bk.book_id
//!   LEFT JOIN author a    ON a.author_id = ba.author_id
//! ```
//! The author side is a LEFT JOIN so loans of books without recorded
//! authors still match on their other columns. `DISTINCT` folds the
//! one-row-per-author fan-out back to one row per loan.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use super::{filter_binds, like_pattern, require_id};
use crate::error::DbResult;
use shelf_core::validation::{require_not_future, validate_loan};
use shelf_core::{Loan, LoanInput};

/// Repository for loan database operations.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: SqlitePool,
}

impl LoanRepository {
    /// Creates a new LoanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoanRepository { pool }
    }

    pub async fn find_all(&self) -> DbResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT loan_id, borrower_id, book_id, loan_date, due_date, return_date
            FROM loan
            ORDER BY loan_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT loan_id, borrower_id, book_id, loan_date, due_date, return_date
            FROM loan
            WHERE loan_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loan")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Matches `keyword` against the loan's ids and dates, the borrower's
    /// name, the book's title and the names of the book's authors.
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Loan>> {
        debug!(keyword = %keyword, "Searching loans");

        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT DISTINCT l.loan_id, l.borrower_id, l.book_id,
                   l.loan_date, l.due_date, l.return_date
            FROM loan l
            JOIN borrower b ON b.borrower_id = l.borrower_id
            JOIN book bk ON bk.book_id = l.book_id
            LEFT JOIN book_author ba ON ba.book_id = bk.book_id
            LEFT JOIN author a ON a.author_id = ba.author_id
            WHERE CAST(l.loan_id AS TEXT) LIKE ?1
               OR CAST(l.borrower_id AS TEXT) LIKE ?1
               OR CAST(l.book_id AS TEXT) LIKE ?1
               OR l.loan_date LIKE ?1
               OR l.due_date LIKE ?1
               OR l.return_date LIKE ?1
               OR b.first_name || ' ' || b.last_name LIKE ?1
               OR bk.title LIKE ?1
               OR a.first_name || ' ' || a.last_name LIKE ?1
            ORDER BY l.loan_id
            "#,
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = loans.len(), "Search returned loans");
        Ok(loans)
    }

    /// Filters by borrower full name, book title and loan date text
    /// (`"2024-03"` matches every loan made in March 2024).
    pub async fn search_filtered(
        &self,
        borrower_name: &str,
        book_title: &str,
        loan_date: &str,
    ) -> DbResult<Vec<Loan>> {
        let (borrower_name, borrower_like) = filter_binds(borrower_name);
        let (book_title, title_like) = filter_binds(book_title);
        let (loan_date, date_like) = filter_binds(loan_date);

        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT l.loan_id, l.borrower_id, l.book_id,
                   l.loan_date, l.due_date, l.return_date
            FROM loan l
            JOIN borrower b ON b.borrower_id = l.borrower_id
            JOIN book bk ON bk.book_id = l.book_id
            WHERE (?1 = '' OR b.first_name || ' ' || b.last_name LIKE ?2)
              AND (?3 = '' OR bk.title LIKE ?4)
              AND (?5 = '' OR l.loan_date LIKE ?6)
            ORDER BY l.loan_id
            "#,
        )
        .bind(borrower_name)
        .bind(borrower_like)
        .bind(book_title)
        .bind(title_like)
        .bind(loan_date)
        .bind(date_like)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Records a loan and returns its id.
    ///
    /// ## Checks
    /// - borrower and book ids positive
    /// - due date on or after loan date
    /// - return date, if given, not in the future
    /// - borrower and book exist (enforced by the store)
    pub async fn insert(&self, input: &LoanInput) -> DbResult<i64> {
        validate_loan(input)?;

        debug!(
            borrower_id = %input.borrower_id,
            book_id = %input.book_id,
            loan_date = %input.loan_date,
            "Inserting loan"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO loan (borrower_id, book_id, loan_date, due_date, return_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(input.borrower_id)
        .bind(input.book_id)
        .bind(input.loan_date)
        .bind(input.due_date)
        .bind(input.return_date)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, id: i64, input: &LoanInput) -> DbResult<bool> {
        require_id(id, "Loan ID")?;
        validate_loan(input)?;

        debug!(id = %id, "Updating loan");

        let result = sqlx::query(
            r#"
            UPDATE loan SET
                borrower_id = ?2,
                book_id = ?3,
                loan_date = ?4,
                due_date = ?5,
                return_date = ?6
            WHERE loan_id = ?1
            "#,
        )
        .bind(id)
        .bind(input.borrower_id)
        .bind(input.book_id)
        .bind(input.loan_date)
        .bind(input.due_date)
        .bind(input.return_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Records (or with `None`, clears) the return date.
    pub async fn update_return_date(
        &self,
        id: i64,
        return_date: Option<NaiveDate>,
    ) -> DbResult<bool> {
        require_id(id, "Loan ID")?;
        if let Some(date) = return_date {
            require_not_future(date, "Return date")?;
        }

        debug!(id = %id, return_date = ?return_date, "Updating loan return date");

        let result = sqlx::query("UPDATE loan SET return_date = ?2 WHERE loan_id = ?1")
            .bind(id)
            .bind(return_date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting loan");

        let result = sqlx::query("DELETE FROM loan WHERE loan_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbError, ErrorKind};
    use crate::pool::Database;
    use crate::repository::test_support::{author, book, borrower, date, loan, test_db};
    use chrono::Duration;
    use shelf_core::validation::today;

    /// Two borrowers, two books (one with two authors, one with none).
    async fn seeded() -> (Database, i64, i64, i64, i64) {
        let db = test_db().await;
        let ada = db.borrowers().insert(&borrower("Ada", "Lovelace")).await.unwrap();
        let alan = db.borrowers().insert(&borrower("Alan", "Turing")).await.unwrap();
        let omens = db.books().insert(&book("Good Omens", "Fiction", 999)).await.unwrap();
        let manual = db.books().insert(&book("Field Manual", "Reference", 500)).await.unwrap();

        let terry = db.authors().insert(&author("Terry", "Pratchett", "UK")).await.unwrap();
        let neil = db.authors().insert(&author("Neil", "Gaiman", "UK")).await.unwrap();
        db.books().link_author(omens, terry).await.unwrap();
        db.books().link_author(omens, neil).await.unwrap();

        (db, ada, alan, omens, manual)
    }

    #[tokio::test]
    async fn test_insert_and_find_all() {
        let (db, ada, _, omens, _) = seeded().await;
        let repo = db.loans();

        let id = repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].loan_id, id);
        assert_eq!(all[0].due_date, date(2024, 3, 15));
        assert!(all[0].is_open());
    }

    #[tokio::test]
    async fn test_due_before_loan_is_rejected() {
        let (db, ada, _, omens, _) = seeded().await;
        let repo = db.loans();

        let mut input = loan(ada, omens, date(2024, 3, 10));
        input.due_date = date(2024, 3, 1);
        let err = repo.insert(&input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Due date cannot be before Loan date.");
        assert_eq!(repo.count().await.unwrap(), 0);

        // Same-day due date is fine.
        input.due_date = input.loan_date;
        assert!(repo.insert(&input).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_borrower_is_storage_error() {
        let (db, _, _, omens, _) = seeded().await;
        let err = db.loans().insert(&loan(999, omens, date(2024, 3, 1))).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_return_date() {
        let (db, ada, _, omens, _) = seeded().await;
        let repo = db.loans();
        let id = repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();

        let err = repo
            .update_return_date(id, Some(today() + Duration::days(1)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Return date cannot be in the future.");

        assert!(repo.update_return_date(id, Some(date(2024, 3, 10))).await.unwrap());
        assert_eq!(
            repo.find_by_id(id).await.unwrap().unwrap().return_date,
            Some(date(2024, 3, 10))
        );
        assert!(!repo.update_return_date(id + 1, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (db, ada, alan, omens, manual) = seeded().await;
        let repo = db.loans();
        let id = repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();

        assert!(!repo.update(id + 5, &loan(alan, manual, date(2024, 4, 1))).await.unwrap());
        assert!(repo.update(id, &loan(alan, manual, date(2024, 4, 1))).await.unwrap());
        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.borrower_id, alan);
        assert_eq!(stored.book_id, manual);

        assert!(repo.delete(id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_spans_joined_names() {
        let (db, ada, alan, omens, manual) = seeded().await;
        let repo = db.loans();
        repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();
        repo.insert(&loan(alan, manual, date(2024, 4, 2))).await.unwrap();

        assert_eq!(repo.search("").await.unwrap().len(), 2);
        // Author name: one row even though the book has two authors.
        assert_eq!(repo.search("gaiman").await.unwrap().len(), 1);
        // Book without authors still found by title.
        let hits = repo.search("manual").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].borrower_id, alan);
        // Borrower full name and date text.
        assert_eq!(repo.search("ada lovelace").await.unwrap().len(), 1);
        assert_eq!(repo.search("2024-04").await.unwrap().len(), 1);
        assert!(repo.search("tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_filtered() {
        let (db, ada, alan, omens, manual) = seeded().await;
        let repo = db.loans();
        repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();
        repo.insert(&loan(ada, manual, date(2024, 4, 2))).await.unwrap();
        repo.insert(&loan(alan, omens, date(2024, 4, 9))).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(repo.search_filtered("", "", "").await.unwrap(), all);
        assert_eq!(repo.search_filtered("ada", "", "").await.unwrap().len(), 2);
        assert_eq!(repo.search_filtered("", "omens", "").await.unwrap().len(), 2);
        assert_eq!(repo.search_filtered("", "", "2024-04").await.unwrap().len(), 2);
        let hits = repo.search_filtered("ada", "omens", "").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].loan_date, date(2024, 3, 1));
    }

    #[tokio::test]
    async fn test_deleted_id_is_not_reused() {
        let (db, ada, alan, omens, manual) = seeded().await;
        let repo = db.loans();

        let first = repo.insert(&loan(ada, omens, date(2024, 3, 1))).await.unwrap();
        assert!(repo.delete(first).await.unwrap());
        let second = repo.insert(&loan(alan, manual, date(2024, 3, 2))).await.unwrap();

        assert!(second > 0);
        assert_ne!(first, second);
    }
}
