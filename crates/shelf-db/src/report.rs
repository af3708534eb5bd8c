//! # Report Engine
//!
//! The sixteen fixed read-only queries behind the reports screen.
//!
//! ## Row Decoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteRow                                                              │
//! │       │  for each column in SELECT order                                │
//! │       ▼                                                                 │
//! │  raw value NULL? ──yes──► Value::Null                                   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  declared kind for this report column?                                  │
//! │       ├── yes ──► Text | Integer | Decimal (cents) | Date               │
//! │       └── no  ──► kind from SQLite's runtime type (INTEGER, TEXT ...)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NamedRow.push(column, value)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices come back as `Value::Decimal`, dates as `Value::Date`. An
//! aggregate over zero rows (`SUM` of an empty table) is `Value::Null`.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};
use tracing::debug;

use crate::error::DbResult;
use shelf_core::{ColumnKind, Money, NamedRow, Value};

type ColumnKinds = &'static [(&'static str, ColumnKind)];

// =============================================================================
// Declared Column Kinds
// =============================================================================

const TOTAL_VALUE: ColumnKinds = &[("total_value", ColumnKind::Decimal)];

const BOOK_TITLE: ColumnKinds = &[
    ("book_id", ColumnKind::Integer),
    ("title", ColumnKind::Text),
];

const BOUGHT_BY_BORROWER: ColumnKinds = &[
    ("title", ColumnKind::Text),
    ("price", ColumnKind::Decimal),
    ("date", ColumnKind::Date),
];

const CURRENT_LOANS: ColumnKinds = &[
    ("loan_id", ColumnKind::Integer),
    ("borrower_id", ColumnKind::Integer),
    ("book_id", ColumnKind::Integer),
    ("due_date", ColumnKind::Date),
];

const BOOKS_BY_COUNTRY: ColumnKinds = &[
    ("book_id", ColumnKind::Integer),
    ("title", ColumnKind::Text),
    ("country", ColumnKind::Text),
];

const INACTIVE_BORROWERS: ColumnKinds = &[
    ("borrower_id", ColumnKind::Integer),
    ("first_name", ColumnKind::Text),
    ("last_name", ColumnKind::Text),
];

const MULTI_AUTHOR: ColumnKinds = &[
    ("book_id", ColumnKind::Integer),
    ("title", ColumnKind::Text),
    ("authors_count", ColumnKind::Integer),
];

const SOLD_BOOKS: ColumnKinds = &[
    ("book_id", ColumnKind::Integer),
    ("title", ColumnKind::Text),
    ("sale_price", ColumnKind::Decimal),
    ("sale_date", ColumnKind::Date),
];

const LOAN_HISTORY: ColumnKinds = &[
    ("loan_id", ColumnKind::Integer),
    ("book_id", ColumnKind::Integer),
    ("loan_date", ColumnKind::Date),
    ("due_date", ColumnKind::Date),
    ("return_date", ColumnKind::Date),
];

const LOANS_BETWEEN: ColumnKinds = &[
    ("loan_id", ColumnKind::Integer),
    ("book_id", ColumnKind::Integer),
    ("borrower_id", ColumnKind::Integer),
    ("loan_date", ColumnKind::Date),
];

const PER_CATEGORY: ColumnKinds = &[
    ("category", ColumnKind::Text),
    ("cnt", ColumnKind::Integer),
];

const AVAILABILITY: ColumnKinds = &[
    ("available_cnt", ColumnKind::Integer),
    ("borrowed_cnt", ColumnKind::Integer),
];

const LOANS_PER_MONTH: ColumnKinds = &[
    ("month_label", ColumnKind::Text),
    ("cnt", ColumnKind::Integer),
];

const REVENUE_PER_MONTH: ColumnKinds = &[
    ("month_label", ColumnKind::Text),
    ("revenue", ColumnKind::Decimal),
];

const TOP_BORROWERS: ColumnKinds = &[
    ("borrower", ColumnKind::Text),
    ("cnt", ColumnKind::Integer),
];

// =============================================================================
// Report Engine
// =============================================================================

/// Runs the fixed report queries. Holds a pool handle and nothing else.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    pool: SqlitePool,
}

impl ReportEngine {
    /// Creates a new ReportEngine.
    pub fn new(pool: SqlitePool) -> Self {
        ReportEngine { pool }
    }

    /// 1. Sum of every book's original price: `(total_value)`.
    ///
    /// One row; `total_value` is Null when the catalogue is empty.
    pub async fn total_value_of_all_books(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query("SELECT SUM(original_price) AS total_value FROM book")
            .fetch_all(&self.pool)
            .await?;

        finish("total_value_of_all_books", &rows, TOTAL_VALUE)
    }

    /// 2. Books linked to an author: `(book_id, title)`.
    pub async fn books_by_author(&self, author_id: i64) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title
            FROM book b
            JOIN book_author ba ON b.book_id = ba.book_id
            WHERE ba.author_id = ?1
            ORDER BY b.book_id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        finish("books_by_author", &rows, BOOK_TITLE)
    }

    /// 3. Purchases by a borrower, newest first: `(title, price, date)`.
    pub async fn books_bought_by_borrower(&self, borrower_id: i64) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.title AS title, s.sale_price AS price, s.sale_date AS date
            FROM sale s
            JOIN book b ON b.book_id = s.book_id
            WHERE s.borrower_id = ?1
            ORDER BY s.sale_date DESC, s.sale_id DESC
            "#,
        )
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        finish("books_bought_by_borrower", &rows, BOUGHT_BY_BORROWER)
    }

    /// 4. Loans not yet returned: `(loan_id, borrower_id, book_id, due_date)`.
    pub async fn current_loans(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, borrower_id, book_id, due_date
            FROM loan
            WHERE return_date IS NULL
            ORDER BY loan_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("current_loans", &rows, CURRENT_LOANS)
    }

    /// 5. Books whose publisher is in `country` (exact match):
    /// `(book_id, title, country)`.
    pub async fn books_by_publisher_country(&self, country: &str) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, p.country
            FROM book b
            JOIN publisher p ON b.publisher_id = p.publisher_id
            WHERE p.country = ?1
            ORDER BY b.book_id
            "#,
        )
        .bind(country.trim())
        .fetch_all(&self.pool)
        .await?;

        finish("books_by_publisher_country", &rows, BOOKS_BY_COUNTRY)
    }

    /// 6. Borrowers with no loans and no purchases:
    /// `(borrower_id, first_name, last_name)`.
    pub async fn borrowers_without_activity(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT bo.borrower_id, bo.first_name, bo.last_name
            FROM borrower bo
            WHERE NOT EXISTS (SELECT 1 FROM loan l WHERE l.borrower_id = bo.borrower_id)
              AND NOT EXISTS (SELECT 1 FROM sale s WHERE s.borrower_id = bo.borrower_id)
            ORDER BY bo.borrower_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("borrowers_without_activity", &rows, INACTIVE_BORROWERS)
    }

    /// 7. Books with more than one linked author:
    /// `(book_id, title, authors_count)`.
    pub async fn books_with_multiple_authors(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, COUNT(ba.author_id) AS authors_count
            FROM book b
            JOIN book_author ba ON b.book_id = ba.book_id
            GROUP BY b.book_id, b.title
            HAVING COUNT(ba.author_id) > 1
            ORDER BY b.book_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("books_with_multiple_authors", &rows, MULTI_AUTHOR)
    }

    /// 8. Every sale with its book: `(book_id, title, sale_price, sale_date)`.
    pub async fn sold_books_with_prices(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.book_id, b.title, s.sale_price, s.sale_date
            FROM sale s
            JOIN book b ON s.book_id = b.book_id
            ORDER BY s.sale_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("sold_books_with_prices", &rows, SOLD_BOOKS)
    }

    /// 9. Books flagged available: `(book_id, title)`.
    pub async fn books_currently_available(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            "SELECT book_id, title FROM book WHERE available = 1 ORDER BY book_id",
        )
        .fetch_all(&self.pool)
        .await?;

        finish("books_currently_available", &rows, BOOK_TITLE)
    }

    /// 10. A borrower's loans, newest first:
    /// `(loan_id, book_id, loan_date, due_date, return_date)`.
    pub async fn loan_history_for_borrower(&self, borrower_id: i64) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, book_id, loan_date, due_date, return_date
            FROM loan
            WHERE borrower_id = ?1
            ORDER BY loan_date DESC, loan_id DESC
            "#,
        )
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        finish("loan_history_for_borrower", &rows, LOAN_HISTORY)
    }

    /// 11. Loans made between `from` and `to`, both inclusive:
    /// `(loan_id, book_id, borrower_id, loan_date)`.
    ///
    /// A reversed range matches nothing.
    pub async fn loans_between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, book_id, borrower_id, loan_date
            FROM loan
            WHERE loan_date BETWEEN ?1 AND ?2
            ORDER BY loan_date, loan_id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        finish("loans_between", &rows, LOANS_BETWEEN)
    }

    /// 12. Book count per category, largest first: `(category, cnt)`.
    pub async fn books_per_category(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT category, COUNT(*) AS cnt
            FROM book
            GROUP BY category
            ORDER BY cnt DESC, category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("books_per_category", &rows, PER_CATEGORY)
    }

    /// 13. One row: `(available_cnt, borrowed_cnt)`. Zeros on an empty
    /// catalogue.
    pub async fn availability_summary(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN available = 1 THEN 1 ELSE 0 END), 0) AS available_cnt,
                COALESCE(SUM(CASE WHEN available = 0 THEN 1 ELSE 0 END), 0) AS borrowed_cnt
            FROM book
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("availability_summary", &rows, AVAILABILITY)
    }

    /// 14. Loans per calendar month, oldest first: `(month_label, cnt)`
    /// with `month_label` as `YYYY-MM`.
    pub async fn loans_per_month(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT strftime('%Y-%m', loan_date) AS month_label, COUNT(*) AS cnt
            FROM loan
            GROUP BY month_label
            ORDER BY month_label
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("loans_per_month", &rows, LOANS_PER_MONTH)
    }

    /// 15. Sale revenue per calendar month, oldest first:
    /// `(month_label, revenue)`.
    pub async fn sales_revenue_per_month(&self) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT strftime('%Y-%m', sale_date) AS month_label, SUM(sale_price) AS revenue
            FROM sale
            GROUP BY month_label
            ORDER BY month_label
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        finish("sales_revenue_per_month", &rows, REVENUE_PER_MONTH)
    }

    /// 16. The `limit` borrowers with the most loans: `(borrower, cnt)`.
    ///
    /// Grouped per borrower, so two members sharing a name stay separate.
    pub async fn top_borrowers(&self, limit: u32) -> DbResult<Vec<NamedRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.first_name || ' ' || b.last_name AS borrower, COUNT(*) AS cnt
            FROM loan l
            JOIN borrower b ON b.borrower_id = l.borrower_id
            GROUP BY l.borrower_id
            ORDER BY cnt DESC, l.borrower_id
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        finish("top_borrowers", &rows, TOP_BORROWERS)
    }
}

// =============================================================================
// Row Decoding
// =============================================================================

fn finish(report: &str, rows: &[SqliteRow], kinds: ColumnKinds) -> DbResult<Vec<NamedRow>> {
    let named = rows
        .iter()
        .map(|row| to_named_row(row, kinds))
        .collect::<DbResult<Vec<_>>>()?;

    debug!(report, rows = named.len(), "Report complete");
    Ok(named)
}

fn to_named_row(row: &SqliteRow, kinds: ColumnKinds) -> DbResult<NamedRow> {
    let mut named = NamedRow::new();

    for (index, column) in row.columns().iter().enumerate() {
        let name = column.name();

        if row.try_get_raw(index)?.is_null() {
            named.push(name, Value::Null);
            continue;
        }

        let kind = kinds
            .iter()
            .find(|(declared, _)| *declared == name)
            .map(|(_, kind)| *kind);

        let value = match kind {
            Some(kind) => decode(row, index, kind)?,
            None => decode_runtime(row, index, column.type_info().name())?,
        };
        named.push(name, value);
    }

    Ok(named)
}

fn decode(row: &SqliteRow, index: usize, kind: ColumnKind) -> DbResult<Value> {
    let value = match kind {
        ColumnKind::Text => Value::Text(row.try_get::<String, _>(index)?),
        ColumnKind::Integer => Value::Integer(row.try_get::<i64, _>(index)?),
        ColumnKind::Decimal => Value::Decimal(Money::from_cents(row.try_get::<i64, _>(index)?)),
        ColumnKind::Date => Value::Date(row.try_get::<NaiveDate, _>(index)?),
    };
    Ok(value)
}

/// Fallback for columns a report did not declare.
fn decode_runtime(row: &SqliteRow, index: usize, type_name: &str) -> DbResult<Value> {
    match type_name {
        "INTEGER" | "BOOLEAN" => decode(row, index, ColumnKind::Integer),
        "DATE" => decode(row, index, ColumnKind::Date),
        "REAL" => Ok(Value::Text(row.try_get::<f64, _>(index)?.to_string())),
        _ => decode(row, index, ColumnKind::Text),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support::{
        author, book, borrower, date, loan, publisher, sale, test_db,
    };

    /// Library fixture ids.
    struct Library {
        db: Database,
        ada: i64,
        alan: i64,
        grace: i64,
        omens: i64,
        dune: i64,
        cosmos: i64,
        pratchett: i64,
    }

    async fn library() -> Library {
        let db = test_db().await;

        let ace = db.publishers().insert(&publisher("Ace", "New York", "USA")).await.unwrap();
        let gollancz = db
            .publishers()
            .insert(&publisher("Gollancz", "London", "UK"))
            .await
            .unwrap();

        let mut omens_input = book("Good Omens", "Fiction", 999);
        omens_input.publisher_id = Some(gollancz);
        let omens = db.books().insert(&omens_input).await.unwrap();
        let mut dune_input = book("Dune", "Fiction", 1099);
        dune_input.publisher_id = Some(ace);
        let dune = db.books().insert(&dune_input).await.unwrap();
        let mut cosmos_input = book("Cosmos", "Science", 1500);
        cosmos_input.available = false;
        let cosmos = db.books().insert(&cosmos_input).await.unwrap();

        let pratchett = db.authors().insert(&author("Terry", "Pratchett", "UK")).await.unwrap();
        let gaiman = db.authors().insert(&author("Neil", "Gaiman", "UK")).await.unwrap();
        let herbert = db.authors().insert(&author("Frank", "Herbert", "USA")).await.unwrap();
        db.books().link_author(omens, pratchett).await.unwrap();
        db.books().link_author(omens, gaiman).await.unwrap();
        db.books().link_author(dune, herbert).await.unwrap();

        let ada = db.borrowers().insert(&borrower("Ada", "Lovelace")).await.unwrap();
        let alan = db.borrowers().insert(&borrower("Alan", "Turing")).await.unwrap();
        let grace = db.borrowers().insert(&borrower("Grace", "Hopper")).await.unwrap();

        Library { db, ada, alan, grace, omens, dune, cosmos, pratchett }
    }

    #[tokio::test]
    async fn test_total_value() {
        let db = test_db().await;
        let rows = db.reports().total_value_of_all_books().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("total_value").unwrap().is_null());

        let lib = library().await;
        let rows = lib.db.reports().total_value_of_all_books().await.unwrap();
        assert_eq!(
            rows[0].get("total_value").and_then(Value::as_money),
            Some(Money::from_cents(999 + 1099 + 1500))
        );
    }

    #[tokio::test]
    async fn test_authorship_reports() {
        let lib = library().await;
        let reports = lib.db.reports();

        let rows = reports.books_by_author(lib.pratchett).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("book_id").and_then(Value::as_i64), Some(lib.omens));
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["book_id", "title"]);

        let rows = reports.books_with_multiple_authors().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title").and_then(Value::as_str), Some("Good Omens"));
        assert_eq!(rows[0].get("authors_count").and_then(Value::as_i64), Some(2));
    }

    #[tokio::test]
    async fn test_sales_reports() {
        let lib = library().await;
        let sales = lib.db.sales();
        sales.insert(&sale(lib.dune, lib.ada, 1250, date(2024, 5, 1))).await.unwrap();
        sales.insert(&sale(lib.omens, lib.ada, 800, date(2024, 6, 2))).await.unwrap();
        sales.insert(&sale(lib.cosmos, lib.alan, 1000, date(2024, 6, 20))).await.unwrap();

        let reports = lib.db.reports();
        let rows = reports.books_bought_by_borrower(lib.ada).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["title", "price", "date"]);
        assert_eq!(rows[0].get("title").and_then(Value::as_str), Some("Good Omens"));
        assert_eq!(rows[0].get("date").and_then(Value::as_date), Some(date(2024, 6, 2)));
        assert_eq!(rows[1].get("price").and_then(Value::as_money), Some(Money::from_cents(1250)));

        let rows = reports.sold_books_with_prices().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].get("sale_price").unwrap().to_string(), "10.00");

        let rows = reports.sales_revenue_per_month().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("month_label").and_then(Value::as_str), Some("2024-05"));
        assert_eq!(rows[1].get("month_label").and_then(Value::as_str), Some("2024-06"));
        assert_eq!(rows[1].get("revenue").and_then(Value::as_money), Some(Money::from_cents(1800)));
    }

    #[tokio::test]
    async fn test_loan_reports() {
        let lib = library().await;
        let loans = lib.db.loans();
        let first = loans.insert(&loan(lib.ada, lib.omens, date(2024, 3, 1))).await.unwrap();
        let second = loans.insert(&loan(lib.ada, lib.dune, date(2024, 3, 20))).await.unwrap();
        let third = loans.insert(&loan(lib.alan, lib.dune, date(2024, 4, 5))).await.unwrap();
        loans.update_return_date(first, Some(date(2024, 3, 10))).await.unwrap();

        let reports = lib.db.reports();

        let rows = reports.current_loans().await.unwrap();
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.get("loan_id")?.as_i64()).collect();
        assert_eq!(ids, vec![second, third]);
        assert_eq!(rows[0].get("due_date").and_then(Value::as_date), Some(date(2024, 4, 3)));

        let rows = reports.loan_history_for_borrower(lib.ada).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("loan_id").and_then(Value::as_i64), Some(second));
        assert!(rows[0].get("return_date").unwrap().is_null());
        assert_eq!(rows[1].get("return_date").and_then(Value::as_date), Some(date(2024, 3, 10)));

        let rows = reports.loans_between(date(2024, 3, 1), date(2024, 3, 20)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(reports
            .loans_between(date(2024, 4, 30), date(2024, 1, 1))
            .await
            .unwrap()
            .is_empty());

        let rows = reports.loans_per_month().await.unwrap();
        let months: Vec<(String, i64)> = rows
            .iter()
            .map(|r| {
                (
                    r.get("month_label").unwrap().to_string(),
                    r.get("cnt").and_then(Value::as_i64).unwrap(),
                )
            })
            .collect();
        assert_eq!(months, vec![("2024-03".to_string(), 2), ("2024-04".to_string(), 1)]);

        let rows = reports.top_borrowers(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("borrower").and_then(Value::as_str), Some("Ada Lovelace"));
        assert_eq!(rows[0].get("cnt").and_then(Value::as_i64), Some(2));
        assert_eq!(reports.top_borrowers(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_borrowers_without_activity() {
        let lib = library().await;
        lib.db.loans().insert(&loan(lib.ada, lib.omens, date(2024, 3, 1))).await.unwrap();
        lib.db
            .sales()
            .insert(&sale(lib.dune, lib.alan, 1250, date(2024, 5, 1)))
            .await
            .unwrap();

        let rows = lib.db.reports().borrowers_without_activity().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("borrower_id").and_then(Value::as_i64), Some(lib.grace));
        assert_eq!(rows[0].get("first_name").and_then(Value::as_str), Some("Grace"));
    }

    #[tokio::test]
    async fn test_catalogue_reports() {
        let lib = library().await;
        let reports = lib.db.reports();

        let rows = reports.books_by_publisher_country("UK").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title").and_then(Value::as_str), Some("Good Omens"));
        assert_eq!(rows[0].get("country").and_then(Value::as_str), Some("UK"));
        assert!(reports.books_by_publisher_country("France").await.unwrap().is_empty());

        let rows = reports.books_currently_available().await.unwrap();
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.get("book_id")?.as_i64()).collect();
        assert_eq!(ids, vec![lib.omens, lib.dune]);

        let rows = reports.books_per_category().await.unwrap();
        assert_eq!(rows[0].get("category").and_then(Value::as_str), Some("Fiction"));
        assert_eq!(rows[0].get("cnt").and_then(Value::as_i64), Some(2));
        assert_eq!(rows[1].get("category").and_then(Value::as_str), Some("Science"));
    }

    #[tokio::test]
    async fn test_availability_summary() {
        let db = test_db().await;
        for (i, available) in [true, true, true, false, false].into_iter().enumerate() {
            let mut input = book(&format!("Book {i}"), "Misc", 100);
            input.available = available;
            db.books().insert(&input).await.unwrap();
        }

        let rows = db.reports().availability_summary().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("available_cnt").and_then(Value::as_i64), Some(3));
        assert_eq!(rows[0].get("borrowed_cnt").and_then(Value::as_i64), Some(2));
    }

    #[tokio::test]
    async fn test_rows_serialize_in_column_order() {
        let lib = library().await;
        lib.db
            .sales()
            .insert(&sale(lib.dune, lib.ada, 1250, date(2024, 5, 1)))
            .await
            .unwrap();

        let rows = lib.db.reports().sold_books_with_prices().await.unwrap();
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(
            json,
            format!(
                r#"[{{"book_id":{},"title":"Dune","sale_price":"12.50","sale_date":"2024-05-01"}}]"#,
                lib.dune
            )
        );
    }
}
