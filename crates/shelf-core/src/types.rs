//! # Domain Types
//!
//! Library records handled by Shelfmark.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Publisher    │◄──│      Book       │──►│     Author      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  publisher_id   │   │  book_id        │   │  author_id      │       │
//! │  │  name, country  │   │  title          │   │  first/last     │       │
//! │  └─────────────────┘   │  original_price │   └─────────────────┘       │
//! │                        │  available      │   (via book_author)          │
//! │                        └────────┬────────┘                              │
//! │                                 │                                       │
//! │                  ┌──────────────┴──────────────┐                        │
//! │                  ▼                             ▼                        │
//! │        ┌─────────────────┐           ┌─────────────────┐                │
//! │        │      Loan       │           │      Sale       │                │
//! │        │  loan/due/return│           │  sale_price     │                │
//! │        └────────┬────────┘           └────────┬────────┘                │
//! │                 └──────────────┬──────────────┘                         │
//! │                                ▼                                        │
//! │                      ┌─────────────────┐                                │
//! │                      │    Borrower     │                                │
//! │                      │  type_id        │                                │
//! │                      └─────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs Input
//! Each entity comes in two shapes:
//! - `Author`, `Book`, ...: a row read back from storage, id included
//! - `AuthorInput`, `BookInput`, ...: the fields a caller supplies for an
//!   insert or full update, without the id
//!
//! Relationships are plain foreign-key ids. Nothing here loads related rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Owned, trimmed copy of a text field.
fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trims an optional string. Present-but-blank stays present (as `""`).
fn trim_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().map(trim)
}

// =============================================================================
// Author
// =============================================================================

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Author {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub bio: Option<String>,
}

impl Author {
    /// `"First Last"`, the form full-name search matches against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for creating or replacing an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthorInput {
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub bio: Option<String>,
}

impl AuthorInput {
    /// Copy with every text field trimmed.
    pub fn trimmed(&self) -> Self {
        AuthorInput {
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            country: trim_opt(&self.country),
            bio: trim_opt(&self.bio),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalogue entry.
///
/// `available` is false while the copy is out on loan or has been sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub publisher_id: Option<i64>,
    pub category: String,
    pub book_type: String,
    /// Purchase price. Zero is allowed for donated copies.
    pub original_price: Money,
    pub available: bool,
}

/// Fields for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookInput {
    pub title: String,
    pub publisher_id: Option<i64>,
    pub category: String,
    pub book_type: String,
    pub original_price: Money,
    pub available: bool,
}

impl BookInput {
    pub fn trimmed(&self) -> Self {
        BookInput {
            title: trim(&self.title),
            category: trim(&self.category),
            book_type: trim(&self.book_type),
            ..self.clone()
        }
    }
}

// =============================================================================
// Borrower
// =============================================================================

/// A library member. `type_id` points at the `borrower_type` lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Borrower {
    pub borrower_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub type_id: i64,
    pub contact_info: Option<String>,
}

impl Borrower {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BorrowerInput {
    pub first_name: String,
    pub last_name: String,
    pub type_id: i64,
    pub contact_info: Option<String>,
}

impl BorrowerInput {
    pub fn trimmed(&self) -> Self {
        BorrowerInput {
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            type_id: self.type_id,
            contact_info: trim_opt(&self.contact_info),
        }
    }
}

// =============================================================================
// Publisher
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Publisher {
    pub publisher_id: i64,
    pub name: String,
    pub city: Option<String>,
    pub country: String,
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublisherInput {
    pub name: String,
    pub city: Option<String>,
    pub country: String,
    pub contact_info: Option<String>,
}

impl PublisherInput {
    pub fn trimmed(&self) -> Self {
        PublisherInput {
            name: trim(&self.name),
            city: trim_opt(&self.city),
            country: trim(&self.country),
            contact_info: trim_opt(&self.contact_info),
        }
    }
}

// =============================================================================
// Loan
// =============================================================================

/// A book lent to a borrower.
///
/// ## Lifecycle
/// ```text
/// insert (return_date = NULL) ──► update_return_date(date) ──► returned
///        └── listed by current_loans until returned
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Loan {
    pub loan_id: i64,
    pub borrower_id: i64,
    pub book_id: i64,
    #[ts(type = "string")]
    pub loan_date: NaiveDate,
    #[ts(type = "string")]
    pub due_date: NaiveDate,
    #[ts(type = "string | null")]
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    /// True until a return date is recorded.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanInput {
    pub borrower_id: i64,
    pub book_id: i64,
    #[ts(type = "string")]
    pub loan_date: NaiveDate,
    #[ts(type = "string")]
    pub due_date: NaiveDate,
    #[ts(type = "string | null")]
    pub return_date: Option<NaiveDate>,
}

// =============================================================================
// Sale
// =============================================================================

/// A book sold to a borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub sale_id: i64,
    pub book_id: i64,
    pub borrower_id: i64,
    /// Price actually paid. Always > 0.
    pub sale_price: Money,
    #[ts(type = "string")]
    pub sale_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleInput {
    pub book_id: i64,
    pub borrower_id: i64,
    pub sale_price: Money,
    #[ts(type = "string")]
    pub sale_date: NaiveDate,
}

// =============================================================================
// User
// =============================================================================

/// The public view of an account, returned by a successful login.
///
/// Hash and salt never leave the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_trimmed_keeps_blank_optionals() {
        let input = AuthorInput {
            first_name: "  Ursula ".to_string(),
            last_name: "Le Guin\t".to_string(),
            country: Some("   ".to_string()),
            bio: None,
        };
        let trimmed = input.trimmed();
        assert_eq!(trimmed.first_name, "Ursula");
        assert_eq!(trimmed.last_name, "Le Guin");
        assert_eq!(trimmed.country.as_deref(), Some(""));
        assert_eq!(trimmed.bio, None);
    }

    #[test]
    fn test_book_trimmed_keeps_numbers() {
        let input = BookInput {
            title: " Dune ".to_string(),
            publisher_id: Some(3),
            category: "Fiction ".to_string(),
            book_type: " Paperback".to_string(),
            original_price: Money::from_cents(1250),
            available: false,
        };
        let trimmed = input.trimmed();
        assert_eq!(trimmed.title, "Dune");
        assert_eq!(trimmed.publisher_id, Some(3));
        assert_eq!(trimmed.original_price.cents(), 1250);
        assert!(!trimmed.available);
    }

    #[test]
    fn test_full_name() {
        let borrower = Borrower {
            borrower_id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            type_id: 1,
            contact_info: None,
        };
        assert_eq!(borrower.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_loan_serializes_dates_as_iso() {
        let loan = Loan {
            loan_id: 7,
            borrower_id: 1,
            book_id: 2,
            loan_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            return_date: None,
        };
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["loan_date"], "2024-03-01");
        assert!(json["return_date"].is_null());
        assert!(loan.is_open());
    }
}
