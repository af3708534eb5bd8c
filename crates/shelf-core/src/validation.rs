//! # Validation Module
//!
//! Field checks for every Shelfmark write.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (UI)                                                   │
//! │  └── Parses text into typed values (ids, Money, dates)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Primitive checks: require_non_blank, require_max_length, ...      │
//! │  └── Entity checks:    validate_book, validate_loan, ...               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (users.username)                                           │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entity checks run the primitive checks in a fixed order and stop at the
//! first failure, so the same bad input always yields the same message.
//!
//! ## Usage
//! ```rust
//! use shelf_core::validation::{require_non_blank, require_max_length};
//!
//! assert!(require_non_blank("Dune", "Title").is_ok());
//! assert!(require_max_length(Some("Dune"), 200, "Title").is_ok());
//! assert!(require_non_blank("   ", "Title").is_err());
//! ```

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AuthorInput, BookInput, BorrowerInput, LoanInput, PublisherInput, SaleInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Email shape: `local@domain.tld`, TLD of two or more letters.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| panic!("email pattern is a valid regex: {e}"))
});

// =============================================================================
// Column Limits
// =============================================================================

pub const MAX_PERSON_NAME: usize = 100;
pub const MAX_COUNTRY: usize = 100;
pub const MAX_CITY: usize = 100;
pub const MAX_BIO: usize = 1000;
pub const MAX_TITLE: usize = 200;
pub const MAX_PUBLISHER_NAME: usize = 200;
pub const MAX_CATEGORY: usize = 100;
pub const MAX_BOOK_TYPE: usize = 50;
pub const MAX_CONTACT_INFO: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty and whitespace-only values.
pub fn require_non_blank(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Rejects values longer than `max` characters.
///
/// A missing value passes; pair with [`require_non_blank`] for required
/// columns. Length is measured on the value as submitted, before trimming.
pub fn require_max_length(value: Option<&str>, max: usize, field: &str) -> ValidationResult<()> {
    if let Some(value) = value {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
            });
        }
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - Trimmed value must match `local@domain.tld`
///
/// ## Example
/// ```rust
/// use shelf_core::validation::require_valid_email;
///
/// assert!(require_valid_email("a@x.com", "Email").is_ok());
/// assert!(require_valid_email("a@x", "Email").is_err());
/// ```
pub fn require_valid_email(email: &str, field: &str) -> ValidationResult<()> {
    require_non_blank(email, field)?;

    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects values `<= 0`. Used for ids, type ids and sale prices.
pub fn require_positive(value: i64, field: &str) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Rejects values `< 0`. Zero is allowed (donated books).
///
/// ## Example
/// ```rust
/// use shelf_core::money::Money;
/// use shelf_core::validation::require_non_negative;
///
/// assert!(require_non_negative(Money::zero(), "Original price").is_ok());
/// assert!(require_non_negative(Money::from_cents(-1), "Original price").is_err());
/// ```
pub fn require_non_negative(value: Money, field: &str) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Rejects amounts `<= 0`.
pub fn require_positive_amount(value: Money, field: &str) -> ValidationResult<()> {
    require_positive(value.cents(), field)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Returns today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rejects a date strictly after today.
pub fn require_not_future(date: NaiveDate, field: &str) -> ValidationResult<()> {
    require_not_after(date, today(), field)
}

/// Rejects a date strictly after `reference`.
pub fn require_not_after(date: NaiveDate, reference: NaiveDate, field: &str) -> ValidationResult<()> {
    if date > reference {
        return Err(ValidationError::InFuture {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Rejects an `end` strictly before `start`. Equal dates pass.
pub fn require_date_order(
    start: NaiveDate,
    end: NaiveDate,
    start_field: &str,
    end_field: &str,
) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::OutOfOrder {
            start: start_field.to_string(),
            end: end_field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_author(input: &AuthorInput) -> ValidationResult<()> {
    require_non_blank(&input.first_name, "First name")?;
    require_non_blank(&input.last_name, "Last name")?;
    require_max_length(Some(&input.first_name), MAX_PERSON_NAME, "First name")?;
    require_max_length(Some(&input.last_name), MAX_PERSON_NAME, "Last name")?;
    require_max_length(input.country.as_deref(), MAX_COUNTRY, "Country")?;
    require_max_length(input.bio.as_deref(), MAX_BIO, "Bio")?;
    Ok(())
}

pub fn validate_book(input: &BookInput) -> ValidationResult<()> {
    require_non_blank(&input.title, "Title")?;
    require_non_blank(&input.category, "Category")?;
    require_non_blank(&input.book_type, "Book type")?;
    require_max_length(Some(&input.title), MAX_TITLE, "Title")?;
    require_max_length(Some(&input.category), MAX_CATEGORY, "Category")?;
    require_max_length(Some(&input.book_type), MAX_BOOK_TYPE, "Book type")?;
    require_non_negative(input.original_price, "Original price")?;
    if let Some(publisher_id) = input.publisher_id {
        require_positive(publisher_id, "Publisher ID")?;
    }
    Ok(())
}

pub fn validate_borrower(input: &BorrowerInput) -> ValidationResult<()> {
    require_non_blank(&input.first_name, "First name")?;
    require_non_blank(&input.last_name, "Last name")?;
    require_positive(input.type_id, "Borrower type")?;
    require_max_length(Some(&input.first_name), MAX_PERSON_NAME, "First name")?;
    require_max_length(Some(&input.last_name), MAX_PERSON_NAME, "Last name")?;
    require_max_length(input.contact_info.as_deref(), MAX_CONTACT_INFO, "Contact info")?;
    Ok(())
}

pub fn validate_publisher(input: &PublisherInput) -> ValidationResult<()> {
    require_non_blank(&input.name, "Publisher name")?;
    require_non_blank(&input.country, "Country")?;
    require_max_length(Some(&input.name), MAX_PUBLISHER_NAME, "Publisher name")?;
    require_max_length(input.city.as_deref(), MAX_CITY, "City")?;
    require_max_length(Some(&input.country), MAX_COUNTRY, "Country")?;
    require_max_length(input.contact_info.as_deref(), MAX_CONTACT_INFO, "Contact info")?;
    Ok(())
}

/// Validates a loan.
///
/// ## Rules
/// - Borrower and book ids must be positive
/// - Due date must not be before the loan date
/// - A return date, when present, must not be in the future
pub fn validate_loan(input: &LoanInput) -> ValidationResult<()> {
    require_positive(input.borrower_id, "Borrower ID")?;
    require_positive(input.book_id, "Book ID")?;
    require_date_order(input.loan_date, input.due_date, "Loan date", "Due date")?;
    if let Some(return_date) = input.return_date {
        require_not_future(return_date, "Return date")?;
    }
    Ok(())
}

/// Validates a sale.
///
/// ## Rules
/// - Book and borrower ids must be positive
/// - Sale price must be strictly positive (unlike book prices, which may be 0)
/// - Sale date must not be in the future
pub fn validate_sale(input: &SaleInput) -> ValidationResult<()> {
    require_positive(input.book_id, "Book ID")?;
    require_positive(input.borrower_id, "Borrower ID")?;
    require_positive_amount(input.sale_price, "Sale price")?;
    require_not_future(input.sale_date, "Sale date")?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("Dune", "Title").is_ok());
        assert!(require_non_blank("", "Title").is_err());
        assert!(require_non_blank(" \t\n", "Title").is_err());

        let err = require_non_blank("", "Title").unwrap_err();
        assert_eq!(err.to_string(), "Title is required.");
    }

    #[test]
    fn test_require_max_length() {
        assert!(require_max_length(None, 5, "City").is_ok());
        assert!(require_max_length(Some("Paris"), 5, "City").is_ok());
        assert!(require_max_length(Some("London"), 5, "City").is_err());
        // Counted in characters, not bytes.
        assert!(require_max_length(Some("Zürich"), 6, "City").is_ok());
    }

    #[test]
    fn test_numeric_flavours() {
        assert!(require_positive(1, "Book ID").is_ok());
        assert!(require_positive(0, "Book ID").is_err());
        assert!(require_positive(-3, "Book ID").is_err());

        assert!(require_non_negative(Money::zero(), "Original price").is_ok());
        assert!(require_non_negative(Money::from_cents(-1), "Original price").is_err());

        assert!(require_positive_amount(Money::from_cents(1), "Sale price").is_ok());
        assert!(require_positive_amount(Money::zero(), "Sale price").is_err());
    }

    #[test]
    fn test_require_valid_email() {
        assert!(require_valid_email("a@x.com", "Email").is_ok());
        assert!(require_valid_email(" first.last+tag@mail.example.org ", "Email").is_ok());

        assert_eq!(
            require_valid_email("", "Email").unwrap_err(),
            ValidationError::Required {
                field: "Email".to_string()
            }
        );
        assert!(require_valid_email("a@x", "Email").is_err());
        assert!(require_valid_email("a@x.c", "Email").is_err());
        assert!(require_valid_email("no-at-sign.com", "Email").is_err());
        assert!(require_valid_email("a b@x.com", "Email").is_err());
    }

    #[test]
    fn test_date_checks() {
        let reference = date(2024, 5, 1);
        assert!(require_not_after(date(2024, 5, 1), reference, "Sale date").is_ok());
        assert!(require_not_after(date(2024, 5, 2), reference, "Sale date").is_err());

        let tomorrow = today() + Duration::days(1);
        assert!(require_not_future(today(), "Sale date").is_ok());
        assert!(require_not_future(tomorrow, "Sale date").is_err());

        assert!(require_date_order(date(2024, 1, 1), date(2024, 1, 1), "Loan date", "Due date").is_ok());
        assert!(require_date_order(date(2024, 1, 10), date(2024, 1, 1), "Loan date", "Due date").is_err());
    }

    #[test]
    fn test_validate_book_price_and_publisher() {
        let mut book = BookInput {
            title: "Dune".to_string(),
            publisher_id: None,
            category: "Fiction".to_string(),
            book_type: "Hardcover".to_string(),
            original_price: Money::zero(),
            available: true,
        };
        assert!(validate_book(&book).is_ok());

        book.publisher_id = Some(0);
        assert_eq!(validate_book(&book).unwrap_err().field(), "Publisher ID");

        book.publisher_id = Some(2);
        book.original_price = Money::from_cents(-100);
        assert_eq!(validate_book(&book).unwrap_err().field(), "Original price");
    }

    #[test]
    fn test_validate_loan_order() {
        let loan = LoanInput {
            borrower_id: 1,
            book_id: 1,
            loan_date: date(2024, 1, 10),
            due_date: date(2024, 1, 1),
            return_date: None,
        };
        let err = validate_loan(&loan).unwrap_err();
        assert_eq!(err.to_string(), "Due date cannot be before Loan date.");
    }

    #[test]
    fn test_validate_sale_future_and_price() {
        let mut sale = SaleInput {
            book_id: 1,
            borrower_id: 1,
            sale_price: Money::from_cents(1000),
            sale_date: today() + Duration::days(1),
        };
        assert_eq!(validate_sale(&sale).unwrap_err().field(), "Sale date");

        sale.sale_date = today();
        sale.sale_price = Money::zero();
        assert_eq!(validate_sale(&sale).unwrap_err().field(), "Sale price");
    }

    #[test]
    fn test_validate_author_first_failure_wins() {
        let author = AuthorInput {
            first_name: " ".to_string(),
            last_name: String::new(),
            country: None,
            bio: None,
        };
        assert_eq!(validate_author(&author).unwrap_err().field(), "First name");
    }

    #[test]
    fn test_validate_publisher_requires_country() {
        let publisher = PublisherInput {
            name: "Ace".to_string(),
            city: None,
            country: "  ".to_string(),
            contact_info: None,
        };
        assert_eq!(validate_publisher(&publisher).unwrap_err().field(), "Country");
    }

    #[test]
    fn test_validate_borrower_type() {
        let borrower = BorrowerInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            type_id: 0,
            contact_info: Some("ada@example.com".to_string()),
        };
        assert_eq!(validate_borrower(&borrower).unwrap_err().field(), "Borrower type");
    }
}
