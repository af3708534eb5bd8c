//! # Repository Module
//!
//! Database repository implementations for Shelfmark.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Shape                                     │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.books().search_filtered("dune", "", "")                     │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── find_all / find_by_id / count                                     │
//! │  ├── search(keyword)          OR across text columns                   │
//! │  ├── search_filtered(...)     AND across per-field filters             │
//! │  ├── insert(&input)           validate → trim → INSERT → id            │
//! │  ├── update(id, &input)       validate → UPDATE → bool                 │
//! │  ├── update_<field>(id, v)    validate → UPDATE one column → bool      │
//! │  └── delete(id)               DELETE → bool                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Matching Rules
//! - Keyword search is a substring match on the keyword exactly as given,
//!   case-insensitive for ASCII letters only. An empty keyword matches every
//!   row; a whitespace-only keyword matches only text containing it.
//! - A filter argument that is empty after trimming is ignored. Active
//!   filters must all match.
//! - `%` and `_` in user text act as SQL wildcards.
//!
//! ## Available Repositories
//!
//! - [`AuthorRepository`](author::AuthorRepository)
//! - [`BookRepository`](book::BookRepository) - also maintains book/author links
//! - [`BorrowerRepository`](borrower::BorrowerRepository)
//! - [`PublisherRepository`](publisher::PublisherRepository)
//! - [`LoanRepository`](loan::LoanRepository)
//! - [`SaleRepository`](sale::SaleRepository)
//! - [`UserDirectory`](user::UserDirectory) - signup / login

use shelf_core::validation::{require_positive, ValidationResult};

pub mod author;
pub mod book;
pub mod borrower;
pub mod loan;
pub mod publisher;
pub mod sale;
pub mod user;

/// `%keyword%` for a LIKE clause. The keyword is not trimmed.
pub(crate) fn like_pattern(keyword: &str) -> String {
    format!("%{}%", keyword)
}

/// A search filter as the `(?n = '' OR col LIKE ?m)` pair binds it:
/// the trimmed value and its LIKE pattern.
pub(crate) fn filter_binds(value: &str) -> (String, String) {
    let value = value.trim();
    (value.to_string(), format!("%{}%", value))
}

/// Rejects a non-positive id before an update or delete touches the store.
pub(crate) fn require_id(id: i64, field: &str) -> ValidationResult<()> {
    require_positive(id, field)
}
