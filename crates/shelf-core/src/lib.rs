//! # shelf-core: Domain Model for Shelfmark
//!
//! Entities, validation rules, password digests and report values for the
//! Shelfmark library records service. Nothing in this crate touches a
//! database, a file or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shelfmark Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (UI / export)                         │   │
//! │  │    Catalogue ──► Circulation ──► Sales ──► Reports ──► Login   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed values                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelf-db (Database Layer)                    │   │
//! │  │      repositories, user directory, report engine, migrations    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │credentials│  │  report   │  │   │
//! │  │   │  Author   │  │  require_ │  │  salt     │  │  Value    │  │   │
//! │  │   │  Book ... │  │  validate_│  │  SHA-256  │  │  NamedRow │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Library entities and their input forms
//! - [`money`] - Integer-cent prices
//! - [`error`] - Validation errors
//! - [`validation`] - Field and entity checks
//! - [`credentials`] - Salted password hashing
//! - [`report`] - Report cells and rows
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::money::Money;
//! use shelf_core::types::BookInput;
//! use shelf_core::validation::validate_book;
//!
//! let book = BookInput {
//!     title: "The Dispossessed".to_string(),
//!     publisher_id: None,
//!     category: "Fiction".to_string(),
//!     book_type: "Paperback".to_string(),
//!     original_price: Money::from_cents(-1),
//!     available: true,
//! };
//!
//! let err = validate_book(&book).unwrap_err();
//! assert_eq!(err.to_string(), "Original price must be ≥ 0.");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credentials;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use report::{ColumnKind, NamedRow, Value};
pub use types::*;
