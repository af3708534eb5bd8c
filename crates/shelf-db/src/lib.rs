//! # shelf-db: Database Layer for Shelfmark
//!
//! SQLite storage for the library records service, driven through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelfmark Data Flow                              │
//! │                                                                         │
//! │  Screen / command (add book, search loans, run report)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shelf-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐    │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │    │   │
//! │  │   │   (pool.rs)   │   │  author, book  │   │  (embedded)  │    │   │
//! │  │   │               │◄──│  borrower, ... │   │ 001_initial  │    │   │
//! │  │   │  SqlitePool   │   │  UserDirectory │   │              │    │   │
//! │  │   │               │◄──│  ReportEngine  │   │              │    │   │
//! │  │   └───────────────┘   └────────────────┘   └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SQLite Database (file or in-memory)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Configuration, connection pool and repository accessors
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Database error types
//! - [`repository`] - Entity repositories and the user directory
//! - [`report`] - The fixed report queries
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let id = db.books().insert(&input).await?;
//! let hits = db.books().search("dune").await?;
//! let summary = db.reports().availability_summary().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{ConfigError, Database, DbConfig};
pub use report::ReportEngine;

// Repository re-exports for convenience
pub use repository::author::AuthorRepository;
pub use repository::book::BookRepository;
pub use repository::borrower::BorrowerRepository;
pub use repository::loan::LoanRepository;
pub use repository::publisher::PublisherRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserDirectory;
