//! # Seed Data Generator
//!
//! Fills a database with a small demo library and prints a few reports.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by SHELF_DATABASE_PATH (default shelfmark.db)
//! cargo run -p shelf-db --bin seed
//!
//! # Specify database path
//! cargo run -p shelf-db --bin seed -- --db ./data/library.db
//! ```
//!
//! ## Generated Records
//! - Publishers in three countries
//! - Authors with book links, one book co-written
//! - Borrowers of every borrower type
//! - Loans across two months, some still out
//! - Sales priced below the list price
//! - A demo account `librarian` / `librarian`

use chrono::NaiveDate;
use shelf_core::{
    AuthorInput, BookInput, BorrowerInput, LoanInput, Money, NamedRow, PublisherInput, SaleInput,
};
use shelf_db::{Database, DbConfig};
use std::env;
use tracing_subscriber::EnvFilter;

/// (name, city, country)
const PUBLISHERS: &[(&str, &str, &str)] = &[
    ("Gollancz", "London", "UK"),
    ("Ace Books", "New York", "USA"),
    ("Gallimard", "Paris", "France"),
];

/// (first, last, country)
const AUTHORS: &[(&str, &str, &str)] = &[
    ("Terry", "Pratchett", "UK"),
    ("Neil", "Gaiman", "UK"),
    ("Frank", "Herbert", "USA"),
    ("Ursula", "Le Guin", "USA"),
    ("Albert", "Camus", "France"),
];

/// (title, publisher index, category, type, price cents, available, author indexes)
const BOOKS: &[(&str, usize, &str, &str, i64, bool, &[usize])] = &[
    ("Good Omens", 0, "Fiction", "Paperback", 999, true, &[0, 1]),
    ("Mort", 0, "Fiction", "Paperback", 899, true, &[0]),
    ("Dune", 1, "Science Fiction", "Hardcover", 2499, false, &[2]),
    ("The Dispossessed", 1, "Science Fiction", "Paperback", 1299, true, &[3]),
    ("A Wizard of Earthsea", 1, "Fantasy", "Paperback", 1099, true, &[3]),
    ("L'Etranger", 2, "Classics", "Paperback", 750, false, &[4]),
];

/// (first, last, type id)
const BORROWERS: &[(&str, &str, i64)] = &[
    ("Ada", "Lovelace", 1),
    ("Alan", "Turing", 2),
    ("Grace", "Hopper", 3),
    ("Edsger", "Dijkstra", 1),
];

/// (borrower index, book index, loan date, returned)
const LOANS: &[(usize, usize, (i32, u32, u32), bool)] = &[
    (0, 0, (2024, 3, 4), true),
    (0, 2, (2024, 3, 18), false),
    (1, 5, (2024, 4, 2), false),
    (0, 1, (2024, 4, 9), true),
    (3, 3, (2024, 4, 20), true),
];

/// (book index, borrower index, price cents, sale date)
const SALES: &[(usize, usize, i64, (i32, u32, u32))] = &[
    (1, 1, 650, (2024, 3, 11)),
    (4, 3, 900, (2024, 4, 15)),
    (3, 1, 1100, (2024, 4, 28)),
];

const LOAN_DAYS: i64 = 21;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shelfmark Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $SHELF_DATABASE_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shelfmark Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        print_reports(&db).await?;
        return Ok(());
    }

    let mut publisher_ids = Vec::with_capacity(PUBLISHERS.len());
    for (name, city, country) in PUBLISHERS {
        let input = PublisherInput {
            name: name.to_string(),
            city: Some(city.to_string()),
            country: country.to_string(),
            contact_info: None,
        };
        publisher_ids.push(db.publishers().insert(&input).await?);
    }

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for (first, last, country) in AUTHORS {
        let input = AuthorInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
            country: Some(country.to_string()),
            bio: None,
        };
        author_ids.push(db.authors().insert(&input).await?);
    }

    let mut book_ids = Vec::with_capacity(BOOKS.len());
    for (title, publisher, category, book_type, cents, available, authors) in BOOKS {
        let input = BookInput {
            title: title.to_string(),
            publisher_id: Some(publisher_ids[*publisher]),
            category: category.to_string(),
            book_type: book_type.to_string(),
            original_price: Money::from_cents(*cents),
            available: *available,
        };
        let book_id = db.books().insert(&input).await?;
        for author in *authors {
            db.books().link_author(book_id, author_ids[*author]).await?;
        }
        book_ids.push(book_id);
    }
    println!("✓ {} publishers, {} authors, {} books", PUBLISHERS.len(), AUTHORS.len(), BOOKS.len());

    let mut borrower_ids = Vec::with_capacity(BORROWERS.len());
    for (first, last, type_id) in BORROWERS {
        let input = BorrowerInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
            type_id: *type_id,
            contact_info: Some(format!("{}.{}@example.org", first, last).to_lowercase()),
        };
        borrower_ids.push(db.borrowers().insert(&input).await?);
    }

    for (borrower, book, (y, m, d), returned) in LOANS {
        let loan_date = ymd(*y, *m, *d)?;
        let due_date = loan_date + chrono::Duration::days(LOAN_DAYS);
        let input = LoanInput {
            borrower_id: borrower_ids[*borrower],
            book_id: book_ids[*book],
            loan_date,
            due_date,
            return_date: returned.then_some(loan_date + chrono::Duration::days(7)),
        };
        db.loans().insert(&input).await?;
    }

    for (book, borrower, cents, (y, m, d)) in SALES {
        let input = SaleInput {
            book_id: book_ids[*book],
            borrower_id: borrower_ids[*borrower],
            sale_price: Money::from_cents(*cents),
            sale_date: ymd(*y, *m, *d)?,
        };
        db.sales().insert(&input).await?;
    }
    println!("✓ {} borrowers, {} loans, {} sales", BORROWERS.len(), LOANS.len(), SALES.len());

    if !db.users().exists("librarian").await? {
        db.users()
            .signup("librarian", "librarian@example.org", "librarian", "admin")
            .await?;
        println!("✓ Demo account: librarian / librarian");
    }

    print_reports(&db).await?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Prints a handful of reports as JSON.
async fn print_reports(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let reports = db.reports();
    let sections: [(&str, Vec<NamedRow>); 4] = [
        ("Total value of all books", reports.total_value_of_all_books().await?),
        ("Availability", reports.availability_summary().await?),
        ("Loans per month", reports.loans_per_month().await?),
        ("Top borrowers", reports.top_borrowers(3).await?),
    ];

    for (title, rows) in sections {
        println!();
        println!("{}:", title);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    Ok(())
}

fn ymd(y: i32, m: u32, d: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("invalid date {y}-{m}-{d}"))
}

/// Log level from `RUST_LOG`, `info` otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
