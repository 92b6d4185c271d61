//! # Quotes Repository
//!
//! Concrete repository implementation (adapter) for the quote service.
//! Provides the SQLite adapter that implements the `QuoteRepository` port.

pub mod sqlite;

mod types;


pub use sqlite::SqliteRepo;

/// Build and initialize a repository from a database URL.
///
/// This function:
/// 1. Creates the database file (and its directory) if missing
/// 2. Runs the bootstrap script to create the table
/// 3. Returns a ready-to-use `SqliteRepo`
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://data/exchange.db?mode=rwc").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<SqliteRepo> {
    SqliteRepo::new(database_url).await
}
