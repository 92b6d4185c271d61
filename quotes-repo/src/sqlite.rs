//! SQLite repository adapter.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use quotes_types::{Quote, QuoteRepository, RepoError};

use crate::types::DbQuote;

const BOOTSTRAP_SQL: &str = include_str!("../migrations/0001_create_exchange_rates.sql");

/// How long a statement waits on another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(1);

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// Holds the process-wide pool. Request handlers share it by reference and
/// leave write serialization to SQLite.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens the database and runs the bootstrap script.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        let parent = database_url
            .strip_prefix("sqlite://")
            .filter(|_| !in_memory)
            .map(|rest| rest.split('?').next().unwrap_or(rest))
            .and_then(|path| Path::new(path).parent())
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        // Every in-memory connection is its own database; keep exactly one.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;

        tracing::debug!("SQLite schema ready at {}", database_url);
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Executes the bootstrap script. Safe to run more than once.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        sqlx::query(BOOTSTRAP_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl QuoteRepository for SqliteRepo {
    /// Runs inside a transaction: if the caller drops this future before the
    /// commit (deadline, cancellation), the pending rollback discards the row
    /// even when the statement itself finishes later on the driver thread.
    async fn insert_quote(&self, quote: &Quote) -> Result<(), RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO exchange_rates (code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date, recorded_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&quote.code)
        .bind(&quote.codein)
        .bind(&quote.name)
        .bind(&quote.high)
        .bind(&quote.low)
        .bind(&quote.var_bid)
        .bind(&quote.pct_change)
        .bind(&quote.bid)
        .bind(&quote.ask)
        .bind(&quote.timestamp)
        .bind(&quote.create_date)
        .bind(chrono::Utc::now())
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count_quotes(&self) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM exchange_rates"#)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }

    async fn latest_quote(&self) -> Result<Option<Quote>, RepoError> {
        let row: Option<DbQuote> = sqlx::query_as(
            r#"SELECT code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date
               FROM exchange_rates ORDER BY rowid DESC LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(DbQuote::into_domain))
    }
}
