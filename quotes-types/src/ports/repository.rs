//! Repository port trait.

use crate::domain::Quote;
use crate::error::RepoError;

/// Append-only storage for quotes.
///
/// There is no update or delete path. Concurrent callers share one instance
/// and rely on the storage engine for write safety.
#[async_trait::async_trait]
pub trait QuoteRepository: Send + Sync + 'static {
    /// Appends one quote as a single atomic statement.
    async fn insert_quote(&self, quote: &Quote) -> Result<(), RepoError>;

    /// Number of quotes recorded so far.
    async fn count_quotes(&self) -> Result<i64, RepoError>;

    /// Most recently recorded quote, if any.
    async fn latest_quote(&self) -> Result<Option<Quote>, RepoError>;
}
