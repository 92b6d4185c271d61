//! Upstream quote provider port.

use crate::domain::Quote;
use crate::error::FetchError;

/// Port trait for upstream quote sources.
///
/// Implementations perform exactly one upstream call per invocation. Deadlines
/// are imposed by the caller, which drops the future when they expire.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync + 'static {
    /// Fetches the current quote for the configured pair.
    async fn fetch_quote(&self) -> Result<Quote, FetchError>;
}
