//! Upstream exchange rate provider.
//!
//! Talks to the AwesomeAPI `json/last/<PAIR>` endpoint, which answers with an
//! object keyed by pair symbol:
//!
//! ```text
//! { "USDBRL": { "code": "USD", "codein": "BRL", "bid": "5.00", ... } }
//! ```
//!
//! # Example
//! ```no_run
//! use exchange_rates::AwesomeApiProvider;
//! use quotes_types::QuoteProvider;
//!
//! # async fn run() -> Result<(), quotes_types::FetchError> {
//! let provider = AwesomeApiProvider::usd_brl();
//! let quote = provider.fetch_quote().await?;
//! println!("bid: {}", quote.bid);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use quotes_types::{FetchError, Quote, QuoteProvider};

/// Default upstream endpoint for the USD-BRL pair.
pub const DEFAULT_UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

/// Key under which the upstream nests the USD-BRL quote.
pub const DEFAULT_PAIR: &str = "USDBRL";

/// HTTP adapter for the [`QuoteProvider`] port.
pub struct AwesomeApiProvider {
    url: String,
    pair: String,
    http: Client,
}

impl AwesomeApiProvider {
    /// Creates a provider for `pair` served at `url`.
    pub fn new(url: impl Into<String>, pair: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pair: pair.into(),
            http: Client::new(),
        }
    }

    /// Provider for the public USD-BRL endpoint.
    pub fn usd_brl() -> Self {
        Self::new(DEFAULT_UPSTREAM_URL, DEFAULT_PAIR)
    }

    /// Replaces the underlying HTTP client.
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }
}

#[async_trait]
impl QuoteProvider for AwesomeApiProvider {
    async fn fetch_quote(&self) -> Result<Quote, FetchError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %self.url, status = status.as_u16(), "upstream returned non-200");
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_quote(&body, &self.pair)
    }
}

/// Decodes an upstream body and extracts the entry for `pair`.
pub fn decode_quote(body: &[u8], pair: &str) -> Result<Quote, FetchError> {
    let mut data: HashMap<String, Quote> =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    data.remove(pair)
        .ok_or_else(|| FetchError::PairNotFound(pair.to_string()))
}
