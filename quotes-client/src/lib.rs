//! # Quotes Client SDK
//!
//! A typed Rust client for the quote API, plus the helper that records the
//! fetched bid to a local file.

use std::path::Path;
use std::time::Duration;

use quotes_types::BidResponse;
use reqwest::Client;

/// Overall time allowed for one round trip to the server.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Label written in front of the bid in the output file.
pub const BID_LABEL: &str = "Dólar";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned non-200 status code: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Quote API client.
pub struct QuotesClient {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl QuotesClient {
    /// Creates a new client with the default 30s timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Sets the overall timeout for each call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Fetches the current quote, keeping only its bid.
    pub async fn fetch_bid(&self) -> Result<BidResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/quote", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.trim_end().to_string(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Overwrites `path` with a single `Dólar: <bid>` line.
pub async fn save_bid(path: impl AsRef<Path>, bid: &str) -> Result<(), ClientError> {
    tokio::fs::write(path, format!("{}: {}\n", BID_LABEL, bid)).await?;
    Ok(())
}
