//! Quote Application Service
//!
//! Orchestrates one fetch-then-store round through the provider and
//! repository ports. Contains NO infrastructure logic.

use std::fmt;
use std::time::Duration;

use quotes_types::{AppError, Quote, QuoteProvider, QuoteRepository};

use crate::scope::RequestScope;

/// Time bounds applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Minimum wait before any work starts.
    pub fixed_delay: Duration,
    /// Upper bound for the upstream call.
    pub fetch_timeout: Duration,
    /// Upper bound for the insert.
    pub persist_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            fixed_delay: Duration::from_secs(5),
            fetch_timeout: Duration::from_millis(200),
            persist_timeout: Duration::from_millis(10),
        }
    }
}

/// Where a request is in its lifecycle.
///
/// `Started → WaitingFixedDelay → {Cancelled | Fetching} → {FetchFailed |
/// Persisting} → {PersistFailed | Completed}`; no transition goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Started,
    WaitingFixedDelay,
    Cancelled,
    Fetching,
    FetchFailed,
    Persisting,
    PersistFailed,
    Completed,
}

impl RequestPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestPhase::Cancelled
                | RequestPhase::FetchFailed
                | RequestPhase::PersistFailed
                | RequestPhase::Completed
        )
    }

    fn as_str(&self) -> &'static str {
        match self {
            RequestPhase::Started => "started",
            RequestPhase::WaitingFixedDelay => "waiting_fixed_delay",
            RequestPhase::Cancelled => "cancelled",
            RequestPhase::Fetching => "fetching",
            RequestPhase::FetchFailed => "fetch_failed",
            RequestPhase::Persisting => "persisting",
            RequestPhase::PersistFailed => "persist_failed",
            RequestPhase::Completed => "completed",
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logs "Request started." on creation and "Request stopped." when dropped,
/// so every exit path is bracketed.
struct RequestLog {
    phase: RequestPhase,
    started: tokio::time::Instant,
}

impl RequestLog {
    fn start() -> Self {
        tracing::info!("Request started.");
        Self {
            phase: RequestPhase::Started,
            started: tokio::time::Instant::now(),
        }
    }

    fn enter(&mut self, phase: RequestPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "request phase");
        self.phase = phase;
    }
}

impl Drop for RequestLog {
    fn drop(&mut self) {
        if !self.phase.is_terminal() {
            // The future was dropped mid-flight, e.g. the worker task was aborted.
            tracing::warn!(phase = %self.phase, "Request aborted before finishing.");
        }
        tracing::info!(
            phase = %self.phase,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Request stopped."
        );
    }
}

/// Application service for quote requests.
///
/// Generic over the provider and repository ports - adapters are injected at
/// compile time, which keeps the service testable with in-memory mocks.
pub struct QuoteService<P: QuoteProvider, R: QuoteRepository> {
    provider: P,
    repo: R,
    timings: Timings,
}

impl<P: QuoteProvider, R: QuoteRepository> QuoteService<P, R> {
    /// Creates a service with the default timings.
    pub fn new(provider: P, repo: R) -> Self {
        Self {
            provider,
            repo,
            timings: Timings::default(),
        }
    }

    /// Overrides the request timings.
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Waits the fixed delay, fetches a quote and stores it.
    ///
    /// Cancellation during the delay yields [`AppError::Cancelled`] without
    /// touching either port. The fetch and the insert each run under their
    /// own child deadline of `scope`; a failed fetch never reaches the insert.
    pub async fn fetch_and_store(&self, scope: &RequestScope) -> Result<Quote, AppError> {
        let mut log = RequestLog::start();

        log.enter(RequestPhase::WaitingFixedDelay);
        if let Err(reason) = scope.sleep(self.timings.fixed_delay).await {
            log.enter(RequestPhase::Cancelled);
            tracing::info!(%reason, "Request cancelled by the client.");
            return Err(AppError::Cancelled);
        }

        log.enter(RequestPhase::Fetching);
        let fetch_scope = scope.child(self.timings.fetch_timeout);
        let fetched = match fetch_scope.run(self.provider.fetch_quote()).await {
            Ok(result) => result.map_err(AppError::from),
            Err(e) => Err(AppError::Fetch(e.to_string())),
        };
        let quote = match fetched {
            Ok(quote) => quote,
            Err(e) => {
                log.enter(RequestPhase::FetchFailed);
                tracing::error!("{}", e);
                return Err(e);
            }
        };

        log.enter(RequestPhase::Persisting);
        let persist_scope = scope.child(self.timings.persist_timeout);
        let stored = match persist_scope.run(self.repo.insert_quote(&quote)).await {
            Ok(result) => result.map_err(AppError::from),
            Err(e) => Err(AppError::Persist(e.to_string())),
        };
        if let Err(e) = stored {
            log.enter(RequestPhase::PersistFailed);
            tracing::error!("{}", e);
            return Err(e);
        }

        log.enter(RequestPhase::Completed);
        tracing::info!(bid = %quote.bid, "Request processed with success.");
        Ok(quote)
    }
}
