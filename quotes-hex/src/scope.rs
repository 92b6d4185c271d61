//! Request scope: a cancellation token paired with an optional deadline.
//!
//! A scope is derived per request from the server's root token. Each
//! downstream step derives a child that cannot outlive its parent: the child
//! shares the parent's cancellation and takes the earlier of the two deadlines.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a scoped operation did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline carried by one request.
#[derive(Debug, Clone)]
pub struct RequestScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestScope {
    /// Creates a root scope. `lifetime` bounds the whole request when set.
    pub fn new(token: CancellationToken, lifetime: Option<Duration>) -> Self {
        Self {
            token,
            deadline: lifetime.map(|d| Instant::now() + d),
        }
    }

    /// Derives a child bounded by `timeout` and by this scope.
    pub fn child(&self, timeout: Duration) -> Self {
        let own = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) => parent.min(own),
            None => own,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `fut` until it completes, the token fires or the deadline passes,
    /// whichever comes first. A losing `fut` is dropped.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ScopeError> {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ScopeError::Cancelled),
            _ = deadline => Err(ScopeError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }

    /// Waits for `delay` unless the scope ends first.
    pub async fn sleep(&self, delay: Duration) -> Result<(), ScopeError> {
        self.run(tokio::time::sleep(delay)).await
    }
}
