//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use quotes_types::{QuoteProvider, QuoteRepository};

use super::handlers::{self, AppState};
use crate::QuoteService;

/// HTTP Server for the Quote API.
pub struct HttpServer<P: QuoteProvider, R: QuoteRepository> {
    state: Arc<AppState<P, R>>,
}

impl<P: QuoteProvider, R: QuoteRepository> HttpServer<P, R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: QuoteService<P, R>) -> Self {
        Self::with_request_timeout(service, None)
    }

    /// Creates a server that bounds each request's overall lifetime.
    pub fn with_request_timeout(service: QuoteService<P, R>, timeout: Option<Duration>) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                shutdown: CancellationToken::new(),
                request_timeout: timeout,
            }),
        }
    }

    /// Root token every request derives from.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    pub fn service(&self) -> &QuoteService<P, R> {
        &self.state.service
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/quote", get(handlers::get_quote::<P, R>))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// On shutdown the root token is cancelled, so requests still inside the
    /// fixed delay answer with the cancellation response.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let shutdown = self.shutdown_token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                shutdown.cancel();
            })
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
