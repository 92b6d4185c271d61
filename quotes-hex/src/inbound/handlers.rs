//! HTTP request handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use quotes_types::{AppError, QuoteProvider, QuoteRepository};

use crate::{QuoteService, RequestScope};

pub const CANCELLED_BODY: &str = "Request cancelled by the client.\n";
pub const FETCH_FAILED_BODY: &str = "Error with request.\n";
pub const PERSIST_FAILED_BODY: &str = "Error with saving data.\n";

/// Application state shared across handlers.
pub struct AppState<P: QuoteProvider, R: QuoteRepository> {
    pub service: QuoteService<P, R>,
    /// Root token; cancelled when the server shuts down.
    pub shutdown: CancellationToken,
    /// Overall lifetime granted to each request, if bounded.
    pub request_timeout: Option<Duration>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::Cancelled => (StatusCode::REQUEST_TIMEOUT, CANCELLED_BODY),
            AppError::Fetch(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_BODY)
            }
            AppError::Persist(_) => (StatusCode::INTERNAL_SERVER_ERROR, PERSIST_FAILED_BODY),
        };

        (status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Fetch the current quote, store it, and return it.
///
/// The work runs on its own task under a per-request token. If the client
/// goes away, axum drops this future and the drop guard cancels the token,
/// which the task observes at its next suspension point.
#[tracing::instrument(skip(state))]
pub async fn get_quote<P: QuoteProvider, R: QuoteRepository>(
    State(state): State<Arc<AppState<P, R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.shutdown.child_token();
    let _disconnect = token.clone().drop_guard();
    let scope = RequestScope::new(token, state.request_timeout);

    let worker = tokio::spawn(
        async move { state.service.fetch_and_store(&scope).await }.in_current_span(),
    );

    let quote = worker
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(quote))
}
