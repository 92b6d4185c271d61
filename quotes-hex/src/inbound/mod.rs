//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod server;

pub use handlers::{CANCELLED_BODY, FETCH_FAILED_BODY, PERSIST_FAILED_BODY};
pub use server::HttpServer;
