//! # Quotes Hex
//!
//! Application service layer and HTTP adapter for the quote service.
//!
//! ## Architecture
//!
//! - `scope/` - Cancellation token plus deadline handed down a request
//! - `service/` - Fetch-then-store orchestration with per-step deadlines
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: QuoteProvider` and `R: QuoteRepository`,
//! allowing different adapters to be injected.

pub mod inbound;
pub mod scope;
pub mod service;


pub use scope::{RequestScope, ScopeError};
pub use service::{QuoteService, RequestPhase, Timings};
