//! # Quotes Types
//!
//! Domain types and port traits for the USD-BRL quote service.
//! This crate has ZERO external IO dependencies - only data structures
//! and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - The `Quote` snapshot as received from upstream
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Response shapes seen by API consumers
//! - `error/` - Fetch, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

pub use domain::Quote;
pub use dto::BidResponse;
pub use error::{AppError, FetchError, RepoError};
pub use ports::{QuoteProvider, QuoteRepository};
