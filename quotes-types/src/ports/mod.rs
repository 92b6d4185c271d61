//! Port traits (interfaces for adapters).
//!
//! The application layer depends on these traits, not concrete implementations.

mod provider;
mod repository;

pub use provider::QuoteProvider;
pub use repository::QuoteRepository;
