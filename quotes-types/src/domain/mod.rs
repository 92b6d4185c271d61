//! Domain types.

mod quote;

pub use quote::Quote;
