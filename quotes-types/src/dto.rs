//! Data Transfer Objects (DTOs) for API consumers.

use serde::{Deserialize, Serialize};

/// What the quote client reads from `GET /quote`.
///
/// Deliberately narrower than [`crate::Quote`]: the client only depends on
/// `bid`, and every other field the server sends is ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    pub bid: String,
}
