//! Exchange quote snapshot.

use serde::{Deserialize, Serialize};

/// One snapshot of exchange-rate data for a currency pair.
///
/// Every field is kept as the opaque string the upstream sent. Nothing is
/// parsed or normalized, so whatever arrives is what gets stored and served.
/// Absent fields decode to the empty string; a value of the wrong JSON type
/// is still a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    /// Base currency code, e.g. `USD`.
    pub code: String,
    /// Counter currency code, e.g. `BRL`.
    pub codein: String,
    /// Display name, e.g. `Dólar Americano/Real Brasileiro`.
    pub name: String,
    pub high: String,
    pub low: String,
    /// Absolute change over the session.
    #[serde(rename = "varBid")]
    pub var_bid: String,
    /// Percent change over the session.
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    /// Source-side timestamp (epoch seconds, as text).
    pub timestamp: String,
    /// Human-readable creation date from the source.
    pub create_date: String,
}
