//! Database row types.

use sqlx::FromRow;

use quotes_types::Quote;

/// Quote row from the `exchange_rates` table.
#[derive(FromRow)]
pub struct DbQuote {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    pub var_bid: String,
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

impl DbQuote {
    pub fn into_domain(self) -> Quote {
        Quote {
            code: self.code,
            codein: self.codein,
            name: self.name,
            high: self.high,
            low: self.low,
            var_bid: self.var_bid,
            pct_change: self.pct_change,
            bid: self.bid,
            ask: self.ask,
            timestamp: self.timestamp,
            create_date: self.create_date,
        }
    }
}
