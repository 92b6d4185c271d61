//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use exchange_rates::{DEFAULT_PAIR, DEFAULT_UPSTREAM_URL};
use quotes_hex::Timings;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/exchange.db?mode=rwc";

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub upstream_url: String,
    pub upstream_pair: String,
    pub timings: Timings,
    /// Overall lifetime of one request; unbounded when unset.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let upstream_url =
            lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let upstream_pair = lookup("UPSTREAM_PAIR").unwrap_or_else(|| DEFAULT_PAIR.to_string());

        let defaults = Timings::default();
        let timings = Timings {
            fixed_delay: millis(&lookup, "FIXED_DELAY_MS")?.unwrap_or(defaults.fixed_delay),
            fetch_timeout: millis(&lookup, "FETCH_TIMEOUT_MS")?.unwrap_or(defaults.fetch_timeout),
            persist_timeout: millis(&lookup, "PERSIST_TIMEOUT_MS")?
                .unwrap_or(defaults.persist_timeout),
        };
        let request_timeout = millis(&lookup, "REQUEST_TIMEOUT_MS")?;

        Ok(Self {
            port,
            database_url,
            upstream_url,
            upstream_pair,
            timings,
            request_timeout,
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Duration>> {
    lookup(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e))
        })
        .transpose()
}
