use std::env;
use anyhow::{Context, Result};
use chrono::Duration;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The forward-looking window, in days, over which bookable slots are computed.
    pub resolver_horizon_days: u32,
    /// The length of a bookable increment, in minutes.
    pub slot_granularity_minutes: i64,
    /// Whether overlapping availability slots are merged before slot resolution.
    pub merge_overlapping_slots: bool,
    /// The URL of the third-party hotline lookup service.
    pub hotline_api_url: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let resolver_horizon_days: u32 = env::var("RESOLVER_HORIZON_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .context("Invalid RESOLVER_HORIZON_DAYS")?;

        let slot_granularity_minutes: i64 = env::var("SLOT_GRANULARITY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("Invalid SLOT_GRANULARITY_MINUTES")?;

        if slot_granularity_minutes < 1 {
            anyhow::bail!("SLOT_GRANULARITY_MINUTES must be at least 1");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            resolver_horizon_days,
            slot_granularity_minutes,
            merge_overlapping_slots: env::var("MERGE_OVERLAPPING_SLOTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            hotline_api_url: env::var("HOTLINE_API_URL")
                .unwrap_or_else(|_| "https://sadag.org/api/get_hotlines".to_string()),
        })
    }

    /// The slot granularity as a `chrono::Duration`.
    pub fn slot_granularity(&self) -> Duration {
        Duration::minutes(self.slot_granularity_minutes)
    }
}
