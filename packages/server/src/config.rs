use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::element_sets::RetryPolicy;
use crate::kernel::SchedulerSettings;

/// Active-satellite catalog in three-line TLE form.
pub const DEFAULT_TLE_SOURCE_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub tle_source_url: String,
    /// Per-attempt network timeout
    pub fetch_timeout: Duration,
    pub fetch_max_attempts: u32,
    /// Linear backoff unit: attempt N waits N units
    pub fetch_backoff_unit: Duration,
    pub fetch_interval: Duration,
    /// Deadline for one whole fetch -> parse -> persist cycle
    pub cycle_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            tle_source_url: env::var("TLE_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_TLE_SOURCE_URL.to_string()),
            fetch_timeout: Duration::from_millis(parse_var("TLE_FETCH_TIMEOUT_MS", 10_000)?),
            fetch_max_attempts: parse_var("TLE_FETCH_MAX_ATTEMPTS", 3)?,
            fetch_backoff_unit: Duration::from_millis(parse_var("TLE_FETCH_BACKOFF_MS", 1_000)?),
            fetch_interval: hours_to_duration(
                "TLE_FETCH_INTERVAL_H",
                parse_var("TLE_FETCH_INTERVAL_H", 6)?,
            )?,
            cycle_timeout: Duration::from_millis(parse_var("TLE_CYCLE_TIMEOUT_MS", 60_000)?),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_max_attempts == 0 {
            bail!("TLE_FETCH_MAX_ATTEMPTS must be at least 1");
        }
        if self.fetch_timeout.is_zero() {
            bail!("TLE_FETCH_TIMEOUT_MS must be greater than zero");
        }
        if self.fetch_interval.is_zero() {
            bail!("TLE_FETCH_INTERVAL_H must be greater than zero");
        }
        if self.cycle_timeout.is_zero() {
            bail!("TLE_CYCLE_TIMEOUT_MS must be greater than zero");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.fetch_max_attempts,
            backoff_unit: self.fetch_backoff_unit,
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval: self.fetch_interval,
            cycle_timeout: self.cycle_timeout,
        }
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn hours_to_duration(name: &str, hours: u64) -> Result<Duration> {
    match hours.checked_mul(3600) {
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => bail!("{} is too large: {} hours", name, hours),
    }
}
