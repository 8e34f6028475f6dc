//! Fetch-with-retry ingest of the upstream catalog.
//!
//! ```text
//! fetch_and_ingest(ctx)
//!     │
//!     ├─► attempt 1..=max_attempts
//!     │       ├─► source.fetch_catalog()   (raced against ctx)
//!     │       ├─► zero records → retryable failure
//!     │       └─► retryable failure → sleep attempt × unit (raced against ctx)
//!     │
//!     └─► writer.save_batch(records)       (bounded by ctx deadline only)
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tle_format::ElementSet;
use tracing::{debug, info, warn};

use crate::domains::element_sets::{FetchError, IngestError};
use crate::kernel::{BaseBatchWriter, BaseCatalogSource, BaseFetcher, CycleContext, Interrupt};

/// Bounded linear retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Attempt `n` is followed by a wait of `n × backoff_unit`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }
}

/// What one successful cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Fetch attempts used, including the successful one
    pub attempts: u32,
    pub parsed: usize,
    pub inserted: u64,
}

/// Fetches the catalog, retrying transient failures, and persists it.
pub struct ElementSetIngestor {
    source: Arc<dyn BaseCatalogSource>,
    writer: Arc<dyn BaseBatchWriter>,
    policy: RetryPolicy,
}

impl ElementSetIngestor {
    pub fn new(
        source: Arc<dyn BaseCatalogSource>,
        writer: Arc<dyn BaseBatchWriter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            source,
            writer,
            policy,
        }
    }

    /// Fetch until one attempt yields records, or give up.
    async fn fetch_with_retry(
        &self,
        ctx: &CycleContext,
    ) -> Result<(u32, Vec<ElementSet>), IngestError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            if let Some(interrupt) = ctx.check() {
                return Err(interrupt.into());
            }

            let outcome = tokio::select! {
                biased;
                interrupt = ctx.interrupted() => return Err(interrupt.into()),
                result = self.source.fetch_catalog() => result,
            };

            let err = match outcome {
                Ok(records) if !records.is_empty() => return Ok((attempt, records)),
                Ok(_) => FetchError::NoRecords,
                Err(FetchError::Malformed(parse_err)) => {
                    return Err(IngestError::Malformed(parse_err));
                }
                Err(e) => e,
            };

            if attempt >= max_attempts {
                return Err(IngestError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Catalog fetch attempt failed, backing off"
            );

            tokio::select! {
                biased;
                interrupt = ctx.interrupted() => return Err(interrupt.into()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[async_trait]
impl BaseFetcher for ElementSetIngestor {
    async fn fetch_and_ingest(&self, ctx: &CycleContext) -> Result<IngestReport, IngestError> {
        debug!(source = %self.source.describe(), "Fetching element set catalog");

        let (attempts, records) = self.fetch_with_retry(ctx).await?;
        let parsed = records.len();

        // A write already under way is not abandoned on shutdown; only the
        // cycle deadline bounds it, and dropping the transaction rolls back.
        let outcome = tokio::time::timeout_at(ctx.deadline(), self.writer.save_batch(&records))
            .await
            .map_err(|_| IngestError::from(Interrupt::DeadlineExceeded))?
            .map_err(|e| IngestError::Persistence(e.into()))?;

        info!(
            attempts,
            parsed,
            inserted = outcome.inserted,
            skipped = outcome.skipped(),
            "Element sets ingested"
        );

        Ok(IngestReport {
            attempts,
            parsed,
            inserted: outcome.inserted,
        })
    }
}
