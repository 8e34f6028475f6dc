//! Periodic element set ingestion.
//!
//! One cycle runs immediately on start, then one per interval until the
//! shutdown token fires:
//!
//! ```text
//! IngestScheduler::run(shutdown)
//!     │
//!     ├─► tick (or shutdown → stop)
//!     └─► run_cycle()
//!             └─► fetcher.fetch_and_ingest(CycleContext { child token, deadline })
//!                     └─► logged; never stops the loop
//! ```
//!
//! Cycles never overlap: the next tick is only awaited after the current
//! cycle returns. Ticks missed while a cycle overran collapse into a single
//! immediate trigger (`MissedTickBehavior::Skip`), after which the cadence
//! realigns to the original schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::domains::element_sets::{IngestError, IngestReport};
use crate::kernel::{BaseFetcher, CycleContext};

/// Shortest cadence accepted; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Time between cycle starts
    pub interval: Duration,
    /// Deadline for a single cycle, independent of shutdown
    pub cycle_timeout: Duration,
}

/// How a single cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    Succeeded(IngestReport),
    Failed(IngestError),
    /// Shutdown arrived mid-cycle; not an ingestion failure.
    Cancelled,
}

pub struct IngestScheduler {
    fetcher: Arc<dyn BaseFetcher>,
    settings: SchedulerSettings,
}

impl IngestScheduler {
    pub fn new(fetcher: Arc<dyn BaseFetcher>, settings: SchedulerSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// A cycle in flight when shutdown arrives is allowed to finish within
    /// its own deadline; no further cycle is started.
    pub async fn run(&self, shutdown: CancellationToken) {
        let period = self.settings.interval.max(MIN_INTERVAL);
        info!(
            interval_secs = period.as_secs(),
            cycle_timeout_ms = self.settings.cycle_timeout.as_millis() as u64,
            "Starting element set ingest scheduler"
        );

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.run_cycle(&shutdown).await;
        }

        info!("Element set ingest scheduler stopped");
    }

    /// Run one fetch -> parse -> persist cycle and log how it ended.
    pub async fn run_cycle(&self, shutdown: &CancellationToken) -> CycleOutcome {
        let ctx = CycleContext::new(shutdown.child_token(), self.settings.cycle_timeout);

        match self.fetcher.fetch_and_ingest(&ctx).await {
            Ok(report) => {
                info!(
                    attempts = report.attempts,
                    parsed = report.parsed,
                    inserted = report.inserted,
                    "Element set ingest cycle completed successfully"
                );
                CycleOutcome::Succeeded(report)
            }
            Err(e) if e.is_shutdown() => {
                info!("Element set ingest cycle cancelled by shutdown");
                CycleOutcome::Cancelled
            }
            Err(e) => {
                error!(error = %e, "Element set ingest cycle failed");
                CycleOutcome::Failed(e)
            }
        }
    }
}
