// TestDependencies - mock implementations for testing
//
// In-memory stand-ins for the catalog source, the batch writer and the
// fetcher, so the ingest cycle and the scheduler can be tested without a
// network or a database.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tle_format::ElementSet;
use tokio::time::Instant;

use super::{BaseBatchWriter, BaseCatalogSource, BaseFetcher, CycleContext};
use crate::domains::element_sets::{BatchOutcome, FetchError, IngestError, IngestReport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Mock Catalog Source
// =============================================================================

/// Scripted per-attempt responses. Once the script runs out every attempt
/// returns an empty document.
#[derive(Default)]
pub struct MockCatalogSource {
    responses: Mutex<VecDeque<std::result::Result<Vec<ElementSet>, FetchError>>>,
    delay: Option<Duration>,
    calls: AtomicU32,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(self, records: Vec<ElementSet>) -> Self {
        lock(&self.responses).push_back(Ok(records));
        self
    }

    pub fn with_failure(self, err: FetchError) -> Self {
        lock(&self.responses).push_back(Err(err));
        self
    }

    /// Every attempt takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetch attempts observed
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseCatalogSource for MockCatalogSource {
    async fn fetch_catalog(&self) -> std::result::Result<Vec<ElementSet>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.responses).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn describe(&self) -> String {
        "mock catalog source".to_string()
    }
}

// =============================================================================
// Mock Batch Writer
// =============================================================================

/// Keeps rows in memory with the same (catalog_number, epoch) dedup rule as
/// the database.
#[derive(Default)]
pub struct MockBatchWriter {
    rows: Mutex<BTreeMap<(i32, DateTime<Utc>), ElementSet>>,
    fail_next: AtomicBool,
    delay: Option<Duration>,
    batches: AtomicU32,
}

impl MockBatchWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write takes `delay` before it commits.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make the next save fail without storing anything.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        lock(&self.rows).len()
    }

    /// Number of save calls that reached the writer (including failures)
    pub fn batches(&self) -> u32 {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseBatchWriter for MockBatchWriter {
    async fn save_batch(&self, records: &[ElementSet]) -> Result<BatchOutcome> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("simulated storage failure"));
        }

        let mut rows = lock(&self.rows);
        let mut inserted = 0;
        for record in records {
            let key = (record.catalog_number, record.epoch);
            if !rows.contains_key(&key) {
                rows.insert(key, record.clone());
                inserted += 1;
            }
        }

        Ok(BatchOutcome {
            staged: records.len() as u64,
            inserted,
        })
    }
}

// =============================================================================
// Mock Fetcher (for scheduler tests)
// =============================================================================

/// Scripted cycle results; succeeds with an empty report once the script is
/// exhausted. Each call takes its configured duration and ignores
/// cancellation, like a write that must run to completion.
#[derive(Default)]
pub struct MockFetcher {
    outcomes: Mutex<VecDeque<std::result::Result<IngestReport, IngestError>>>,
    durations: Mutex<VecDeque<Duration>>,
    started_at: Mutex<Vec<Instant>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, outcome: std::result::Result<IngestReport, IngestError>) -> Self {
        lock(&self.outcomes).push_back(outcome);
        self
    }

    /// The next un-scripted call takes `duration`; later calls are instant.
    pub fn with_duration(self, duration: Duration) -> Self {
        lock(&self.durations).push_back(duration);
        self
    }

    pub fn calls(&self) -> usize {
        lock(&self.started_at).len()
    }

    /// When each call began
    pub fn started_at(&self) -> Vec<Instant> {
        lock(&self.started_at).clone()
    }
}

#[async_trait]
impl BaseFetcher for MockFetcher {
    async fn fetch_and_ingest(
        &self,
        _ctx: &CycleContext,
    ) -> std::result::Result<IngestReport, IngestError> {
        lock(&self.started_at).push(Instant::now());

        let duration = lock(&self.durations).pop_front();
        if let Some(duration) = duration {
            tokio::time::sleep(duration).await;
        }

        let outcome = lock(&self.outcomes).pop_front();
        outcome.unwrap_or_else(|| Ok(IngestReport::default()))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Shared handles for wiring mocks into an `ElementSetIngestor`.
pub struct TestDependencies {
    pub source: Arc<MockCatalogSource>,
    pub writer: Arc<MockBatchWriter>,
}

impl TestDependencies {
    pub fn new(source: MockCatalogSource) -> Self {
        Self {
            source: Arc::new(source),
            writer: Arc::new(MockBatchWriter::new()),
        }
    }

    pub fn with_writer(mut self, writer: MockBatchWriter) -> Self {
        self.writer = Arc::new(writer);
        self
    }
}
