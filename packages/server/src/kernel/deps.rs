//! Ingestion dependencies (using traits for testability)
//!
//! The scheduler only sees `BaseFetcher`; the ingestor behind it only sees
//! `BaseCatalogSource` and `BaseBatchWriter`. This module builds the
//! production implementations of those seams from a pool and a config.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tle_format::ElementSet;

use crate::config::Config;
use crate::domains::element_sets::{BatchOutcome, ElementSetIngestor, StoredElementSet};
use crate::kernel::{BaseBatchWriter, BaseCatalogSource, BaseFetcher, HttpCatalogSource};

// =============================================================================
// Postgres Batch Writer (implements BaseBatchWriter trait)
// =============================================================================

/// Writes batches through `StoredElementSet::save_batch`.
#[derive(Clone)]
pub struct PostgresBatchWriter {
    pool: PgPool,
}

impl PostgresBatchWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseBatchWriter for PostgresBatchWriter {
    async fn save_batch(&self, records: &[ElementSet]) -> Result<BatchOutcome> {
        StoredElementSet::save_batch(records, &self.pool).await
    }
}

// =============================================================================
// IngestDeps
// =============================================================================

/// Everything one ingest cycle talks to.
#[derive(Clone)]
pub struct IngestDeps {
    pub source: Arc<dyn BaseCatalogSource>,
    pub writer: Arc<dyn BaseBatchWriter>,
}

impl IngestDeps {
    pub fn new(source: Arc<dyn BaseCatalogSource>, writer: Arc<dyn BaseBatchWriter>) -> Self {
        Self { source, writer }
    }

    /// HTTP source and Postgres writer as configured.
    pub fn from_config(config: &Config, db_pool: PgPool) -> Result<Self> {
        let source = HttpCatalogSource::new(&config.tle_source_url, config.fetch_timeout)
            .context("Failed to build HTTP client for catalog source")?;
        let writer = PostgresBatchWriter::new(db_pool);
        Ok(Self::new(Arc::new(source), Arc::new(writer)))
    }

    /// Ingestor over these dependencies with the configured retry policy.
    pub fn fetcher(&self, config: &Config) -> Arc<dyn BaseFetcher> {
        Arc::new(ElementSetIngestor::new(
            self.source.clone(),
            self.writer.clone(),
            config.retry_policy(),
        ))
    }
}
