// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE seams only. The ingest cycle is written against
// them so tests can swap the network and the database for in-memory doubles.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogSource, BaseBatchWriter)

use anyhow::Result;
use async_trait::async_trait;
use tle_format::ElementSet;

use crate::domains::element_sets::{BatchOutcome, FetchError, IngestError, IngestReport};
use crate::kernel::CycleContext;

// =============================================================================
// Catalog Source Trait (Infrastructure - upstream TLE document)
// =============================================================================

#[async_trait]
pub trait BaseCatalogSource: Send + Sync {
    /// Perform ONE fetch attempt: request the document and decode it.
    ///
    /// Retrying is the caller's job; implementations must not retry.
    async fn fetch_catalog(&self) -> std::result::Result<Vec<ElementSet>, FetchError>;

    /// Where the catalog comes from (for logs)
    fn describe(&self) -> String {
        "catalog source".to_string()
    }
}

// =============================================================================
// Batch Writer Trait (Infrastructure - persistence write path)
// =============================================================================

#[async_trait]
pub trait BaseBatchWriter: Send + Sync {
    /// Persist all records atomically, skipping any (catalog_number, epoch)
    /// already stored.
    async fn save_batch(&self, records: &[ElementSet]) -> Result<BatchOutcome>;
}

// =============================================================================
// Fetcher Trait (one full fetch -> parse -> persist cycle)
// =============================================================================

#[async_trait]
pub trait BaseFetcher: Send + Sync {
    async fn fetch_and_ingest(
        &self,
        ctx: &CycleContext,
    ) -> std::result::Result<IngestReport, IngestError>;
}
