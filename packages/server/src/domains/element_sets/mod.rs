//! Element sets: the ingested TLE catalog.
//!
//! - `models` - storage (batch write path and read contract)
//! - `activities` - the fetch -> parse -> persist ingest with retry
//! - `errors` - typed attempt and cycle failures

pub mod activities;
pub mod errors;
pub mod models;

pub use activities::{ElementSetIngestor, IngestReport, RetryPolicy};
pub use errors::{FetchError, IngestError};
pub use models::{BatchOutcome, StoredElementSet};
