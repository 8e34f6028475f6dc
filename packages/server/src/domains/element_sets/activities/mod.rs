pub mod ingest;

pub use ingest::{ElementSetIngestor, IngestReport, RetryPolicy};
