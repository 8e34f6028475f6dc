//! Kernel module - ingestion infrastructure and dependencies.

pub mod catalog_source;
pub mod cycle;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use catalog_source::HttpCatalogSource;
pub use cycle::{CycleContext, Interrupt};
pub use deps::{IngestDeps, PostgresBatchWriter};
pub use scheduled_tasks::{CycleOutcome, IngestScheduler, SchedulerSettings};
pub use test_dependencies::{MockBatchWriter, MockCatalogSource, MockFetcher, TestDependencies};
pub use traits::*;
