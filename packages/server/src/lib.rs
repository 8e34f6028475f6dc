// TLE Ingestion - Server Core
//
// Periodically fetches the public two-line element catalog, decodes it with
// `tle_format`, and persists new element sets to Postgres. A small read-only
// HTTP surface serves the stored data and a health check.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
