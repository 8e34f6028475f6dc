//! Typed failures of the ingest path.
//!
//! [`FetchError`] describes one failed attempt; [`IngestError`] is what a
//! whole cycle reports to the scheduler. Keeping them as tagged kinds lets
//! the scheduler tell a shutdown apart from a real failure without looking
//! at message text.

use thiserror::Error;
use tle_format::ParseError;

use crate::kernel::Interrupt;

/// One fetch attempt failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, or per-attempt timeout failure
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("source server responded with: {0}")]
    Status(reqwest::StatusCode),

    /// The body stream broke mid-transfer
    #[error("reading response body failed: {0}")]
    Body(#[source] std::io::Error),

    /// The document decoded to zero element sets
    #[error("no element sets parsed from source")]
    NoRecords,

    /// The document is malformed; fetching it again will not help
    #[error(transparent)]
    Malformed(#[from] ParseError),
}

impl FetchError {
    /// Whether another attempt in the same cycle may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Malformed(_))
    }
}

/// A whole ingest cycle failed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("ingest cancelled by shutdown")]
    Cancelled,

    #[error("ingest cycle deadline exceeded")]
    DeadlineExceeded,

    #[error("fetch failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: FetchError,
    },

    #[error("source served malformed element sets: {0}")]
    Malformed(#[source] ParseError),

    #[error("failed to save element sets: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IngestError {
    /// True when the cycle ended because the process is shutting down.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, IngestError::Cancelled)
    }
}

impl From<Interrupt> for IngestError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => IngestError::Cancelled,
            Interrupt::DeadlineExceeded => IngestError::DeadlineExceeded,
        }
    }
}
