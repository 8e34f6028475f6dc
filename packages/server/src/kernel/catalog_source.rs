//! HTTP catalog source.
//!
//! Streams the upstream document line by line into the TLE assembler, so
//! only the decoded records are held in memory, never the raw body. Each
//! line read is capped at `tle_format::LINE_READ_LIMIT` bytes.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tle_format::{ElementSet, TripletAssembler, LINE_READ_LIMIT};
use tokio::io::{AsyncBufReadExt, AsyncReadExt};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::domains::element_sets::FetchError;
use crate::kernel::BaseCatalogSource;

const USER_AGENT: &str = concat!("tle-ingestion/", env!("CARGO_PKG_VERSION"));

/// Fetches the catalog with a plain GET.
///
/// The `reqwest::Client` is built once and shared by every attempt and
/// every cycle, so connections are reused.
#[derive(Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Build a source whose requests time out after `request_timeout`.
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, url))
    }

    /// Use an existing client (its timeout settings apply).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

}

#[async_trait]
impl BaseCatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<Vec<ElementSet>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = Box::pin(response.bytes_stream().map_err(io::Error::other));
        let mut reader = StreamReader::new(body);
        let mut assembler = TripletAssembler::new();
        let mut records = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = (&mut reader)
                .take(LINE_READ_LIMIT)
                .read_until(b'\n', &mut line)
                .await
                .map_err(FetchError::Body)?;
            if read == 0 {
                break;
            }
            if let Some(record) = assembler.push_bytes(&line)? {
                records.push(record);
            }
        }
        assembler.finish()?;

        debug!(url = %self.url, records = records.len(), "Catalog document decoded");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
