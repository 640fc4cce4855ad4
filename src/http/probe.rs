use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::error::AppResult;

use super::client::build_client;

/// Status reported when a request could not complete at all.
const FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status_code: u16,
    pub reply_size: u64,
}

impl ProbeOutcome {
    /// Outcome for transport failures, expired deadlines and cancellations.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            status_code: FAILURE_STATUS,
            reply_size: 0,
        }
    }
}

/// One GET against a URL. Implementations absorb every error into the
/// returned outcome.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn fetch(&self, url: &str) -> ProbeOutcome;
}

#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(connect_timeout: Duration) -> AppResult<Self> {
        Ok(Self::with_client(build_client(connect_timeout)?))
    }

    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn fetch(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("Failed to fetch {}: {}", url, err);
                return ProbeOutcome::failed();
            }
        };

        let status_code = response.status().as_u16();
        let header_size = header_bytes(response.headers());

        match drain_response_body(response).await {
            Ok(body_size) => ProbeOutcome {
                status_code,
                reply_size: header_size.saturating_add(body_size),
            },
            Err(err) => {
                warn!("Failed to read response body from {}: {}", url, err);
                ProbeOutcome {
                    status_code,
                    reply_size: header_size,
                }
            }
        }
    }
}

/// Sum of name and value lengths over every header entry.
#[must_use]
pub fn header_bytes(headers: &HeaderMap) -> u64 {
    headers.iter().fold(0u64, |total, (name, value)| {
        let entry = name.as_str().len().saturating_add(value.as_bytes().len());
        total.saturating_add(u64::try_from(entry).unwrap_or(u64::MAX))
    })
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
