use std::time::Duration;

use reqwest::Client;
use tracing::error;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Builds the client shared by every probe of a run.
///
/// No overall request timeout is set here; the dispatcher owns the per-probe
/// deadline so an expiry is reported as a failed measurement.
///
/// # Errors
///
/// Returns an error when the underlying TLS/connector setup fails.
pub fn build_client(connect_timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| {
            error!("Failed to build HTTP client: {}", err);
            AppError::http(HttpError::BuildClientFailed { source: err })
        })
}

/// Checks that `raw` parses as an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns an error for unparsable URLs or other schemes.
pub fn validate_url(raw: &str) -> AppResult<Url> {
    let parsed = Url::parse(raw).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::validation(
            ValidationError::UnsupportedUrlScheme {
                url: raw.to_owned(),
                scheme: other.to_owned(),
            },
        )),
    }
}
