//! reqwest transport for the CLI build
//!
//! The browser build never goes through here; its requests ride the page's
//! own session via the JS shim. This transport exists so `jobscura stats`
//! can hit the endpoint from a terminal with an exported cookie.

use crate::error::FetchError;
use crate::models::JobStats;

use super::{csrf_token_from_cookie, parse_stats_response, request_headers, stats_endpoint};

/// Issue one stats request. `cookie` is the raw Cookie header value; the
/// CSRF token is derived from it when present.
pub async fn fetch_job_stats(
    client: &reqwest::Client,
    job_id: &str,
    cookie: Option<&str>,
) -> Result<JobStats, FetchError> {
    let csrf_token = cookie.and_then(csrf_token_from_cookie);

    let mut request = client.get(stats_endpoint(job_id));
    for (name, value) in request_headers(csrf_token.as_deref()) {
        request = request.header(name, value);
    }
    if let Some(cookie) = cookie {
        request = request.header("Cookie", cookie);
    }

    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    parse_stats_response(&body)
}

/// Fire the usage-counter ping. Failures are reported but never matter.
pub async fn ping_counter(client: &reqwest::Client) -> Result<u16, FetchError> {
    let response = client
        .get(super::COUNTER_ENDPOINT)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    Ok(response.status().as_u16())
}
