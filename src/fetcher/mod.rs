//! Stats fetcher: endpoint, headers, and response validation
//!
//! Everything about one fetch except the socket lives here, so the same
//! logic backs both the browser build (the JS shim performs the `fetch`)
//! and the CLI transport in [`http`]. One request per job id, fire and
//! forget: no retry, no backoff.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::JobStats;

#[cfg(feature = "cli")]
pub mod http;

/// Voyager endpoint template; append the job id.
pub const STATS_ENDPOINT_BASE: &str = "https://www.linkedin.com/voyager/api/jobs/jobPostings/";

/// Usage-counter endpoint pinged by the background script.
pub const COUNTER_ENDPOINT: &str = "https://api.counterapi.dev/v2/linkedinlens/jobs_viewed/up";

pub const ACCEPT_HEADER: &str = "application/vnd.linkedin.normalized+json+2.1";
pub const RESTLI_VERSION: &str = "2.0.0";

lazy_static! {
    // The session cookie carries the CSRF token, usually quoted:
    //   JSESSIONID="ajax:1234567890"
    static ref JSESSIONID_PATTERN: Regex = Regex::new(r#"JSESSIONID="?([^";]+)"?"#).unwrap();
}

/// Build the stats URL for one job id.
pub fn stats_endpoint(job_id: &str) -> String {
    format!("{STATS_ENDPOINT_BASE}{job_id}")
}

/// Extract the CSRF token from a raw cookie string. Absence is a valid
/// outcome: the request is still issued, just without the token header.
pub fn csrf_token_from_cookie(cookie: &str) -> Option<String> {
    JSESSIONID_PATTERN
        .captures(cookie)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Header set for one stats request.
pub fn request_headers(csrf_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("Accept", ACCEPT_HEADER.to_string()),
        ("x-restli-protocol-version", RESTLI_VERSION.to_string()),
    ];
    if let Some(token) = csrf_token {
        headers.push(("csrf-token", token.to_string()));
    }
    headers
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    data: Option<StatsData>,
}

#[derive(Debug, Deserialize)]
struct StatsData {
    #[serde(rename = "jobPostingId")]
    job_posting_id: Option<u64>,
    applies: Option<u64>,
    views: Option<u64>,
    #[serde(rename = "expireAt")]
    expire_at: Option<i64>,
    #[serde(rename = "workRemoteAllowed")]
    work_remote_allowed: Option<bool>,
}

/// Validate a stats response body.
///
/// All four required fields must be present; anything less is the "no
/// data" outcome ([`FetchError::Incomplete`]) and is never cached.
pub fn parse_stats_response(body: &str) -> Result<JobStats, FetchError> {
    let response: StatsResponse = serde_json::from_str(body)?;
    let data = response.data.ok_or(FetchError::Incomplete)?;

    match (data.job_posting_id, data.applies, data.views, data.expire_at) {
        (Some(id), Some(applies), Some(views), Some(expire_at)) => Ok(JobStats {
            job_id: id.to_string(),
            applies,
            views,
            expire_at,
            is_remote_allowed: data.work_remote_allowed,
        }),
        _ => Err(FetchError::Incomplete),
    }
}
