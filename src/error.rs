//! Error taxonomy for the overlay core
//!
//! Every error here is terminal at the boundary that produced it: callers
//! log it and fall back to an `Empty` render state. Nothing is surfaced to
//! the user and nothing is retried, except a single delayed re-check after
//! `ContainerNotFound` while the page is still laying out.

use thiserror::Error;

/// Failure modes of one stats fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response.
    #[error("network request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("stats endpoint returned status {0}")]
    Http(u16),

    /// The response body was not valid JSON.
    #[error("malformed stats response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body parsed but one of the required fields was absent.
    /// This is the "no data" outcome: nothing is cached or rendered.
    #[error("stats response is missing required fields")]
    Incomplete,
}

/// Failure modes of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    /// None of the known container selectors matched the document.
    #[error("no badge container matched any known selector")]
    ContainerNotFound,
}
