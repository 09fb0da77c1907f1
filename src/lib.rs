//! Jobscura: job-posting stats overlay
//!
//! Core logic for a browser extension that decorates job pages with
//! application/view/expiration badges scraped from the host site's private
//! stats endpoint. The crate owns everything that can be reasoned about
//! off-page: URL watching, the per-session job cache, fetch request/response
//! handling, badge construction, and the epoch-tagged reconciliation that
//! keeps stale results from rendering over a newer navigation. The DOM,
//! timers, and sockets stay behind seams implemented per platform (wasm
//! bindings for the browser, reqwest/terminal for the CLI).

pub mod error;
pub mod fetcher;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod watcher;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{FetchError, RenderError};
pub use models::{JobRecord, JobStats, NavigationEvent, PageMessage};
pub use orchestrator::{
    AnalyticsSink, Directives, FetchRequest, JobStore, NoopAnalytics, Orchestrator,
};
pub use render::{BadgeSurface, Renderer, ViewState};
pub use watcher::{extract_job_id, SubscriptionToken, UrlWatcher};
