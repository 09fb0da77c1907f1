//! Orchestrator: binds navigation, cache, fetch, and render together
//!
//! The only component that reads or writes the [`JobStore`]. It is sans-IO:
//! every entry point returns a [`Directives`] value describing what the
//! platform layer should do next (issue a fetch, schedule a render
//! re-check), and fetch completions come back in through
//! [`Orchestrator::complete_fetch`] carrying the tag they were issued with.
//!
//! Ordering rule: each navigation bumps an epoch, and a fetch result only
//! renders when both its epoch and its job id still match the current
//! target. A result that lost the race is reported as stale for the caller
//! to log; valid data is still cached so a later visit hits the store.

pub mod store;

pub use store::{InsertOutcome, JobStore};

use crate::error::{FetchError, RenderError};
use crate::models::{JobStats, NavigationEvent};
use crate::render::{BadgeSurface, Renderer, ViewState};

/// Outbound analytics seam. The browser build forwards to
/// `chrome.runtime.sendMessage({type: "update"})`; the CLI uses a no-op.
pub trait AnalyticsSink {
    fn send_update(&mut self);
}

/// Analytics sink that drops every ping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn send_update(&mut self) {}
}

/// Tag for one in-flight fetch: the job it was issued for and the
/// navigation epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub job_id: String,
    pub epoch: u64,
}

/// What the platform layer should do after an orchestrator call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Directives {
    /// Issue one stats fetch and report back via `complete_fetch`.
    pub fetch: Option<FetchRequest>,
    /// Schedule a single delayed `retry_render` with this epoch; replaces
    /// any previously scheduled re-check.
    pub retry_render: Option<u64>,
    /// The inbound result no longer matched the current target and was
    /// discarded without rendering. For the caller's log line.
    pub stale: bool,
}

pub struct Orchestrator<S: BadgeSurface, A: AnalyticsSink> {
    store: JobStore,
    renderer: Renderer<S>,
    analytics: A,
    epoch: u64,
    current_job: Option<String>,
    retry_pending: bool,
}

impl<S: BadgeSurface, A: AnalyticsSink> Orchestrator<S, A> {
    pub fn new(surface: S, analytics: A) -> Self {
        Self {
            store: JobStore::new(),
            renderer: Renderer::new(surface),
            analytics,
            epoch: 0,
            current_job: None,
            retry_pending: false,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// React to one navigation event.
    ///
    /// Non-job page: render `Empty`. Job page: render `Loading` at once so
    /// the previous job's badges never linger, then either render the
    /// cached record (no network) or direct the caller to fetch.
    pub fn handle_navigation(&mut self, nav: &NavigationEvent, now_ms: i64) -> Directives {
        self.epoch += 1;
        // A newer navigation supersedes any pending container re-check.
        self.retry_pending = false;
        let mut directives = Directives::default();

        let Some(job_id) = nav.job_id.clone() else {
            self.current_job = None;
            let _ = self.renderer.transition(ViewState::Empty, now_ms);
            return directives;
        };
        self.current_job = Some(job_id.clone());
        let _ = self.renderer.transition(ViewState::Loading, now_ms);

        if self.store.contains(&job_id) {
            self.render_cached(&job_id, now_ms, &mut directives);
        } else {
            directives.fetch = Some(FetchRequest {
                job_id,
                epoch: self.epoch,
            });
        }
        directives
    }

    /// Accept the outcome of a fetch issued by an earlier
    /// `handle_navigation`. Valid stats are cached either way; rendering
    /// happens only when the request's tag still matches the current
    /// target.
    pub fn complete_fetch(
        &mut self,
        request: &FetchRequest,
        outcome: Result<JobStats, FetchError>,
        now_ms: i64,
    ) -> Directives {
        let mut directives = Directives::default();
        let still_current = request.epoch == self.epoch
            && self.current_job.as_deref() == Some(request.job_id.as_str());

        match outcome {
            Ok(stats) => {
                let job_id = stats.job_id.clone();
                self.cache_and_ping(stats, now_ms);
                if still_current {
                    self.render_cached(&job_id, now_ms, &mut directives);
                } else {
                    directives.stale = true;
                }
            }
            Err(_) => {
                // Fetch failed or carried no data: nothing to show.
                if still_current {
                    let _ = self.renderer.transition(ViewState::Empty, now_ms);
                } else {
                    directives.stale = true;
                }
            }
        }
        directives
    }

    /// Accept an unsolicited stats push from the page-context script.
    /// Same cache-insert-then-render rule as a fetch success, gated by the
    /// same still-current check.
    pub fn handle_stats_push(&mut self, stats: JobStats, now_ms: i64) -> Directives {
        let mut directives = Directives::default();
        let still_current = self.current_job.as_deref() == Some(stats.job_id.as_str());
        let job_id = stats.job_id.clone();

        self.cache_and_ping(stats, now_ms);
        if still_current {
            self.render_cached(&job_id, now_ms, &mut directives);
        } else {
            directives.stale = true;
        }
        directives
    }

    /// The single delayed re-check after a `ContainerNotFound`. A newer
    /// navigation invalidates it via the epoch.
    pub fn retry_render(&mut self, epoch: u64, now_ms: i64) {
        if epoch != self.epoch || !self.retry_pending {
            return;
        }
        self.retry_pending = false;
        let _ = self.renderer.reapply(now_ms);
    }

    /// Render the stored record for `job_id`. Rendering always goes
    /// through the store so a losing duplicate insert can never put
    /// different numbers on screen than the cache holds.
    fn render_cached(&mut self, job_id: &str, now_ms: i64, directives: &mut Directives) {
        let Some(record) = self.store.get(job_id) else {
            return;
        };
        let stats = record.stats.clone();
        match self.renderer.transition(ViewState::Shown(stats), now_ms) {
            Ok(()) => {}
            Err(RenderError::ContainerNotFound) => {
                // Page may still be laying out; ask for one re-check.
                self.retry_pending = true;
                directives.retry_render = Some(self.epoch);
            }
        }
    }

    /// Cache the stats (first write wins) and fire the usage ping at most
    /// once per job id.
    fn cache_and_ping(&mut self, stats: JobStats, now_ms: i64) {
        let job_id = stats.job_id.clone();
        self.store.insert(stats, now_ms);
        let needs_ping = self
            .store
            .get(&job_id)
            .map(|record| !record.analytics_sent)
            .unwrap_or(false);
        if needs_ping {
            self.analytics.send_update();
            self.store.mark_analytics_sent(&job_id);
        }
    }
}
