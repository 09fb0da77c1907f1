//! Page renderer: reconciles the visible badge set with a view state
//!
//! The renderer is a small state machine over [`ViewState`]. Every
//! transition first removes all previously injected badges from the whole
//! document (the page may have re-rendered its container between
//! navigations), then mounts the badge set for the new state. The DOM
//! itself is behind the [`BadgeSurface`] seam; implementations live in
//! `wasm.rs` (real document), `cli` (terminal), and the tests (fakes).

pub mod badge;

pub use badge::{
    applies_palette, badges_for, days_until, expiration_label, expiry_palette, loading_badge,
    Badge, Palette, CONTAINER_SELECTORS, MARKER_CLASSES,
};

use crate::error::RenderError;
use crate::models::JobStats;

/// What the current job view should display.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Not a job page, or nothing to show. Renders no badges.
    Empty,
    /// A fetch is in flight for the current job.
    Loading,
    /// Stats are available for the current job.
    Shown(JobStats),
}

/// Where badges get mounted. `clear_badges` must remove every
/// marker-classed element in the document; `mount` places the given
/// badges, in order, into the first matching container.
pub trait BadgeSurface {
    fn clear_badges(&mut self);
    fn mount(&mut self, badges: &[Badge]) -> Result<(), RenderError>;
}

/// Badge-set reconciler for one browsing context.
pub struct Renderer<S: BadgeSurface> {
    surface: S,
    state: ViewState,
}

impl<S: BadgeSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: ViewState::Empty,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Move to `next`, clearing stale badges first. `Empty` and `Loading`
    /// with no container are not errors worth acting on; only a failed
    /// `Shown` mount returns `ContainerNotFound` so the caller can
    /// schedule its single delayed re-check.
    pub fn transition(&mut self, next: ViewState, now_ms: i64) -> Result<(), RenderError> {
        self.surface.clear_badges();

        let badges = match &next {
            ViewState::Empty => Vec::new(),
            ViewState::Loading => vec![loading_badge()],
            ViewState::Shown(stats) => badges_for(stats, now_ms),
        };
        let report_mount_failure = matches!(next, ViewState::Shown(_));
        self.state = next;

        if badges.is_empty() {
            return Ok(());
        }
        match self.surface.mount(&badges) {
            Ok(()) => Ok(()),
            Err(e) if report_mount_failure => Err(e),
            Err(_) => Ok(()),
        }
    }

    /// Re-apply the current state, for the delayed container re-check.
    pub fn reapply(&mut self, now_ms: i64) -> Result<(), RenderError> {
        self.transition(self.state.clone(), now_ms)
    }
}
