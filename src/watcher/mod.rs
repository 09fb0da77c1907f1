//! URL watcher: turns raw location strings into navigation events
//!
//! The platform layer feeds every location signal it has (history API
//! interception, back/forward traversal, mutation-observer fallback) into
//! [`UrlWatcher::observe`]; the watcher de-duplicates against the last-seen
//! location and emits at most one [`NavigationEvent`] per actual change.
//! It never touches the DOM or the cache.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::NavigationEvent;

lazy_static! {
    // Job pages carry the id either as a path segment or a query parameter:
    //   /jobs/view/4012345678
    //   /jobs/search/?currentJobId=4012345678
    static ref JOB_ID_PATTERN: Regex =
        Regex::new(r"(?:jobs/view/(\d+)|currentJobId=(\d+))").unwrap();
}

/// Extract the job identifier from a location string; the first matching
/// form wins. `None` means the location is not a job page.
pub fn extract_job_id(url: &str) -> Option<String> {
    let caps = JOB_ID_PATTERN.captures(url)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Handle to one registered navigation listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

struct Listener {
    token: SubscriptionToken,
    callback: Box<dyn FnMut(&NavigationEvent)>,
}

/// Last-seen location tracker with an explicit subscription API.
///
/// This replaces the shipped pattern of monkey-patching `history.pushState`
/// and friends: interception stays in the platform layer, and consumers
/// subscribe here instead of sharing patched globals.
#[derive(Default)]
pub struct UrlWatcher {
    last_url: Option<String>,
    listeners: Vec<Listener>,
    next_token: u64,
}

impl UrlWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for future navigation events.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut(&NavigationEvent) + 'static,
    {
        self.next_token += 1;
        let token = SubscriptionToken(self.next_token);
        self.listeners.push(Listener {
            token,
            callback: Box::new(callback),
        });
        token
    }

    /// Remove a listener. Returns false when the token was already gone.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.token != token);
        self.listeners.len() != before
    }

    /// Report the current location. Emits a [`NavigationEvent`] (to every
    /// subscriber, and as the return value) only when the location actually
    /// changed since the last call.
    pub fn observe(&mut self, url: &str) -> Option<NavigationEvent> {
        if self.last_url.as_deref() == Some(url) {
            return None;
        }
        self.last_url = Some(url.to_string());

        let event = NavigationEvent {
            url: url.to_string(),
            job_id: extract_job_id(url),
        };
        for listener in &mut self.listeners {
            (listener.callback)(&event);
        }
        Some(event)
    }

    /// Last location this watcher has seen, if any.
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use test_case::test_case;

    #[test_case("https://www.linkedin.com/jobs/view/4012345678/", Some("4012345678"); "path segment")]
    #[test_case("https://www.linkedin.com/jobs/view/7/?refId=abc", Some("7"); "path segment with query")]
    #[test_case("https://www.linkedin.com/jobs/search/?currentJobId=123&keywords=rust", Some("123"); "query parameter")]
    #[test_case("https://www.linkedin.com/jobs/view/55/?currentJobId=66", Some("55"); "path form wins over query form")]
    #[test_case("https://www.linkedin.com/feed/", None; "not a job page")]
    #[test_case("https://www.linkedin.com/jobs/view/abc/", None; "non numeric id")]
    #[test_case("", None; "empty url")]
    fn test_extract_job_id(url: &str, expected: Option<&str>) {
        assert_eq!(extract_job_id(url).as_deref(), expected);
    }

    #[test]
    fn test_observe_dedups_repeated_locations() {
        let mut watcher = UrlWatcher::new();
        let url = "https://www.linkedin.com/jobs/view/42/";

        let first = watcher.observe(url).unwrap();
        assert_eq!(first.job_id.as_deref(), Some("42"));
        assert_eq!(watcher.last_url(), Some(url));
        // Same location again: no event, regardless of how many signal
        // sources reported it.
        assert_eq!(watcher.observe(url), None);
        assert_eq!(watcher.observe(url), None);

        let second = watcher.observe("https://www.linkedin.com/feed/").unwrap();
        assert_eq!(second.job_id, None);
    }

    #[test]
    fn test_subscribers_see_each_event_once() {
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut watcher = UrlWatcher::new();
        watcher.subscribe(move |event| sink.borrow_mut().push(event.job_id.clone()));

        watcher.observe("https://www.linkedin.com/jobs/view/1/");
        watcher.observe("https://www.linkedin.com/jobs/view/1/");
        watcher.observe("https://www.linkedin.com/jobs/view/2/");

        assert_eq!(
            *seen.borrow(),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);

        let mut watcher = UrlWatcher::new();
        let token = watcher.subscribe(move |_| *sink.borrow_mut() += 1);

        watcher.observe("https://www.linkedin.com/jobs/view/1/");
        assert!(watcher.unsubscribe(token));
        assert!(!watcher.unsubscribe(token));
        watcher.observe("https://www.linkedin.com/jobs/view/2/");

        assert_eq!(*seen.borrow(), 1);
    }
}
