//! WebAssembly bindings for the browser build
//!
//! The content-script shim stays thin: it forwards location signals, page
//! messages, fetch completions, and timer ticks into [`Session`], executes
//! the directives objects it gets back (issue a `fetch`, schedule one
//! render re-check), and forwards analytics pings to the background
//! script. All decisions happen on this side of the boundary.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDocument};

use crate::error::RenderError;
use crate::fetcher::{csrf_token_from_cookie, request_headers, stats_endpoint};
use crate::models::{PageMessage, UPDATE_MESSAGE_TYPE};
use crate::orchestrator::{AnalyticsSink, Directives, FetchRequest, Orchestrator};
use crate::render::{Badge, BadgeSurface, CONTAINER_SELECTORS, MARKER_CLASSES};
use crate::watcher::UrlWatcher;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

const STYLE_ELEMENT_ID: &str = "jobscura-style";

fn badge_stylesheet() -> String {
    let container_rules: Vec<String> = CONTAINER_SELECTORS
        .iter()
        .map(|s| format!("{s}:has(.jobscura-badge)"))
        .collect();
    format!(
        "{containers} {{ flex-direction: column; align-items: flex-start; }}\n\
         .jobscura-badge {{ padding: 6px 12px; border-radius: 16px; font-weight: bold; \
         font-size: 14px; margin-top: 8px; display: block; width: fit-content; \
         box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}\n\
         .custom-loading-indicator {{ animation: jobscura-pulse 1.2s ease-in-out infinite; }}\n\
         @keyframes jobscura-pulse {{ 0%, 100% {{ opacity: 1; }} 50% {{ opacity: 0.45; }} }}",
        containers = container_rules.join(", ")
    )
}

/// Badge surface backed by the live document.
struct DomSurface {
    document: Document,
}

impl DomSurface {
    fn new(document: Document) -> Self {
        Self { document }
    }

    /// Install the shared badge stylesheet on first use.
    fn ensure_stylesheet(&self) {
        if self
            .document
            .get_element_by_id(STYLE_ELEMENT_ID)
            .is_some()
        {
            return;
        }
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_id(STYLE_ELEMENT_ID);
        style.set_text_content(Some(&badge_stylesheet()));
        let target: Option<Element> = self
            .document
            .head()
            .map(Element::from)
            .or_else(|| self.document.document_element());
        if let Some(target) = target {
            let _ = target.append_child(&style);
        }
    }

    fn find_container(&self) -> Option<Element> {
        CONTAINER_SELECTORS
            .iter()
            .find_map(|selector| self.document.query_selector(selector).ok().flatten())
    }
}

impl BadgeSurface for DomSurface {
    fn clear_badges(&mut self) {
        // Sweep the whole document: the page may have re-rendered its
        // container since the badges were mounted.
        let selector = MARKER_CLASSES
            .iter()
            .map(|class| format!(".{class}"))
            .collect::<Vec<_>>()
            .join(", ");
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                element.remove();
            }
        }
    }

    fn mount(&mut self, badges: &[Badge]) -> Result<(), RenderError> {
        let container = self.find_container().ok_or(RenderError::ContainerNotFound)?;
        self.ensure_stylesheet();

        for badge in badges {
            let Ok(element) = self.document.create_element("div") else {
                continue;
            };
            element.set_class_name(&format!("jobscura-badge {}", badge.marker_class));
            let _ = element.set_attribute(
                "style",
                &format!(
                    "background: {}; color: {};",
                    badge.palette.background, badge.palette.foreground
                ),
            );
            element.set_text_content(Some(&badge.text));
            let _ = container.append_child(&element);
        }
        Ok(())
    }
}

/// Forwards usage pings to the JS callback, which relays them to the
/// background script as `{type: "update"}`.
struct JsAnalytics {
    callback: js_sys::Function,
}

impl AnalyticsSink for JsAnalytics {
    fn send_update(&mut self) {
        let message = js_sys::Object::new();
        let _ = js_sys::Reflect::set(
            &message,
            &JsValue::from_str("type"),
            &JsValue::from_str(UPDATE_MESSAGE_TYPE),
        );
        if self.callback.call1(&JsValue::NULL, &message).is_err() {
            console_log!("[Jobscura] analytics callback failed");
        }
    }
}

fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// One content-script session: watcher plus orchestrator over the live DOM.
#[wasm_bindgen]
pub struct Session {
    watcher: UrlWatcher,
    orchestrator: Orchestrator<DomSurface, JsAnalytics>,
    document: Document,
}

#[wasm_bindgen]
impl Session {
    /// `analytics` receives `{type: "update"}` objects; the shim forwards
    /// them via `chrome.runtime.sendMessage`.
    #[wasm_bindgen(constructor)]
    pub fn new(analytics: js_sys::Function) -> Result<Session, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document in this context"))?;

        let surface = DomSurface::new(document.clone());
        Ok(Session {
            watcher: UrlWatcher::new(),
            orchestrator: Orchestrator::new(surface, JsAnalytics { callback: analytics }),
            document,
        })
    }

    /// Report the current location from any signal source (history
    /// interception, popstate, mutation observer). Duplicate reports for
    /// the same location are absorbed here.
    pub fn on_url_change(&mut self, url: &str) -> JsValue {
        let Some(event) = self.watcher.observe(url) else {
            return directives_to_js(&Directives::default(), None);
        };
        console_log!(
            "[Jobscura] navigation: job {}",
            event.job_id.as_deref().unwrap_or("(none)")
        );
        let directives = self.orchestrator.handle_navigation(&event, now_ms());
        directives_to_js(&directives, self.csrf_token().as_deref())
    }

    /// Handle one message posted by the page-context script.
    pub fn on_page_message(&mut self, body: &str) -> JsValue {
        let Some(message) = PageMessage::parse(body) else {
            return directives_to_js(&Directives::default(), None);
        };
        match message {
            PageMessage::UrlChange { url } => self.on_url_change(&url),
            job_data @ PageMessage::JobData { .. } => {
                let stats = job_data.into_stats();
                let Some(stats) = stats else {
                    return directives_to_js(&Directives::default(), None);
                };
                let job_id = stats.job_id.clone();
                let directives = self.orchestrator.handle_stats_push(stats, now_ms());
                if directives.stale {
                    console_log!("[Jobscura] pushed stats for job {job_id} are not current, cached only");
                }
                directives_to_js(&directives, None)
            }
        }
    }

    /// Deliver the body of a completed fetch that was issued for
    /// `(job_id, epoch)`.
    pub fn on_fetch_success(&mut self, job_id: &str, epoch: f64, status: u16, body: &str) -> JsValue {
        let request = FetchRequest {
            job_id: job_id.to_string(),
            epoch: epoch as u64,
        };
        let outcome = if (200..300).contains(&status) {
            crate::fetcher::parse_stats_response(body)
        } else {
            Err(crate::error::FetchError::Http(status))
        };
        if let Err(e) = &outcome {
            console_log!("[Jobscura] stats fetch for job {job_id} failed: {e}");
        }
        let directives = self.orchestrator.complete_fetch(&request, outcome, now_ms());
        if directives.stale {
            console_log!("[Jobscura] discarding stale fetch result for job {job_id}");
        }
        directives_to_js(&directives, None)
    }

    /// Deliver a transport-level fetch failure.
    pub fn on_fetch_failure(&mut self, job_id: &str, epoch: f64, message: &str) -> JsValue {
        console_log!("[Jobscura] stats fetch for job {job_id} failed: {message}");
        let request = FetchRequest {
            job_id: job_id.to_string(),
            epoch: epoch as u64,
        };
        let directives = self.orchestrator.complete_fetch(
            &request,
            Err(crate::error::FetchError::Network(message.to_string())),
            now_ms(),
        );
        directives_to_js(&directives, None)
    }

    /// Timer tick for the single delayed container re-check.
    pub fn retry_render(&mut self, epoch: f64) {
        self.orchestrator.retry_render(epoch as u64, now_ms());
    }
}

impl Session {
    fn csrf_token(&self) -> Option<String> {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|d| d.cookie().ok())
            .and_then(|cookie| csrf_token_from_cookie(&cookie))
    }
}

/// Shape directives for the shim:
/// `{ fetch: { jobId, epoch, url, headers } | null, retryRenderEpoch: number | null }`
fn directives_to_js(directives: &Directives, csrf_token: Option<&str>) -> JsValue {
    let out = js_sys::Object::new();

    let fetch_value: JsValue = match &directives.fetch {
        Some(request) => {
            let fetch = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &fetch,
                &JsValue::from_str("jobId"),
                &JsValue::from_str(&request.job_id),
            );
            let _ = js_sys::Reflect::set(
                &fetch,
                &JsValue::from_str("epoch"),
                &JsValue::from_f64(request.epoch as f64),
            );
            let _ = js_sys::Reflect::set(
                &fetch,
                &JsValue::from_str("url"),
                &JsValue::from_str(&stats_endpoint(&request.job_id)),
            );
            let headers = js_sys::Object::new();
            for (name, value) in request_headers(csrf_token) {
                let _ = js_sys::Reflect::set(
                    &headers,
                    &JsValue::from_str(name),
                    &JsValue::from_str(&value),
                );
            }
            let _ = js_sys::Reflect::set(&fetch, &JsValue::from_str("headers"), &headers);
            fetch.into()
        }
        None => JsValue::NULL,
    };
    let _ = js_sys::Reflect::set(&out, &JsValue::from_str("fetch"), &fetch_value);

    let retry_value = match directives.retry_render {
        Some(epoch) => JsValue::from_f64(epoch as f64),
        None => JsValue::NULL,
    };
    let _ = js_sys::Reflect::set(&out, &JsValue::from_str("retryRenderEpoch"), &retry_value);

    out.into()
}
