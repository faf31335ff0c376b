//! Live-document implementations of [`LinkSource`], [`ViewportProbe`], and
//! [`HintSink`], plus the capability and clock probes the runtime needs.
//!
//! Every read here degrades instead of failing: a page we cannot inspect is
//! a page we simply do not prefetch on.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use js_sys::{Date, Reflect};
use presage_core::{is_internal_href, LinkCandidate, Rect, TouchCapability};
use presage_page::{HintSink, LinkSource, PageError, PageResult, ViewportProbe};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, Element, Event, HtmlHeadElement, Window};

const MARKER_ATTR: &str = "data-presage";
const HINTED_CLASS: &str = "presage-hinted";
const DEBUG_STYLE_ID: &str = "presage-debug-style";
const DEBUG_STYLE_RULE: &str = ".presage-hinted { outline: 1px dashed #7aa2ff; }";

/// Anchor scan over the live document.
pub struct DomLinkSource {
    document: Document,
}

impl DomLinkSource {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl LinkSource for DomLinkSource {
    fn internal_links(&self) -> Vec<LinkCandidate> {
        let Ok(anchors) = self.document.query_selector_all("a[href]") else {
            return Vec::new();
        };
        let mut links = Vec::with_capacity(anchors.length() as usize);
        for index in 0..anchors.length() {
            let Some(element) = anchors
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let Some(href) = element.get_attribute("href") else {
                continue;
            };
            let href = href.trim();
            if !is_internal_href(href) {
                continue;
            }
            let rect = element.get_bounding_client_rect();
            links.push(LinkCandidate::new(
                href,
                Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
            ));
        }
        links
    }
}

/// Visual viewport as reported by the window, origin pinned at (0, 0) to
/// match the client coordinates of anchor rects.
pub struct DomViewport {
    window: Window,
}

impl DomViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ViewportProbe for DomViewport {
    fn bounds(&self) -> Rect {
        let width = js_f64(self.window.inner_width());
        let height = js_f64(self.window.inner_height());
        Rect::new(0.0, 0.0, width, height)
    }
}

fn js_f64(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Hint emitter that appends `<link rel="prefetch">` elements to the head.
pub struct DomHintSink {
    document: Document,
    debug: bool,
    style_injected: Cell<bool>,
}

impl DomHintSink {
    pub fn new(document: Document, debug: bool) -> Self {
        Self {
            document,
            debug,
            style_injected: Cell::new(false),
        }
    }

    fn append_hint_element(&self, head: &HtmlHeadElement, url: &str) -> Result<(), JsValue> {
        let link = self.document.create_element("link")?;
        link.set_attribute("rel", "prefetch")?;
        link.set_attribute("as", "document")?;
        link.set_attribute("href", url)?;
        head.append_child(&link)?;
        Ok(())
    }

    fn ensure_debug_style(&self) {
        if self.style_injected.get() {
            return;
        }
        if self.document.get_element_by_id(DEBUG_STYLE_ID).is_some() {
            self.style_injected.set(true);
            return;
        }
        let Some(head) = self.document.head() else {
            return;
        };
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        let _ = style.set_attribute("id", DEBUG_STYLE_ID);
        style.set_text_content(Some(DEBUG_STYLE_RULE));
        if head.append_child(&style).is_ok() {
            self.style_injected.set(true);
        }
    }
}

impl HintSink for DomHintSink {
    fn insert_hint(&self, url: &str) -> PageResult<()> {
        let head = self
            .document
            .head()
            .ok_or(PageError::DocumentUnavailable("document has no head"))?;
        self.append_hint_element(&head, url)
            .map_err(|err| PageError::hint_insertion(url, js_reason(err)))?;
        if self.debug {
            console::log_1(&format!("presage: prefetch hint {url}").into());
        }
        Ok(())
    }

    fn annotate(&self, url: &str) {
        self.ensure_debug_style();
        let Ok(anchors) = self.document.query_selector_all("a[href]") else {
            return;
        };
        // Anchors are matched by comparing trimmed hrefs rather than through
        // an attribute selector, so URLs never need CSS escaping.
        for index in 0..anchors.length() {
            let Some(element) = anchors
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let matches = element
                .get_attribute("href")
                .is_some_and(|href| href.trim() == url);
            if !matches || element.has_attribute(MARKER_ATTR) {
                continue;
            }
            let _ = element.set_attribute(MARKER_ATTR, "1");
            let _ = element.class_list().add_1(HINTED_CLASS);
            let _ = element.set_attribute("title", "Prefetched for faster navigation");
        }
    }
}

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Reads the host's touch signals. Anything unanswerable reads as absent,
/// which biases classification toward the pointer strategy.
pub fn probe_touch_capability(window: &Window) -> TouchCapability {
    let touch_events =
        Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let navigator = window.navigator();
    let vendor_touch_points = Reflect::get(navigator.as_ref(), &JsValue::from_str("msMaxTouchPoints"))
        .ok()
        .and_then(|value| value.as_f64())
        .map(|value| value as i32)
        .unwrap_or(0);
    TouchCapability {
        touch_events,
        max_touch_points: navigator.max_touch_points(),
        vendor_touch_points,
    }
}

/// Clock feeding the trigger throttle: `performance.now()` when the host
/// exposes it, wall clock otherwise.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(Date::now)
}

/// Resolves once the document has finished initial parsing. Pages that are
/// already interactive or complete resolve immediately.
pub async fn ready(document: &Document) -> Result<(), JsValue> {
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let (sender, receiver) = oneshot::channel::<()>();
    let sender = Rc::new(RefCell::new(Some(sender)));
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        if let Some(sender) = sender.borrow_mut().take() {
            let _ = sender.send(());
        }
    }) as Box<dyn FnMut(Event)>);
    document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
    closure.forget();
    receiver
        .await
        .map_err(|_| JsValue::from_str("document ready listener dropped"))
}
