//! Scripted page surfaces for exercising the scheduler natively.
//!
//! Everything here is single-threaded `RefCell` state: tests construct a
//! [`MockPage`], hand its `services` to a scheduler, and then inspect the
//! concrete handles to see what the scheduler did.

use presage_core::{LinkCandidate, Rect};
use presage_page::{HintSink, LinkSource, PageError, PageResult, PageServices, ViewportProbe};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Link inventory backed by a scripted candidate list.
#[derive(Default)]
pub struct ScriptedLinks {
    links: RefCell<Vec<LinkCandidate>>,
}

impl ScriptedLinks {
    pub fn new(links: Vec<LinkCandidate>) -> Self {
        Self {
            links: RefCell::new(links),
        }
    }

    /// Replaces the inventory, as if the page content changed.
    pub fn set(&self, links: Vec<LinkCandidate>) {
        *self.links.borrow_mut() = links;
    }
}

impl LinkSource for ScriptedLinks {
    fn internal_links(&self) -> Vec<LinkCandidate> {
        self.links.borrow().clone()
    }
}

/// Viewport probe reporting a fixed rectangle.
pub struct FixedViewport {
    bounds: Rect,
}

impl FixedViewport {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }
}

impl ViewportProbe for FixedViewport {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Hint sink that records insertions and annotations.
///
/// Failures can be scripted per URL to exercise the retry path; a scripted
/// failure consumes itself, so the next attempt for that URL succeeds.
#[derive(Default)]
pub struct RecordingSink {
    inserted: RefCell<Vec<String>>,
    annotated: RefCell<Vec<String>>,
    fail_once: RefCell<HashSet<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a single insertion failure for `url`.
    pub fn fail_once_for(&self, url: &str) {
        self.fail_once.borrow_mut().insert(url.to_owned());
    }

    /// Every hint inserted so far, in insertion order.
    pub fn inserted(&self) -> Vec<String> {
        self.inserted.borrow().clone()
    }

    /// Number of hints inserted for `url`.
    pub fn insert_count(&self, url: &str) -> usize {
        self.inserted.borrow().iter().filter(|u| *u == url).count()
    }

    /// URLs annotated so far, in first-annotation order.
    pub fn annotated(&self) -> Vec<String> {
        self.annotated.borrow().clone()
    }
}

impl HintSink for RecordingSink {
    fn insert_hint(&self, url: &str) -> PageResult<()> {
        if self.fail_once.borrow_mut().remove(url) {
            return Err(PageError::hint_insertion(url, "scripted failure"));
        }
        self.inserted.borrow_mut().push(url.to_owned());
        Ok(())
    }

    fn annotate(&self, url: &str) {
        // Mirrors the marker-attribute guard: a URL's anchors are marked at
        // most once no matter how often annotation is requested.
        let mut annotated = self.annotated.borrow_mut();
        if !annotated.iter().any(|u| u == url) {
            annotated.push(url.to_owned());
        }
    }
}

/// Scripted page bundle: the services aggregate plus the concrete handles
/// tests poke and inspect.
pub struct MockPage {
    pub services: PageServices,
    pub links: Rc<ScriptedLinks>,
    pub viewport: Rc<FixedViewport>,
    pub sink: Rc<RecordingSink>,
}

/// Creates a mock page with the supplied inventory and an 800x600 viewport.
pub fn make_page(links: Vec<LinkCandidate>) -> MockPage {
    make_page_with_viewport(links, Rect::new(0.0, 0.0, 800.0, 600.0))
}

/// Creates a mock page with an explicit viewport rectangle.
pub fn make_page_with_viewport(links: Vec<LinkCandidate>, viewport: Rect) -> MockPage {
    let links = Rc::new(ScriptedLinks::new(links));
    let viewport = Rc::new(FixedViewport::new(viewport));
    let sink = Rc::new(RecordingSink::new());
    let services = PageServices::builder()
        .links(links.clone())
        .viewport(viewport.clone())
        .hints(sink.clone())
        .build()
        .expect("mock page build");
    MockPage {
        services,
        links,
        viewport,
        sink,
    }
}
