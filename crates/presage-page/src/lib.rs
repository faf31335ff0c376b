//! Trait seam between the scheduler and the page that hosts it.
//!
//! The engine never touches the DOM directly; it consumes the page through
//! the three surfaces defined here. Browser-backed implementations live in
//! `presage-wasm`, scripted ones in `presage-mock`, which is what keeps the
//! whole scheduling pipeline runnable under native tests.

use anyhow::{anyhow, Result};
use presage_core::{LinkCandidate, Rect};
use std::rc::Rc;
use thiserror::Error;

pub type PageResult<T> = Result<T, PageError>;

/// Errors surfaced by page-surface implementations.
///
/// Nothing here is fatal to the scheduler: callers log and carry on, and
/// the page itself must never observe a failure.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("prefetch hint for `{url}` rejected: {reason}")]
    HintInsertion { url: String, reason: String },

    #[error("document surface unavailable: {0}")]
    DocumentUnavailable(&'static str),
}

impl PageError {
    pub fn hint_insertion(url: impl Into<String>, reason: impl Into<String>) -> Self {
        PageError::HintInsertion {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Point-in-time inventory of the page's internal links.
pub trait LinkSource {
    /// Internal navigable anchors with their current layout rectangles.
    ///
    /// Computed eagerly on every call; rectangles are read from live layout
    /// and are only valid for the instant of the call. Returns an empty
    /// vector when nothing matches.
    fn internal_links(&self) -> Vec<LinkCandidate>;
}

/// Live viewport geometry.
pub trait ViewportProbe {
    /// Current viewport bounds, with `left`/`top` pinned to zero.
    fn bounds(&self) -> Rect;
}

/// Prefetch-hint output surface plus its diagnostic side channel.
pub trait HintSink {
    /// Inserts a document prefetch hint for `url`.
    ///
    /// The host environment owns execution, deduplication, and caching of
    /// the underlying fetch; this call only registers the hint.
    fn insert_hint(&self, url: &str) -> PageResult<()>;

    /// Visually marks every anchor targeting `url`.
    ///
    /// Diagnostic only. Implementations guard per element so repeated calls
    /// for the same URL annotate each anchor at most once.
    fn annotate(&self, url: &str);
}

/// Shared handle to a link source.
pub type LinkSourceHandle = Rc<dyn LinkSource>;
/// Shared handle to a viewport probe.
pub type ViewportHandle = Rc<dyn ViewportProbe>;
/// Shared handle to a hint sink.
pub type HintSinkHandle = Rc<dyn HintSink>;

/// Aggregates the page surfaces the scheduler consumes.
///
/// Handles are `Rc`, not `Arc`: the scheduler contract is single-threaded
/// (browser main thread or a native test), so nothing here is `Send`.
#[derive(Clone)]
pub struct PageServices {
    pub links: LinkSourceHandle,
    pub viewport: ViewportHandle,
    pub hints: HintSinkHandle,
}

impl PageServices {
    /// Creates a new builder for assembling page surfaces.
    pub fn builder() -> PageServicesBuilder {
        PageServicesBuilder::new()
    }
}

/// Builder for assembling a [`PageServices`] from individual handles.
pub struct PageServicesBuilder {
    links: Option<LinkSourceHandle>,
    viewport: Option<ViewportHandle>,
    hints: Option<HintSinkHandle>,
}

impl PageServicesBuilder {
    /// Creates an empty builder with no surfaces attached.
    pub fn new() -> Self {
        Self {
            links: None,
            viewport: None,
            hints: None,
        }
    }

    /// Sets the link source handle.
    pub fn links(mut self, links: LinkSourceHandle) -> Self {
        self.links = Some(links);
        self
    }

    /// Sets the viewport probe handle.
    pub fn viewport(mut self, viewport: ViewportHandle) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Sets the hint sink handle.
    pub fn hints(mut self, hints: HintSinkHandle) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Builds a [`PageServices`], returning an error if any surface is missing.
    pub fn build(self) -> Result<PageServices> {
        Ok(PageServices {
            links: self.links.ok_or_else(|| anyhow!("missing link source"))?,
            viewport: self
                .viewport
                .ok_or_else(|| anyhow!("missing viewport probe"))?,
            hints: self.hints.ok_or_else(|| anyhow!("missing hint sink"))?,
        })
    }
}

impl Default for PageServicesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
