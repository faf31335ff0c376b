//! Link candidates and the internal-href classification rule.

use crate::geom::Rect;

/// A prefetchable internal link captured from the live page.
///
/// Candidates are ephemeral: the rectangle is only valid for the instant of
/// the inventory snapshot, so the set is recomputed on every evaluation
/// cycle rather than cached.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkCandidate {
    /// Trimmed raw `href` attribute value.
    pub url: String,
    /// Bounding rectangle in viewport coordinates at snapshot time.
    pub rect: Rect,
    /// Pointer distance, filled in by the proximity heuristic.
    pub distance: Option<f64>,
}

impl LinkCandidate {
    /// Creates a candidate with no distance assigned yet.
    pub fn new(url: impl Into<String>, rect: Rect) -> Self {
        Self {
            url: url.into(),
            rect,
            distance: None,
        }
    }

    pub(crate) fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Classifies a raw anchor `href` value as an internal navigation target.
///
/// Internal means: non-empty after trimming, not an in-page fragment, and
/// either rooted at `/` or carrying no `://` scheme separator. Anything
/// else (absolute URLs to other origins, empty attributes, `#section`
/// references) is skipped by the inventory.
pub fn is_internal_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    href.starts_with('/') || !href.contains("://")
}
