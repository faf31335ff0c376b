//! Idempotent prefetch-hint dispatch.

use presage_page::{HintSink, PageResult};
use std::collections::HashSet;

/// Set of URLs already issued as prefetch hints in this page's lifetime.
///
/// Grows monotonically and never shrinks: a hint, once registered with the
/// browser, stays valid until the page unloads. A URL is recorded only
/// after the sink accepts the hint, so a failed insertion leaves the set
/// untouched and the URL eligible for retry on a later cycle.
#[derive(Debug, Default)]
pub struct DispatchTracker {
    issued: HashSet<String>,
}

impl DispatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a prefetch hint for `url` unless one is already recorded.
    ///
    /// `Ok(true)` means a hint was newly inserted; `Ok(false)` is the
    /// duplicate no-op, with no sink interaction at all. With `debug` set, a
    /// successful insertion also asks the sink to annotate matching anchors.
    pub fn issue(&mut self, url: &str, sink: &dyn HintSink, debug: bool) -> PageResult<bool> {
        if self.issued.contains(url) {
            return Ok(false);
        }
        sink.insert_hint(url)?;
        self.issued.insert(url.to_owned());
        if debug {
            sink.annotate(url);
        }
        Ok(true)
    }

    /// Whether a hint for `url` has been issued.
    pub fn contains(&self, url: &str) -> bool {
        self.issued.contains(url)
    }

    /// Number of distinct URLs issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
