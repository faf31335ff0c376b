//! Candidate selection heuristics.
//!
//! Two mutually exclusive strategies, chosen once at startup by the latched
//! interaction mode. Both are naive O(n) scans over the live inventory: a
//! page carries tens of links, not millions, so a spatial index would buy
//! nothing over a filter-and-sort.

use crate::geom::{Point, Rect};
use crate::link::LinkCandidate;
use smallvec::SmallVec;

/// Ranked, capped selection output. Sized for the default issue cap.
pub type Candidates = SmallVec<[LinkCandidate; 4]>;

/// Heuristic strategy, latched at startup alongside the interaction mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    /// Desktop: rank by Euclidean distance from the pointer to each link's
    /// center, keeping only links strictly inside `threshold_px`.
    Proximity {
        /// Last recorded pointer position.
        pointer: Point,
        /// Exclusive distance cutoff in CSS pixels.
        threshold_px: f64,
    },
    /// Mobile: keep links intersecting the viewport inflated by `margin_px`
    /// on all four sides, ranked top-to-bottom as an approximation of what
    /// the user will scroll to next.
    Viewport {
        /// Current viewport bounds.
        viewport: Rect,
        /// Inflation applied to every viewport edge, in CSS pixels.
        margin_px: f64,
    },
}

/// Applies `strategy` to a point-in-time inventory snapshot.
///
/// Returns at most `max_prefetch` candidates, ranked nearest-first
/// (proximity) or topmost-first (viewport). Empty input yields empty
/// output.
pub fn select_candidates(
    links: Vec<LinkCandidate>,
    strategy: Strategy,
    max_prefetch: usize,
) -> Candidates {
    let mut picked = match strategy {
        Strategy::Proximity {
            pointer,
            threshold_px,
        } => {
            let mut near: Candidates = links
                .into_iter()
                .filter_map(|link| {
                    let distance = pointer.distance_to(link.rect.center());
                    (distance < threshold_px).then(|| link.with_distance(distance))
                })
                .collect();
            near.sort_by(|a, b| {
                let da = a.distance.unwrap_or(f64::INFINITY);
                let db = b.distance.unwrap_or(f64::INFINITY);
                da.total_cmp(&db)
            });
            near
        }
        Strategy::Viewport {
            viewport,
            margin_px,
        } => {
            let reach = viewport.inflate(margin_px);
            let mut visible: Candidates = links
                .into_iter()
                .filter(|link| link.rect.intersects(reach))
                .collect();
            visible.sort_by(|a, b| a.rect.top.total_cmp(&b.rect.top));
            visible
        }
    };
    picked.truncate(max_prefetch);
    picked
}
