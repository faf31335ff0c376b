//! Pure decision logic for the predictive link-prefetch scheduler.
//!
//! The `presage-core` crate intentionally stays host-agnostic: geometry,
//! internal-link classification, device-mode latching, the two candidate
//! heuristics, the shared throttle gate, and the configuration record. It
//! never touches the DOM, a clock, or the network, which is what lets the
//! whole decision surface run under native tests. Browser integration lives
//! in `presage-wasm`.

/// Runtime configuration record and its defaults.
pub mod config;
/// Viewport-space points and rectangles.
pub mod geom;
/// Link candidates and internal-href classification.
pub mod link;
/// Device interaction mode and pointer state.
pub mod mode;
/// Candidate selection heuristics.
pub mod select;
/// Shared evaluation rate gate.
pub mod throttle;

pub use crate::config::Config;
pub use crate::geom::{Point, Rect};
pub use crate::link::{is_internal_href, LinkCandidate};
pub use crate::mode::{InteractionMode, InteractionState, TouchCapability};
pub use crate::select::{select_candidates, Candidates, Strategy};
pub use crate::throttle::{Throttle, THROTTLE_INTERVAL_MS};
