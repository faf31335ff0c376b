//! Runtime configuration for the prefetch scheduler.

use serde::{Deserialize, Serialize};

/// Immutable configuration record, resolved once at startup.
///
/// The embedding integration produces this record; any field it omits falls
/// back to the default below. The scheduler owns the resolved value and
/// every other component reads it by shared reference. Serde field names
/// follow the embedder-facing contract, while the Rust fields carry their
/// units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Proximity radius for the desktop heuristic, in CSS pixels.
    #[serde(rename = "threshold")]
    pub threshold_px: f64,
    /// Fixed re-evaluation period; `0` selects event-reactive mode.
    #[serde(rename = "predictionInterval")]
    pub prediction_interval_ms: u32,
    /// Upper bound on candidates issued per evaluation.
    #[serde(rename = "maxPrefetch")]
    pub max_prefetch: usize,
    /// Enables diagnostic logging and anchor annotation.
    pub debug: bool,
    /// Enables the heuristic wiring on touch-classified devices.
    #[serde(rename = "mobileSupport")]
    pub mobile_support: bool,
    /// Viewport inflation for the mobile heuristic, in CSS pixels.
    #[serde(rename = "viewportMargin")]
    pub viewport_margin_px: f64,
    /// Enables the delayed bulk sweep over every internal link.
    #[serde(rename = "prefetchAllLinks")]
    pub prefetch_all_links: bool,
    /// Startup delay before the bulk sweep begins.
    #[serde(rename = "prefetchAllLinksDelay")]
    pub prefetch_all_links_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_THRESHOLD_PX,
            prediction_interval_ms: 0,
            max_prefetch: DEFAULT_MAX_PREFETCH,
            debug: false,
            mobile_support: true,
            viewport_margin_px: DEFAULT_VIEWPORT_MARGIN_PX,
            prefetch_all_links: false,
            prefetch_all_links_delay_ms: DEFAULT_SWEEP_DELAY_MS,
        }
    }
}

const DEFAULT_THRESHOLD_PX: f64 = 200.0;
const DEFAULT_MAX_PREFETCH: usize = 3;
const DEFAULT_VIEWPORT_MARGIN_PX: f64 = 300.0;
const DEFAULT_SWEEP_DELAY_MS: u32 = 1_500;
