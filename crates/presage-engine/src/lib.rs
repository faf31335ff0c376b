//! Event-driven prefetch scheduling over the page surfaces.
//!
//! One [`Scheduler`] value owns every piece of mutable state the system
//! carries: the latched interaction mode, the pointer record, the shared
//! throttle, and the dispatched-URL tracker. All trigger sources funnel
//! through [`Scheduler::handle_trigger`], the single reentrant guard that
//! the browser layer and the native tests both drive directly.

pub mod dispatch;

use log::{debug, trace, warn};
use presage_core::{
    select_candidates, Config, InteractionMode, InteractionState, Point, Strategy, Throttle,
};
use presage_page::PageServices;
use std::collections::HashSet;

pub use crate::dispatch::DispatchTracker;

/// Number of URLs issued per bulk-sweep batch.
pub const SWEEP_BATCH_SIZE: usize = 3;
/// Pause between consecutive bulk-sweep batches.
pub const SWEEP_BATCH_DELAY_MS: u32 = 300;

/// Sources that can request a re-evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// One-shot eager evaluation right after wiring.
    Startup,
    /// Pointer moved (desktop reactive mode).
    PointerMove,
    /// Page scrolled (mobile mode).
    Scroll,
    /// Touch interaction began (mobile mode).
    TouchStart,
    /// Viewport resized (both modes).
    Resize,
    /// Fixed wall-clock interval elapsed.
    IntervalTick,
}

impl Trigger {
    /// Throttle-window multiplier for this source. Resize waits out a
    /// doubled window because link rectangles may still be settling.
    fn window_scale(self) -> f64 {
        match self {
            Trigger::Resize => 2.0,
            _ => 1.0,
        }
    }
}

/// Result of pushing a trigger through the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The trigger arrived inside the throttle window and was dropped.
    Throttled,
    /// Desktop mode with no pointer movement recorded yet.
    AwaitingPointer,
    /// A full evaluation ran.
    Evaluated(EvalReport),
}

/// Counters from one evaluation cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalReport {
    /// Internal links present in the inventory snapshot.
    pub considered: usize,
    /// Candidates picked by the active heuristic.
    pub selected: usize,
    /// Hints newly inserted (net of duplicates and failures).
    pub issued: usize,
}

/// Event-wiring decision derived once from mode and configuration.
///
/// The browser layer executes this plan mechanically, which keeps the
/// wiring branch itself testable without a DOM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WiringPlan {
    /// Record pointer positions from pointer-move events.
    pub track_pointer: bool,
    /// Request an evaluation on every pointer-move event.
    pub evaluate_on_pointer_move: bool,
    /// Listen for scroll events.
    pub scroll: bool,
    /// Listen for touch-start events.
    pub touch_start: bool,
    /// Listen for resize events.
    pub resize: bool,
    /// Fixed evaluation period, when configured.
    pub interval_ms: Option<u32>,
    /// Evaluate once immediately after wiring.
    pub eager_evaluation: bool,
    /// Startup delay for the bulk sweep, when enabled.
    pub sweep_delay_ms: Option<u32>,
}

/// Owns the prefetch decision state for one page lifetime.
pub struct Scheduler {
    config: Config,
    mode: InteractionMode,
    state: InteractionState,
    throttle: Throttle,
    tracker: DispatchTracker,
    services: PageServices,
    evaluations: u64,
}

impl Scheduler {
    /// Creates a scheduler for the latched `mode` over the given page.
    pub fn new(config: Config, mode: InteractionMode, services: PageServices) -> Self {
        Self {
            config,
            mode,
            state: InteractionState::new(),
            throttle: Throttle::new(),
            tracker: DispatchTracker::new(),
            services,
            evaluations: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Dispatched-URL set, for diagnostics and tests.
    pub fn tracker(&self) -> &DispatchTracker {
        &self.tracker
    }

    /// Number of completed evaluation cycles.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Records the pointer position from a pointer-move event.
    ///
    /// Tracking is unconditional and unthrottled; only the evaluation that
    /// may follow goes through the gate.
    pub fn record_pointer(&mut self, at: Point) {
        self.state.record_pointer(at);
    }

    /// Derives the event wiring for the latched mode and configuration.
    pub fn wiring_plan(&self) -> WiringPlan {
        let sweep_delay_ms = self
            .config
            .prefetch_all_links
            .then_some(self.config.prefetch_all_links_delay_ms);
        let interval_ms =
            (self.config.prediction_interval_ms > 0).then_some(self.config.prediction_interval_ms);

        match self.mode {
            // Touch devices with mobile support disabled get no heuristic
            // wiring at all; the sweep is independent and still honored.
            InteractionMode::Touch if !self.config.mobile_support => WiringPlan {
                sweep_delay_ms,
                ..WiringPlan::default()
            },
            InteractionMode::Touch => WiringPlan {
                eager_evaluation: true,
                scroll: true,
                touch_start: true,
                resize: true,
                interval_ms,
                sweep_delay_ms,
                ..WiringPlan::default()
            },
            InteractionMode::Pointer => WiringPlan {
                track_pointer: true,
                evaluate_on_pointer_move: interval_ms.is_none(),
                resize: true,
                interval_ms,
                sweep_delay_ms,
                ..WiringPlan::default()
            },
        }
    }

    /// Single entry point for every evaluation request.
    ///
    /// `now_ms` is the caller's clock reading (the browser layer passes
    /// `performance.now()`). Requests inside the throttle window are
    /// dropped, never queued; the startup evaluation bypasses the gate but
    /// still stamps it.
    pub fn handle_trigger(&mut self, trigger: Trigger, now_ms: f64) -> EvalOutcome {
        match trigger {
            Trigger::Startup => self.throttle.stamp(now_ms),
            _ => {
                if !self.throttle.try_pass(now_ms, trigger.window_scale()) {
                    trace!("{trigger:?} dropped inside throttle window");
                    return EvalOutcome::Throttled;
                }
            }
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> EvalOutcome {
        let strategy = match self.mode {
            InteractionMode::Pointer => match self.state.pointer() {
                Some(pointer) => Strategy::Proximity {
                    pointer,
                    threshold_px: self.config.threshold_px,
                },
                None => return EvalOutcome::AwaitingPointer,
            },
            InteractionMode::Touch => Strategy::Viewport {
                viewport: self.services.viewport.bounds(),
                margin_px: self.config.viewport_margin_px,
            },
        };

        let links = self.services.links.internal_links();
        let considered = links.len();
        let picked = select_candidates(links, strategy, self.config.max_prefetch);
        let selected = picked.len();

        let mut issued = 0;
        for candidate in &picked {
            if self.issue_one(&candidate.url) {
                issued += 1;
            }
        }

        self.evaluations += 1;
        let report = EvalReport {
            considered,
            selected,
            issued,
        };
        debug!(
            "evaluation {}: {considered} considered, {selected} selected, {issued} issued",
            self.evaluations
        );
        EvalOutcome::Evaluated(report)
    }

    /// Snapshot of every internal link URL, deduplicated in document order.
    ///
    /// Read at sweep time rather than startup, so links injected after the
    /// initial load are still covered.
    pub fn sweep_targets(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.services
            .links
            .internal_links()
            .into_iter()
            .filter_map(|link| seen.insert(link.url.clone()).then_some(link.url))
            .collect()
    }

    /// Issues one bulk-sweep batch through the shared tracker.
    ///
    /// The sweep bypasses the throttle, the heuristics, and `max_prefetch`;
    /// only the already-issued dedupe still applies. Returns the number of
    /// hints newly inserted.
    pub fn issue_batch(&mut self, urls: &[String]) -> usize {
        let mut issued = 0;
        for url in urls {
            if self.issue_one(url) {
                issued += 1;
            }
        }
        issued
    }

    fn issue_one(&mut self, url: &str) -> bool {
        match self
            .tracker
            .issue(url, self.services.hints.as_ref(), self.config.debug)
        {
            Ok(newly) => newly,
            Err(err) => {
                warn!("prefetch hint for {url} failed: {err}");
                false
            }
        }
    }
}
