//! Bootstrap and event wiring.
//!
//! Module init spawns [`boot`] on the main-thread executor. Once the
//! document is ready it builds the scheduler, parks it in a thread-local
//! context, and registers exactly the listeners the wiring plan calls for.
//! Listeners are never torn down; they live for the lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use js_sys::{Object, Reflect};
use presage_core::{InteractionMode, Point};
use presage_engine::{Scheduler, Trigger, WiringPlan, SWEEP_BATCH_DELAY_MS, SWEEP_BATCH_SIZE};
use presage_page::PageServices;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Event, MouseEvent, Window};

use crate::dom::{self, DomHintSink, DomLinkSource, DomViewport};
use crate::embed;

thread_local! {
    static CTX: RefCell<Option<Scheduler>> = RefCell::new(None);
}

fn with_scheduler<R>(f: impl FnOnce(&mut Scheduler) -> R) -> Option<R> {
    CTX.with(|ctx| ctx.borrow_mut().as_mut().map(f))
}

/// Bridges the `log` facade to the browser console so scheduler tracing
/// is visible in devtools.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let line = format!("{}: {}", record.target(), record.args());
        match record.level() {
            log::Level::Error => console::error_1(&line.into()),
            log::Level::Warn => console::warn_1(&line.into()),
            _ => console::log_1(&line.into()),
        }
    }

    fn flush(&self) {}
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    spawn_local(async {
        if let Err(err) = boot().await {
            console::error_1(&err);
        }
    });
}

async fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    dom::ready(&document).await?;

    let config = embed::resolve_config(&window);
    init_logging(config.debug);
    let mode = InteractionMode::classify(dom::probe_touch_capability(&window));
    if config.debug {
        console::log_1(&format!("presage: starting, mode {mode:?}, {config:?}").into());
    }

    let services = PageServices::builder()
        .links(Rc::new(DomLinkSource::new(document.clone())))
        .viewport(Rc::new(DomViewport::new(window.clone())))
        .hints(Rc::new(DomHintSink::new(document, config.debug)))
        .build()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let scheduler = Scheduler::new(config, mode, services);
    let plan = scheduler.wiring_plan();
    CTX.with(|ctx| *ctx.borrow_mut() = Some(scheduler));

    execute_plan(&window, plan)
}

fn execute_plan(window: &Window, plan: WiringPlan) -> Result<(), JsValue> {
    if plan.track_pointer {
        let evaluate = plan.evaluate_on_pointer_move;
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let at = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
            with_scheduler(|scheduler| {
                scheduler.record_pointer(at);
                if evaluate {
                    scheduler.handle_trigger(Trigger::PointerMove, dom::now_ms());
                }
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if plan.scroll {
        attach_trigger(window, "scroll", Trigger::Scroll)?;
    }
    if plan.touch_start {
        attach_trigger(window, "touchstart", Trigger::TouchStart)?;
    }
    if plan.resize {
        attach_trigger(window, "resize", Trigger::Resize)?;
    }
    if plan.eager_evaluation {
        with_scheduler(|scheduler| scheduler.handle_trigger(Trigger::Startup, dom::now_ms()));
    }
    if let Some(period_ms) = plan.interval_ms {
        spawn_local(async move {
            loop {
                TimeoutFuture::new(period_ms).await;
                let ticked =
                    with_scheduler(|s| s.handle_trigger(Trigger::IntervalTick, dom::now_ms()));
                if ticked.is_none() {
                    break;
                }
            }
        });
    }
    if let Some(delay_ms) = plan.sweep_delay_ms {
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            run_sweep().await;
        });
    }
    Ok(())
}

fn attach_trigger(window: &Window, event_name: &str, trigger: Trigger) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        with_scheduler(|scheduler| scheduler.handle_trigger(trigger, dom::now_ms()));
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Issues the sweep inventory in fixed-size batches, pausing between
/// batches so a long page does not enqueue every fetch in one turn.
async fn run_sweep() {
    let Some(targets) = with_scheduler(|scheduler| scheduler.sweep_targets()) else {
        return;
    };
    let mut offset = 0;
    while offset < targets.len() {
        let end = usize::min(offset + SWEEP_BATCH_SIZE, targets.len());
        with_scheduler(|scheduler| scheduler.issue_batch(&targets[offset..end]));
        offset = end;
        if offset < targets.len() {
            TimeoutFuture::new(SWEEP_BATCH_DELAY_MS).await;
        }
    }
}

/// Read-only counters for host pages and self checks: interaction mode,
/// hints issued so far, and evaluation rounds completed.
#[wasm_bindgen]
pub fn presage_snapshot() -> Result<JsValue, JsValue> {
    CTX.with(|ctx| {
        let borrow = ctx.borrow();
        let scheduler = borrow
            .as_ref()
            .ok_or_else(|| JsValue::from_str("presage scheduler not started"))?;
        let mode = match scheduler.mode() {
            InteractionMode::Pointer => "pointer",
            InteractionMode::Touch => "touch",
        };
        let out = Object::new();
        Reflect::set(&out, &"mode".into(), &JsValue::from_str(mode))?;
        Reflect::set(
            &out,
            &"issued".into(),
            &JsValue::from_f64(scheduler.tracker().len() as f64),
        )?;
        Reflect::set(
            &out,
            &"evaluations".into(),
            &JsValue::from_f64(scheduler.evaluations() as f64),
        )?;
        Ok(out.into())
    })
}
