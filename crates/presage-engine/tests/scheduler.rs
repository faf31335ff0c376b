//! Integration tests driving the scheduler entry point over scripted pages.

use presage_core::{Config, InteractionMode, LinkCandidate, Point, Rect};
use presage_engine::{EvalOutcome, EvalReport, Scheduler, Trigger, WiringPlan};
use presage_mock::{make_page, MockPage};

/// Builds a 100x20 candidate whose rectangle is centered on (x, y).
fn link_centered(url: &str, x: f64, y: f64) -> LinkCandidate {
    LinkCandidate::new(url, Rect::new(x - 50.0, y - 10.0, 100.0, 20.0))
}

fn link_at_top(url: &str, top: f64) -> LinkCandidate {
    LinkCandidate::new(url, Rect::new(0.0, top, 120.0, 24.0))
}

fn pointer_scheduler(config: Config, links: Vec<LinkCandidate>) -> (Scheduler, MockPage) {
    let page = make_page(links);
    let scheduler = Scheduler::new(config, InteractionMode::Pointer, page.services.clone());
    (scheduler, page)
}

fn touch_scheduler(config: Config, links: Vec<LinkCandidate>) -> (Scheduler, MockPage) {
    let page = make_page(links);
    let scheduler = Scheduler::new(config, InteractionMode::Touch, page.services.clone());
    (scheduler, page)
}

/// A pointer resting near a link gets that link prefetched, exactly once.
#[test]
fn reactive_pointer_issues_nearby_link_once() {
    let (mut scheduler, page) =
        pointer_scheduler(Config::default(), vec![link_centered("/pricing", 150.0, 100.0)]);
    scheduler.record_pointer(Point::new(100.0, 100.0));

    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 10.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 1,
            selected: 1,
            issued: 1,
        })
    );
    assert_eq!(page.sink.inserted(), ["/pricing"]);

    // A later cycle re-selects the same candidate but must not re-issue.
    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 210.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 1,
            selected: 1,
            issued: 0,
        })
    );
    assert_eq!(
        page.sink.insert_count("/pricing"),
        1,
        "duplicate evaluation must not insert a second hint"
    );
    assert_eq!(scheduler.tracker().len(), 1);
}

/// With a tight threshold nothing qualifies and nothing is issued.
#[test]
fn out_of_range_pointer_issues_nothing() {
    let config = Config {
        threshold_px: 10.0,
        ..Config::default()
    };
    let (mut scheduler, page) =
        pointer_scheduler(config, vec![link_centered("/pricing", 150.0, 100.0)]);
    scheduler.record_pointer(Point::new(100.0, 100.0));

    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 10.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 1,
            selected: 0,
            issued: 0,
        })
    );
    assert!(page.sink.inserted().is_empty(), "no hint for distance 50 at threshold 10");
}

/// Two triggers inside one throttle window produce a single evaluation.
#[test]
fn throttle_coalesces_rapid_triggers() {
    let (mut scheduler, _page) =
        pointer_scheduler(Config::default(), vec![link_centered("/a", 150.0, 100.0)]);
    scheduler.record_pointer(Point::new(100.0, 100.0));

    assert!(matches!(
        scheduler.handle_trigger(Trigger::PointerMove, 0.0),
        EvalOutcome::Evaluated(_)
    ));
    assert_eq!(
        scheduler.handle_trigger(Trigger::PointerMove, 50.0),
        EvalOutcome::Throttled
    );
    assert_eq!(scheduler.evaluations(), 1, "second trigger fell inside the window");

    assert!(matches!(
        scheduler.handle_trigger(Trigger::PointerMove, 100.0),
        EvalOutcome::Evaluated(_)
    ));
    assert_eq!(scheduler.evaluations(), 2);
}

/// Resize waits out a doubled throttle window in both modes.
#[test]
fn resize_requires_double_window() {
    let (mut scheduler, _page) = touch_scheduler(Config::default(), vec![link_at_top("/a", 100.0)]);

    assert!(matches!(
        scheduler.handle_trigger(Trigger::Startup, 0.0),
        EvalOutcome::Evaluated(_)
    ));
    assert_eq!(
        scheduler.handle_trigger(Trigger::Resize, 150.0),
        EvalOutcome::Throttled,
        "150ms elapsed is inside the 200ms resize window"
    );
    assert!(matches!(
        scheduler.handle_trigger(Trigger::Resize, 250.0),
        EvalOutcome::Evaluated(_)
    ));
}

/// The startup evaluation bypasses the gate but still stamps it.
#[test]
fn startup_bypasses_then_stamps_throttle() {
    let (mut scheduler, _page) = touch_scheduler(Config::default(), vec![link_at_top("/a", 100.0)]);

    assert!(matches!(
        scheduler.handle_trigger(Trigger::Startup, 0.0),
        EvalOutcome::Evaluated(_)
    ));
    assert_eq!(
        scheduler.handle_trigger(Trigger::Scroll, 50.0),
        EvalOutcome::Throttled
    );
    assert!(matches!(
        scheduler.handle_trigger(Trigger::Scroll, 100.0),
        EvalOutcome::Evaluated(_)
    ));
}

/// Interval ticks are skipped until the pointer has actually moved.
#[test]
fn interval_awaits_first_pointer_move() {
    let config = Config {
        prediction_interval_ms: 1_000,
        ..Config::default()
    };
    let (mut scheduler, page) =
        pointer_scheduler(config, vec![link_centered("/a", 150.0, 100.0)]);

    assert_eq!(
        scheduler.handle_trigger(Trigger::IntervalTick, 1_000.0),
        EvalOutcome::AwaitingPointer
    );
    assert!(page.sink.inserted().is_empty());
    assert_eq!(scheduler.evaluations(), 0, "skipped tick is not an evaluation");

    scheduler.record_pointer(Point::new(100.0, 100.0));
    assert!(matches!(
        scheduler.handle_trigger(Trigger::IntervalTick, 2_000.0),
        EvalOutcome::Evaluated(_)
    ));
    assert_eq!(page.sink.inserted(), ["/a"]);
}

/// Mobile evaluation keeps links inside the inflated viewport only.
#[test]
fn touch_mode_prefetches_within_inflated_viewport() {
    let (mut scheduler, page) = touch_scheduler(
        Config::default(),
        vec![link_at_top("/soon", 650.0), link_at_top("/far", 1000.0)],
    );

    let outcome = scheduler.handle_trigger(Trigger::Startup, 0.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 2,
            selected: 1,
            issued: 1,
        })
    );
    assert_eq!(page.sink.inserted(), ["/soon"]);
}

/// A failed insertion is logged away, leaves no tracker entry, and the URL
/// is retried on the next qualifying cycle.
#[test]
fn failed_insertion_is_retried_later() {
    let (mut scheduler, page) =
        pointer_scheduler(Config::default(), vec![link_centered("/flaky", 150.0, 100.0)]);
    page.sink.fail_once_for("/flaky");
    scheduler.record_pointer(Point::new(100.0, 100.0));

    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 0.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 1,
            selected: 1,
            issued: 0,
        })
    );
    assert!(
        !scheduler.tracker().contains("/flaky"),
        "failure must not poison the dispatched set"
    );

    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 200.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 1,
            selected: 1,
            issued: 1,
        })
    );
    assert_eq!(page.sink.insert_count("/flaky"), 1);
}

/// Anchor annotation happens only in debug mode, once per URL.
#[test]
fn annotation_follows_debug_flag() {
    let debug_config = Config {
        debug: true,
        ..Config::default()
    };
    let (mut scheduler, page) =
        pointer_scheduler(debug_config, vec![link_centered("/a", 150.0, 100.0)]);
    scheduler.record_pointer(Point::new(100.0, 100.0));
    scheduler.handle_trigger(Trigger::PointerMove, 0.0);
    assert_eq!(page.sink.annotated(), ["/a"]);

    let (mut quiet, quiet_page) =
        pointer_scheduler(Config::default(), vec![link_centered("/a", 150.0, 100.0)]);
    quiet.record_pointer(Point::new(100.0, 100.0));
    quiet.handle_trigger(Trigger::PointerMove, 0.0);
    assert!(quiet_page.sink.annotated().is_empty(), "no annotation without debug");
}

/// Wiring plans across the mode/config matrix.
#[test]
fn wiring_plan_matrix() {
    struct Case {
        name: &'static str,
        mode: InteractionMode,
        config: Config,
        expect: WiringPlan,
    }

    let cases = vec![
        Case {
            name: "desktop_reactive",
            mode: InteractionMode::Pointer,
            config: Config::default(),
            expect: WiringPlan {
                track_pointer: true,
                evaluate_on_pointer_move: true,
                resize: true,
                ..WiringPlan::default()
            },
        },
        Case {
            name: "desktop_interval",
            mode: InteractionMode::Pointer,
            config: Config {
                prediction_interval_ms: 1_000,
                ..Config::default()
            },
            expect: WiringPlan {
                track_pointer: true,
                resize: true,
                interval_ms: Some(1_000),
                ..WiringPlan::default()
            },
        },
        Case {
            name: "mobile_default",
            mode: InteractionMode::Touch,
            config: Config::default(),
            expect: WiringPlan {
                eager_evaluation: true,
                scroll: true,
                touch_start: true,
                resize: true,
                ..WiringPlan::default()
            },
        },
        Case {
            name: "mobile_interval",
            mode: InteractionMode::Touch,
            config: Config {
                prediction_interval_ms: 2_000,
                ..Config::default()
            },
            expect: WiringPlan {
                eager_evaluation: true,
                scroll: true,
                touch_start: true,
                resize: true,
                interval_ms: Some(2_000),
                ..WiringPlan::default()
            },
        },
        Case {
            name: "mobile_unsupported_keeps_sweep",
            mode: InteractionMode::Touch,
            config: Config {
                mobile_support: false,
                prefetch_all_links: true,
                ..Config::default()
            },
            expect: WiringPlan {
                sweep_delay_ms: Some(1_500),
                ..WiringPlan::default()
            },
        },
        Case {
            name: "desktop_with_immediate_sweep",
            mode: InteractionMode::Pointer,
            config: Config {
                prefetch_all_links: true,
                prefetch_all_links_delay_ms: 0,
                ..Config::default()
            },
            expect: WiringPlan {
                track_pointer: true,
                evaluate_on_pointer_move: true,
                resize: true,
                sweep_delay_ms: Some(0),
                ..WiringPlan::default()
            },
        },
    ];

    for case in cases {
        let page = make_page(Vec::new());
        let scheduler = Scheduler::new(case.config, case.mode, page.services.clone());
        assert_eq!(scheduler.wiring_plan(), case.expect, "{} wiring", case.name);
    }
}

/// Candidate output is capped even when many links qualify.
#[test]
fn issue_cap_applies_per_evaluation() {
    let links = (1..=6)
        .map(|i| link_centered(&format!("/l{i}"), 150.0, 90.0 + f64::from(i)))
        .collect();
    let (mut scheduler, page) = pointer_scheduler(Config::default(), links);
    scheduler.record_pointer(Point::new(100.0, 100.0));

    let outcome = scheduler.handle_trigger(Trigger::PointerMove, 0.0);
    assert_eq!(
        outcome,
        EvalOutcome::Evaluated(EvalReport {
            considered: 6,
            selected: 3,
            issued: 3,
        })
    );
    assert_eq!(page.sink.inserted().len(), 3);
}
