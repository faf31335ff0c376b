//! Configuration intake from the embedding page.
//!
//! Options arrive as a plain `window.PRESAGE` object written by the page
//! before the module loads. Each field is read individually, so an absent
//! or mistyped field falls back to its default without discarding the rest.
//! A page-wide `window.PRESAGE_DEBUG === true` forces the debug flag on.

use js_sys::Reflect;
use presage_core::Config;
use wasm_bindgen::JsValue;
use web_sys::Window;

const CONFIG_GLOBAL: &str = "PRESAGE";
const DEBUG_GLOBAL: &str = "PRESAGE_DEBUG";

/// Resolves the effective configuration, read exactly once at startup.
pub fn resolve_config(window: &Window) -> Config {
    let mut config = Config::default();
    if let Some(options) = global_object(window, CONFIG_GLOBAL) {
        if let Some(value) = f64_field(&options, "threshold") {
            config.threshold_px = value;
        }
        if let Some(value) = u32_field(&options, "predictionInterval") {
            config.prediction_interval_ms = value;
        }
        if let Some(value) = u32_field(&options, "maxPrefetch") {
            config.max_prefetch = value as usize;
        }
        if let Some(value) = bool_field(&options, "debug") {
            config.debug = value;
        }
        if let Some(value) = bool_field(&options, "mobileSupport") {
            config.mobile_support = value;
        }
        if let Some(value) = f64_field(&options, "viewportMargin") {
            config.viewport_margin_px = value;
        }
        if let Some(value) = bool_field(&options, "prefetchAllLinks") {
            config.prefetch_all_links = value;
        }
        if let Some(value) = u32_field(&options, "prefetchAllLinksDelay") {
            config.prefetch_all_links_delay_ms = value;
        }
    }
    if global_flag(window, DEBUG_GLOBAL) {
        config.debug = true;
    }
    config
}

fn global_object(window: &Window, key: &str) -> Option<JsValue> {
    let value = Reflect::get(window.as_ref(), &JsValue::from_str(key)).ok()?;
    value.is_object().then_some(value)
}

fn global_flag(window: &Window, key: &str) -> bool {
    Reflect::get(window.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn f64_field(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

fn bool_field(target: &JsValue, key: &str) -> Option<bool> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_bool()
}

fn u32_field(target: &JsValue, key: &str) -> Option<u32> {
    f64_field(target, key).map(|value| value.max(0.0) as u32)
}
