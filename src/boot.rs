//! Bridge to the loading overlay in `index.html`, which exposes
//! `window.__YOSEGI_BOOT` with `setPhase`, `fail` and `ready`. Every call is
//! a no-op when the overlay is absent or on native targets.

#[cfg(target_arch = "wasm32")]
use std::cell::Cell;

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};

use crate::error::ShellError;

#[cfg(target_arch = "wasm32")]
const BOOT_GLOBAL: &str = "__YOSEGI_BOOT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BootPhase {
    Layout,
    LoadingImage,
}

impl BootPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            BootPhase::Layout => "Preparing board",
            BootPhase::LoadingImage => "Loading picture",
        }
    }
}

#[cfg(target_arch = "wasm32")]
thread_local! {
    static FINISHED: Cell<bool> = Cell::new(false);
}

#[cfg(target_arch = "wasm32")]
fn boot_object() -> Option<Object> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(BOOT_GLOBAL)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value.dyn_into::<Object>().ok()
}

#[cfg(target_arch = "wasm32")]
fn call(method: &str, args: &[JsValue]) {
    let Some(boot) = boot_object() else {
        return;
    };
    let Ok(func) = Reflect::get(&boot, &JsValue::from_str(method))
        .and_then(|value| value.dyn_into::<Function>())
    else {
        return;
    };
    let array: Array = args.iter().collect();
    let _ = func.apply(&boot, &array);
}

/// Marks the overlay finished; returns false if it already was.
#[cfg(target_arch = "wasm32")]
fn finish_once() -> bool {
    FINISHED.with(|flag| !flag.replace(true))
}

pub(crate) fn set_phase(phase: BootPhase, detail: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        call(
            "setPhase",
            &[JsValue::from_str(phase.label()), JsValue::from_str(detail)],
        );
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (phase, detail);
    }
}

pub(crate) fn fail(error: &ShellError) {
    #[cfg(target_arch = "wasm32")]
    {
        if !finish_once() {
            return;
        }
        call(
            "fail",
            &[
                JsValue::from_str(error.code()),
                JsValue::from_str(&error.to_string()),
                JsValue::from_str(error.hint()),
            ],
        );
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = error;
    }
}

pub(crate) fn ready() {
    #[cfg(target_arch = "wasm32")]
    {
        if finish_once() {
            call("ready", &[]);
        }
    }
}
