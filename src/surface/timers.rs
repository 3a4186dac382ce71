use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::game::Scheduler;

/// `setTimeout`-backed scheduler. Every task gets its own one-shot closure.
pub struct WindowTimers;

impl Scheduler for WindowTimers {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let Some(win) = window() else {
            log::error!("no window; dropping timer ({delay_ms}ms)");
            return;
        };
        let cb = Closure::once(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) =
            win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay)
        {
            log::error!("setTimeout failed: {:?}", e);
            return;
        }
        cb.forget();
    }
}
