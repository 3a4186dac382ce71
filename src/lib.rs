//! KYBNK clicker core crate.
//!
//! The browser game is exposed through `start_game()`: tap the picture, the
//! score goes up, a "+1" floats away and every 100 taps a banner pops. The
//! click loop itself (`game`, `session`, `overlay`, `notify`) is plain Rust and
//! runs natively under `cargo test`; `surface` binds it to the DOM.
//!
//! With the `bot` feature the crate also carries the Telegram responder used by
//! the `kybnk-bot` binary.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod notify;
pub mod overlay;
pub mod session;
pub mod surface;

#[cfg(feature = "bot")]
pub mod bot;

pub use config::GameConfig;
pub use error::SurfaceError;
pub use game::{Clicker, Scheduler, View};
pub use notify::{Banner, Tone};
pub use overlay::{FloatingLabel, LabelId, LabelPhase, Overlay};
pub use session::{ClickOutcome, ClickSession, Milestone, PointerEvent, is_milestone, progress_value};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    init_console_log();
}

#[cfg(feature = "console_log")]
fn init_console_log() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already installed"));
    }
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Mount the game with default settings. Never throws: construction failures
/// end up on a fallback banner and the page stays up.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    launch(GameConfig::default());
    Ok(())
}

/// Mount the game with a JSON override of the defaults. A bad override is
/// reported on the banner and the defaults are used instead.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    match GameConfig::from_json(json) {
        Ok(cfg) => {
            launch(cfg);
        }
        Err(e) => {
            if let Some(clicker) = launch(GameConfig::default()) {
                clicker.report(e);
            }
        }
    }
    Ok(())
}

fn launch(config: GameConfig) -> Option<Clicker<surface::DomView>> {
    let banner_style = config.banner.clone();
    match surface::mount(config) {
        Ok(clicker) => Some(clicker),
        Err(e) => {
            surface::report_fatal(&e, &banner_style);
            None
        }
    }
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
