//! Browser surface: page setup, DOM tree, click wiring and timers.
//!
//! `mount()` builds everything under `<body>` and returns the live
//! [`Clicker`]. The click listener keeps its own handle, so the session lives
//! as long as the page does.
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent, window};

use crate::config::{BannerStyle, GameConfig, PageStyle};
use crate::error::SurfaceError;
use crate::game::Clicker;
use crate::session::PointerEvent;

mod timers;
mod view;

pub use timers::WindowTimers;
pub use view::{BANNER_ID, COLUMN_ID, DomView, OVERLAY_ID, PLACEHOLDER_ID, ROOT_ID, SCORE_ID, TARGET_ID, mount_placeholder};

const FONT_STYLE_ID: &str = "kc-font";
pub const FATAL_ID: &str = "kc-fatal";

pub fn mount(config: GameConfig) -> Result<Clicker<DomView>, SurfaceError> {
    config.validate()?;
    let win = window().ok_or(SurfaceError::MissingWindow)?;
    let doc = win.document().ok_or(SurfaceError::MissingDocument)?;
    let body = doc.body().ok_or(SurfaceError::MissingBody)?;

    setup_page(&doc, &body, &config.page)?;
    let view = DomView::build(&doc, &body, &config)?;
    let center_fallback = (config.page.width as f64 / 2.0, config.page.height as f64 / 2.0);
    let clicker = Clicker::new(config, view, Rc::new(WindowTimers));

    let area = clicker.with_view(|v| v.click_area().clone());
    attach_click_listener(&area, &clicker, center_fallback)?;
    log::info!("clicker surface mounted");
    Ok(clicker)
}

fn setup_page(doc: &Document, body: &HtmlElement, page: &PageStyle) -> Result<(), SurfaceError> {
    doc.set_title(&page.title);
    body.set_attribute(
        "style",
        &format!(
            "margin:0; padding:{}px; background:{}; color:#fff; font-family:'{}', sans-serif; overflow:hidden;",
            page.padding, page.background, page.font_family
        ),
    )?;
    if doc.get_element_by_id(FONT_STYLE_ID).is_none() {
        let style = doc.create_element("style")?;
        style.set_id(FONT_STYLE_ID);
        style.set_text_content(Some(&format!(
            "@font-face {{ font-family: '{}'; src: url('{}'); }}",
            page.font_family, page.font_src
        )));
        body.append_child(&style)?;
    }
    Ok(())
}

fn attach_click_listener(
    area: &HtmlElement,
    clicker: &Clicker<DomView>,
    center_fallback: (f64, f64),
) -> Result<(), SurfaceError> {
    let clicker = clicker.clone();
    let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
        // detail == 0 marks keyboard activation / synthetic clicks with no real position.
        let position = (evt.detail() != 0).then(|| (evt.client_x() as f64, evt.client_y() as f64));
        let mut pointer = PointerEvent::from_host(position, evt.default_prevented());
        clicker.click(&mut pointer, surface_center(center_fallback), crate::performance_now());
        if pointer.is_handled() {
            evt.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn surface_center(fallback: (f64, f64)) -> (f64, f64) {
    let Some(win) = window() else {
        return fallback;
    };
    let w = win.inner_width().ok().and_then(|v| v.as_f64());
    let h = win.inner_height().ok().and_then(|v| v.as_f64());
    match (w, h) {
        (Some(w), Some(h)) => (w / 2.0, h / 2.0),
        _ => fallback,
    }
}

/// Last-resort banner when the surface could not be built at all.
pub fn report_fatal(err: &SurfaceError, style: &BannerStyle) {
    log::error!("Fatal error: {err}");
    let shown = (|| -> Result<(), SurfaceError> {
        let doc = window()
            .ok_or(SurfaceError::MissingWindow)?
            .document()
            .ok_or(SurfaceError::MissingDocument)?;
        let body = doc.body().ok_or(SurfaceError::MissingBody)?;
        if let Some(old) = doc.get_element_by_id(FATAL_ID) {
            old.remove();
        }
        let banner = view::create_div(
            &doc,
            Some(FATAL_ID),
            &format!(
                "position:fixed; left:50%; bottom:24px; transform:translateX(-50%); padding:12px 20px; border-radius:6px; background:{}; color:{}; z-index:60;",
                style.error_background, style.error_color
            ),
        )?;
        banner.set_text_content(Some(&format!("Fatal error: {err}")));
        body.append_child(&banner)?;
        Ok(())
    })();
    if let Err(e) = shown {
        log::error!("critical: fatal banner failed ({e}): {err}");
    }
}
