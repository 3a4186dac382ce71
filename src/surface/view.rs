// DOM implementation of the game view.
// Layout: a fixed full-screen click area holding a page-width column (score,
// picture stack, progress bar),
// a pointer-transparent overlay for floating labels and a bottom banner.
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlImageElement};

use crate::config::{BannerStyle, GameConfig, ImageStyle, LabelStyle};
use crate::error::SurfaceError;
use crate::game::View;
use crate::notify::{Banner, Tone};
use crate::overlay::{FloatingLabel, LabelId};

pub const ROOT_ID: &str = "kc-root";
pub const COLUMN_ID: &str = "kc-column";
pub const SCORE_ID: &str = "kc-score";
pub const TARGET_ID: &str = "kc-target";
pub const PLACEHOLDER_ID: &str = "kc-placeholder";
pub const OVERLAY_ID: &str = "kc-overlay";
pub const BANNER_ID: &str = "kc-banner";

pub struct DomView {
    click_area: HtmlElement,
    score: HtmlElement,
    target: HtmlElement,
    progress_fill: HtmlElement,
    overlay: HtmlElement,
    banner: HtmlElement,
    // DOM handles for the labels the overlay currently tracks.
    labels: HashMap<LabelId, HtmlElement>,
    document: Document,
    label_style: LabelStyle,
    banner_style: BannerStyle,
}

pub(crate) fn create_div(doc: &Document, id: Option<&str>, style: &str) -> Result<HtmlElement, SurfaceError> {
    let el: HtmlElement = doc
        .create_element("div")?
        .dyn_into()
        .map_err(|_| SurfaceError::Dom("div is not an HtmlElement".into()))?;
    if let Some(id) = id {
        el.set_id(id);
    }
    el.set_attribute("style", style)?;
    Ok(el)
}

impl DomView {
    /// Build the whole tree under `parent`, replacing a previous one.
    pub fn build(doc: &Document, parent: &HtmlElement, config: &GameConfig) -> Result<Self, SurfaceError> {
        if let Some(old) = doc.get_element_by_id(ROOT_ID) {
            old.remove();
        }
        let root = create_div(doc, Some(ROOT_ID), "")?;

        let click_area = create_div(
            doc,
            None,
            "position:fixed; inset:0; display:flex; justify-content:center; cursor:pointer; user-select:none; -webkit-tap-highlight-color:transparent;",
        )?;
        let column = create_div(
            doc,
            Some(COLUMN_ID),
            &format!(
                "width:100%; max-width:{}px; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:12px;",
                config.page.width
            ),
        )?;
        click_area.append_child(&column)?;

        let score = create_div(
            doc,
            Some(SCORE_ID),
            &format!("font-size:{}px; line-height:1; color:#fff;", config.score_font_size),
        )?;
        score.set_text_content(Some("0"));
        column.append_child(&score)?;

        let size = config.image.size;
        let stack = create_div(doc, None, &format!("position:relative; width:{size}px; height:{size}px;"))?;
        let target = create_div(
            doc,
            Some(TARGET_ID),
            &format!(
                "width:100%; height:100%; transform:scale(1); transition:transform {}ms ease;",
                config.image.scale_transition_ms
            ),
        )?;
        stack.append_child(&target)?;
        column.append_child(&stack)?;
        mount_target(doc, &target, &config.image)?;

        let p = &config.progress;
        let track = create_div(
            doc,
            None,
            &format!(
                "width:{}px; height:{}px; background:{}; border-radius:{}px; overflow:hidden; margin:10px 0;",
                p.width, p.height, p.track, p.radius
            ),
        )?;
        let progress_fill = create_div(doc, None, &format!("width:0%; height:100%; background:{};", p.fill))?;
        track.append_child(&progress_fill)?;
        column.append_child(&track)?;

        let overlay = create_div(doc, Some(OVERLAY_ID), "position:fixed; inset:0; pointer-events:none; z-index:40;")?;

        let b = &config.banner;
        let banner = create_div(
            doc,
            Some(BANNER_ID),
            &format!(
                "display:none; position:fixed; left:50%; bottom:24px; transform:translateX(-50%); min-width:240px; padding:12px 20px; border-radius:6px; font-size:{}px; text-align:center; z-index:50;",
                b.font_size
            ),
        )?;

        root.append_child(&click_area)?;
        root.append_child(&overlay)?;
        root.append_child(&banner)?;
        parent.append_child(&root)?;

        Ok(Self {
            click_area,
            score,
            target,
            progress_fill,
            overlay,
            banner,
            labels: HashMap::new(),
            document: doc.clone(),
            label_style: config.label.clone(),
            banner_style: config.banner.clone(),
        })
    }

    pub fn click_area(&self) -> &HtmlElement {
        &self.click_area
    }

    pub fn mounted_labels(&self) -> usize {
        self.labels.len()
    }
}

/// Put the picture into `wrapper`. A missing asset (empty src, failed
/// construction or a later load error) is replaced by the warning placeholder.
fn mount_target(doc: &Document, wrapper: &HtmlElement, style: &ImageStyle) -> Result<(), SurfaceError> {
    if style.src.is_empty() {
        log::warn!("no image asset configured, using placeholder");
        mount_placeholder(doc, wrapper, style)?;
        return Ok(());
    }
    let img = match HtmlImageElement::new() {
        Ok(img) => img,
        Err(e) => {
            log::warn!("image element unavailable ({:?}), using placeholder", e);
            mount_placeholder(doc, wrapper, style)?;
            return Ok(());
        }
    };
    img.set_src(&style.src);
    img.set_alt("clicker");
    img.set_draggable(false);
    img.set_attribute("style", "width:100%; height:100%; object-fit:contain; pointer-events:none;")?;

    let (doc_err, wrapper_err, style_err) = (doc.clone(), wrapper.clone(), style.clone());
    let on_error = Closure::once(move || {
        log::warn!("image asset `{}` failed to load, using placeholder", style_err.src);
        if let Err(e) = mount_placeholder(&doc_err, &wrapper_err, &style_err) {
            log::error!("placeholder mount failed: {e}");
        }
    });
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    wrapper.append_child(&img)?;
    Ok(())
}

/// Amber tile with a warning glyph, shown instead of the picture.
pub fn mount_placeholder(doc: &Document, wrapper: &HtmlElement, style: &ImageStyle) -> Result<HtmlElement, SurfaceError> {
    wrapper.set_inner_html("");
    let tile = create_div(
        doc,
        Some(PLACEHOLDER_ID),
        &format!(
            "width:100%; height:100%; background:{}; border-radius:10px; display:flex; align-items:center; justify-content:center; font-size:100px; color:{};",
            style.placeholder_color, style.placeholder_glyph_color
        ),
    )?;
    tile.set_text_content(Some("⚠"));
    wrapper.append_child(&tile)?;
    Ok(tile)
}

fn label_dom_id(id: LabelId) -> String {
    format!("kc-label-{}", id.raw())
}

impl View for DomView {
    fn render_score(&mut self, score: u64) -> Result<(), SurfaceError> {
        self.score.set_text_content(Some(&score.to_string()));
        Ok(())
    }

    fn render_scale(&mut self, scale: f64) -> Result<(), SurfaceError> {
        self.target.style().set_property("transform", &format!("scale({scale})"))?;
        Ok(())
    }

    fn render_progress(&mut self, value: f64) -> Result<(), SurfaceError> {
        self.progress_fill
            .style()
            .set_property("width", &format!("{:.2}%", value * 100.0))?;
        Ok(())
    }

    fn mount_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError> {
        let s = &self.label_style;
        let el = create_div(
            &self.document,
            Some(label_dom_id(label.id).as_str()),
            &format!(
                "position:absolute; left:{}px; top:{}px; opacity:{}; font-size:{}px; font-weight:bold; color:{}; transition:top {}ms, opacity {}ms;",
                label.left, label.top, label.opacity, s.font_size, s.color, s.rise_duration_ms, s.rise_duration_ms
            ),
        )?;
        el.set_text_content(Some(&s.text));
        self.overlay.append_child(&el)?;
        self.labels.insert(label.id, el);
        Ok(())
    }

    fn animate_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError> {
        let el = self
            .labels
            .get(&label.id)
            .ok_or_else(|| SurfaceError::MissingElement(label_dom_id(label.id)))?;
        let style = el.style();
        style.set_property("top", &format!("{}px", label.top))?;
        style.set_property("opacity", &label.opacity.to_string())?;
        Ok(())
    }

    fn unmount_label(&mut self, id: LabelId) -> Result<(), SurfaceError> {
        if let Some(el) = self.labels.remove(&id) {
            el.remove();
        }
        Ok(())
    }

    fn show_banner(&mut self, banner: &Banner) -> Result<(), SurfaceError> {
        let s = &self.banner_style;
        let (color, background) = match banner.tone {
            Tone::Info => (&s.info_color, &s.background),
            Tone::Error => (&s.error_color, &s.error_background),
        };
        self.banner.set_text_content(Some(&banner.text));
        let style = self.banner.style();
        style.set_property("color", color)?;
        style.set_property("background", background)?;
        style.set_property("display", "block")?;
        Ok(())
    }

    fn hide_banner(&mut self) -> Result<(), SurfaceError> {
        self.banner.style().set_property("display", "none")?;
        Ok(())
    }
}
