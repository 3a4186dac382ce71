//! Click-to-feedback loop.
//!
//! [`Clicker`] owns the session state (score, overlay, banner slot) and drives
//! a [`View`] through one accepted click: score, press squash, progress,
//! milestone banner, floating label. Delayed work (press restore, label rise,
//! label removal, banner auto-hide) goes through a [`Scheduler`] as independent
//! single-shot tasks. Every view call returns a `Result`; failures are routed
//! through [`Game::report`], the only place that turns an error into a banner.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::GameConfig;
use crate::error::SurfaceError;
use crate::notify::{Banner, NotificationSlot};
use crate::overlay::{FloatingLabel, LabelId, Overlay};
use crate::session::{ClickOutcome, ClickSession, PointerEvent};

/// Rendering side of the surface.
pub trait View {
    fn render_score(&mut self, score: u64) -> Result<(), SurfaceError>;
    fn render_scale(&mut self, scale: f64) -> Result<(), SurfaceError>;
    fn render_progress(&mut self, value: f64) -> Result<(), SurfaceError>;
    fn mount_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError>;
    fn animate_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError>;
    /// Must succeed when the label is not mounted.
    fn unmount_label(&mut self, id: LabelId) -> Result<(), SurfaceError>;
    fn show_banner(&mut self, banner: &Banner) -> Result<(), SurfaceError>;
    fn hide_banner(&mut self) -> Result<(), SurfaceError>;
}

/// Single-shot delayed execution on the surface's event loop.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

pub struct Game<V: View> {
    config: GameConfig,
    session: ClickSession,
    overlay: Overlay,
    banner: NotificationSlot,
    view: V,
    timers: Rc<dyn Scheduler>,
    this: Weak<RefCell<Game<V>>>,
}

impl<V: View + 'static> Game<V> {
    fn on_click(&mut self, outcome: ClickOutcome, now_ms: f64) {
        let r = self.view.render_score(outcome.score);
        self.check(r, "Click");

        let r = self.view.render_scale(self.config.image.press_scale);
        self.check(r, "Click");
        self.after(self.config.image.press_restore_ms, |game| {
            let r = game.view.render_scale(1.0);
            game.check(r, "Click");
        });

        let r = self.view.render_progress(outcome.progress);
        self.check(r, "Click");

        if let Some(m) = outcome.milestone {
            log::info!("milestone reached at {}", m.score);
            self.announce(Banner::info(self.config.banner.milestone_text.clone()));
        }

        self.spawn_label(outcome.position, now_ms);
    }

    fn spawn_label(&mut self, (x, y): (f64, f64), now_ms: f64) {
        let rise_delay = self.config.label.rise_delay_ms;
        let lifetime = self.config.label.lifetime_ms();
        let Some(label) = self.overlay.spawn(x, y, now_ms, &self.config.label).cloned() else {
            return;
        };
        let id = label.id;
        if let Err(e) = self.view.mount_label(&label) {
            // Never shown, so it must not be tracked or animated.
            self.overlay.expire(id);
            self.report(e.during("Animation"));
            return;
        }

        self.after(rise_delay, move |game| {
            if let Some(label) = game.overlay.rise(id, &game.config.label).cloned() {
                let r = game.view.animate_label(&label);
                game.check(r, "Animation");
            }
        });
        self.after(lifetime, move |game| {
            if game.overlay.expire(id).is_some() {
                if let Err(e) = game.view.unmount_label(id) {
                    log::error!("label {} removal failed: {e}", id.raw());
                }
            }
        });
    }

    /// Show a banner, replacing the current one, and arm its auto-hide.
    fn announce(&mut self, banner: Banner) {
        if let Err(e) = self.view.show_banner(&banner) {
            log::error!("critical: banner could not be shown ({e}): {}", banner.text);
            return;
        }
        let generation = self.banner.show(banner);
        let dismiss_ms = self.config.banner.dismiss_ms;
        if dismiss_ms > 0 {
            self.after(dismiss_ms, move |game| {
                if game.banner.dismiss(generation) {
                    if let Err(e) = game.view.hide_banner() {
                        log::warn!("banner hide failed: {e}");
                    }
                }
            });
        }
    }

    fn check(&mut self, result: Result<(), SurfaceError>, step: &'static str) {
        if let Err(e) = result {
            self.report(e.during(step));
        }
    }

    /// Log the error and surface it on the banner. Never fails.
    pub fn report(&mut self, err: SurfaceError) {
        log::error!("{err}");
        self.announce(Banner::error(err.to_string()));
    }

    fn after(&self, delay_ms: u32, task: impl FnOnce(&mut Game<V>) + 'static) {
        let this = self.this.clone();
        self.timers.schedule(
            delay_ms,
            Box::new(move || {
                let Some(cell) = this.upgrade() else {
                    return;
                };
                match cell.try_borrow_mut() {
                    Ok(mut game) => task(&mut *game),
                    Err(_) => log::warn!("timer fired while the game was busy; skipped"),
                };
            }),
        );
    }
}

/// Cheap, clonable handle to one game session.
pub struct Clicker<V: View> {
    inner: Rc<RefCell<Game<V>>>,
}

impl<V: View> Clone for Clicker<V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<V: View + 'static> Clicker<V> {
    pub fn new(config: GameConfig, view: V, timers: Rc<dyn Scheduler>) -> Self {
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Game {
                session: ClickSession::new(config.banner.milestone_every),
                overlay: Overlay::new(config.label.max_labels),
                banner: NotificationSlot::default(),
                config,
                view,
                timers,
                this: this.clone(),
            })
        });
        Self { inner }
    }

    /// Handle one pointer event. Already-handled events are ignored.
    pub fn click(&self, event: &mut PointerEvent, center: (f64, f64), now_ms: f64) {
        let Ok(mut game) = self.inner.try_borrow_mut() else {
            log::warn!("click delivered while the game was busy; dropped");
            return;
        };
        if let Some(outcome) = game.session.accept(event, center) {
            game.on_click(outcome, now_ms);
        }
    }

    pub fn report(&self, err: SurfaceError) {
        self.inner.borrow_mut().report(err);
    }

    /// Drop all labels. Their pending timers become no-ops.
    pub fn teardown(&self) {
        let mut game = self.inner.borrow_mut();
        for id in game.overlay.clear() {
            if let Err(e) = game.view.unmount_label(id) {
                log::warn!("label {} unmount on teardown failed: {e}", id.raw());
            }
        }
    }

    pub fn score(&self) -> u64 {
        self.inner.borrow().session.score()
    }

    pub fn progress(&self) -> f64 {
        self.inner.borrow().session.progress()
    }

    pub fn label_count(&self) -> usize {
        self.inner.borrow().overlay.len()
    }

    pub fn labels(&self) -> Vec<FloatingLabel> {
        self.inner.borrow().overlay.iter().cloned().collect()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.inner.borrow().banner.current().cloned()
    }

    pub fn config(&self) -> GameConfig {
        self.inner.borrow().config.clone()
    }

    /// Run `f` against the view (used by the DOM layer and tests).
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.inner.borrow_mut().view)
    }
}
