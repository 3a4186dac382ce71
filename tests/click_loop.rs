// Integration tests (native) for the click-to-feedback loop.
// A recording view and a manual clock stand in for the DOM and setTimeout so
// timing can be stepped deterministically.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kybnk_clicker::{
    Banner, Clicker, FloatingLabel, GameConfig, LabelId, LabelPhase, PointerEvent, Scheduler,
    SurfaceError, Tone, View,
};

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct ManualTimers {
    now: Cell<u64>,
    seq: Cell<u64>,
    queue: RefCell<Vec<(u64, u64, Task)>>,
}

impl Scheduler for ManualTimers {
    fn schedule(&self, delay_ms: u32, task: Task) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.queue.borrow_mut().push((self.now.get() + delay_ms as u64, seq, task));
    }
}

impl ManualTimers {
    fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut q = self.queue.borrow_mut();
                let idx = q
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _, _))| *due <= target)
                    .min_by_key(|(_, (due, seq, _))| (*due, *seq))
                    .map(|(i, _)| i);
                idx.map(|i| q.swap_remove(i))
            };
            let Some((due, _, task)) = next else { break };
            self.now.set(due);
            task();
        }
        self.now.set(target);
    }

    fn now(&self) -> f64 {
        self.now.get() as f64
    }

    fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[derive(Default)]
struct RecordingView {
    score: Option<u64>,
    scales: Vec<f64>,
    progress: f64,
    mounted: HashMap<LabelId, FloatingLabel>,
    risen: Vec<LabelId>,
    banners: Vec<Banner>,
    banner_visible: bool,
    fail_progress: bool,
    fail_banner: bool,
    fail_mount: bool,
}

impl View for RecordingView {
    fn render_score(&mut self, score: u64) -> Result<(), SurfaceError> {
        self.score = Some(score);
        Ok(())
    }

    fn render_scale(&mut self, scale: f64) -> Result<(), SurfaceError> {
        self.scales.push(scale);
        Ok(())
    }

    fn render_progress(&mut self, value: f64) -> Result<(), SurfaceError> {
        if self.fail_progress {
            return Err(SurfaceError::Dom("boom".into()));
        }
        self.progress = value;
        Ok(())
    }

    fn mount_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError> {
        if self.fail_mount {
            return Err(SurfaceError::Dom("mount".into()));
        }
        self.mounted.insert(label.id, label.clone());
        Ok(())
    }

    fn animate_label(&mut self, label: &FloatingLabel) -> Result<(), SurfaceError> {
        self.risen.push(label.id);
        self.mounted.insert(label.id, label.clone());
        Ok(())
    }

    fn unmount_label(&mut self, id: LabelId) -> Result<(), SurfaceError> {
        self.mounted.remove(&id);
        Ok(())
    }

    fn show_banner(&mut self, banner: &Banner) -> Result<(), SurfaceError> {
        if self.fail_banner {
            return Err(SurfaceError::Dom("banner gone".into()));
        }
        self.banners.push(banner.clone());
        self.banner_visible = true;
        Ok(())
    }

    fn hide_banner(&mut self) -> Result<(), SurfaceError> {
        self.banner_visible = false;
        Ok(())
    }
}

const CENTER: (f64, f64) = (200.0, 350.0);

fn setup(config: GameConfig) -> (Clicker<RecordingView>, Rc<ManualTimers>) {
    let timers = Rc::new(ManualTimers::default());
    let clicker = Clicker::new(config, RecordingView::default(), timers.clone());
    (clicker, timers)
}

fn tap(clicker: &Clicker<RecordingView>, timers: &ManualTimers, x: f64, y: f64) {
    let mut evt = PointerEvent::at(x, y);
    clicker.click(&mut evt, CENTER, timers.now());
}

#[test]
fn single_click_renders_score_progress_and_label() {
    let (clicker, timers) = setup(GameConfig::default());
    tap(&clicker, &timers, 50.0, 50.0);

    assert_eq!(clicker.score(), 1);
    assert!((clicker.progress() - 0.01).abs() < 1e-12);
    let labels = clicker.labels();
    assert_eq!(labels.len(), 1);
    assert_eq!((labels[0].left, labels[0].top), (35.0, 10.0));
    assert_eq!(labels[0].phase, LabelPhase::Created);

    clicker.with_view(|v| {
        assert_eq!(v.score, Some(1));
        assert_eq!(v.scales, vec![0.9]);
        assert!((v.progress - 0.01).abs() < 1e-12);
        assert_eq!(v.mounted.len(), 1);
        assert!(v.banners.is_empty());
    });
}

#[test]
fn press_restores_and_label_walks_its_lifecycle() {
    let (clicker, timers) = setup(GameConfig::default());
    tap(&clicker, &timers, 50.0, 200.0);
    let id = clicker.labels()[0].id;

    timers.advance(99);
    assert_eq!(clicker.labels()[0].phase, LabelPhase::Created);

    timers.advance(1);
    let labels = clicker.labels();
    let rising = &labels[0];
    assert_eq!(rising.phase, LabelPhase::Rising);
    assert_eq!(rising.top, 120.0);
    assert_eq!(rising.opacity, 0.0);
    clicker.with_view(|v| {
        assert_eq!(v.scales, vec![0.9, 1.0]);
        assert_eq!(v.risen, vec![id]);
    });

    timers.advance(499);
    assert_eq!(clicker.label_count(), 1);
    timers.advance(1);
    assert_eq!(clicker.label_count(), 0);
    clicker.with_view(|v| assert!(v.mounted.is_empty()));
    assert_eq!(timers.pending(), 0);
}

#[test]
fn n_clicks_score_n() {
    let (clicker, timers) = setup(GameConfig::default());
    for i in 0..257 {
        tap(&clicker, &timers, i as f64, i as f64);
        timers.advance(3);
    }
    assert_eq!(clicker.score(), 257);
    assert!((clicker.progress() - 0.57).abs() < 1e-12);
}

#[test]
fn hundred_clicks_fire_exactly_one_milestone() {
    let (clicker, timers) = setup(GameConfig::default());
    for _ in 0..100 {
        tap(&clicker, &timers, 10.0, 10.0);
    }
    assert_eq!(clicker.score(), 100);
    assert_eq!(clicker.progress(), 0.0);
    clicker.with_view(|v| {
        assert_eq!(v.banners.len(), 1);
        assert_eq!(v.banners[0], Banner::info("🍊 +100"));
        assert_eq!(v.progress, 0.0);
    });
    assert_eq!(clicker.banner().map(|b| b.tone), Some(Tone::Info));

    for _ in 0..150 {
        tap(&clicker, &timers, 10.0, 10.0);
    }
    clicker.with_view(|v| assert_eq!(v.banners.len(), 2));
}

#[test]
fn overlay_tracks_trailing_lifetime_window() {
    let (clicker, timers) = setup(GameConfig::default());
    tap(&clicker, &timers, 0.0, 0.0); // t=0
    timers.advance(200);
    tap(&clicker, &timers, 0.0, 0.0); // t=200
    timers.advance(200);
    tap(&clicker, &timers, 0.0, 0.0); // t=400
    assert_eq!(clicker.label_count(), 3);

    timers.advance(250); // t=650: first label gone
    assert_eq!(clicker.label_count(), 2);
    timers.advance(100); // t=750
    assert_eq!(clicker.label_count(), 2);
    timers.advance(50); // t=800: second gone
    assert_eq!(clicker.label_count(), 1);
    timers.advance(200); // t=1000: third gone
    assert_eq!(clicker.label_count(), 0);
}

#[test]
fn burst_of_clicks_all_expire() {
    let (clicker, timers) = setup(GameConfig::default());
    for i in 0..500 {
        tap(&clicker, &timers, i as f64, 0.0);
    }
    assert_eq!(clicker.label_count(), 500);
    timers.advance(600);
    assert_eq!(clicker.label_count(), 0);
    clicker.with_view(|v| assert!(v.mounted.is_empty()));
}

#[test]
fn label_cap_limits_concurrent_labels() {
    let mut config = GameConfig::default();
    config.label.max_labels = Some(3);
    let (clicker, timers) = setup(config);
    for _ in 0..5 {
        tap(&clicker, &timers, 0.0, 0.0);
    }
    assert_eq!(clicker.score(), 5);
    assert_eq!(clicker.label_count(), 3);
    timers.advance(600);
    tap(&clicker, &timers, 0.0, 0.0);
    assert_eq!(clicker.label_count(), 1);
}

#[test]
fn duplicate_delivery_counts_once() {
    let (clicker, timers) = setup(GameConfig::default());
    let mut evt = PointerEvent::at(5.0, 5.0);
    clicker.click(&mut evt, CENTER, timers.now());
    clicker.click(&mut evt, CENTER, timers.now());
    assert_eq!(clicker.score(), 1);
    assert_eq!(clicker.label_count(), 1);
}

#[test]
fn unpositioned_click_spawns_at_center() {
    let (clicker, timers) = setup(GameConfig::default());
    let mut evt = PointerEvent::unpositioned();
    clicker.click(&mut evt, CENTER, timers.now());
    let labels = clicker.labels();
    let label = &labels[0];
    assert_eq!(label.origin, CENTER);
    assert_eq!((label.left, label.top), (185.0, 310.0));
}

#[test]
fn render_failure_is_reported_and_click_continues() {
    let (clicker, timers) = setup(GameConfig::default());
    clicker.with_view(|v| v.fail_progress = true);
    tap(&clicker, &timers, 1.0, 1.0);

    assert_eq!(clicker.score(), 1);
    assert_eq!(clicker.label_count(), 1);
    let banner = clicker.banner().expect("error banner");
    assert_eq!(banner.tone, Tone::Error);
    assert_eq!(banner.text, "Error: Click error: DOM operation failed: boom");
    clicker.with_view(|v| assert_eq!(v.score, Some(1)));
}

#[test]
fn failed_label_mount_is_dropped_and_reported_once() {
    let (clicker, timers) = setup(GameConfig::default());
    clicker.with_view(|v| v.fail_mount = true);
    tap(&clicker, &timers, 1.0, 1.0);

    assert_eq!(clicker.score(), 1);
    assert_eq!(clicker.label_count(), 0);
    timers.advance(600);
    assert_eq!(clicker.label_count(), 0);

    clicker.with_view(|v| {
        assert_eq!(v.banners.len(), 1);
        assert_eq!(v.banners[0].text, "Error: Animation error: DOM operation failed: mount");
        assert!(v.risen.is_empty());
    });
    assert_eq!(clicker.banner().map(|b| b.tone), Some(Tone::Error));
}

#[test]
fn banner_failure_does_not_panic() {
    let (clicker, timers) = setup(GameConfig::default());
    clicker.with_view(|v| {
        v.fail_progress = true;
        v.fail_banner = true;
    });
    tap(&clicker, &timers, 1.0, 1.0);
    assert_eq!(clicker.score(), 1);
    assert!(clicker.banner().is_none());
}

#[test]
fn newer_banner_survives_older_dismiss_timer() {
    let (clicker, timers) = setup(GameConfig::default());
    for _ in 0..100 {
        tap(&clicker, &timers, 0.0, 0.0);
    }
    timers.advance(3000);
    clicker.report(SurfaceError::Dom("late".into()));

    timers.advance(1000); // milestone timer fires, error banner stays
    assert_eq!(clicker.banner().map(|b| b.tone), Some(Tone::Error));
    clicker.with_view(|v| assert!(v.banner_visible));

    timers.advance(3000);
    assert!(clicker.banner().is_none());
    clicker.with_view(|v| assert!(!v.banner_visible));
}

#[test]
fn teardown_tolerates_pending_label_timers() {
    let (clicker, timers) = setup(GameConfig::default());
    tap(&clicker, &timers, 0.0, 0.0);
    tap(&clicker, &timers, 0.0, 0.0);
    clicker.teardown();
    assert_eq!(clicker.label_count(), 0);
    timers.advance(1000);
    assert_eq!(clicker.label_count(), 0);
    clicker.with_view(|v| {
        assert!(v.mounted.is_empty());
        assert!(v.risen.is_empty());
    });
    assert!(clicker.banner().is_none());
}

#[test]
fn timers_after_drop_are_noops() {
    let (clicker, timers) = setup(GameConfig::default());
    tap(&clicker, &timers, 0.0, 0.0);
    drop(clicker);
    timers.advance(1000);
    assert_eq!(timers.pending(), 0);
}
