//! Floating "+1" labels and the overlay collection that holds them.
//!
//! Each label walks `Created -> Rising -> Expired` on its own timers. The
//! collection is keyed by [`LabelId`]; removal of an absent id is a no-op so a
//! late timer after teardown is harmless.

use std::collections::HashMap;

use crate::config::LabelStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(u64);

impl LabelId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelPhase {
    Created,
    Rising,
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingLabel {
    pub id: LabelId,
    /// Click point the label was spawned for.
    pub origin: (f64, f64),
    pub created_ms: f64,
    pub left: f64,
    pub top: f64,
    pub opacity: f64,
    /// How far the label has been moved up from its spawn position.
    pub offset_y: f64,
    pub phase: LabelPhase,
}

impl FloatingLabel {
    fn new(id: LabelId, x: f64, y: f64, now_ms: f64, style: &LabelStyle) -> Self {
        Self {
            id,
            origin: (x, y),
            created_ms: now_ms,
            left: x - style.offset_x,
            top: y - style.offset_y,
            opacity: 1.0,
            offset_y: 0.0,
            phase: LabelPhase::Created,
        }
    }

    fn begin_rise(&mut self, style: &LabelStyle) {
        let target_top = self.origin.1 - style.rise_distance;
        self.offset_y = (self.top - target_top).max(0.0);
        self.top = target_top;
        self.opacity = 0.0;
        self.phase = LabelPhase::Rising;
    }
}

/// Unordered set of visible labels.
#[derive(Default)]
pub struct Overlay {
    labels: HashMap<LabelId, FloatingLabel>,
    next_id: u64,
    cap: Option<usize>,
}

impl Overlay {
    pub fn new(cap: Option<usize>) -> Self {
        Self { labels: HashMap::new(), next_id: 0, cap }
    }

    /// Add a label at the click point. Returns `None` only when a cap is set and
    /// already reached.
    pub fn spawn(&mut self, x: f64, y: f64, now_ms: f64, style: &LabelStyle) -> Option<&FloatingLabel> {
        if self.cap.is_some_and(|cap| self.labels.len() >= cap) {
            log::debug!("label cap reached ({} visible), dropping spawn", self.labels.len());
            return None;
        }
        let id = LabelId(self.next_id);
        self.next_id += 1;
        let label = FloatingLabel::new(id, x, y, now_ms, style);
        Some(self.labels.entry(id).or_insert(label))
    }

    /// `Created -> Rising`. Absent or already rising labels are left alone.
    pub fn rise(&mut self, id: LabelId, style: &LabelStyle) -> Option<&FloatingLabel> {
        let label = self.labels.get_mut(&id)?;
        if label.phase != LabelPhase::Created {
            return None;
        }
        label.begin_rise(style);
        Some(label)
    }

    /// Remove the label, handing it back in the `Expired` phase. Idempotent.
    pub fn expire(&mut self, id: LabelId) -> Option<FloatingLabel> {
        let mut label = self.labels.remove(&id)?;
        label.phase = LabelPhase::Expired;
        Some(label)
    }

    pub fn get(&self, id: LabelId) -> Option<&FloatingLabel> {
        self.labels.get(&id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatingLabel> {
        self.labels.values()
    }

    /// Drop every label, returning their ids so the renderer can unmount them.
    pub fn clear(&mut self) -> Vec<LabelId> {
        self.labels.drain().map(|(id, _)| id).collect()
    }
}
