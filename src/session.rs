//! Score bookkeeping for one play session.
//!
//! Nothing here touches the DOM: a [`ClickSession`] turns accepted pointer
//! events into [`ClickOutcome`]s and the surface renders them.

/// A pointer/tap event as seen by the click loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Option<(f64, f64)>,
    handled: bool,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self { position: Some((x, y)), handled: false }
    }

    /// Event without usable coordinates (keyboard activation, synthetic click).
    pub fn unpositioned() -> Self {
        Self { position: None, handled: false }
    }

    /// Wrap a host event that may already have been processed elsewhere.
    pub fn from_host(position: Option<(f64, f64)>, handled: bool) -> Self {
        Self { position, handled }
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }
}

/// Fired when the score lands on a positive multiple of the milestone period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub score: u64,
}

/// Everything the surface has to render for one accepted click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickOutcome {
    pub score: u64,
    pub progress: f64,
    pub milestone: Option<Milestone>,
    pub position: (f64, f64),
}

pub struct ClickSession {
    score: u64,
    milestone_every: u64,
}

impl ClickSession {
    /// `milestone_every` must be non-zero (checked by `GameConfig::validate`).
    pub fn new(milestone_every: u64) -> Self {
        Self { score: 0, milestone_every: milestone_every.max(1) }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn progress(&self) -> f64 {
        progress_value(self.score, self.milestone_every)
    }

    /// Register a click. Returns `None` for an event that was already handled;
    /// otherwise marks it handled, bumps the score and reports what changed.
    /// Events without a position resolve to `center`.
    pub fn accept(&mut self, event: &mut PointerEvent, center: (f64, f64)) -> Option<ClickOutcome> {
        if event.handled {
            return None;
        }
        event.handled = true;

        self.score += 1;
        let milestone = is_milestone(self.score, self.milestone_every)
            .then_some(Milestone { score: self.score });
        Some(ClickOutcome {
            score: self.score,
            progress: self.progress(),
            milestone,
            position: event.position.unwrap_or(center),
        })
    }
}

/// Fraction of the current cycle, always in `[0, 1)`.
pub fn progress_value(score: u64, period: u64) -> f64 {
    let period = period.max(1);
    (score % period) as f64 / period as f64
}

pub fn is_milestone(score: u64, period: u64) -> bool {
    score > 0 && score % period.max(1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_click_scores_one() {
        let mut s = ClickSession::new(100);
        let mut evt = PointerEvent::at(50.0, 50.0);
        let out = s.accept(&mut evt, (0.0, 0.0)).expect("fresh click accepted");
        assert_eq!(out.score, 1);
        assert!((out.progress - 0.01).abs() < 1e-12);
        assert_eq!(out.position, (50.0, 50.0));
        assert!(out.milestone.is_none());
        assert!(evt.is_handled());
    }

    #[test]
    fn test_duplicate_delivery_is_ignored() {
        let mut s = ClickSession::new(100);
        let mut evt = PointerEvent::at(1.0, 2.0);
        assert!(s.accept(&mut evt, (0.0, 0.0)).is_some());
        assert!(s.accept(&mut evt, (0.0, 0.0)).is_none());
        let mut pre = PointerEvent::from_host(None, true);
        assert!(s.accept(&mut pre, (0.0, 0.0)).is_none());
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_missing_position_uses_center() {
        let mut s = ClickSession::new(100);
        let mut evt = PointerEvent::unpositioned();
        let out = s.accept(&mut evt, (200.0, 350.0)).unwrap();
        assert_eq!(out.position, (200.0, 350.0));
    }

    #[test]
    fn test_milestone_only_on_exact_multiples() {
        assert!(!is_milestone(0, 100));
        assert!(!is_milestone(99, 100));
        assert!(is_milestone(100, 100));
        assert!(!is_milestone(101, 100));
        assert!(is_milestone(300, 100));
    }

    #[test]
    fn test_progress_wraps_each_cycle() {
        assert_eq!(progress_value(0, 100), 0.0);
        assert!((progress_value(42, 100) - 0.42).abs() < 1e-12);
        assert_eq!(progress_value(100, 100), 0.0);
        assert!((progress_value(199, 100) - 0.99).abs() < 1e-12);
        for k in 0..1000 {
            let p = progress_value(k, 100);
            assert!((0.0..1.0).contains(&p));
        }
    }
}
