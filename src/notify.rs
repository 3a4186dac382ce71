//! Single-slot banner used for milestones and error reports.
//! A new banner always replaces the visible one; nothing is queued.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub tone: Tone,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Info }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: format!("Error: {}", text.into()), tone: Tone::Error }
    }
}

#[derive(Default)]
pub struct NotificationSlot {
    current: Option<Banner>,
    generation: u64,
}

impl NotificationSlot {
    /// Replace whatever is showing. The returned generation identifies this
    /// banner for a later [`dismiss`](Self::dismiss).
    pub fn show(&mut self, banner: Banner) -> u64 {
        self.generation += 1;
        self.current = Some(banner);
        self.generation
    }

    /// Hide the banner only if it is still the one shown at `generation`.
    pub fn dismiss(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut slot = NotificationSlot::default();
        slot.show(Banner::info("🍊 +100"));
        slot.show(Banner::error("Click error: boom"));
        let cur = slot.current().unwrap();
        assert_eq!(cur.tone, Tone::Error);
        assert_eq!(cur.text, "Error: Click error: boom");
    }

    #[test]
    fn test_stale_dismiss_keeps_newer_banner() {
        let mut slot = NotificationSlot::default();
        let first = slot.show(Banner::info("a"));
        let second = slot.show(Banner::info("b"));
        assert!(!slot.dismiss(first));
        assert_eq!(slot.current().unwrap().text, "b");
        assert!(slot.dismiss(second));
        assert!(slot.current().is_none());
        assert!(!slot.dismiss(second));
    }
}
