//! Tunable look & timing of the clicker surface.
//!
//! All values default to the KYBNK page layout. With the `serde`
//! feature enabled every group can be partially overridden from JSON; missing
//! fields fall back to these defaults.

use crate::error::SurfaceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page chrome: title, colors, font and the nominal window size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PageStyle {
    pub title: String,
    pub background: String,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub font_family: String,
    pub font_src: String,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            title: "KYBNK SHOW clicker".into(),
            background: "#141221".into(),
            width: 400,
            height: 700,
            padding: 20,
            font_family: "FulboArgenta".into(),
            font_src: "assets/fonts/FulboArgenta.ttf".into(),
        }
    }
}

/// The clickable picture and its press feedback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ImageStyle {
    /// Asset path; an empty string goes straight to the placeholder.
    pub src: String,
    pub size: u32,
    pub press_scale: f64,
    pub scale_transition_ms: u32,
    pub press_restore_ms: u32,
    pub placeholder_color: String,
    pub placeholder_glyph_color: String,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            src: "assets/photo.png".into(),
            size: 300,
            press_scale: 0.9,
            scale_transition_ms: 200,
            press_restore_ms: 100,
            placeholder_color: "#ffc107".into(),
            placeholder_glyph_color: "#f44336".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ProgressStyle {
    pub width: u32,
    pub height: u32,
    pub fill: String,
    pub track: String,
    pub radius: u32,
}

impl Default for ProgressStyle {
    fn default() -> Self {
        Self { width: 350, height: 25, fill: "#ff8b1f".into(), track: "#bf6524".into(), radius: 20 }
    }
}

/// Floating "+1" label look and its two-step timed sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LabelStyle {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    /// Subtracted from the click point to get the label's top-left corner.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Delay between spawn and the start of the rise.
    pub rise_delay_ms: u32,
    /// Final top = click y - rise_distance.
    pub rise_distance: f64,
    /// Transition length handed to the renderer for position and opacity.
    pub rise_duration_ms: u32,
    /// Delay between the start of the rise and removal.
    pub expire_delay_ms: u32,
    /// Optional cap on concurrently visible labels. `None` never drops a label.
    pub max_labels: Option<usize>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            text: "+1".into(),
            font_size: 30,
            color: "#ff8b1f".into(),
            offset_x: 15.0,
            offset_y: 40.0,
            rise_delay_ms: 100,
            rise_distance: 80.0,
            rise_duration_ms: 300,
            expire_delay_ms: 500,
            max_labels: None,
        }
    }
}

impl LabelStyle {
    /// Spawn-to-removal time of a single label.
    pub fn lifetime_ms(&self) -> u32 {
        self.rise_delay_ms + self.expire_delay_ms
    }
}

/// Snackbar-like banner shared by milestones and errors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BannerStyle {
    pub milestone_every: u64,
    pub milestone_text: String,
    pub font_size: u32,
    pub info_color: String,
    pub error_color: String,
    /// Milestone banner background.
    pub background: String,
    pub error_background: String,
    /// Visible time before the banner hides itself; 0 keeps it until replaced.
    pub dismiss_ms: u32,
}

impl Default for BannerStyle {
    fn default() -> Self {
        Self {
            milestone_every: 100,
            milestone_text: "🍊 +100".into(),
            font_size: 20,
            info_color: "#ff8b1f".into(),
            error_color: "red".into(),
            background: "#25223a".into(),
            error_background: "#333333".into(),
            dismiss_ms: 4000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GameConfig {
    pub page: PageStyle,
    pub score_font_size: u32,
    pub image: ImageStyle,
    pub progress: ProgressStyle,
    pub label: LabelStyle,
    pub banner: BannerStyle,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            page: PageStyle::default(),
            score_font_size: 100,
            image: ImageStyle::default(),
            progress: ProgressStyle::default(),
            label: LabelStyle::default(),
            banner: BannerStyle::default(),
        }
    }
}

impl GameConfig {
    /// Reject values the click loop cannot work with.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.banner.milestone_every == 0 {
            return Err(SurfaceError::Config("milestone_every must be positive".into()));
        }
        if self.image.press_scale.is_nan() || self.image.press_scale <= 0.0 {
            return Err(SurfaceError::Config(format!(
                "press_scale must be positive, got {}",
                self.image.press_scale
            )));
        }
        if self.label.max_labels == Some(0) {
            return Err(SurfaceError::Config("max_labels cannot be zero".into()));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override on top of the defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, SurfaceError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| SurfaceError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
