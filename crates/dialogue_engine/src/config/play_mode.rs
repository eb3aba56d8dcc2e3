//! Play mode configuration
//!
//! Asset names, layout metrics, colours and option gating rules. Every
//! field has a default so partial TOML/RON files are accepted.

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::{Vec3, Vec4};

/// Top-level configuration for [`PlayMode`](crate::play::PlayMode)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayModeConfig {
    /// Scene asset name; the scene must contain exactly one camera
    pub scene: String,
    /// Sound sample asset names loaded alongside the scene
    pub samples: Vec<String>,
    /// Font asset name (TrueType/OpenType)
    pub font: String,
    /// Font size in pixels used for shaping and rasterization
    pub font_pixel_size: u32,
    /// Dialogue script asset name
    pub script: String,
    /// Run the script validation pass after loading and log its findings
    pub validate_script: bool,
    /// Screen-space layout of body text and options
    pub layout: LayoutMetrics,
    /// Colours used when drawing
    pub palette: Palette,
    /// Lock marker, terminal sentinel and unlock trigger
    pub gating: GatingRules,
}

impl Default for PlayModeConfig {
    fn default() -> Self {
        Self {
            scene: "hexapod.scene".to_string(),
            samples: vec!["dusty-floor.opus".to_string(), "honk.wav".to_string()],
            font: "PlayfairDisplay-VariableFont_wght.ttf".to_string(),
            font_pixel_size: 32,
            script: "dialogues.txt".to_string(),
            validate_script: true,
            layout: LayoutMetrics::default(),
            palette: Palette::default(),
            gating: GatingRules::default(),
        }
    }
}

impl Config for PlayModeConfig {}

/// Pixel metrics shared by drawing and pointer hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Left margin in pixels
    pub margin_left: f32,
    /// Right margin in pixels
    pub margin_right: f32,
    /// Baseline of the first body line, from the top of the viewport
    pub start_y: f32,
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Extra space between the body and the first option
    pub option_gap: f32,
    /// Horizontal indent of option labels
    pub option_indent: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            margin_left: 64.0,
            margin_right: 64.0,
            start_y: 100.0,
            line_height: 42.0,
            option_gap: 30.0,
            option_indent: 28.0,
        }
    }
}

impl LayoutMetrics {
    /// Wrap width for body text in a viewport of the given pixel width
    pub fn body_width(&self, viewport_width: u32) -> f32 {
        viewport_width as f32 - self.margin_left - self.margin_right
    }

    /// Wrap width for option labels in a viewport of the given pixel width
    pub fn option_width(&self, viewport_width: u32) -> f32 {
        self.body_width(viewport_width) - self.option_indent
    }
}

/// Colours used by the play mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Framebuffer clear colour (RGBA)
    pub clear: [f32; 4],
    /// Body text colour
    pub body: [f32; 3],
    /// Colour of the selected option
    pub selected: [f32; 3],
    /// Colour of unselected options
    pub option: [f32; 3],
    /// Colour of the message shown when the current node is missing
    pub missing: [f32; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            clear: [0.96, 0.87, 0.70, 1.0],
            body: [0.0, 0.0, 0.0],
            selected: [0.8, 0.1, 0.1],
            option: [0.0, 0.0, 0.0],
            missing: [1.0, 0.4, 0.4],
        }
    }
}

impl Palette {
    /// Clear colour as a vector
    pub fn clear_color(&self) -> Vec4 {
        Vec4::from(self.clear)
    }

    /// Colour for an option row
    pub fn option_color(&self, selected: bool) -> Vec3 {
        Vec3::from(if selected { self.selected } else { self.option })
    }
}

/// Rules that gate and terminate navigation
///
/// Reaching `unlock_trigger` sets a persistent flag that makes options
/// prefixed with `lock_marker` selectable. An option targeting
/// `end_sentinel` finishes the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingRules {
    /// Literal label prefix marking a locked option
    pub lock_marker: String,
    /// Reserved option target that ends navigation
    pub end_sentinel: String,
    /// State id whose arrival sets the unlock flag
    pub unlock_trigger: String,
}

impl Default for GatingRules {
    fn default() -> Self {
        Self {
            lock_marker: "[LOCKED]".to_string(),
            end_sentinel: "END".to_string(),
            unlock_trigger: "end".to_string(),
        }
    }
}

impl GatingRules {
    /// Whether a label carries the lock marker
    pub fn is_locked_label(&self, label: &str) -> bool {
        !self.lock_marker.is_empty() && label.starts_with(&self.lock_marker)
    }

    /// Label as shown on screen
    ///
    /// Locked labels are blanked until `unlocked`; afterwards the marker is
    /// stripped.
    pub fn display_label<'a>(&self, label: &'a str, unlocked: bool) -> &'a str {
        match label.strip_prefix(self.lock_marker.as_str()) {
            Some(rest) if !self.lock_marker.is_empty() => {
                if unlocked { rest } else { "" }
            }
            _ => label,
        }
    }
}
