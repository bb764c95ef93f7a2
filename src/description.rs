//! The declarative icon description consumed by both renderers.
//!
//! An [`IconDescription`] fully determines the rendered icon, independent of
//! output resolution. It serializes to camelCase JSON so an editor front end
//! can persist and exchange it:
//!
//! ```json
//! {
//!   "canvasSize": 512,
//!   "borderRadius": 18,
//!   "background": {
//!     "mode": "gradient",
//!     "solidColor": "#0b7285",
//!     "gradient": { "presetId": "sunset", "from": "#ff9966", "to": "#ff5e62", "angleDegrees": 140 },
//!     "imageSource": ""
//!   },
//!   "text": {
//!     "content": "IA",
//!     "sizePx": 220,
//!     "weight": "700",
//!     "lineHeightMultiplier": 1,
//!     "color": "#ffffff",
//!     "font": { "presetId": "sans", "customFamily": "" }
//!   },
//!   "shadow": { "enabled": false, "color": "#000000", "alpha": 0.5, "angleDegrees": 135, "blurRadius": 18 }
//! }
//! ```
//!
//! Range limits are enforced by the setters (the edit boundary) and by
//! [`IconDescription::normalized`] for values that arrive as JSON. Renderers
//! assume valid ranges.

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, normalize_degrees};
use crate::presets::{
    CANVAS_BASE_SIZE, CUSTOM_FONT_PRESET, GRADIENT_PRESETS, gradient_preset, pattern_preset,
};

/// Allowed corner rounding, in percent of the half edge.
pub const BORDER_RADIUS_RANGE: (f32, f32) = (0.0, 50.0);
/// Allowed text size at the base canvas size.
pub const TEXT_SIZE_RANGE: (f32, f32) = (18.0, 320.0);
/// Allowed line height multiplier.
pub const LINE_HEIGHT_RANGE: (f32, f32) = (0.8, 2.0);
/// Allowed shadow blur at the base canvas size.
pub const SHADOW_BLUR_RANGE: (f32, f32) = (0.0, 64.0);

// ============================================================================
// Background
// ============================================================================

/// Which background record is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMode {
    Solid,
    #[default]
    Gradient,
    Image,
}

/// Two-stop linear gradient settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct GradientSettings {
    /// Preset the colors were last copied from. Informational only.
    pub preset_id: String,
    pub from: String,
    pub to: String,
    /// Direction of the gradient axis; 0° runs left to right.
    pub angle_degrees: f32,
}

impl Default for GradientSettings {
    fn default() -> Self {
        let preset = &GRADIENT_PRESETS[0];
        Self {
            preset_id: preset.id.to_string(),
            from: preset.from.to_string(),
            to: preset.to.to_string(),
            angle_degrees: preset.angle,
        }
    }
}

/// Background settings.
///
/// All three records are kept regardless of [`mode`](Self::mode), so
/// switching modes never loses earlier choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Background {
    pub mode: BackgroundMode,
    pub solid_color: String,
    pub gradient: GradientSettings,
    /// Data URL, file path or remote URL of the background image.
    pub image_source: String,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Gradient,
            solid_color: "#0b7285".to_string(),
            gradient: GradientSettings::default(),
            image_source: String::new(),
        }
    }
}

// ============================================================================
// Text
// ============================================================================

/// Font choice: a preset id, or [`CUSTOM_FONT_PRESET`] plus a registered
/// custom family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct FontSelector {
    pub preset_id: String,
    pub custom_family: String,
}

impl Default for FontSelector {
    fn default() -> Self {
        Self {
            preset_id: "sans".to_string(),
            custom_family: String::new(),
        }
    }
}

impl FontSelector {
    /// Returns true if this selector points at a custom family.
    pub fn is_custom(&self) -> bool {
        self.preset_id == CUSTOM_FONT_PRESET
    }
}

/// Text content and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    /// Text to draw; `\n` separates lines.
    pub content: String,
    /// Font size at the base canvas size.
    pub size_px: f32,
    /// CSS font weight, e.g. `"700"` or `"bold"`.
    pub weight: String,
    pub line_height_multiplier: f32,
    pub color: String,
    pub font: FontSelector,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            content: "IA".to_string(),
            size_px: 220.0,
            weight: "700".to_string(),
            line_height_multiplier: 1.0,
            color: "#ffffff".to_string(),
            font: FontSelector::default(),
        }
    }
}

// ============================================================================
// Shadow
// ============================================================================

/// Text shadow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ShadowSettings {
    pub enabled: bool,
    pub color: String,
    /// Shadow opacity in `[0, 1]`.
    pub alpha: f32,
    /// Direction the shadow falls in, `[0, 360)`; 0° is to the right.
    pub angle_degrees: f32,
    /// Blur at the base canvas size, with canvas `shadowBlur` semantics.
    pub blur_radius: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#000000".to_string(),
            alpha: 0.5,
            angle_degrees: 135.0,
            blur_radius: 18.0,
        }
    }
}

// ============================================================================
// IconDescription
// ============================================================================

/// Everything needed to draw one icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct IconDescription {
    /// Reference edge length that absolute sizes are expressed against.
    pub canvas_size: f32,
    /// Corner rounding in percent of the edge, `[0, 50]`; 50 is a circle.
    pub border_radius: f32,
    pub background: Background,
    pub text: TextSettings,
    pub shadow: ShadowSettings,
}

impl Default for IconDescription {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_BASE_SIZE,
            border_radius: 18.0,
            background: Background::default(),
            text: TextSettings::default(),
            shadow: ShadowSettings::default(),
        }
    }
}

impl IconDescription {
    /// Creates the default description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text content.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text.content = content.into();
        self
    }

    /// Sets the corner rounding, clamped to `[0, 50]`.
    pub fn set_border_radius(&mut self, percent: f32) {
        self.border_radius = clamp(percent, BORDER_RADIUS_RANGE.0, BORDER_RADIUS_RANGE.1);
    }

    /// Switches the active background record without touching the others.
    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.background.mode = mode;
    }

    /// Sets a solid background color and activates it.
    pub fn set_solid_color(&mut self, color: impl Into<String>) {
        self.background.solid_color = color.into();
        self.background.mode = BackgroundMode::Solid;
    }

    /// Sets the gradient direction, normalized into `[0, 360)`.
    pub fn set_gradient_angle(&mut self, degrees: f32) {
        self.background.gradient.angle_degrees = normalize_degrees(degrees);
    }

    /// Copies a gradient preset into the gradient record and activates it.
    ///
    /// Returns false, leaving the description unchanged, for unknown ids.
    pub fn apply_gradient_preset(&mut self, id: &str) -> bool {
        let Some(preset) = gradient_preset(id) else {
            return false;
        };
        self.background.gradient = GradientSettings {
            preset_id: preset.id.to_string(),
            from: preset.from.to_string(),
            to: preset.to.to_string(),
            angle_degrees: preset.angle,
        };
        self.background.mode = BackgroundMode::Gradient;
        true
    }

    /// Sets the background image source and activates it.
    pub fn set_image_source(&mut self, source: impl Into<String>) {
        self.background.image_source = source.into();
        self.background.mode = BackgroundMode::Image;
    }

    /// Uses a pattern preset as the background image.
    ///
    /// Returns false, leaving the description unchanged, for unknown ids.
    pub fn apply_pattern_preset(&mut self, id: &str) -> bool {
        let Some(preset) = pattern_preset(id) else {
            return false;
        };
        self.set_image_source(preset.source());
        true
    }

    /// Sets the text size at the base canvas, clamped to `[18, 320]`.
    pub fn set_text_size(&mut self, size_px: f32) {
        self.text.size_px = clamp(size_px, TEXT_SIZE_RANGE.0, TEXT_SIZE_RANGE.1);
    }

    /// Sets the line height multiplier, clamped to `[0.8, 2]`.
    pub fn set_line_height(&mut self, multiplier: f32) {
        self.text.line_height_multiplier =
            clamp(multiplier, LINE_HEIGHT_RANGE.0, LINE_HEIGHT_RANGE.1);
    }

    /// Selects a font preset. The custom family id is kept for later.
    pub fn set_font_preset(&mut self, id: impl Into<String>) {
        self.text.font.preset_id = id.into();
    }

    /// Selects a registered custom font family.
    pub fn set_custom_font(&mut self, family: impl Into<String>) {
        self.text.font = FontSelector {
            preset_id: CUSTOM_FONT_PRESET.to_string(),
            custom_family: family.into(),
        };
    }

    /// Sets the shadow opacity, clamped to `[0, 1]`.
    pub fn set_shadow_alpha(&mut self, alpha: f32) {
        self.shadow.alpha = clamp(alpha, 0.0, 1.0);
    }

    /// Sets the shadow direction, normalized into `[0, 360)`.
    pub fn set_shadow_angle(&mut self, degrees: f32) {
        self.shadow.angle_degrees = normalize_degrees(degrees);
    }

    /// Sets the shadow blur at the base canvas, clamped to `[0, 64]`.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        self.shadow.blur_radius = clamp(blur, SHADOW_BLUR_RANGE.0, SHADOW_BLUR_RANGE.1);
    }

    /// Returns a copy with every ranged field pulled into its valid range.
    ///
    /// Use this on descriptions that did not pass through the setters, such
    /// as ones read from JSON. A non-positive canvas size is reset to the
    /// default base size.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if out.canvas_size.is_nan() || out.canvas_size <= 0.0 {
            out.canvas_size = CANVAS_BASE_SIZE;
        }
        out.set_border_radius(self.border_radius);
        out.set_gradient_angle(self.background.gradient.angle_degrees);
        out.set_text_size(self.text.size_px);
        out.set_line_height(self.text.line_height_multiplier);
        out.set_shadow_alpha(self.shadow.alpha);
        out.set_shadow_angle(self.shadow.angle_degrees);
        out.set_shadow_blur(self.shadow.blur_radius);
        out
    }

    /// Serializes the description to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the description to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a description from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON schema of the description format.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(IconDescription)
    }
}

// ============================================================================
// Tests
// ============================================================================
