//! Pure geometry shared by the raster and markup backends.
//!
//! Every size-dependent quantity of an icon is derived here, once, so the two
//! backends cannot drift apart.

use std::f32::consts::SQRT_2;

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics: if `min > max`, `max` wins.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Converts an angle in degrees to a unit direction vector.
///
/// 0° points right and 90° points down, matching screen coordinates.
pub fn angle_to_unit_vector(degrees: f32) -> (f32, f32) {
    let radians = degrees.to_radians();
    (radians.cos(), radians.sin())
}

/// Ratio between an output edge length and the description's base canvas.
///
/// A non-positive canvas size is treated as the output size itself.
pub fn scale_factor(output_size: f32, canvas_size: f32) -> f32 {
    if canvas_size > 0.0 {
        output_size / canvas_size
    } else {
        1.0
    }
}

/// Corner radius of the rounded-square clip, in output pixels.
///
/// `percent` is a percentage of the full edge, so 50 turns the square into
/// a circle. The result is clamped to `[0, size / 2]` even if the caller
/// skipped the edit-time clamp.
pub fn clip_radius(size: f32, percent: f32) -> f32 {
    clamp(size * percent / 100.0, 0.0, size / 2.0)
}

/// Distance of the text shadow from the glyphs, in output pixels.
pub fn shadow_distance(size: f32) -> f32 {
    (size * 0.014).max(2.0)
}

/// Offset of the text shadow for a given angle and output size.
pub fn shadow_offset(size: f32, degrees: f32) -> (f32, f32) {
    let (dx, dy) = angle_to_unit_vector(degrees);
    let distance = shadow_distance(size);
    (dx * distance, dy * distance)
}

/// Axis of a linear gradient across a square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl GradientLine {
    /// Builds the axis for `degrees` across a `size` square.
    ///
    /// The axis runs through the center and spans the full diagonal
    /// (`√2 × half edge` on each side), so the color ramp covers every corner
    /// at any rotation.
    pub fn new(size: f32, degrees: f32) -> Self {
        let (dx, dy) = angle_to_unit_vector(degrees);
        let half = size / 2.0;
        let length = SQRT_2 * half;
        Self {
            x1: half - dx * length,
            y1: half - dy * length,
            x2: half + dx * length,
            y2: half + dy * length,
        }
    }
}

/// Destination rectangle that fills a square target with a source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CoverFit {
    /// Scales the source so it covers `target` entirely, centered, with the
    /// overflow cropped away.
    ///
    /// Returns `None` for empty sources.
    pub fn new(target: f32, source_width: f32, source_height: f32) -> Option<Self> {
        if source_width <= 0.0 || source_height <= 0.0 {
            return None;
        }
        let scale = (target / source_width).max(target / source_height);
        let width = source_width * scale;
        let height = source_height * scale;
        Some(Self {
            scale,
            x: (target - width) / 2.0,
            y: (target - height) / 2.0,
            width,
            height,
        })
    }
}
