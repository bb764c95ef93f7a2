//! Text line layout and shadow projection.

use crate::color::hex_to_rgba;
use crate::description::{ShadowSettings, TextSettings};
use crate::geometry::shadow_offset;

/// Splits text into lines on `\n`.
///
/// Empty lines are kept as a single space so blank lines still take up a
/// line of vertical space. A trailing `\r` on each line is dropped.
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| if line.is_empty() { " " } else { line })
        .collect()
}

/// Position and style of every text line at one output size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<'a> {
    pub lines: Vec<&'a str>,
    pub font_size: f32,
    pub line_height: f32,
    /// Baseline of the first line. Lines are anchored at their middle.
    pub first_baseline: f32,
    /// Horizontal center every line is anchored on.
    pub center_x: f32,
    pub font_family: String,
    pub weight: &'a str,
    pub color: &'a str,
}

impl<'a> TextLayout<'a> {
    /// Lays out `text` in a `size` square scaled by `scale`.
    pub fn new(text: &'a TextSettings, font_family: String, size: f32, scale: f32) -> Self {
        let lines = split_lines(&text.content);
        let font_size = text.size_px * scale;
        let line_height = text.line_height_multiplier * font_size;
        let center = size / 2.0;
        let first_baseline = center - (lines.len() as f32 - 1.0) * line_height / 2.0;
        Self {
            lines,
            font_size,
            line_height,
            first_baseline,
            center_x: center,
            font_family,
            weight: &text.weight,
            color: &text.color,
        }
    }

    /// Iterates over `(line, baseline_y)` pairs, top to bottom.
    pub fn baselines(&self) -> impl Iterator<Item = (&'a str, f32)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (*line, self.first_baseline + index as f32 * self.line_height))
    }
}

/// Text shadow resolved for one output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLayout<'a> {
    pub dx: f32,
    pub dy: f32,
    /// Gaussian standard deviation; half the scaled blur radius.
    pub blur_sigma: f32,
    /// Hex color as written in the description.
    pub color: &'a str,
    pub alpha: f32,
}

impl<'a> ShadowLayout<'a> {
    /// Resolves the shadow, or returns `None` if it is disabled.
    pub fn new(shadow: &'a ShadowSettings, size: f32, scale: f32) -> Option<Self> {
        if !shadow.enabled {
            return None;
        }
        let (dx, dy) = shadow_offset(size, shadow.angle_degrees);
        Some(Self {
            dx,
            dy,
            blur_sigma: shadow.blur_radius.max(0.0) * scale / 2.0,
            color: &shadow.color,
            alpha: shadow.alpha,
        })
    }

    /// Shadow color with its opacity applied, as a CSS color string.
    pub fn css_color(&self) -> String {
        hex_to_rgba(self.color, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_preserved() {
        assert_eq!(split_lines("A\n\nB"), vec!["A", " ", "B"]);
        assert_eq!(split_lines(""), vec![" "]);
        assert_eq!(split_lines("A\r\nB\n"), vec!["A", "B", " "]);
    }

    #[test]
    fn lines_are_centered_vertically() {
        let text = TextSettings {
            content: "A\n\nB".into(),
            size_px: 100.0,
            line_height_multiplier: 1.5,
            ..TextSettings::default()
        };
        let layout = TextLayout::new(&text, "serif".into(), 512.0, 1.0);
        let ys: Vec<f32> = layout.baselines().map(|(_, y)| y).collect();
        assert_eq!(ys, vec![106.0, 256.0, 406.0]);
        assert_eq!(layout.center_x, 256.0);
    }

    #[test]
    fn single_line_sits_on_the_center() {
        let text = TextSettings::default();
        let layout = TextLayout::new(&text, "serif".into(), 1024.0, 2.0);
        assert_eq!(layout.font_size, 440.0);
        assert_eq!(layout.baselines().collect::<Vec<_>>(), vec![("IA", 512.0)]);
    }

    #[test]
    fn disabled_shadow_resolves_to_none() {
        assert!(ShadowLayout::new(&ShadowSettings::default(), 512.0, 1.0).is_none());
    }

    #[test]
    fn shadow_blur_scales_with_output() {
        let settings = ShadowSettings {
            enabled: true,
            blur_radius: 18.0,
            ..ShadowSettings::default()
        };
        let small = ShadowLayout::new(&settings, 512.0, 1.0).unwrap();
        let large = ShadowLayout::new(&settings, 1024.0, 2.0).unwrap();
        assert_eq!(small.blur_sigma, 9.0);
        assert_eq!(large.blur_sigma, 18.0);
        assert!((large.dx / small.dx - 2.0).abs() < 1e-4);
        assert_eq!(small.css_color(), "rgba(0, 0, 0, 0.5)");
    }
}
