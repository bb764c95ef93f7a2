//! Size-resolved drawing instructions shared by both backends.

use super::background::BackgroundFill;
use super::layout::{ShadowLayout, TextLayout};
use crate::description::IconDescription;
use crate::font::font_stack;
use crate::geometry::{clip_radius, scale_factor};

/// Everything a backend needs to draw one icon at one output size.
///
/// Built once per render from the description; neither backend recomputes
/// geometry on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan<'a> {
    pub size_px: u32,
    pub size: f32,
    /// Output size divided by the description's canvas size.
    pub scale: f32,
    pub clip_radius: f32,
    pub background: BackgroundFill<'a>,
    pub text: TextLayout<'a>,
    pub shadow: Option<ShadowLayout<'a>>,
}

impl<'a> RenderPlan<'a> {
    pub fn new(description: &'a IconDescription, size_px: u32) -> Self {
        let size = size_px as f32;
        let scale = scale_factor(size, description.canvas_size);
        Self {
            size_px,
            size,
            scale,
            clip_radius: clip_radius(size, description.border_radius),
            background: BackgroundFill::new(&description.background, size),
            text: TextLayout::new(&description.text, font_stack(description), size, scale),
            shadow: ShadowLayout::new(&description.shadow, size, scale),
        }
    }
}
