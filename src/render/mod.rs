//! Rendering of icon descriptions.
//!
//! Two backends draw the same [`RenderPlan`]: a pixel backend producing
//! RGBA images and a markup backend producing SVG documents. Both are
//! deterministic, so rendering one description twice at one size yields
//! identical output.

pub mod background;
pub mod layout;
pub(crate) mod markup;
mod plan;
pub(crate) mod raster;

use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::Pixmap;

pub use plan::RenderPlan;

use crate::description::IconDescription;
use crate::error::Result;
use crate::font::{CustomFontRegistration, FontRegistry};
use crate::image_cache::ImageCache;

// ============================================================================
// IconRenderer
// ============================================================================

/// Renders icon descriptions with an owned font registry and decode cache.
///
/// The decode cache lives as long as the renderer (or longer, when shared
/// through [`IconRenderer::with_services`]).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use instaicon_renderer::{FontRegistry, IconDescription, IconRenderer, ImageCache};
///
/// let renderer = IconRenderer::with_services(FontRegistry::new(), Arc::new(ImageCache::new()));
/// let mut desc = IconDescription::new().with_text("");
/// desc.set_solid_color("#336699");
///
/// let image = renderer.render_to_pixel_buffer(&desc, 64).unwrap();
/// assert_eq!(image.dimensions(), (64, 64));
/// assert_eq!(image.get_pixel(32, 32).0, [0x33, 0x66, 0x99, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct IconRenderer {
    fonts: FontRegistry,
    images: Arc<ImageCache>,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl IconRenderer {
    /// Creates a renderer using the system fonts and a fresh decode cache.
    pub fn new() -> Self {
        Self::with_services(FontRegistry::with_system_fonts(), Arc::new(ImageCache::new()))
    }

    /// Creates a renderer from an explicit font registry and decode cache.
    pub fn with_services(fonts: FontRegistry, images: Arc<ImageCache>) -> Self {
        Self { fonts, images }
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    pub fn images(&self) -> &Arc<ImageCache> {
        &self.images
    }

    /// Installs a custom font. See [`FontRegistry::install`].
    pub fn install_font(
        &mut self,
        data: Vec<u8>,
        display_name: &str,
    ) -> Result<CustomFontRegistration> {
        self.fonts.install(data, display_name)
    }

    /// Renders to a premultiplied pixmap of `size x size` pixels.
    ///
    /// Blocks while an image background is decoded for the first time.
    pub fn render_to_pixmap(&self, description: &IconDescription, size: u32) -> Result<Pixmap> {
        log::debug!("raster render at {size}px");
        let plan = RenderPlan::new(description, size);
        raster::render(&plan, &self.fonts, &self.images)
    }

    /// Renders to a straight-alpha RGBA image of `size x size` pixels.
    pub fn render_to_pixel_buffer(
        &self,
        description: &IconDescription,
        size: u32,
    ) -> Result<RgbaImage> {
        let pixmap = self.render_to_pixmap(description, size)?;
        Ok(raster::pixmap_to_rgba_image(&pixmap))
    }

    /// Renders to an SVG document. Never fails and never blocks.
    pub fn render_to_markup(&self, description: &IconDescription, size: u32) -> String {
        render_to_markup(description, size)
    }
}

/// Renders a description to an SVG document of `size x size` user units.
///
/// Image backgrounds are referenced by their source; custom fonts by their
/// family id.
pub fn render_to_markup(description: &IconDescription, size: u32) -> String {
    log::debug!("markup render at {size}px");
    markup::render(&RenderPlan::new(description, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BACKGROUND_FALLBACK;
    use crate::description::BackgroundMode;
    use crate::error::RenderError;
    use crate::image_cache::tests::png_data_url;
    use image::Rgba;

    fn renderer() -> IconRenderer {
        IconRenderer::with_services(FontRegistry::new(), Arc::new(ImageCache::new()))
    }

    fn blank() -> IconDescription {
        let mut desc = IconDescription::new().with_text("");
        desc.border_radius = 0.0;
        desc
    }

    fn gradient(angle: f32) -> IconDescription {
        let mut desc = blank();
        desc.background.mode = BackgroundMode::Gradient;
        desc.background.gradient.from = "#ff0000".into();
        desc.background.gradient.to = "#0000ff".into();
        desc.background.gradient.angle_degrees = angle;
        desc
    }

    fn red_dominant(px: &Rgba<u8>) -> bool {
        px[0] > px[2]
    }

    fn is_glyph(px: &Rgba<u8>) -> bool {
        px[0] > 160 && px[1] > 160 && px[2] > 160
    }

    fn is_shadow(px: &Rgba<u8>) -> bool {
        px[0] > 160 && px[1] < 90 && px[2] < 90
    }

    /// Count and centroid of the pixels matching `pred`.
    fn centroid(img: &RgbaImage, pred: impl Fn(&Rgba<u8>) -> bool) -> (usize, f32, f32) {
        let (mut count, mut sx, mut sy) = (0usize, 0.0f32, 0.0f32);
        for (x, y, px) in img.enumerate_pixels() {
            if pred(px) {
                count += 1;
                sx += x as f32;
                sy += y as f32;
            }
        }
        let n = count.max(1) as f32;
        (count, sx / n, sy / n)
    }

    /// A renderer with one real font installed, or `None` on hosts
    /// without fonts.
    fn font_renderer() -> Option<(IconRenderer, String)> {
        let Some(bytes) = crate::font::tests::system_font_bytes() else {
            eprintln!("no system fonts, skipping");
            return None;
        };
        let mut renderer = renderer();
        let family = renderer.install_font(bytes, "Test").unwrap().family;
        Some((renderer, family))
    }

    /// White text on black, square corners, in the given font.
    fn text_icon(family: &str, content: &str) -> IconDescription {
        let mut desc = IconDescription::new().with_text(content);
        desc.border_radius = 0.0;
        desc.set_solid_color("#000000");
        desc.text.color = "#ffffff".into();
        desc.set_custom_font(family);
        desc
    }

    #[test]
    fn zero_size_fails_surface_creation() {
        let err = renderer().render_to_pixel_buffer(&blank(), 0).unwrap_err();
        assert_eq!(err, RenderError::SurfaceCreation { size: 0 });
    }

    #[test]
    fn rendering_is_idempotent() {
        let renderer = renderer();
        let mut desc = IconDescription::new();
        desc.shadow.enabled = true;
        let a = renderer.render_to_pixel_buffer(&desc, 96).unwrap();
        let b = renderer.render_to_pixel_buffer(&desc, 96).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
        assert_eq!(render_to_markup(&desc, 96), render_to_markup(&desc, 96));
    }

    #[test]
    fn rounded_corners_are_transparent() {
        let mut desc = blank();
        desc.set_solid_color("#ffffff");
        desc.set_border_radius(50.0);
        let img = renderer().render_to_pixel_buffer(&desc, 512).unwrap();

        // 50% is a full circle: anything outside the inscribed circle is empty
        for (x, y) in [(0, 0), (511, 0), (0, 511), (511, 511), (40, 40), (70, 70), (441, 441)] {
            assert_eq!(img.get_pixel(x, y)[3], 0, "corner pixel ({x}, {y})");
        }
        assert_eq!(img.get_pixel(256, 256)[3], 255);
        assert_eq!(img.get_pixel(256, 3)[3], 255);
        assert_eq!(img.get_pixel(3, 256)[3], 255);
    }

    #[test]
    fn default_radius_is_a_share_of_the_full_edge() {
        let mut desc = blank();
        desc.set_solid_color("#ffffff");
        desc.set_border_radius(18.0);
        let img = renderer().render_to_pixel_buffer(&desc, 512).unwrap();
        // corner radius is 92.16px
        assert_eq!(img.get_pixel(20, 20)[3], 0);
        assert_eq!(img.get_pixel(40, 40)[3], 255);
        assert_eq!(img.get_pixel(100, 3)[3], 255);
    }

    #[test]
    fn square_corners_are_opaque() {
        let mut desc = blank();
        desc.set_solid_color("#ffffff");
        let img = renderer().render_to_pixel_buffer(&desc, 32).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(31, 31).0, [255, 255, 255, 255]);
    }

    #[test]
    fn horizontal_gradient_runs_left_to_right() {
        let img = renderer().render_to_pixel_buffer(&gradient(0.0), 64).unwrap();
        assert!(red_dominant(img.get_pixel(2, 32)));
        assert!(!red_dominant(img.get_pixel(61, 32)));
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let img = renderer().render_to_pixel_buffer(&gradient(90.0), 64).unwrap();
        assert!(red_dominant(img.get_pixel(32, 2)));
        assert!(!red_dominant(img.get_pixel(32, 61)));
        let left = img.get_pixel(2, 32);
        let right = img.get_pixel(61, 32);
        assert!((left[0] as i16 - right[0] as i16).abs() <= 1);
    }

    #[test]
    fn image_background_is_cover_fitted() {
        let mut source = RgbaImage::new(2, 1);
        source.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        source.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let mut desc = blank();
        desc.set_image_source(png_data_url(&source));
        let img = renderer().render_to_pixel_buffer(&desc, 64).unwrap();
        assert!(red_dominant(img.get_pixel(16, 32)));
        assert!(!red_dominant(img.get_pixel(48, 32)));
        assert_eq!(img.get_pixel(32, 0)[3], 255);
    }

    #[test]
    fn image_decode_is_cached_across_renders() {
        let renderer = renderer();
        let mut desc = blank();
        desc.set_image_source(png_data_url(&RgbaImage::from_pixel(
            4,
            4,
            Rgba([0, 255, 0, 255]),
        )));
        renderer.render_to_pixel_buffer(&desc, 32).unwrap();
        renderer.render_to_pixel_buffer(&desc, 64).unwrap();
        assert_eq!(renderer.images().len(), 1);
    }

    #[test]
    fn unreadable_image_fails_the_render() {
        let mut desc = blank();
        desc.set_image_source("data:image/png;base64,AAAA");
        let err = renderer().render_to_pixel_buffer(&desc, 32).unwrap_err();
        assert!(matches!(err, RenderError::ImageLoad { .. }));
        // the markup backend cannot detect the failure
        assert!(render_to_markup(&desc, 32).contains("<image "));
    }

    #[test]
    fn empty_image_source_uses_fallback_fill() {
        let mut desc = blank();
        desc.set_background_mode(BackgroundMode::Image);
        let img = renderer().render_to_pixel_buffer(&desc, 16).unwrap();
        let fallback = crate::color::parse_hex(BACKGROUND_FALLBACK).unwrap();
        assert_eq!(
            img.get_pixel(8, 8).0,
            [fallback.red, fallback.green, fallback.blue, 255]
        );
    }

    #[test]
    fn installed_font_draws_centered_text() {
        let Some((renderer, family)) = font_renderer() else {
            return;
        };
        let img = renderer
            .render_to_pixel_buffer(&text_icon(&family, "IA"), 256)
            .unwrap();
        let (count, cx, cy) = centroid(&img, is_glyph);
        assert!(count > 500, "only {count} glyph pixels");
        assert!((cx - 128.0).abs() < 20.0, "centroid x {cx}");
        assert!((cy - 128.0).abs() < 24.0, "centroid y {cy}");
    }

    #[test]
    fn blank_line_keeps_its_height() {
        let Some((renderer, family)) = font_renderer() else {
            return;
        };
        let mut desc = text_icon(&family, "I\n\nI");
        desc.text.size_px = 80.0;
        let img = renderer.render_to_pixel_buffer(&desc, 256).unwrap();

        // lines sit at y = 88, 128 and 168 with a 40px line height
        let row_has_ink = |y: u32| (0..256).any(|x| is_glyph(img.get_pixel(x, y)));
        assert!((118..=138).all(|y| !row_has_ink(y)), "blank line has ink");
        assert!((60..118).any(row_has_ink));
        assert!((139..200).any(row_has_ink));
    }

    #[test]
    fn shadow_falls_on_the_offset_side() {
        let Some((renderer, family)) = font_renderer() else {
            return;
        };
        let shadow_centroid = |angle: f32| {
            let mut desc = text_icon(&family, "IA");
            desc.shadow.enabled = true;
            desc.shadow.color = "#ff0000".into();
            desc.set_shadow_alpha(1.0);
            desc.set_shadow_blur(0.0);
            desc.set_shadow_angle(angle);
            let img = renderer.render_to_pixel_buffer(&desc, 256).unwrap();
            centroid(&img, is_shadow)
        };

        let (right_count, right_x, _) = shadow_centroid(0.0);
        let (left_count, left_x, _) = shadow_centroid(180.0);
        let (down_count, _, down_y) = shadow_centroid(90.0);
        let (up_count, _, up_y) = shadow_centroid(270.0);
        for count in [right_count, left_count, down_count, up_count] {
            assert!(count > 50, "only {count} shadow pixels");
        }
        assert!(right_x > left_x + 2.0, "{right_x} vs {left_x}");
        assert!(down_y > up_y + 2.0, "{down_y} vs {up_y}");
    }

    #[test]
    fn shadow_bleed_stays_inside_the_clip() {
        let Some((renderer, family)) = font_renderer() else {
            return;
        };
        let mut desc = text_icon(&family, "WW");
        desc.set_text_size(320.0);
        desc.set_border_radius(50.0);
        desc.shadow.enabled = true;
        desc.shadow.color = "#ff0000".into();
        desc.set_shadow_alpha(1.0);
        desc.set_shadow_blur(64.0);
        let img = renderer.render_to_pixel_buffer(&desc, 128).unwrap();
        for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127), (10, 10)] {
            assert_eq!(img.get_pixel(x, y)[3], 0, "corner pixel ({x}, {y})");
        }
        assert!(centroid(&img, |px| px[0] > px[1] + 40).0 > 0);
    }

    #[test]
    fn default_presets_draw_with_system_fonts() {
        let renderer = IconRenderer::new();
        if renderer.fonts().database().is_empty() {
            eprintln!("no system fonts, skipping");
            return;
        }
        for preset in ["sans", "serif", "mono", "cursive"] {
            let mut desc = IconDescription::new();
            desc.border_radius = 0.0;
            desc.set_solid_color("#000000");
            desc.text.color = "#ffffff".into();
            desc.set_font_preset(preset);
            let img = renderer.render_to_pixel_buffer(&desc, 256).unwrap();
            let (count, _, _) = centroid(&img, is_glyph);
            assert!(count > 200, "{preset}: only {count} glyph pixels");
        }
    }

    #[test]
    fn installing_garbage_font_fails() {
        let mut renderer = renderer();
        let err = renderer.install_font(vec![0; 16], "zeros").unwrap_err();
        assert!(matches!(err, RenderError::FontInstall { .. }));
    }
}
