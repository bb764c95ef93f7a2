//! Pixel backend on tiny-skia.
//!
//! Every layer is drawn through one anti-aliased mask of the rounded square,
//! so nothing (blurred shadow bleed included) escapes the corners.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use resvg::tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Mask, Paint, Path,
    PathBuilder, Pixmap, PixmapPaint, Point, Rect, SpreadMode, Transform,
};
use resvg::usvg::{Options, Tree};

use super::RenderPlan;
use super::background::BackgroundFill;
use super::layout::ShadowLayout;
use super::markup;
use crate::color::hex_to_srgba;
use crate::error::{RenderError, Result};
use crate::font::FontRegistry;
use crate::geometry::CoverFit;
use crate::image_cache::{ImageCache, premultiply};

/// Control point distance for a quarter circle drawn with one cubic.
const KAPPA: f32 = 0.552_284_8;

/// Blur below this sigma is invisible after quantization and is skipped.
const MIN_BLUR_SIGMA: f32 = 0.01;

/// Above this sigma the exact Gaussian gets slow; a box approximation is
/// used instead.
const FAST_BLUR_SIGMA: f32 = 8.0;

/// Draws the plan into a fresh premultiplied pixmap.
pub(crate) fn render(
    plan: &RenderPlan<'_>,
    fonts: &FontRegistry,
    images: &ImageCache,
) -> Result<Pixmap> {
    // Surface and rounded-square clip
    let surface_error = || RenderError::SurfaceCreation { size: plan.size_px };
    let mut pixmap = Pixmap::new(plan.size_px, plan.size_px).ok_or_else(surface_error)?;
    let mask = clip_mask(plan).ok_or_else(surface_error)?;

    // Background
    draw_background(&mut pixmap, plan, &mask, images)?;

    let Some(text) = text_layer(plan, fonts) else {
        return Ok(pixmap);
    };

    // Shadow goes under the glyphs, offset and clipped like everything else
    if let Some(shadow) = &plan.shadow {
        if let Some(layer) = shadow_layer(&text, shadow) {
            pixmap.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                },
                Transform::from_translate(shadow.dx, shadow.dy),
                Some(&mask),
            );
        }
    }
    // Glyphs
    pixmap.draw_pixmap(
        0,
        0,
        text.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        Some(&mask),
    );
    Ok(pixmap)
}

// ============================================================================
// Clip
// ============================================================================

fn rounded_square(size: f32, radius: f32) -> Option<Path> {
    if radius <= 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, size, size)?));
    }
    let r = radius;
    let c = r * KAPPA;
    let far = size - r;

    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(far, 0.0);
    pb.cubic_to(far + c, 0.0, size, r - c, size, r);
    pb.line_to(size, far);
    pb.cubic_to(size, far + c, far + c, size, far, size);
    pb.line_to(r, size);
    pb.cubic_to(r - c, size, 0.0, far + c, 0.0, far);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - c, r - c, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

fn clip_mask(plan: &RenderPlan<'_>) -> Option<Mask> {
    let path = rounded_square(plan.size, plan.clip_radius)?;
    let mut mask = Mask::new(plan.size_px, plan.size_px)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

// ============================================================================
// Background
// ============================================================================

fn draw_background(
    pixmap: &mut Pixmap,
    plan: &RenderPlan<'_>,
    mask: &Mask,
    images: &ImageCache,
) -> Result<()> {
    let Some(rect) = Rect::from_xywh(0.0, 0.0, plan.size, plan.size) else {
        return Ok(());
    };

    match plan.background {
        BackgroundFill::Solid { color } => {
            let mut paint = Paint::default();
            paint.set_color(parse_color(color, 1.0));
            pixmap.fill_rect(rect, &paint, Transform::identity(), Some(mask));
        }
        BackgroundFill::Gradient { line, from, to } => {
            let from = parse_color(from, 1.0);
            let to = parse_color(to, 1.0);
            let mut paint = Paint::default();
            match LinearGradient::new(
                Point::from_xy(line.x1, line.y1),
                Point::from_xy(line.x2, line.y2),
                vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
                SpreadMode::Pad,
                Transform::identity(),
            ) {
                Some(shader) => paint.shader = shader,
                None => paint.set_color(from),
            }
            pixmap.fill_rect(rect, &paint, Transform::identity(), Some(mask));
        }
        BackgroundFill::Image { source } => {
            // Blocks on the first decode of this source
            let image = images.get(source)?;
            let Some(fit) =
                CoverFit::new(plan.size, image.width() as f32, image.height() as f32)
            else {
                return Ok(());
            };
            // Scaled to cover, centered, cropped by the mask
            pixmap.draw_pixmap(
                0,
                0,
                image.pixmap().as_ref(),
                &PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..PixmapPaint::default()
                },
                Transform::from_row(fit.scale, 0.0, 0.0, fit.scale, fit.x, fit.y),
                Some(mask),
            );
        }
    }
    Ok(())
}

fn parse_color(hex: &str, alpha: f32) -> Color {
    match hex_to_srgba(hex, alpha) {
        Some(c) => Color::from_rgba8(c.red, c.green, c.blue, c.alpha),
        None => {
            log::warn!("unparseable color {hex:?}, drawing black");
            Color::from_rgba8(0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
        }
    }
}

// ============================================================================
// Text and shadow
// ============================================================================

/// Shapes and rasterizes the text lines onto a transparent layer.
///
/// Returns `None` when nothing could be drawn.
fn text_layer(plan: &RenderPlan<'_>, fonts: &FontRegistry) -> Option<Pixmap> {
    let document = markup::text_layer(plan);
    let options = Options {
        fontdb: fonts.database(),
        ..Options::default()
    };
    // Shape against the registry's fonts
    let tree = match Tree::from_str(&document, &options) {
        Ok(tree) => tree,
        Err(err) => {
            log::warn!("text layer could not be parsed: {err}");
            return None;
        }
    };
    let mut layer = Pixmap::new(plan.size_px, plan.size_px)?;
    resvg::render(&tree, Transform::identity(), &mut layer.as_mut());

    // An empty layer for visible text means no face matched the font stack
    let has_ink = layer.pixels().iter().any(|px| px.alpha() > 0);
    if !has_ink {
        if plan.text.lines.iter().any(|line| !line.trim().is_empty()) {
            log::warn!(
                "no glyphs drawn for font stack {:?}; is a matching font installed?",
                plan.text.font_family
            );
        }
        return None;
    }
    Some(layer)
}

/// Builds the blurred, colorized silhouette of `text`, not yet offset.
fn shadow_layer(text: &Pixmap, shadow: &ShadowLayout<'_>) -> Option<Pixmap> {
    let (width, height) = (text.width(), text.height());
    let alpha: Vec<u8> = text.pixels().iter().map(|px| px.alpha()).collect();
    let mut silhouette = GrayImage::from_raw(width, height, alpha)?;

    // Blur the alpha coverage; box passes once the exact kernel gets wide
    if shadow.blur_sigma > FAST_BLUR_SIGMA {
        silhouette = image::imageops::fast_blur(&silhouette, shadow.blur_sigma);
    } else if shadow.blur_sigma >= MIN_BLUR_SIGMA {
        silhouette = image::imageops::blur(&silhouette, shadow.blur_sigma);
    }

    // Tint the coverage with the shadow color, premultiplied
    let color = parse_color(shadow.color, shadow.alpha).to_color_u8();
    let mut data = Vec::with_capacity(silhouette.len() * 4);
    for Luma([coverage]) in silhouette.pixels() {
        let a = premultiply(color.alpha(), *coverage);
        data.extend_from_slice(&[
            premultiply(color.red(), a),
            premultiply(color.green(), a),
            premultiply(color.blue(), a),
            a,
        ]);
    }
    Pixmap::from_vec(data, IntSize::from_wh(width, height)?)
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts a premultiplied pixmap to a straight-alpha RGBA image.
pub(crate) fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        *dst = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
    }
    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    Rgba([channel(r), channel(g), channel(b), a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::PATTERN_PRESETS;

    fn block_text(size: u32) -> Pixmap {
        filled_text(size, Rect::from_xywh(8.0, 8.0, 4.0, 4.0).unwrap())
    }

    fn filled_text(size: u32, rect: Rect) -> Pixmap {
        let mut text = Pixmap::new(size, size).unwrap();
        let mut paint = Paint::default();
        paint.set_color(Color::WHITE);
        text.fill_rect(rect, &paint, Transform::identity(), None);
        text
    }

    fn shadow(sigma: f32) -> ShadowLayout<'static> {
        ShadowLayout {
            dx: 3.0,
            dy: 0.0,
            blur_sigma: sigma,
            color: "#ff0000",
            alpha: 0.5,
        }
    }

    #[test]
    fn sharp_shadow_keeps_the_glyph_outline() {
        let layer = shadow_layer(&block_text(32), &shadow(0.0)).unwrap();
        let inside = layer.pixel(9, 9).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.alpha()), (128, 0, 128));
        assert_eq!(layer.pixel(4, 9).unwrap().alpha(), 0);
    }

    #[test]
    fn blurred_shadow_bleeds_outward() {
        let layer = shadow_layer(&block_text(32), &shadow(2.0)).unwrap();
        assert!(layer.pixel(6, 9).unwrap().alpha() > 0);
        assert!(layer.pixel(9, 9).unwrap().alpha() < 128);
    }

    #[test]
    fn wide_blur_takes_the_fast_path_and_still_bleeds() {
        let text = filled_text(64, Rect::from_xywh(0.0, 0.0, 32.0, 64.0).unwrap());
        let layer = shadow_layer(&text, &shadow(12.0)).unwrap();
        assert!(layer.pixel(10, 32).unwrap().alpha() > 50);
        let bleed = layer.pixel(40, 32).unwrap().alpha();
        assert!(bleed > 0 && bleed < 100, "bleed alpha {bleed}");
    }

    #[test]
    fn text_without_fonts_yields_no_layer() {
        let desc = crate::description::IconDescription::new();
        let plan = RenderPlan::new(&desc, 64);
        assert!(text_layer(&plan, &FontRegistry::new()).is_none());
    }

    #[test]
    fn square_corners_without_radius() {
        let path = rounded_square(10.0, 0.0).unwrap();
        let bounds = path.bounds();
        assert_eq!((bounds.width(), bounds.height()), (10.0, 10.0));
    }

    #[test]
    fn rounded_square_stays_in_bounds() {
        let path = rounded_square(100.0, 50.0).unwrap();
        let bounds = path.bounds();
        assert_eq!((bounds.left(), bounds.top()), (0.0, 0.0));
        assert_eq!((bounds.right(), bounds.bottom()), (100.0, 100.0));
    }

    #[test]
    fn unparseable_color_falls_back_to_black() {
        assert_eq!(parse_color("tomato", 1.0), Color::BLACK);
        assert_eq!(
            parse_color("#fff", 1.0).to_color_u8(),
            Color::WHITE.to_color_u8()
        );
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        assert_eq!(unpremultiply(128, 0, 64, 128), Rgba([255, 0, 128, 128]));
        assert_eq!(unpremultiply(10, 10, 10, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn pattern_background_covers_the_square() {
        let mut desc = crate::description::IconDescription::new().with_text("");
        desc.border_radius = 0.0;
        desc.apply_pattern_preset(PATTERN_PRESETS[0].id);
        let plan = RenderPlan::new(&desc, 32);
        let pixmap = render(&plan, &FontRegistry::new(), &ImageCache::new()).unwrap();
        assert!(pixmap.pixels().iter().all(|px| px.alpha() > 250));
    }
}
