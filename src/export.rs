//! Export formats, file naming and encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::description::IconDescription;
use crate::error::{RenderError, Result};
use crate::image_cache::premultiply;
use crate::presets::{APP_NAME, EXPORT_SIZE_PRESETS};
use crate::render::IconRenderer;

/// Bounds for the edge length of exported files.
pub const EXPORT_SIZE_RANGE: (u32, u32) = (128, 4096);

const JPEG_QUALITY: f32 = 0.92;

// ============================================================================
// ExportFormat
// ============================================================================

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Webp,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Png, Self::Jpg, Self::Webp, Self::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Encoder quality in `[0, 1]`. Only JPG is lossy.
    pub fn quality(self) -> f32 {
        match self {
            Self::Jpg => JPEG_QUALITY,
            _ => 1.0,
        }
    }
}

/// Maps a `[0, 1]` quality onto the encoder's `1..=100` scale.
fn encoder_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// File name for an exported icon, e.g. `instaicon-1024.jpg`.
pub fn export_filename(format: ExportFormat, size: u32) -> String {
    format!("{APP_NAME}-{size}.{}", format.extension())
}

// ============================================================================
// ExportSettings
// ============================================================================

/// Format and edge length of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub size: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            size: EXPORT_SIZE_PRESETS[0],
        }
    }
}

impl ExportSettings {
    /// Creates settings with `size` clamped to [`EXPORT_SIZE_RANGE`].
    pub fn new(format: ExportFormat, size: u32) -> Self {
        Self {
            format,
            size: size.clamp(EXPORT_SIZE_RANGE.0, EXPORT_SIZE_RANGE.1),
        }
    }

    /// Returns a copy with the size clamped, for deserialized values.
    pub fn normalized(&self) -> Self {
        Self::new(self.format, self.size)
    }

    pub fn filename(&self) -> String {
        export_filename(self.format, self.size)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// A finished export ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Encodes a rendered image as PNG, JPG or WebP.
///
/// JPG has no alpha channel; translucent pixels are composited over black.
/// Asking for [`ExportFormat::Svg`] is an encode error, since SVG comes from
/// the markup backend instead.
pub fn encode_raster(image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
    let encode_error = |reason: String| RenderError::Encode {
        format: format.extension(),
        reason,
    };
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    let writer = Cursor::new(&mut bytes);

    let result = match format {
        ExportFormat::Png => {
            PngEncoder::new(writer).write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
        ExportFormat::Jpg => {
            let rgb = flatten_over_black(image);
            JpegEncoder::new_with_quality(writer, encoder_quality(format.quality())).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        ExportFormat::Webp => WebPEncoder::new_lossless(writer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ExportFormat::Svg => {
            return Err(encode_error("svg is not a raster format".to_string()));
        }
    };
    result.map_err(|e| encode_error(e.to_string()))?;

    if bytes.is_empty() {
        return Err(encode_error("encoder produced no data".to_string()));
    }
    log::debug!("encoded {width}x{height} {} ({} bytes)", format.extension(), bytes.len());
    Ok(bytes)
}

fn flatten_over_black(image: &RgbaImage) -> Vec<u8> {
    image
        .pixels()
        .flat_map(|px| {
            let [r, g, b, a] = px.0;
            [premultiply(r, a), premultiply(g, a), premultiply(b, a)]
        })
        .collect()
}

impl IconRenderer {
    /// Renders and encodes a description according to `settings`.
    ///
    /// The size is clamped to [`EXPORT_SIZE_RANGE`] first.
    pub fn export(
        &self,
        description: &IconDescription,
        settings: &ExportSettings,
    ) -> Result<ExportedFile> {
        let settings = settings.normalized();
        let bytes = match settings.format {
            ExportFormat::Svg => self.render_to_markup(description, settings.size).into_bytes(),
            format => {
                let image = self.render_to_pixel_buffer(description, settings.size)?;
                encode_raster(&image, format)?
            }
        };
        Ok(ExportedFile {
            filename: settings.filename(),
            mime_type: settings.format.mime_type(),
            bytes,
        })
    }
}
