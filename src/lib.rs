//! instaicon-renderer: square text icons rendered to pixels or SVG
//!
//! An [`IconDescription`] fully specifies one icon: a rounded-square
//! background (solid, gradient or image), centered multi-line text and an
//! optional text shadow. The description is drawn at any output size by two
//! independent backends that agree pixel for pixel: a raster backend
//! producing RGBA images and a markup backend producing SVG documents.
//!
//! # Example
//!
//! ```
//! use instaicon_renderer::{IconDescription, render_to_markup};
//!
//! let mut desc = IconDescription::new().with_text("Hi");
//! desc.apply_gradient_preset("sea");
//! desc.set_border_radius(30.0);
//!
//! let svg = render_to_markup(&desc, 1024);
//! assert!(svg.contains("viewBox='0 0 1024 1024'"));
//! assert!(svg.contains(">Hi</text>"));
//! ```
//!
//! # Exporting
//!
//! [`IconRenderer`] owns the font registry and the image decode cache and
//! turns descriptions into finished files:
//!
//! ```
//! use std::sync::Arc;
//! use instaicon_renderer::{
//!     ExportFormat, ExportSettings, FontRegistry, IconDescription, IconRenderer, ImageCache,
//! };
//!
//! let renderer = IconRenderer::with_services(FontRegistry::new(), Arc::new(ImageCache::new()));
//! let desc = IconDescription::new();
//!
//! let file = renderer
//!     .export(&desc, &ExportSettings::new(ExportFormat::Jpg, 1024))
//!     .unwrap();
//! assert_eq!(file.filename, "instaicon-1024.jpg");
//! assert_eq!(file.mime_type, "image/jpeg");
//! ```
//!
//! # Serializable descriptions
//!
//! Descriptions round-trip through camelCase JSON; missing fields take
//! their defaults:
//!
//! ```
//! use instaicon_renderer::IconDescription;
//!
//! let desc = IconDescription::from_json(r#"{"text":{"content":"OK"}}"#).unwrap();
//! assert_eq!(desc.text.content, "OK");
//! assert_eq!(desc.canvas_size, 512.0);
//! ```

mod color;
mod description;
mod error;
mod export;
mod font;
pub mod geometry;
mod image_cache;
pub mod presets;
pub mod render;

pub use color::{BACKGROUND_FALLBACK, escape_markup, hex_to_rgba, hex_to_srgba, parse_hex};
pub use description::{
    BORDER_RADIUS_RANGE, Background, BackgroundMode, FontSelector, GradientSettings,
    IconDescription, LINE_HEIGHT_RANGE, SHADOW_BLUR_RANGE, ShadowSettings, TEXT_SIZE_RANGE,
    TextSettings,
};
pub use error::{RenderError, Result};
pub use export::{
    EXPORT_SIZE_RANGE, ExportFormat, ExportSettings, ExportedFile, encode_raster, export_filename,
};
pub use font::{CustomFontRegistration, FontRegistry, font_stack, resolve_font_family};
pub use image_cache::{DecodedImage, DefaultImageLoader, ImageCache, ImageLoader, VECTOR_MIN_EDGE};
pub use render::{IconRenderer, RenderPlan, render_to_markup};
