//! Background image decoding and the per-source decode cache.
//!
//! Decoding goes through the [`ImageLoader`] trait so hosts can supply their
//! own fetch logic. [`ImageCache`] wraps a loader and guarantees each
//! distinct source string is decoded at most once for the cache's lifetime,
//! even when several renders ask for it at the same moment.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::Mutex;
use resvg::tiny_skia::{IntSize, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{RenderError, Result};

/// Short edge, in pixels, that vector sources are rasterized to at decode
/// time. Sources larger than this keep their intrinsic size.
pub const VECTOR_MIN_EDGE: f32 = 1024.0;

// ============================================================================
// DecodedImage
// ============================================================================

/// A decoded background image in premultiplied RGBA.
#[derive(Clone)]
pub struct DecodedImage {
    pixmap: Pixmap,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl DecodedImage {
    /// Decodes raster (PNG, JPEG, WebP, ...) or SVG bytes.
    ///
    /// `mime` is a hint; without it the format is sniffed from the data.
    pub fn decode(data: &[u8], mime: Option<&str>) -> std::result::Result<Self, String> {
        if is_svg(data, mime) {
            return Self::decode_svg(data);
        }

        // Raster formats go through `image`, sniffed from the bytes
        let decoded = image::load_from_memory(data).map_err(|e| e.to_string())?;
        Self::from_rgba(decoded.to_rgba8()).ok_or_else(|| "image has no pixels".to_string())
    }

    /// Wraps straight-alpha RGBA pixels.
    pub fn from_rgba(rgba: image::RgbaImage) -> Option<Self> {
        let (width, height) = rgba.dimensions();
        let size = IntSize::from_wh(width, height)?;
        let mut data = rgba.into_raw();
        // tiny-skia wants premultiplied alpha
        for px in data.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = premultiply(px[0], a);
            px[1] = premultiply(px[1], a);
            px[2] = premultiply(px[2], a);
        }
        Pixmap::from_vec(data, size).map(|pixmap| Self { pixmap })
    }

    fn decode_svg(data: &[u8]) -> std::result::Result<Self, String> {
        // Parse the SVG
        let tree = Tree::from_data(data, &Options::default()).map_err(|e| e.to_string())?;

        // Upscale so the short edge is at least VECTOR_MIN_EDGE
        let size = tree.size();
        let short_edge = size.width().min(size.height());
        let scale = (VECTOR_MIN_EDGE / short_edge).max(1.0);
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;

        // Rasterize once; later draws sample this pixmap
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| format!("cannot rasterize svg at {width}x{height}"))?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the premultiplied pixels.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

fn is_svg(data: &[u8], mime: Option<&str>) -> bool {
    if let Some(mime) = mime {
        return mime.contains("svg");
    }
    let head = &data[..data.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

pub(crate) fn premultiply(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

// ============================================================================
// Loaders
// ============================================================================

/// Fetches and decodes an image source.
///
/// Implementations are called at most once per source by [`ImageCache`].
pub trait ImageLoader: Send + Sync {
    fn load(&self, source: &str) -> Result<DecodedImage>;
}

/// Loads `data:` URLs and filesystem paths, plus `http(s)` URLs when the
/// `http` feature is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageLoader;

impl ImageLoader for DefaultImageLoader {
    fn load(&self, source: &str) -> Result<DecodedImage> {
        let (bytes, mime) = fetch(source)?;
        DecodedImage::decode(&bytes, mime.as_deref())
            .map_err(|reason| RenderError::image_load(source, reason))
    }
}

fn fetch(source: &str) -> Result<(Vec<u8>, Option<String>)> {
    if source.starts_with("data:") {
        return parse_data_url(source)
            .map(|(mime, data)| (data, Some(mime)))
            .ok_or_else(|| RenderError::image_load(source, "malformed data url"));
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return fetch_remote(source);
    }

    // Anything else is a local path
    let bytes = std::fs::read(source).map_err(|e| RenderError::image_load(source, e.to_string()))?;
    Ok((bytes, None))
}

#[cfg(feature = "http")]
fn fetch_remote(url: &str) -> Result<(Vec<u8>, Option<String>)> {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build();
    let agent: ureq::Agent = config.into();

    let mut response = agent
        .get(url)
        .call()
        .map_err(|e| RenderError::image_load(url, e.to_string()))?;
    let mime = response
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| RenderError::image_load(url, e.to_string()))?;
    Ok((bytes, mime))
}

#[cfg(not(feature = "http"))]
fn fetch_remote(url: &str) -> Result<(Vec<u8>, Option<String>)> {
    Err(RenderError::image_load(
        url,
        "remote sources need the `http` feature or a custom loader",
    ))
}

/// Splits a `data:` URL into its MIME type and decoded payload.
fn parse_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let (header, payload) = url.strip_prefix("data:")?.split_once(',')?;

    // MIME type defaults to text/plain when the header omits it
    let mime = header
        .split(';')
        .next()
        .filter(|v| !v.is_empty())
        .unwrap_or("text/plain")
        .to_string();

    // Payload is base64 or percent-encoded
    let data = if header.split(';').any(|part| part == "base64") {
        STANDARD.decode(payload.trim()).ok()?
    } else {
        percent_decode(payload)
    };
    Some((mime, data))
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() {
                out.push((hex_value(hi) << 4) | hex_value(lo));
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

// ============================================================================
// ImageCache
// ============================================================================

type Slot = Arc<OnceLock<Result<Arc<DecodedImage>>>>;

/// Decode cache keyed by source string.
///
/// Entries are never evicted; drop the cache to release them. Concurrent
/// requests for one source share a single pending entry, so the loader runs
/// once and every caller receives the same [`Arc`]. Failures are cached too.
pub struct ImageCache {
    loader: Box<dyn ImageLoader>,
    entries: Mutex<HashMap<String, Slot>>,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    /// Creates a cache backed by [`DefaultImageLoader`].
    pub fn new() -> Self {
        Self::with_loader(DefaultImageLoader)
    }

    /// Creates a cache backed by a custom loader.
    pub fn with_loader(loader: impl ImageLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the decoded image for `source`, decoding it on first use.
    pub fn get(&self, source: &str) -> Result<Arc<DecodedImage>> {
        // Find or create the slot; the map lock is not held while decoding
        let slot = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(source.to_string()).or_default())
        };

        // First caller decodes, everyone else blocks on the same slot
        slot.get_or_init(|| {
            log::debug!("decoding image source ({} bytes of url)", source.len());
            let decoded = self.loader.load(source).map(Arc::new);
            if let Err(err) = &decoded {
                log::warn!("{err}");
            }
            decoded
        })
        .clone()
    }

    /// Returns true if `source` has a resolved or pending entry.
    pub fn contains(&self, source: &str) -> bool {
        self.entries.lock().contains_key(source)
    }

    /// Number of distinct sources seen.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
