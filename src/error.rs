//! Error types for rendering and export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Failures surfaced by the renderers and the export pipeline.
///
/// Every variant is terminal for the call that produced it. Lenient
/// fallbacks (unparseable colors, an empty image source) are not errors and
/// never reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The background image could not be fetched or decoded.
    #[error("image load failed for {source_hint}: {reason}")]
    ImageLoad { source_hint: String, reason: String },

    /// The supplied bytes are not a font the registry can install.
    #[error("font install failed: {reason}")]
    FontInstall { reason: String },

    /// A drawing surface of the requested size could not be allocated.
    #[error("cannot create a {size}x{size} drawing surface")]
    SurfaceCreation { size: u32 },

    /// The compressed image encoder failed or produced nothing.
    #[error("{format} encoding failed: {reason}")]
    Encode { format: &'static str, reason: String },
}

impl RenderError {
    /// Builds an [`RenderError::ImageLoad`] with a shortened source.
    ///
    /// Data URLs can be megabytes long, so only their head is kept.
    pub(crate) fn image_load(source: &str, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            source_hint: source_hint(source),
            reason: reason.into(),
        }
    }
}

fn source_hint(source: &str) -> String {
    const MAX: usize = 48;
    match source.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &source[..cut]),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_sources_are_shortened() {
        let long = format!("data:image/png;base64,{}", "A".repeat(500));
        let err = RenderError::image_load(&long, "bad payload");
        let RenderError::ImageLoad { source_hint, .. } = &err else {
            panic!("expected ImageLoad");
        };
        assert!(source_hint.ends_with("..."));
        assert_eq!(source_hint.chars().count(), 51);
        assert!(err.to_string().contains("bad payload"));
    }

    #[test]
    fn short_sources_are_kept() {
        let err = RenderError::image_load("bg.png", "missing");
        assert_eq!(err.to_string(), "image load failed for bg.png: missing");
    }
}
