//! Color parsing and markup escaping shared by both backends.

use palette::{Srgb, Srgba, WithAlpha};

use crate::geometry::clamp;

/// Fill used when a solid background has no color or an image background
/// has no source.
pub const BACKGROUND_FALLBACK: &str = "#0f172a";

/// Parses a 3- or 6-digit hex color, with or without the leading `#`.
///
/// Three-digit codes are expanded by doubling each nibble, so `#fa0` and
/// `#ffaa00` parse to the same color.
pub fn parse_hex(hex: &str) -> Option<Srgb<u8>> {
    hex.parse::<Srgb<u8>>().ok()
}

/// Parses a hex color and attaches an opacity in `[0, 1]`.
pub fn hex_to_srgba(hex: &str, alpha: f32) -> Option<Srgba<u8>> {
    let alpha = (clamp(alpha, 0.0, 1.0) * 255.0).round() as u8;
    parse_hex(hex).map(|rgb| rgb.with_alpha(alpha))
}

/// Formats a hex color as a CSS `rgba(r, g, b, a)` string.
///
/// Anything that is not a 3- or 6-digit hex code is returned unchanged, so
/// callers holding a named color or a malformed value keep it as-is.
///
/// ```
/// use instaicon_renderer::hex_to_rgba;
///
/// assert_eq!(hex_to_rgba("#fff", 0.5), "rgba(255, 255, 255, 0.5)");
/// assert_eq!(hex_to_rgba("#12", 0.5), "#12");
/// ```
pub fn hex_to_rgba(hex: &str, alpha: f32) -> String {
    match parse_hex(hex) {
        Some(rgb) => format!("rgba({}, {}, {}, {})", rgb.red, rgb.green, rgb.blue, alpha),
        None => hex.to_string(),
    }
}

/// Escapes `& < > " '` for use inside markup text nodes and attribute values.
pub fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_hex_agree() {
        assert_eq!(hex_to_rgba("#fff", 0.5), hex_to_rgba("#ffffff", 0.5));
        assert_eq!(hex_to_rgba("fff", 0.5), "rgba(255, 255, 255, 0.5)");
    }

    #[test]
    fn nibbles_are_doubled() {
        let rgb = parse_hex("#1a9").unwrap();
        assert_eq!((rgb.red, rgb.green, rgb.blue), (0x11, 0xaa, 0x99));
    }

    #[test]
    fn invalid_length_is_returned_unchanged() {
        assert_eq!(hex_to_rgba("#12", 0.5), "#12");
        assert_eq!(hex_to_rgba("#12345", 0.5), "#12345");
        assert_eq!(hex_to_rgba("", 1.0), "");
    }

    #[test]
    fn whole_alpha_prints_without_fraction() {
        assert_eq!(hex_to_rgba("#000000", 1.0), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn srgba_clamps_alpha() {
        let color = hex_to_srgba("#ff0000", 2.0).unwrap();
        assert_eq!(color.alpha, 255);
        assert_eq!(color.red, 255);
        let color = hex_to_srgba("#ff0000", 0.5).unwrap();
        assert_eq!(color.alpha, 128);
        assert!(hex_to_srgba("nope", 0.5).is_none());
    }

    #[test]
    fn escapes_all_markup_characters() {
        assert_eq!(
            escape_markup(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_markup("plain"), "plain");
    }
}
