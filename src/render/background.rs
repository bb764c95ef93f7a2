//! Background fill instructions shared by both backends.

use crate::color::BACKGROUND_FALLBACK;
use crate::description::{Background, BackgroundMode};
use crate::geometry::GradientLine;

/// What to paint under the text, resolved for one output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundFill<'a> {
    /// Flat color covering the square.
    Solid { color: &'a str },

    /// Two-stop linear gradient along `line`.
    Gradient {
        line: GradientLine,
        from: &'a str,
        to: &'a str,
    },

    /// Cover-fitted image. The raster backend decodes it; the markup
    /// backend references it by URL.
    Image { source: &'a str },
}

impl<'a> BackgroundFill<'a> {
    /// Picks the active background record and resolves it at `size`.
    ///
    /// An empty solid color and an empty image source both fall back to
    /// [`BACKGROUND_FALLBACK`].
    pub fn new(background: &'a Background, size: f32) -> Self {
        match background.mode {
            BackgroundMode::Solid if background.solid_color.is_empty() => fallback(),
            BackgroundMode::Solid => Self::Solid {
                color: &background.solid_color,
            },
            BackgroundMode::Gradient => Self::Gradient {
                line: GradientLine::new(size, background.gradient.angle_degrees),
                from: &background.gradient.from,
                to: &background.gradient.to,
            },
            BackgroundMode::Image if background.image_source.is_empty() => fallback(),
            BackgroundMode::Image => Self::Image {
                source: &background.image_source,
            },
        }
    }
}

fn fallback<'a>() -> BackgroundFill<'a> {
    BackgroundFill::Solid {
        color: BACKGROUND_FALLBACK,
    }
}
