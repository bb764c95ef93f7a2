//! SVG backend.
//!
//! Produces a standalone SVG document from a [`RenderPlan`]. Every string
//! taken from the description is escaped before it is inserted.

use super::RenderPlan;
use super::background::BackgroundFill;
use super::layout::TextLayout;
use crate::color::escape_markup;

const CLIP_ID: &str = "clip";
const GRADIENT_ID: &str = "bg-gradient";
const SHADOW_ID: &str = "text-shadow";

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f32) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Renders the plan as an SVG document.
pub fn render(plan: &RenderPlan<'_>) -> String {
    let size = plan.size_px;
    let mut defs = vec![format!(
        "<clipPath id='{CLIP_ID}'><rect width='{size}' height='{size}' rx='{r}' ry='{r}' /></clipPath>",
        r = num(plan.clip_radius),
    )];

    if let BackgroundFill::Gradient { line, from, to } = plan.background {
        defs.push(format!(
            "<linearGradient id='{GRADIENT_ID}' gradientUnits='userSpaceOnUse' x1='{}' y1='{}' x2='{}' y2='{}'>\
             <stop offset='0' stop-color='{}' /><stop offset='1' stop-color='{}' /></linearGradient>",
            num(line.x1),
            num(line.y1),
            num(line.x2),
            num(line.y2),
            escape_markup(from),
            escape_markup(to),
        ));
    }

    if let Some(shadow) = &plan.shadow {
        defs.push(format!(
            "<filter id='{SHADOW_ID}' filterUnits='userSpaceOnUse' x='0' y='0' width='{size}' height='{size}'>\
             <feDropShadow dx='{}' dy='{}' stdDeviation='{}' flood-color='{}' flood-opacity='{}' /></filter>",
            num(shadow.dx),
            num(shadow.dy),
            num(shadow.blur_sigma),
            escape_markup(shadow.color),
            num(shadow.alpha),
        ));
    }

    let background = match plan.background {
        BackgroundFill::Solid { color } => format!(
            "<rect width='{size}' height='{size}' fill='{}' />",
            escape_markup(color)
        ),
        BackgroundFill::Gradient { .. } => {
            format!("<rect width='{size}' height='{size}' fill='url(#{GRADIENT_ID})' />")
        }
        BackgroundFill::Image { source } => format!(
            "<image href='{}' x='0' y='0' width='{size}' height='{size}' preserveAspectRatio='xMidYMid slice' />",
            escape_markup(source)
        ),
    };

    let mut text_attrs = format!(" clip-path='url(#{CLIP_ID})'");
    if plan.shadow.is_some() {
        text_attrs.push_str(&format!(" filter='url(#{SHADOW_ID})'"));
    }

    format!(
        "<?xml version='1.0' encoding='UTF-8'?>\n\
         <svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}' viewBox='0 0 {size} {size}'>\n  \
         <defs>{}</defs>\n  \
         <g clip-path='url(#{CLIP_ID})'>{background}</g>\n  \
         {}\n\
         </svg>\n",
        defs.join(""),
        text_group(&plan.text, &text_attrs),
    )
}

/// Renders only the text lines, unclipped and without shadow, as a
/// transparent `size` square.
///
/// The raster backend feeds this to the text shaper so glyph placement is
/// identical to the full document.
pub(crate) fn text_layer(plan: &RenderPlan<'_>) -> String {
    let size = plan.size_px;
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}' viewBox='0 0 {size} {size}'>{}</svg>",
        text_group(&plan.text, "")
    )
}

fn text_group(text: &TextLayout<'_>, extra_attrs: &str) -> String {
    let mut group = format!(
        "<g{extra_attrs} fill='{}' font-family='{}' font-size='{}' font-weight='{}'>",
        escape_markup(text.color),
        escape_markup(&text.font_family),
        num(text.font_size),
        escape_markup(text.weight),
    );
    for (line, y) in text.baselines() {
        group.push_str(&format!(
            "<text x='{}' y='{}' text-anchor='middle' dominant-baseline='middle'>{}</text>",
            num(text.center_x),
            num(y),
            escape_markup(line),
        ));
    }
    group.push_str("</g>");
    group
}
