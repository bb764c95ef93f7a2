//! Built-in presets: gradients, font stacks, background patterns and export sizes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Application name used in export file names.
pub const APP_NAME: &str = "instaicon";

/// Default edge length of the reference canvas.
pub const CANVAS_BASE_SIZE: f32 = 512.0;

/// Export sizes offered alongside a free custom size.
pub const EXPORT_SIZE_PRESETS: [u32; 3] = [512, 1024, 2048];

/// Font preset id that selects the registered custom family.
pub const CUSTOM_FONT_PRESET: &str = "custom";

/// A named two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub angle: f32,
}

pub const GRADIENT_PRESETS: [GradientPreset; 5] = [
    GradientPreset { id: "sunset", name: "Sunset", from: "#ff9966", to: "#ff5e62", angle: 140.0 },
    GradientPreset { id: "sea", name: "Sea Wave", from: "#4facfe", to: "#00f2fe", angle: 120.0 },
    GradientPreset { id: "mint", name: "Mint Fresh", from: "#43e97b", to: "#38f9d7", angle: 130.0 },
    GradientPreset { id: "gold", name: "Golden Hour", from: "#f6d365", to: "#fda085", angle: 125.0 },
    GradientPreset { id: "lilac", name: "Lilac Mist", from: "#89f7fe", to: "#66a6ff", angle: 100.0 },
];

/// Looks up a gradient preset by id.
pub fn gradient_preset(id: &str) -> Option<&'static GradientPreset> {
    GRADIENT_PRESETS.iter().find(|preset| preset.id == id)
}

/// A built-in font family stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub family: &'static str,
}

/// Font presets. The first entry is the fallback for unknown ids.
pub const FONT_PRESETS: [FontPreset; 4] = [
    FontPreset { id: "sans", name: "Sans", family: "Trebuchet MS, Verdana, sans-serif" },
    FontPreset { id: "serif", name: "Serif", family: "Georgia, Times New Roman, serif" },
    FontPreset { id: "mono", name: "Mono", family: "JetBrains Mono, Menlo, monospace" },
    FontPreset { id: "cursive", name: "Cursive", family: "Brush Script MT, cursive" },
];

/// An SVG artwork usable as an image background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternPreset {
    pub id: &'static str,
    pub name: &'static str,
    svg: &'static str,
}

impl PatternPreset {
    /// Returns the raw SVG markup of the pattern.
    pub fn svg(&self) -> &'static str {
        self.svg
    }

    /// Returns the pattern as a base64 `data:` URL, ready to use as an
    /// image background source.
    pub fn source(&self) -> String {
        svg_data_url(self.svg)
    }
}

/// Encodes SVG markup as a base64 `data:image/svg+xml` URL.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Looks up a pattern preset by id.
pub fn pattern_preset(id: &str) -> Option<&'static PatternPreset> {
    PATTERN_PRESETS.iter().find(|preset| preset.id == id)
}

pub const PATTERN_PRESETS: [PatternPreset; 5] = [
    PatternPreset {
        id: "triangles",
        name: "Triangles",
        svg: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 512 512'><rect width='512' height='512' fill='#0b3c49'/><g fill='#2ca6a4' opacity='0.8'><polygon points='0,140 170,0 340,140'/><polygon points='170,140 340,0 512,140'/><polygon points='0,372 170,232 340,372'/><polygon points='172,372 342,232 512,372'/></g><g fill='#f2b97f' opacity='0.6'><polygon points='0,512 120,400 240,512'/><polygon points='272,512 392,400 512,512'/></g></svg>",
    },
    PatternPreset {
        id: "rings",
        name: "Rings",
        svg: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 512 512'><rect width='512' height='512' fill='#132a3a'/><g fill='none' stroke='#76c7c0' stroke-width='20' opacity='0.75'><circle cx='120' cy='120' r='90'/><circle cx='392' cy='140' r='110'/><circle cx='256' cy='350' r='150'/></g><g fill='none' stroke='#f7d794' stroke-width='10' opacity='0.7'><circle cx='120' cy='120' r='130'/><circle cx='392' cy='140' r='150'/></g></svg>",
    },
    PatternPreset {
        id: "stripes",
        name: "Diagonal Stripes",
        svg: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 512 512'><rect width='512' height='512' fill='#20353f'/><g stroke-width='40'><line x1='-60' y1='90' x2='280' y2='-250' stroke='#4ecdc4'/><line x1='20' y1='170' x2='360' y2='-170' stroke='#ffe66d'/><line x1='100' y1='250' x2='440' y2='-90' stroke='#ff6b6b'/><line x1='180' y1='330' x2='520' y2='-10' stroke='#4ecdc4'/><line x1='260' y1='410' x2='600' y2='70' stroke='#ffe66d'/><line x1='340' y1='490' x2='680' y2='150' stroke='#ff6b6b'/></g></svg>",
    },
    PatternPreset {
        id: "grid",
        name: "Rounded Grid",
        svg: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 512 512'><rect width='512' height='512' fill='#0f2f2f'/><g fill='#8bd3dd'><rect x='36' y='36' width='120' height='120' rx='24'/><rect x='196' y='36' width='120' height='120' rx='24'/><rect x='356' y='36' width='120' height='120' rx='24'/><rect x='36' y='196' width='120' height='120' rx='24'/><rect x='196' y='196' width='120' height='120' rx='24'/><rect x='356' y='196' width='120' height='120' rx='24'/><rect x='36' y='356' width='120' height='120' rx='24'/><rect x='196' y='356' width='120' height='120' rx='24'/><rect x='356' y='356' width='120' height='120' rx='24'/></g><g fill='#fce38a' opacity='0.75'><circle cx='96' cy='96' r='12'/><circle cx='256' cy='256' r='12'/><circle cx='416' cy='416' r='12'/></g></svg>",
    },
    PatternPreset {
        id: "blobs",
        name: "Blob Waves",
        svg: "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 512 512'><rect width='512' height='512' fill='#1c2541'/><path d='M0 320C80 290 120 260 180 270C240 280 280 340 340 350C400 360 440 330 512 290V512H0Z' fill='#5bc0be'/><path d='M0 240C70 210 130 180 210 195C290 210 340 260 410 250C460 244 490 220 512 205V512H0Z' fill='#6fffe9' opacity='0.85'/><circle cx='110' cy='115' r='50' fill='#f9c74f'/><circle cx='410' cy='95' r='36' fill='#f9844a'/></svg>",
    },
];
