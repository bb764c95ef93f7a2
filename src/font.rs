//! Font resolution and custom font installation.
//!
//! [`resolve_font_family`] is the single mapping from a description's font
//! selector to a family string; both backends go through it. The
//! [`FontRegistry`] is the font capability handed to the renderer: it owns
//! the font database used for text shaping and installs user-supplied fonts
//! under generated family ids.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use resvg::usvg::fontdb;
use serde::{Deserialize, Serialize};

use crate::description::IconDescription;
use crate::error::{RenderError, Result};
use crate::presets::FONT_PRESETS;

/// Returns the family string for the description's font selector.
///
/// A custom selector with a non-empty family yields that family verbatim,
/// without checking that it is installed. Unknown preset ids fall back to
/// the first preset.
pub fn resolve_font_family(description: &IconDescription) -> &str {
    let font = &description.text.font;
    if font.is_custom() && !font.custom_family.is_empty() {
        return &font.custom_family;
    }
    FONT_PRESETS
        .iter()
        .find(|preset| preset.id == font.preset_id)
        .unwrap_or(&FONT_PRESETS[0])
        .family
}

/// Returns the font-family list used when drawing text.
///
/// Custom families are followed by the default preset stack, so a custom
/// family the host cannot resolve silently falls back to it.
pub fn font_stack(description: &IconDescription) -> String {
    let family = resolve_font_family(description);
    if description.text.font.is_custom() && !description.text.font.custom_family.is_empty() {
        format!("{family}, {}", FONT_PRESETS[0].family)
    } else {
        family.to_string()
    }
}

// ============================================================================
// Custom fonts
// ============================================================================

/// Metadata of an installed custom font.
///
/// Only this metadata is meant to be persisted; the font bytes live in the
/// registry for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFontRegistration {
    /// Generated, session-unique family id.
    pub family: String,
    /// Human-readable name, usually the font file name without extension.
    pub display_name: String,
}

static NEXT_FONT_ID: AtomicU64 = AtomicU64::new(1);

fn generate_family_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed);
    format!("InstaIcon-{millis}-{seq}")
}

/// Font database plus the custom fonts installed into it.
///
/// Cloning is cheap: the database is shared until the next installation.
#[derive(Clone, Default)]
pub struct FontRegistry {
    db: Arc<fontdb::Database>,
    custom: Vec<CustomFontRegistration>,
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("faces", &self.db.len())
            .field("custom", &self.custom)
            .finish()
    }
}

impl FontRegistry {
    /// Creates a registry with no fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the fonts installed on the system.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        bind_generic_families(&mut db);
        Self {
            db: Arc::new(db),
            custom: Vec::new(),
        }
    }

    /// Returns the shared font database used for text shaping.
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Installs a font file and returns its generated registration.
    ///
    /// Every face in the file becomes reachable under the generated family
    /// id, in addition to the family names stored in the font itself.
    pub fn install(
        &mut self,
        data: Vec<u8>,
        display_name: &str,
    ) -> Result<CustomFontRegistration> {
        let db = Arc::make_mut(&mut self.db);
        let ids = db.load_font_source(fontdb::Source::Binary(Arc::new(data)));
        if ids.is_empty() {
            return Err(RenderError::FontInstall {
                reason: "no usable font faces in the supplied data".to_string(),
            });
        }

        let family = generate_family_id();
        for id in ids {
            let Some(mut info) = db.face(id).cloned() else {
                continue;
            };
            db.remove_face(id);
            info.families
                .insert(0, (family.clone(), fontdb::Language::English_UnitedStates));
            db.push_face_info(info);
        }
        bind_generic_families(db);

        let display_name = match display_name.trim() {
            "" => "CustomFont",
            name => name,
        };
        let registration = CustomFontRegistration {
            family,
            display_name: display_name.to_string(),
        };
        log::debug!(
            "installed custom font {} as {}",
            registration.display_name,
            registration.family
        );
        self.custom.push(registration.clone());
        Ok(registration)
    }

    /// Returns the custom fonts installed in this session.
    pub fn custom_fonts(&self) -> &[CustomFontRegistration] {
        &self.custom
    }

    /// Returns true if a custom family with this id is installed.
    pub fn is_installed(&self, family: &str) -> bool {
        self.custom.iter().any(|font| font.family == family)
    }

    /// Removes a custom font and its faces. Returns true if it was present.
    pub fn remove(&mut self, family: &str) -> bool {
        let Some(index) = self.custom.iter().position(|font| font.family == family) else {
            return false;
        };
        self.custom.remove(index);

        let db = Arc::make_mut(&mut self.db);
        let ids: Vec<_> = db
            .faces()
            .filter(|face| face.families.iter().any(|(name, _)| name == family))
            .map(|face| face.id)
            .collect();
        for id in ids {
            db.remove_face(id);
        }
        bind_generic_families(db);
        true
    }
}

// ============================================================================
// Generic families
// ============================================================================

/// Generic family keywords and the style hint used when none of the preset
/// names for that keyword is installed.
const GENERIC_FAMILIES: [(&str, StyleHint); 4] = [
    ("sans-serif", StyleHint::Sans),
    ("serif", StyleHint::Serif),
    ("monospace", StyleHint::Mono),
    ("cursive", StyleHint::Script),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleHint {
    Sans,
    Serif,
    Mono,
    Script,
}

impl StyleHint {
    fn matches(self, face: &fontdb::FaceInfo) -> bool {
        face.families.iter().any(|(name, _)| {
            let name = name.to_ascii_lowercase();
            match self {
                Self::Sans => !face.monospaced && name.contains("sans"),
                Self::Serif => {
                    !face.monospaced && name.contains("serif") && !name.contains("sans")
                }
                Self::Mono => face.monospaced || name.contains("mono"),
                Self::Script => ["script", "cursive", "hand"].iter().any(|k| name.contains(k)),
            }
        })
    }
}

fn has_family(db: &fontdb::Database, family: &str) -> bool {
    db.faces().any(|face| {
        face.families
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    })
}

/// Named families of the font presets that end in `generic`, in order.
fn preset_candidates(generic: &str) -> impl Iterator<Item = &'static str> + '_ {
    FONT_PRESETS
        .iter()
        .filter_map(move |preset| {
            let names: Vec<&str> = preset.family.split(',').map(str::trim).collect();
            (names.last() == Some(&generic)).then_some(names)
        })
        .flat_map(move |names| names.into_iter().filter(move |name| *name != generic))
}

/// Points every generic family keyword at a face that is actually installed.
///
/// fontdb maps the keywords to fixed names (Arial, Times New Roman, ...)
/// that are missing on many hosts, which leaves every preset stack without
/// a match. Resolution order per keyword: a named family from the preset
/// stacks, any face of a matching style, the keyword's current target,
/// the resolved sans-serif family, any face at all.
fn bind_generic_families(db: &mut fontdb::Database) {
    let Some(any_family) = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
    else {
        return;
    };

    let mut sans_fallback: Option<String> = None;
    for (generic, hint) in GENERIC_FAMILIES {
        let current = match hint {
            StyleHint::Sans => db.family_name(&fontdb::Family::SansSerif),
            StyleHint::Serif => db.family_name(&fontdb::Family::Serif),
            StyleHint::Mono => db.family_name(&fontdb::Family::Monospace),
            StyleHint::Script => db.family_name(&fontdb::Family::Cursive),
        }
        .to_string();

        let chosen = preset_candidates(generic)
            .find(|name| has_family(db, name))
            .map(str::to_string)
            .or_else(|| {
                // prefer the plainest face: upright, regular weight, shortest name
                db.faces()
                    .filter(|face| hint.matches(face))
                    .filter_map(|face| Some((face, face.families.first()?.0.as_str())))
                    .max_by_key(|(face, name)| {
                        (
                            face.style == fontdb::Style::Normal,
                            face.weight == fontdb::Weight::NORMAL,
                            Reverse(name.len()),
                        )
                    })
                    .map(|(_, name)| name.to_string())
            })
            .or_else(|| has_family(db, &current).then(|| current.clone()))
            .or_else(|| sans_fallback.clone())
            .unwrap_or_else(|| any_family.clone());

        log::debug!("generic family {generic} -> {chosen}");
        match hint {
            StyleHint::Sans => {
                sans_fallback = Some(chosen.clone());
                db.set_sans_serif_family(chosen);
            }
            StyleHint::Serif => db.set_serif_family(chosen),
            StyleHint::Mono => db.set_monospace_family(chosen),
            StyleHint::Script => db.set_cursive_family(chosen),
        }
    }
}
