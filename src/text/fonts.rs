use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{AssetKind, LaurelError, LaurelResult};

/// A font file registered under a logical family name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFaceConfig {
    /// File name inside the fonts directory.
    pub file: String,
    /// Logical family name used by style preference lists.
    pub family: String,
}

impl FontFaceConfig {
    fn new(file: &str, family: &str) -> Self {
        Self {
            file: file.to_owned(),
            family: family.to_owned(),
        }
    }
}

/// Stock faces.
pub fn default_font_faces() -> Vec<FontFaceConfig> {
    vec![
        FontFaceConfig::new("Shrikhand-Regular.ttf", "Shrikhand"),
        FontFaceConfig::new("BebasNeue-Regular.ttf", "Bebas Neue"),
        FontFaceConfig::new("Poppins-Regular.ttf", "Poppins"),
        FontFaceConfig::new("Poppins-Bold.ttf", "Poppins Bold"),
    ]
}

/// A successfully parsed font file.
#[derive(Clone, Debug)]
pub struct LoadedFace {
    /// Logical family name.
    pub family: Arc<str>,
    /// Family name reported by the font's own name table.
    pub internal_name: String,
    /// Where the bytes came from.
    pub path: PathBuf,
    /// Raw font bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl LoadedFace {
    /// Validate `bytes` as a font and capture its internal family name.
    pub fn from_bytes(
        family: &str,
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
    ) -> LaurelResult<Self> {
        let path = path.into();
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LaurelError::validation(format!("no font families in '{}'", path.display()))
        })?;
        let internal_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LaurelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            family: Arc::from(family),
            internal_name,
            path,
            bytes: Arc::new(bytes),
        })
    }
}

/// Fonts registered for a run, in configuration order.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<LoadedFace>,
}

impl FontBook {
    /// Load every configured face from `dir`, skipping (and reporting) unusable files.
    pub fn load(dir: &Path, faces: &[FontFaceConfig]) -> (Self, Vec<Diagnostic>) {
        let mut book = Self::default();
        let mut diagnostics = Vec::new();
        for face in faces {
            let path = dir.join(&face.file);
            let loaded = std::fs::read(&path)
                .map_err(|_| LaurelError::missing_asset(AssetKind::Font, &path))
                .and_then(|bytes| LoadedFace::from_bytes(&face.family, &path, bytes));
            match loaded {
                Ok(f) => {
                    tracing::debug!(family = %f.family, internal = %f.internal_name, "font registered");
                    book.push(f);
                }
                Err(e) => diagnostics.push(Diagnostic::warn(
                    DiagnosticKind::MissingAsset,
                    None,
                    format!("font '{}' unavailable: {e}", face.family),
                )),
            }
        }
        (book, diagnostics)
    }

    /// Register an already-validated face. A later face with the same family replaces the earlier one.
    pub fn push(&mut self, face: LoadedFace) {
        self.faces.retain(|f| f.family != face.family);
        self.faces.push(face);
    }

    /// All faces in registration order.
    pub fn faces(&self) -> &[LoadedFace] {
        &self.faces
    }

    /// Logical family names in registration order.
    pub fn families(&self) -> Vec<String> {
        self.faces.iter().map(|f| f.family.to_string()).collect()
    }

    /// `true` when nothing loaded.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A family resolved to a registered face, at a pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFont {
    /// Registered logical family.
    pub family: Arc<str>,
    /// Font size in pixels.
    pub size_px: f32,
}

/// Font plus solid fill for one text role.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Resolved font.
    pub font: ResolvedFont,
    /// Fill color.
    pub fill: Rgba8,
}

/// Unresolved text role: ordered family preferences, size and color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    /// Preferred families, first registered wins. Also accepts a CSS-like list string.
    #[serde(deserialize_with = "deserialize_families")]
    pub families: Vec<String>,
    /// Font size in pixels.
    pub size_px: f32,
    /// Fill color.
    pub color: Rgba8,
}

impl StyleSpec {
    fn new(families: &[&str], size_px: f32, color: Rgba8) -> Self {
        Self {
            families: families.iter().map(|s| (*s).to_owned()).collect(),
            size_px,
            color,
        }
    }

    /// Parse a CSS-like comma-separated family list (`"Poppins Bold", Arial, sans-serif`).
    pub fn parse_family_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_owned())
            .filter(|f| !f.is_empty())
            .collect()
    }
}

fn deserialize_families<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(String),
        Names(Vec<String>),
    }

    match Repr::deserialize(deserializer)? {
        Repr::List(list) => Ok(StyleSpec::parse_family_list(&list)),
        Repr::Names(names) => Ok(names),
    }
}

const GREY_555: Rgba8 = Rgba8::rgb(0x55, 0x55, 0x55);
const GREY_888: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);

/// Every text role drawn on a certificate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpecs {
    /// Gradient header word (its color is unused).
    pub header_title: StyleSpec,
    /// "CERTIFICATE".
    pub certificate: StyleSpec,
    /// "This is to certify".
    pub certify_label: StyleSpec,
    /// Name lines.
    pub name: StyleSpec,
    /// Body labels ("at the ", "organised by ", ...).
    pub body_label: StyleSpec,
    /// Body values.
    pub body_value: StyleSpec,
    /// Rank / "participating" (color comes from the template).
    pub accent_value: StyleSpec,
    /// Certificate ID line.
    pub cert_id: StyleSpec,
    /// Ordinal suffixes.
    pub superscript: StyleSpec,
}

impl Default for StyleSpecs {
    fn default() -> Self {
        const POPPINS: &[&str] = &["Poppins", "Poppins Bold", "Helvetica", "Arial", "sans-serif"];
        const POPPINS_BOLD: &[&str] =
            &["Poppins Bold", "Poppins", "Helvetica", "Arial", "sans-serif"];
        Self {
            header_title: StyleSpec::new(&["Shrikhand", "Georgia", "serif"], 32.0, Rgba8::BLACK),
            certificate: StyleSpec::new(
                &["Bebas Neue", "Arial Narrow", "Impact", "sans-serif"],
                65.0,
                Rgba8::BLACK,
            ),
            certify_label: StyleSpec::new(POPPINS, 19.0, GREY_555),
            name: StyleSpec::new(POPPINS_BOLD, 19.0, Rgba8::BLACK),
            body_label: StyleSpec::new(POPPINS, 19.0, GREY_555),
            body_value: StyleSpec::new(POPPINS_BOLD, 19.0, Rgba8::BLACK),
            accent_value: StyleSpec::new(POPPINS_BOLD, 19.0, Rgba8::BLACK),
            cert_id: StyleSpec::new(&["Arial", "Poppins"], 12.0, GREY_888),
            superscript: StyleSpec::new(&["Arial", "Poppins"], 11.0, Rgba8::BLACK),
        }
    }
}

/// Resolved counterpart of [`StyleSpecs`], computed once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyles {
    /// Gradient header word.
    pub header_title: TextStyle,
    /// "CERTIFICATE".
    pub certificate: TextStyle,
    /// "This is to certify".
    pub certify_label: TextStyle,
    /// Name lines.
    pub name: TextStyle,
    /// Body labels.
    pub body_label: TextStyle,
    /// Body values.
    pub body_value: TextStyle,
    /// Rank / "participating".
    pub accent_value: TextStyle,
    /// Certificate ID line.
    pub cert_id: TextStyle,
    /// Ordinal suffixes.
    pub superscript: TextStyle,
}

impl StyleSpecs {
    /// Resolve every role against the registered families.
    ///
    /// A role whose whole chain is unregistered uses the first registered family; with none
    /// registered the run cannot draw text and [`LaurelError::MissingAsset`] is returned.
    pub fn resolve(&self, registered: &[String]) -> LaurelResult<TextStyles> {
        let last_resort = registered.first().ok_or_else(|| {
            LaurelError::missing_asset(AssetKind::Font, PathBuf::from("<no usable fonts>"))
        })?;

        let pick = |role: &str, spec: &StyleSpec| -> TextStyle {
            let family = spec
                .families
                .iter()
                .find(|f| registered.iter().any(|r| r == *f))
                .unwrap_or_else(|| {
                    tracing::warn!(
                        role,
                        families = ?spec.families,
                        fallback = %last_resort,
                        "no preferred family registered"
                    );
                    last_resort
                });
            TextStyle {
                font: ResolvedFont {
                    family: Arc::from(family.as_str()),
                    size_px: spec.size_px,
                },
                fill: spec.color,
            }
        };

        Ok(TextStyles {
            header_title: pick("header_title", &self.header_title),
            certificate: pick("certificate", &self.certificate),
            certify_label: pick("certify_label", &self.certify_label),
            name: pick("name", &self.name),
            body_label: pick("body_label", &self.body_label),
            body_value: pick("body_value", &self.body_value),
            accent_value: pick("accent_value", &self.accent_value),
            cert_id: pick("cert_id", &self.cert_id),
            superscript: pick("superscript", &self.superscript),
        })
    }

    /// `(role, spec)` pairs in drawing order.
    pub fn roles(&self) -> [(&'static str, &StyleSpec); 9] {
        [
            ("header_title", &self.header_title),
            ("certificate", &self.certificate),
            ("certify_label", &self.certify_label),
            ("name", &self.name),
            ("body_label", &self.body_label),
            ("body_value", &self.body_value),
            ("accent_value", &self.accent_value),
            ("cert_id", &self.cert_id),
            ("superscript", &self.superscript),
        ]
    }
}

impl TextStyles {
    /// `(role, style)` pairs in drawing order.
    pub fn roles(&self) -> [(&'static str, &TextStyle); 9] {
        [
            ("header_title", &self.header_title),
            ("certificate", &self.certificate),
            ("certify_label", &self.certify_label),
            ("name", &self.name),
            ("body_label", &self.body_label),
            ("body_value", &self.body_value),
            ("accent_value", &self.accent_value),
            ("cert_id", &self.cert_id),
            ("superscript", &self.superscript),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
