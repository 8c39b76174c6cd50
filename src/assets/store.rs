use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::load_image_file;
use crate::data::records::{ParticipantRecord, SponsorGroups};
use crate::foundation::core::Size;
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{AssetKind, LaurelError, LaurelResult};
use crate::template::registry::TemplateRegistry;

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap premultiplied bytes, checking the length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> LaurelResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(LaurelError::validation(format!(
                "image buffer of {} bytes does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Uniformly colored image, premultiplied from straight `rgba`.
    pub fn solid(width: u32, height: u32, rgba: crate::foundation::core::Rgba8) -> LaurelResult<Self> {
        let px = rgba.premultiplied();
        let bytes = px.repeat((width as usize).saturating_mul(height as usize));
        Self::from_premul(width, height, bytes)
    }

    /// Intrinsic size.
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Where template backgrounds and logos are read from.
#[derive(Clone, Debug)]
pub struct AssetRoots {
    /// Directory holding template backgrounds.
    pub templates_dir: PathBuf,
    /// Base for relative logo paths.
    pub logos_root: PathBuf,
}

/// Backgrounds and logos decoded once, before any record is rendered.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssets {
    backgrounds: HashMap<String, Result<Arc<RasterImage>, PathBuf>>,
    logos: HashMap<String, Arc<RasterImage>>,
}

impl PreparedAssets {
    /// Decode every background the records resolve to and every retained sponsor logo.
    ///
    /// Failures are remembered rather than returned: a broken background fails each record of
    /// that category later, a broken logo is reported once and omitted.
    pub fn prepare(
        records: &[ParticipantRecord],
        sponsors: &SponsorGroups,
        registry: &TemplateRegistry,
        roots: &AssetRoots,
    ) -> (Self, Vec<Diagnostic>) {
        let mut out = Self::default();
        let mut diagnostics = Vec::new();

        let keys: BTreeSet<&str> = records
            .iter()
            .map(|r| registry.resolve(&r.certificate_type).template.key.as_str())
            .collect();
        for key in keys {
            let Some(template) = registry.lookup(key) else {
                continue;
            };
            let path = roots.templates_dir.join(&template.background_file);
            let loaded = match load_image_file(&path) {
                Ok(img) => {
                    tracing::debug!(template = key, w = img.width, h = img.height, "background decoded");
                    Ok(Arc::new(img))
                }
                Err(e) => {
                    tracing::error!(template = key, path = %path.display(), "background unavailable: {e}");
                    Err(path)
                }
            };
            out.backgrounds.insert(key.to_owned(), loaded);
        }

        for (event, list) in sponsors.iter() {
            for sponsor in list {
                if out.logos.contains_key(&sponsor.logo_path) {
                    continue;
                }
                let path = resolve_path(&roots.logos_root, &sponsor.logo_path);
                match load_image_file(&path) {
                    Ok(img) => {
                        out.logos.insert(sponsor.logo_path.clone(), Arc::new(img));
                    }
                    Err(e) => diagnostics.push(Diagnostic::warn(
                        DiagnosticKind::MissingAsset,
                        None,
                        format!(
                            "logo for sponsor '{}' ({event}) omitted: {}: {e}",
                            sponsor.sponsor_name,
                            path.display()
                        ),
                    )),
                }
            }
        }

        (out, diagnostics)
    }

    /// Background for `template_key`, or the `MissingAsset(Template)` error for records using it.
    pub fn background(&self, template_key: &str) -> LaurelResult<&Arc<RasterImage>> {
        match self.backgrounds.get(template_key) {
            Some(Ok(img)) => Ok(img),
            Some(Err(path)) => Err(LaurelError::missing_asset(AssetKind::Template, path)),
            None => Err(LaurelError::missing_asset(
                AssetKind::Template,
                PathBuf::from(template_key),
            )),
        }
    }

    /// Logo decoded for `logo_path`, if it loaded.
    pub fn logo(&self, logo_path: &str) -> Option<&Arc<RasterImage>> {
        self.logos.get(logo_path)
    }

    /// Number of decoded logos.
    pub fn logo_count(&self) -> usize {
        self.logos.len()
    }
}

/// `rel` joined onto `root` unless it is already absolute.
pub fn resolve_path(root: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
