use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::assets::store::AssetRoots;
use crate::foundation::error::{LaurelError, LaurelResult};
use crate::layout::cursor::LayoutConfig;
use crate::layout::logos::LogoLayoutParams;
use crate::render::encode::{DEFAULT_JPEG_QUALITY, OutputFormat};
use crate::template::registry::{CategoryPolicy, TemplateConfig, TemplateRegistry, builtin_templates};
use crate::text::fonts::{FontFaceConfig, StyleSpecs, default_font_faces};

/// Everything a run needs besides the data itself.
///
/// Every field has a default, so a JSON file only has to mention what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Participant and sponsor sources.
    pub inputs: InputConfig,
    /// Asset directories.
    pub assets: AssetConfig,
    /// Where and how certificates are written.
    pub output: OutputConfig,
    /// Category table.
    pub templates: Vec<TemplateConfig>,
    /// Key of the template used for unregistered categories.
    pub fallback_category: String,
    /// Treatment of unregistered categories.
    pub category_policy: CategoryPolicy,
    /// Font files and per-role styles.
    pub fonts: FontConfig,
    /// Text placement.
    pub layout: LayoutConfig,
    /// Sponsor block tuning.
    pub logos: LogoLayoutParams,
    /// Render parallelism.
    pub threading: ThreadingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inputs: InputConfig::default(),
            assets: AssetConfig::default(),
            output: OutputConfig::default(),
            templates: builtin_templates(),
            fallback_category: "participation".to_owned(),
            category_policy: CategoryPolicy::default(),
            fonts: FontConfig::default(),
            layout: LayoutConfig::default(),
            logos: LogoLayoutParams::default(),
            threading: ThreadingConfig::default(),
        }
    }
}

/// Data sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Participant source. Required at run time.
    pub participants: PathBuf,
    /// Sponsor source. Optional at run time.
    pub sponsors: PathBuf,
    /// Field delimiter shared by both sources.
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            participants: PathBuf::from("data/participants.csv"),
            sponsors: PathBuf::from("data/sponsors.csv"),
            delimiter: ',',
        }
    }
}

/// Asset directories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Template backgrounds.
    pub templates_dir: PathBuf,
    /// Font files.
    pub fonts_dir: PathBuf,
    /// Base for relative sponsor logo paths.
    pub logos_root: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("assets/templates"),
            fonts_dir: PathBuf::from("assets/fonts"),
            logos_root: PathBuf::from("."),
        }
    }
}

/// Output location and encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, created when absent.
    pub dir: PathBuf,
    /// Image container.
    pub format: OutputFormat,
    /// JPEG quality, 1..=100. Ignored for PNG.
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: OutputFormat::default(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Font registration and text styles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Files registered under logical family names, in preference order.
    pub faces: Vec<FontFaceConfig>,
    /// Family chains and sizes per text role.
    pub styles: StyleSpecs,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            faces: default_font_faces(),
            styles: StyleSpecs::default(),
        }
    }
}

/// Worker pool settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    /// Render records on a worker pool.
    pub parallel: bool,
    /// Worker count; `None` lets the pool decide. Must be at least 1 when set.
    pub threads: Option<usize>,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration file.
    pub fn from_json_file(path: &Path) -> LaurelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> LaurelResult<()> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(LaurelError::validation(format!(
                "output.quality must be within 1..=100, got {}",
                self.output.quality
            )));
        }
        if self.threading.threads == Some(0) {
            return Err(LaurelError::validation(
                "threading.threads must be >= 1 when set",
            ));
        }
        if self.inputs.delimiter == '"' {
            return Err(LaurelError::validation(
                "inputs.delimiter cannot be the quote character",
            ));
        }
        self.registry().map(|_| ())
    }

    /// Template table with the configured fallback.
    pub fn registry(&self) -> LaurelResult<TemplateRegistry> {
        TemplateRegistry::new(self.templates.clone(), &self.fallback_category)
    }

    /// Directories assets are read from.
    pub fn asset_roots(&self) -> AssetRoots {
        AssetRoots {
            templates_dir: self.assets.templates_dir.clone(),
            logos_root: self.assets.logos_root.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
