use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{LaurelError, LaurelResult};

/// Styling and background for one award category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Category key, lower-case.
    pub key: String,
    /// Background raster file name, relative to the templates directory.
    pub background_file: String,
    /// Color used for the highlighted body value (rank or "participating").
    pub accent_color: Rgba8,
    /// Word drawn with the header gradient.
    pub header_text: String,
    /// Header gradient stops, top then bottom.
    pub header_gradient: [Rgba8; 2],
    /// Rank word used in winner body lines.
    pub rank_text: String,
    /// Winner templates use the "for winning <rank>" body line.
    pub is_winner: bool,
}

impl TemplateConfig {
    fn builtin(
        key: &str,
        background_file: &str,
        accent: &str,
        header_text: &str,
        gradient: [&str; 2],
        rank_text: &str,
        is_winner: bool,
    ) -> Self {
        let c = |s: &str| Rgba8::from_hex(s).unwrap_or(Rgba8::BLACK);
        Self {
            key: key.to_owned(),
            background_file: background_file.to_owned(),
            accent_color: c(accent),
            header_text: header_text.to_owned(),
            header_gradient: [c(gradient[0]), c(gradient[1])],
            rank_text: rank_text.to_owned(),
            is_winner,
        }
    }
}

/// What happens to a record whose category key is not registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Use the fallback template and record a diagnostic.
    #[default]
    Fallback,
    /// Fail the record with [`LaurelError::UnknownCategory`].
    Reject,
}

/// Outcome of a category lookup.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    /// Template to render with.
    pub template: &'a TemplateConfig,
    /// `true` when the key was unknown and the fallback was substituted.
    pub fell_back: bool,
}

/// Immutable category → template table with a designated fallback.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    entries: Vec<TemplateConfig>,
    fallback: usize,
}

impl TemplateRegistry {
    /// Build a registry. `fallback` must name one of the entries.
    pub fn new(entries: Vec<TemplateConfig>, fallback: &str) -> LaurelResult<Self> {
        let mut seen = std::collections::HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for mut e in entries {
            e.key = e.key.trim().to_lowercase();
            if e.key.is_empty() {
                return Err(LaurelError::validation("template key must be non-empty"));
            }
            if !seen.insert(e.key.clone()) {
                return Err(LaurelError::validation(format!(
                    "duplicate template key '{}'",
                    e.key
                )));
            }
            normalized.push(e);
        }

        let fallback_key = fallback.trim().to_lowercase();
        let fallback = normalized
            .iter()
            .position(|e| e.key == fallback_key)
            .ok_or_else(|| {
                LaurelError::validation(format!(
                    "fallback category '{fallback_key}' is not a registered template"
                ))
            })?;
        Ok(Self {
            entries: normalized,
            fallback,
        })
    }

    /// The four stock categories with `participation` as fallback.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_templates(),
            fallback: 3,
        }
    }

    /// Exact (case-insensitive) lookup without fallback.
    pub fn lookup(&self, category: &str) -> Option<&TemplateConfig> {
        let key = category.trim();
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }

    /// Lookup that substitutes the fallback template for unknown keys.
    pub fn resolve(&self, category: &str) -> Resolved<'_> {
        match self.lookup(category) {
            Some(template) => Resolved {
                template,
                fell_back: false,
            },
            None => Resolved {
                template: self.fallback(),
                fell_back: true,
            },
        }
    }

    /// [`Self::resolve`] gated by `policy`.
    pub fn resolve_with_policy(
        &self,
        category: &str,
        policy: CategoryPolicy,
    ) -> LaurelResult<Resolved<'_>> {
        let r = self.resolve(category);
        if r.fell_back && policy == CategoryPolicy::Reject {
            return Err(LaurelError::UnknownCategory(category.trim().to_owned()));
        }
        Ok(r)
    }

    /// Fallback template.
    pub fn fallback(&self) -> &TemplateConfig {
        &self.entries[self.fallback]
    }

    /// All templates in registration order.
    pub fn templates(&self) -> &[TemplateConfig] {
        &self.entries
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Default template table.
pub fn builtin_templates() -> Vec<TemplateConfig> {
    vec![
        TemplateConfig::builtin(
            "gold",
            "gold-certificate.jpeg",
            "#C9A227",
            "Merit",
            ["#997300", "#ffc000"],
            "Gold",
            true,
        ),
        TemplateConfig::builtin(
            "silver",
            "silver-certificate.jpeg",
            "#708090",
            "Merit",
            ["#a8a8a8", "#e0e0e0"],
            "Silver",
            true,
        ),
        TemplateConfig::builtin(
            "bronze",
            "bronze-certificate.jpeg",
            "#CD7F32",
            "Merit",
            ["#8b4513", "#cd853f"],
            "Bronze",
            true,
        ),
        TemplateConfig::builtin(
            "participation",
            "participation-certificate.jpeg",
            "#8B7355",
            "Participation",
            ["#8e8372", "#efe5c5"],
            "participating",
            false,
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/template/registry.rs"]
mod tests;
