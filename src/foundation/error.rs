use std::path::PathBuf;

/// Convenience result type used across Laurel.
pub type LaurelResult<T> = Result<T, LaurelError>;

/// Kind of on-disk asset a [`LaurelError::MissingAsset`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Template background raster.
    Template,
    /// Sponsor logo (raster or SVG).
    Logo,
    /// Font file.
    Font,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Template => "template",
            Self::Logo => "logo",
            Self::Font => "font",
        })
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LaurelError {
    /// A required input source does not exist. Fatal for the run.
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// The participant source exists but yields no usable records.
    #[error("no usable records in {}", .0.display())]
    EmptyInput(PathBuf),

    /// A data row's field count does not match its header.
    #[error("row {line}: expected {expected} fields, found {found}")]
    RowShape {
        /// 1-based line number in the source file.
        line: usize,
        /// Header field count.
        expected: usize,
        /// Field count of the offending row.
        found: usize,
    },

    /// A template, logo or font file is absent or unreadable.
    #[error("missing {kind} asset: {}", path.display())]
    MissingAsset {
        /// What the asset was needed for.
        kind: AssetKind,
        /// Resolved path that was checked.
        path: PathBuf,
    },

    /// Category key not registered while the strict category policy is active.
    #[error("unknown certificate category '{0}'")]
    UnknownCategory(String),

    /// Output image could not be encoded or written.
    #[error("encode/write error: {0}")]
    EncodeWrite(String),

    /// Invalid configuration or user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised while drawing onto a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaurelError {
    /// Build a [`LaurelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LaurelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LaurelError::EncodeWrite`] value.
    pub fn encode_write(msg: impl Into<String>) -> Self {
        Self::EncodeWrite(msg.into())
    }

    /// Build a [`LaurelError::MissingAsset`] value.
    pub fn missing_asset(kind: AssetKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset {
            kind,
            path: path.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
