use serde::Serialize;

/// Reason a non-fatal diagnostic was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Row field count did not match the header; the row was skipped.
    RowShape,
    /// Optional input source (sponsors) was absent; continued without it.
    SoftMissingInput,
    /// A logo (or other optional asset) was missing and has been omitted.
    MissingAsset,
    /// Certificate type is not registered and fell back to the default template.
    UnknownCategory,
    /// A date field could not be parsed and was left blank.
    DateFormat,
    /// Two records mapped to the same output filename.
    OutputOverwrite,
}

impl DiagnosticKind {
    /// Short human label used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::RowShape => "row shape",
            Self::SoftMissingInput => "missing optional input",
            Self::MissingAsset => "missing asset",
            Self::UnknownCategory => "unknown category",
            Self::DateFormat => "date format",
            Self::OutputOverwrite => "output overwrite",
        }
    }
}

/// Non-fatal observation collected during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Reason.
    pub kind: DiagnosticKind,
    /// 1-based source line, when the diagnostic is tied to a data row.
    pub line: Option<usize>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic and emit it as a `tracing` warning.
    pub fn warn(kind: DiagnosticKind, line: Option<usize>, message: impl Into<String>) -> Self {
        let message = message.into();
        match line {
            Some(line) => tracing::warn!(kind = kind.label(), line, "{message}"),
            None => tracing::warn!(kind = kind.label(), "{message}"),
        }
        Self {
            kind,
            line,
            message,
        }
    }
}
