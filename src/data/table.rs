use std::path::Path;

use anyhow::Context as _;

use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{LaurelError, LaurelResult};

/// One data row, tagged with its 1-based line number in the source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// 1-based source line.
    pub line: usize,
    /// Trimmed field values, quote characters removed.
    pub fields: Vec<String>,
}

/// Delimited text parsed into a header and shape-checked rows.
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Trimmed header names, in column order.
    pub headers: Vec<String>,
    /// Rows whose field count matched the header, in source order.
    pub rows: Vec<Row>,
    /// One `RowShape` diagnostic per skipped row.
    pub diagnostics: Vec<Diagnostic>,
}

impl Table {
    /// Read and parse `path`.
    ///
    /// Returns [`LaurelError::MissingInput`] when the file does not exist; callers decide whether
    /// that is fatal.
    pub fn read(path: &Path, delimiter: char) -> LaurelResult<Self> {
        if !path.is_file() {
            return Err(LaurelError::MissingInput(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read delimited text from '{}'", path.display()))?;
        Ok(Self::parse(&content, delimiter))
    }

    /// Parse delimited text. Blank lines are ignored; the first non-blank line is the header.
    pub fn parse(content: &str, delimiter: char) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Self::default();
        };
        let headers: Vec<String> = header_line
            .split(delimiter)
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut diagnostics = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let fields = split_line(line, delimiter);
            if fields.len() != headers.len() {
                let err = LaurelError::RowShape {
                    line: line_no,
                    expected: headers.len(),
                    found: fields.len(),
                };
                diagnostics.push(Diagnostic::warn(
                    DiagnosticKind::RowShape,
                    Some(line_no),
                    format!("skipping {err}"),
                ));
                continue;
            }
            rows.push(Row {
                line: line_no,
                fields,
            });
        }

        Self {
            headers,
            rows,
            diagnostics,
        }
    }

    /// Column index of `name`, matched case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Split one line on `delimiter`, ignoring delimiters inside `"..."` spans.
///
/// Quote characters toggle the quoted state and are dropped from the output; there is no escape
/// sequence for a literal quote. Every field is trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            out.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    out.push(current.trim().to_string());
    out
}

#[cfg(test)]
#[path = "../../tests/unit/data/table.rs"]
mod tests;
