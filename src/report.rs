use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::pipeline::RunReport;

const RULE_WIDTH: usize = 65;

/// Human-readable run summary, written to stdout by the CLI.
pub struct Summary<'a>(pub &'a RunReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let heavy = "=".repeat(RULE_WIDTH);

        writeln!(f, "{heavy}")?;
        writeln!(
            f,
            "Generated {}/{} certificates successfully!",
            report.succeeded(),
            report.attempted
        )?;
        writeln!(f, "Output folder: {}", report.output_dir.display())?;
        writeln!(f, "{heavy}")?;

        writeln!(f)?;
        writeln!(f, "SUMMARY BY CATEGORY:")?;
        for tally in report.tally.iter().filter(|t| t.count() > 0) {
            writeln!(f)?;
            writeln!(f, "{} ({}):", tally.category.to_uppercase(), tally.count())?;
            for name in &tally.names {
                writeln!(f, "   - {name}")?;
            }
        }

        if !report.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "SKIPPED ({}):", report.failures.len())?;
            for failure in &report.failures {
                writeln!(
                    f,
                    "   - line {}: {} ({}): {}",
                    failure.line,
                    display_name(&failure.name),
                    failure.category,
                    failure.error
                )?;
            }
        }

        if !report.diagnostics.is_empty() {
            writeln!(f)?;
            writeln!(f, "DIAGNOSTICS ({}):", report.diagnostics.len())?;
            for (kind, items) in group_by_kind(&report.diagnostics) {
                writeln!(f, "{} ({}):", kind.label(), items.len())?;
                for d in items {
                    let mut line = String::new();
                    if let Some(n) = d.line {
                        let _ = write!(line, "line {n}: ");
                    }
                    writeln!(f, "   - {line}{}", d.message)?;
                }
            }
        }
        Ok(())
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "<unnamed>" } else { name }
}

// Groups print in declaration order of `DiagnosticKind`.
fn group_by_kind(diagnostics: &[Diagnostic]) -> BTreeMap<DiagnosticKind, Vec<&Diagnostic>> {
    let mut out: BTreeMap<DiagnosticKind, Vec<&Diagnostic>> = BTreeMap::new();
    for d in diagnostics {
        out.entry(d.kind).or_default().push(d);
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/report.rs"]
mod tests;
