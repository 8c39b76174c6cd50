use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::assets::store::{PreparedAssets, RasterImage};
use crate::cert_id::{Clock, SystemClock, generate_id};
use crate::config::EngineConfig;
use crate::data::records::{ParticipantRecord, SponsorGroups, read_participants, read_sponsors};
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::{LaurelError, LaurelResult};
use crate::render::certificate::{CertificateComposer, CertificateContent};
use crate::render::encode::{OutputFormat, write_frame};
use crate::render::surface::{RenderBackend, Surface};
use crate::template::registry::TemplateRegistry;
use crate::text::fonts::TextStyles;

/// One certificate written to disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificateResult {
    /// 0-based position in the participant source.
    pub index: usize,
    /// 1-based source line.
    pub line: usize,
    /// Full display name.
    pub name: String,
    /// Template key the record rendered with.
    pub category: String,
    /// Generated certificate ID.
    pub id: String,
    /// Written file.
    pub path: PathBuf,
}

/// A record that produced no certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// 0-based position in the participant source.
    pub index: usize,
    /// 1-based source line.
    pub line: usize,
    /// Full display name.
    pub name: String,
    /// Category as written in the source.
    pub category: String,
    /// Rendered error message.
    pub error: String,
}

/// Successes for one registered category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    /// Template key.
    pub category: String,
    /// Names rendered with this template, in source order.
    pub names: Vec<String>,
}

impl CategoryTally {
    /// Number of certificates in this category.
    pub fn count(&self) -> usize {
        self.names.len()
    }
}

/// Structured outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Records read from the participant source.
    pub attempted: usize,
    /// Directory certificates were written to.
    pub output_dir: PathBuf,
    /// Written certificates in source order.
    pub results: Vec<CertificateResult>,
    /// Skipped records in source order.
    pub failures: Vec<RecordFailure>,
    /// Non-fatal observations: run-level first, then per record in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Per-category successes in registry order.
    pub tally: Vec<CategoryTally>,
}

impl RunReport {
    /// Number of certificates written.
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Batch orchestrator: reads the sources, prepares assets and renders every record.
pub struct CertificateEngine<B> {
    config: EngineConfig,
    backend: B,
    clock: Box<dyn Clock>,
}

impl<B: RenderBackend> CertificateEngine<B> {
    /// Engine stamping IDs with the system clock.
    pub fn new(config: EngineConfig, backend: B) -> Self {
        Self::with_clock(config, backend, SystemClock)
    }

    /// Engine stamping IDs with `clock`.
    pub fn with_clock(config: EngineConfig, backend: B, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            backend,
            clock: Box::new(clock),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the whole batch.
    ///
    /// Only a missing or empty participant source, an invalid configuration, a run without usable
    /// fonts or an uncreatable output directory abort the run. Everything else is isolated to a
    /// record and reported.
    #[tracing::instrument(skip(self), fields(participants = %self.config.inputs.participants.display()))]
    pub fn run(&self) -> LaurelResult<RunReport> {
        let cfg = &self.config;
        cfg.validate()?;
        let registry = cfg.registry()?;

        let participants = read_participants(&cfg.inputs.participants, cfg.inputs.delimiter)?;
        tracing::info!(records = participants.records.len(), "participants loaded");
        let sponsors = read_sponsors(&cfg.inputs.sponsors, cfg.inputs.delimiter)?;
        tracing::info!(
            sponsors = sponsors.groups.sponsor_count(),
            events = sponsors.groups.event_count(),
            "sponsors loaded"
        );

        let mut diagnostics = self.backend.diagnostics();
        diagnostics.extend(participants.diagnostics);
        diagnostics.extend(sponsors.diagnostics);

        let styles = cfg.fonts.styles.resolve(&self.backend.font_families())?;
        let records = participants.records;
        let (assets, asset_diags) =
            PreparedAssets::prepare(&records, &sponsors.groups, &registry, &cfg.asset_roots());
        diagnostics.extend(asset_diags);
        tracing::info!(logos = assets.logo_count(), "assets prepared");

        std::fs::create_dir_all(&cfg.output.dir).map_err(|e| {
            LaurelError::encode_write(format!(
                "create output dir '{}': {e}",
                cfg.output.dir.display()
            ))
        })?;

        let jobs = plan_jobs(&records, &cfg.output.dir, cfg.output.format, &mut diagnostics);
        let run = RunContext {
            registry: &registry,
            sponsors: &sponsors.groups,
            assets: &assets,
            styles: &styles,
        };

        let outcomes: Vec<Outcome> = if cfg.threading.parallel {
            let pool = build_thread_pool(cfg.threading.threads)?;
            tracing::info!(threads = pool.current_num_threads(), "rendering in parallel");
            pool.install(|| {
                jobs.par_iter()
                    .map(|job| self.render_job(&run, job))
                    .collect()
            })
        } else {
            jobs.iter().map(|job| self.render_job(&run, job)).collect()
        };

        let mut report = RunReport {
            attempted: records.len(),
            output_dir: cfg.output.dir.clone(),
            tally: registry
                .templates()
                .iter()
                .map(|t| CategoryTally {
                    category: t.key.clone(),
                    names: Vec::new(),
                })
                .collect(),
            ..RunReport::default()
        };

        for (job, outcome) in jobs.iter().zip(outcomes) {
            report.diagnostics.extend(outcome.diagnostics);
            match outcome.result {
                Ok(result) => {
                    if let Some(t) = report.tally.iter_mut().find(|t| t.category == result.category) {
                        t.names.push(result.name.clone());
                    }
                    report.results.push(result);
                }
                Err(e) => {
                    tracing::error!(line = job.record.source_line, "record skipped: {e}");
                    report.failures.push(RecordFailure {
                        index: job.index,
                        line: job.record.source_line,
                        name: job.record.full_name(),
                        category: job.record.certificate_type.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        diagnostics.append(&mut report.diagnostics);
        report.diagnostics = diagnostics;

        tracing::info!(
            succeeded = report.succeeded(),
            attempted = report.attempted,
            failed = report.failures.len(),
            "run finished"
        );
        Ok(report)
    }

    fn render_job(&self, run: &RunContext<'_>, job: &Job<'_>) -> Outcome {
        let mut diagnostics = Vec::new();
        let result = self.render_record(run, job, &mut diagnostics);
        Outcome {
            result,
            diagnostics,
        }
    }

    fn render_record(
        &self,
        run: &RunContext<'_>,
        job: &Job<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> LaurelResult<CertificateResult> {
        let cfg = &self.config;
        let record = job.record;
        let name = record.full_name();
        tracing::debug!(index = job.index, line = record.source_line, %name, category = %record.certificate_type, "rendering");

        let resolved = run
            .registry
            .resolve_with_policy(&record.certificate_type, cfg.category_policy)?;
        if resolved.fell_back {
            diagnostics.push(Diagnostic::warn(
                DiagnosticKind::UnknownCategory,
                Some(record.source_line),
                format!(
                    "category '{}' is not registered; using '{}'",
                    record.certificate_type.trim(),
                    resolved.template.key
                ),
            ));
        }
        let template = resolved.template;
        let background = run.assets.background(&template.key)?;

        let logos: Vec<Arc<RasterImage>> = run
            .sponsors
            .for_event(&record.event_name)
            .iter()
            .filter_map(|s| run.assets.logo(&s.logo_path).cloned())
            .collect();

        let id = generate_id(record, job.index, self.clock.now_millis());
        let composer = CertificateComposer {
            layout: &cfg.layout,
            logo_params: &cfg.logos,
            styles: run.styles,
        };
        let content = CertificateContent {
            record,
            template,
            logos: &logos,
            cert_id: &id,
        };

        let mut surface = self.backend.create_surface(background)?;
        diagnostics.extend(composer.compose(&mut surface, &content)?);
        let frame = surface.finish()?;
        write_frame(&frame, &job.output_path, cfg.output.format, cfg.output.quality)?;
        tracing::debug!(path = %job.output_path.display(), %id, "certificate written");

        Ok(CertificateResult {
            index: job.index,
            line: record.source_line,
            name,
            category: template.key.clone(),
            id,
            path: job.output_path.clone(),
        })
    }
}

struct RunContext<'a> {
    registry: &'a TemplateRegistry,
    sponsors: &'a SponsorGroups,
    assets: &'a PreparedAssets,
    styles: &'a TextStyles,
}

struct Job<'a> {
    index: usize,
    record: &'a ParticipantRecord,
    output_path: PathBuf,
}

struct Outcome {
    result: LaurelResult<CertificateResult>,
    diagnostics: Vec<Diagnostic>,
}

// Output paths are fixed before dispatch so collisions are reported in source order.
fn plan_jobs<'a>(
    records: &'a [ParticipantRecord],
    output_dir: &Path,
    format: OutputFormat,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Job<'a>> {
    let mut first_use: HashMap<String, usize> = HashMap::new();
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let file_name = output_file_name(record, format);
            if let Some(&earlier) = first_use.get(&file_name) {
                diagnostics.push(Diagnostic::warn(
                    DiagnosticKind::OutputOverwrite,
                    Some(record.source_line),
                    format!("'{file_name}' was already produced by line {earlier} and will be overwritten"),
                ));
            } else {
                first_use.insert(file_name.clone(), record.source_line);
            }
            Job {
                index,
                record,
                output_path: output_dir.join(file_name),
            }
        })
        .collect()
}

/// `{first}_{last}_{type}.{ext}`.
///
/// Names are reduced to ASCII letters and digits; blank ones become `Unknown`. The certificate
/// type is kept as written, trimmed, with path separators replaced by `_`.
pub fn output_file_name(record: &ParticipantRecord, format: OutputFormat) -> String {
    let or_unknown = |s: &str| {
        if s.trim().is_empty() {
            "Unknown".to_owned()
        } else {
            sanitize(s)
        }
    };
    format!(
        "{}_{}_{}.{}",
        or_unknown(&record.first_name),
        or_unknown(&record.last_name),
        record.certificate_type.trim().replace(['/', '\\'], "_"),
        format.extension()
    )
}

fn sanitize(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn build_thread_pool(threads: Option<usize>) -> LaurelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LaurelError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LaurelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
