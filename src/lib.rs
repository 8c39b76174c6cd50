//! Laurel renders award and participation certificates in batch.
//!
//! A run reads a delimited participant source and an optional sponsor source, resolves each
//! record's category to a template, and composites names, event details, dates, sponsor logos
//! and a certificate ID onto the template background:
//!
//! - Build an [`EngineConfig`] (defaults reproduce the stock layout)
//! - Create a [`RenderBackend`], normally [`CpuBackend`]
//! - Run a [`CertificateEngine`] and inspect the [`RunReport`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod data;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod template;
pub(crate) mod text;

/// Certificate ID generation.
pub mod cert_id;
/// Engine configuration.
pub mod config;
/// Batch orchestration and structured results.
pub mod pipeline;
/// Text summary of a run.
pub mod report;

pub use crate::foundation::core::{Affine, Point, Rect, Rgba8, Size};
pub use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
pub use crate::foundation::error::{AssetKind, LaurelError, LaurelResult};

pub use crate::assets::decode::load_image_file;
pub use crate::assets::store::{AssetRoots, PreparedAssets, RasterImage};
pub use crate::cert_id::{Clock, FixedClock, SystemClock, generate_id};
pub use crate::config::{
    AssetConfig, EngineConfig, FontConfig, InputConfig, OutputConfig, ThreadingConfig,
};
pub use crate::data::records::{
    ParticipantRecord, SponsorGroups, SponsorRecord, read_participants, read_sponsors,
};
pub use crate::layout::cursor::{CertificatePlan, LayoutConfig};
pub use crate::layout::logos::{LogoLayoutParams, LogoPlacement, layout_logos};
pub use crate::pipeline::{
    CategoryTally, CertificateEngine, CertificateResult, RecordFailure, RunReport,
    output_file_name,
};
pub use crate::render::certificate::{CertificateComposer, CertificateContent};
pub use crate::render::cpu::{CpuBackend, CpuSurface};
pub use crate::render::encode::{DEFAULT_JPEG_QUALITY, OutputFormat, encode_frame, write_frame};
pub use crate::render::surface::{Fill, FrameRgba, RenderBackend, Surface};
pub use crate::report::Summary;
pub use crate::template::registry::{CategoryPolicy, TemplateConfig, TemplateRegistry};
pub use crate::text::date::OrdinalDate;
pub use crate::text::fonts::{
    FontBook, FontFaceConfig, LoadedFace, ResolvedFont, StyleSpec, StyleSpecs, TextStyle,
    TextStyles,
};
