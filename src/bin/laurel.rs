use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sha2::Digest as _;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "laurel", version, about = "Batch certificate renderer")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one certificate per participant record.
    Render(RenderArgs),
    /// Print the default configuration as JSON.
    Config,
    /// Show registered fonts and the family each text style resolves to.
    Fonts(FontsArgs),
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// JSON configuration file; unspecified fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font directory.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    base: ConfigArgs,

    /// Participant source.
    #[arg(long)]
    participants: Option<PathBuf>,

    /// Sponsor source.
    #[arg(long)]
    sponsors: Option<PathBuf>,

    /// Template background directory.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Base directory for relative sponsor logo paths.
    #[arg(long)]
    logos_root: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output image format.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Render records on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker count for --parallel.
    #[arg(long)]
    threads: Option<usize>,

    /// Fail records whose category is not registered instead of using the fallback template.
    #[arg(long)]
    strict_categories: bool,

    /// Also write the run report as JSON.
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FontsArgs {
    #[command(flatten)]
    base: ConfigArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Jpeg,
    Png,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Config => cmd_config(),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "laurel=debug" } else { "laurel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<laurel::EngineConfig> {
    let mut cfg = match &args.config {
        Some(path) => laurel::EngineConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => laurel::EngineConfig::default(),
    };
    if let Some(dir) = &args.fonts {
        cfg.assets.fonts_dir = dir.clone();
    }
    Ok(cfg)
}

fn make_backend(cfg: &laurel::EngineConfig) -> laurel::CpuBackend {
    let (fonts, diagnostics) = laurel::FontBook::load(&cfg.assets.fonts_dir, &cfg.fonts.faces);
    tracing::info!(faces = fonts.faces().len(), dir = %cfg.assets.fonts_dir.display(), "fonts loaded");
    laurel::CpuBackend::with_diagnostics(fonts, diagnostics)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.base)?;
    if let Some(p) = args.participants {
        cfg.inputs.participants = p;
    }
    if let Some(p) = args.sponsors {
        cfg.inputs.sponsors = p;
    }
    if let Some(p) = args.templates {
        cfg.assets.templates_dir = p;
    }
    if let Some(p) = args.logos_root {
        cfg.assets.logos_root = p;
    }
    if let Some(p) = args.out {
        cfg.output.dir = p;
    }
    if let Some(f) = args.format {
        cfg.output.format = match f {
            FormatChoice::Jpeg => laurel::OutputFormat::Jpeg,
            FormatChoice::Png => laurel::OutputFormat::Png,
        };
    }
    if args.parallel {
        cfg.threading.parallel = true;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if args.strict_categories {
        cfg.category_policy = laurel::CategoryPolicy::Reject;
    }

    let backend = make_backend(&cfg);
    let engine = laurel::CertificateEngine::new(cfg, backend);
    let mut report = engine.run().context("certificate run aborted")?;
    if let Ok(abs) = std::path::absolute(&report.output_dir) {
        report.output_dir = abs;
    }

    print!("{}", laurel::Summary(&report));

    if let Some(path) = args.summary_json {
        write_json(&path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&laurel::EngineConfig::default())
        .context("serialize default config")?;
    println!("{json}");
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.base)?;
    let backend = make_backend(&cfg);

    println!("registered fonts ({}):", cfg.assets.fonts_dir.display());
    for face in backend.fonts().faces() {
        println!("  {}:", face.family);
        println!("    internal: {}", face.internal_name);
        println!("    file:     {}", face.path.display());
        println!("    sha256:   {}", sha256_hex(&face.bytes));
    }

    let families = laurel::RenderBackend::font_families(&backend);
    let styles = cfg
        .fonts
        .styles
        .resolve(&families)
        .context("resolve text styles")?;
    println!("text styles:");
    for (role, style) in styles.roles() {
        println!(
            "  {role:<14} {} {}px {}",
            style.font.family,
            style.font.size_px,
            style.fill.to_hex()
        );
    }
    Ok(())
}

fn write_json(path: &Path, report: &laurel::RunReport) -> anyhow::Result<()> {
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), report)
        .with_context(|| format!("write report '{}'", path.display()))?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
